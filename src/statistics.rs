// 📊 Statistics Aggregator
// Summary figures over a loan collection, computed once per snapshot

use crate::error::{LoanError, Result};
use crate::model::{Loan, LoanKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Point-in-time summary of a sequence of loans.
///
/// Every figure is computed in [`StatisticsSnapshot::from_loans`]; the snapshot keeps
/// no reference to the loans, so it never reflects later changes to the store.
/// Averages and percentages over an empty sequence are zero. Totals that do not fit
/// in a `Decimal` give [`LoanError::Overflow`] instead of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSnapshot {
    pub total_data: usize,
    pub total_pinjaman: Decimal,
    pub total_angsuran: Decimal,
    pub rata_rata_pinjaman: Decimal,
    pub rata_rata_angsuran: Decimal,
    pub jumlah_konsumtif: usize,
    pub jumlah_modal: usize,
    pub persentase_konsumtif: Decimal,
    pub persentase_modal: Decimal,
    pub total_bunga: Decimal,
    pub total_bayar_keseluruhan: Decimal,
}

impl StatisticsSnapshot {
    pub fn from_loans(loans: &[Loan]) -> Result<Self> {
        let total_data = loans.len();

        let total_pinjaman = checked_total(loans, Loan::principal, "pinjaman")?;
        let total_angsuran = checked_total(loans, Loan::installment, "angsuran")?;
        let total_bunga = checked_total(loans, Loan::total_interest, "bunga")?;
        let total_bayar_keseluruhan = checked_total(loans, Loan::total_payable, "bayar")?;

        let jumlah_konsumtif = count_kind(loans, LoanKind::Consumer);
        let jumlah_modal = count_kind(loans, LoanKind::Capital);

        Ok(StatisticsSnapshot {
            total_data,
            total_pinjaman,
            total_angsuran,
            rata_rata_pinjaman: average(total_pinjaman, total_data),
            rata_rata_angsuran: average(total_angsuran, total_data),
            jumlah_konsumtif,
            jumlah_modal,
            persentase_konsumtif: percentage(jumlah_konsumtif, total_data),
            persentase_modal: percentage(jumlah_modal, total_data),
            total_bunga,
            total_bayar_keseluruhan,
        })
    }

    /// Number of loans of one kind
    pub fn count_for(&self, kind: LoanKind) -> usize {
        match kind {
            LoanKind::Consumer => self.jumlah_konsumtif,
            LoanKind::Capital => self.jumlah_modal,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_data == 0
    }
}

fn checked_total(loans: &[Loan], figure: fn(&Loan) -> Decimal, label: &'static str) -> Result<Decimal> {
    loans
        .iter()
        .try_fold(Decimal::ZERO, |total, loan| total.checked_add(figure(loan)))
        .ok_or(LoanError::Overflow(label))
}

fn count_kind(loans: &[Loan], kind: LoanKind) -> usize {
    loans.iter().filter(|loan| loan.kind() == kind).count()
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total / Decimal::from(count)
}

fn percentage(part: usize, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) * dec!(100) / Decimal::from(count)
}

// ============================================================================
// TESTS
// ============================================================================
