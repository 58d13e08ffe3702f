// 🧮 Loan Service - business rules + orchestration
//
// The only entry point that accepts raw input. Everything it hands to storage has
// passed the rules below and the model's own invariants.

use crate::error::{LoanError, Result};
use crate::model::{Loan, LoanKind, Member};
use crate::statistics::StatisticsSnapshot;
use crate::storage::LoanRepository;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Smallest loan the cooperative grants (Rp)
pub const MIN_LOAN_AMOUNT: Decimal = dec!(100000);

/// Longest term allowed: 10 years
pub const MAX_TERM_MONTHS: i64 = 120;

const MEMBER_ID_LENGTH: usize = 4;

/// Kind code check shared by `create_loan` and input screens that need the kind
/// before the rest of the form is filled in
pub fn validate_kind_code(kind_code: &str) -> Result<LoanKind> {
    LoanKind::from_code(kind_code)
        .map_err(|_| LoanError::validation("Kode jenis harus A (Konsumtif) atau B (Modal)"))
}

pub struct LoanService<R: LoanRepository> {
    repository: R,
}

impl<R: LoanRepository> LoanService<R> {
    pub fn new(repository: R) -> Self {
        LoanService { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Validate raw input and build a loan. Nothing is persisted.
    ///
    /// Rules are checked in a fixed order and the first failure is returned:
    /// member id present, member id is 4 digits, name present, kind code A/B,
    /// amount > 0, term > 0, term <= 120, amount >= 100,000.
    /// Fractions of a rupiah are dropped from the accepted amount.
    pub fn create_loan(
        &self,
        member_id: &str,
        member_name: &str,
        kind_code: &str,
        amount: Decimal,
        term_months: i64,
    ) -> Result<Loan> {
        let member_id = member_id.trim();
        let kind_code = kind_code.trim();

        if member_id.is_empty() {
            return Err(LoanError::validation("Nomor anggota tidak boleh kosong"));
        }
        if member_id.len() != MEMBER_ID_LENGTH || !member_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LoanError::validation(
                "Nomor anggota harus 4 digit angka (contoh: 1001)",
            ));
        }
        if member_name.trim().is_empty() {
            return Err(LoanError::validation("Nama anggota tidak boleh kosong"));
        }
        let kind = validate_kind_code(kind_code)?;
        if amount <= Decimal::ZERO {
            return Err(LoanError::validation("Jumlah pinjaman harus lebih dari 0"));
        }
        if term_months <= 0 {
            return Err(LoanError::validation("Lama pinjaman harus lebih dari 0 bulan"));
        }
        if term_months > MAX_TERM_MONTHS {
            return Err(LoanError::validation("Lama pinjaman maksimal 120 bulan (10 tahun)"));
        }
        if amount < MIN_LOAN_AMOUNT {
            return Err(LoanError::validation("Jumlah pinjaman minimal Rp 100,000"));
        }

        let term_months = u32::try_from(term_months)
            .map_err(|_| LoanError::validation("Lama pinjaman maksimal 120 bulan (10 tahun)"))?;
        let member = Member::new(member_id, member_name)?;

        // Stored in whole rupiah, so the loan shown for confirmation is the one saved
        Loan::new(member, kind, amount.trunc(), term_months)
    }

    pub fn save(&mut self, loan: &Loan) -> Result<()> {
        self.repository.append(loan)
    }

    pub fn list_all(&mut self) -> Result<Vec<Loan>> {
        self.repository.read_all()
    }

    pub fn list_by_member(&mut self, member_id: &str) -> Result<Vec<Loan>> {
        self.repository.read_by_member(member_id)
    }

    /// The last `count` loans, oldest first
    pub fn recent(&mut self, count: usize) -> Result<Vec<Loan>> {
        let mut loans = self.repository.read_all()?;
        let start = loans.len().saturating_sub(count);
        Ok(loans.split_off(start))
    }

    pub fn statistics(&mut self) -> Result<StatisticsSnapshot> {
        let loans = self.repository.read_all()?;
        StatisticsSnapshot::from_loans(&loans)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.repository.clear()
    }
}

// ============================================================================
// TESTS
// ============================================================================
