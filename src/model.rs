// 💰 Loan Domain Model
// Member, LoanKind and Loan: immutable values with derived financial figures
//
// All money math uses rust_decimal. Conversion to display formats happens in the
// console layer only.

use crate::error::{LoanError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// rate (%) / 100 / 12 months, folded into one divisor
const MONTHLY_RATE_DIVISOR: Decimal = dec!(1200);

// ============================================================================
// MEMBER
// ============================================================================

/// Cooperative member ("anggota"). Id and name are stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: String,
    name: String,
}

impl Member {
    pub fn new(id: &str, name: &str) -> Result<Self> {
        let id = id.trim();
        let name = name.trim();

        if id.is_empty() {
            return Err(LoanError::validation("Nomor anggota tidak boleh kosong"));
        }
        if name.is_empty() {
            return Err(LoanError::validation("Nama anggota tidak boleh kosong"));
        }

        Ok(Member {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// LOAN KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanKind {
    /// Konsumtif - 15% per year
    Consumer,

    /// Modal (working capital) - 10% per year
    Capital,
}

impl LoanKind {
    /// Every kind, in menu order
    pub const ALL: [LoanKind; 2] = [LoanKind::Consumer, LoanKind::Capital];

    /// Short code used in input and in the data file
    pub fn code(&self) -> &'static str {
        match self {
            LoanKind::Consumer => "A",
            LoanKind::Capital => "B",
        }
    }

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            LoanKind::Consumer => "Konsumtif",
            LoanKind::Capital => "Modal",
        }
    }

    /// Annual interest rate in percent
    pub fn rate(&self) -> u32 {
        match self {
            LoanKind::Consumer => 15,
            LoanKind::Capital => 10,
        }
    }

    /// Look up a kind by its code (case-insensitive)
    pub fn from_code(code: &str) -> Result<Self> {
        let wanted = code.trim();
        LoanKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LoanError::validation(format!("Kode pinjaman tidak valid: {}", code)))
    }
}

impl fmt::Display for LoanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// LOAN
// ============================================================================

/// A loan taken by one member.
///
/// Derived figures are computed once in [`Loan::new`] and never change, so repeated
/// reads always return the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    member: Member,
    kind: LoanKind,
    principal: Decimal,
    term_months: u32,

    // Derived (computed at construction)
    monthly_interest: Decimal,
    monthly_principal: Decimal,
    installment: Decimal,
    total_interest: Decimal,
    total_payable: Decimal,
}

impl Loan {
    pub fn new(member: Member, kind: LoanKind, principal: Decimal, term_months: u32) -> Result<Self> {
        if principal <= Decimal::ZERO {
            return Err(LoanError::validation("Jumlah pinjaman harus lebih dari 0"));
        }
        if term_months == 0 {
            return Err(LoanError::validation("Lama pinjaman harus lebih dari 0"));
        }

        let overflow = || LoanError::validation("Jumlah pinjaman terlalu besar");
        let rate = Decimal::from(kind.rate());
        let term = Decimal::from(term_months);

        // (rate / 100 / 12) * principal, multiplied first to keep exact results exact
        let monthly_interest = principal
            .checked_mul(rate)
            .and_then(|v| v.checked_div(MONTHLY_RATE_DIVISOR))
            .ok_or_else(overflow)?;
        let monthly_principal = principal.checked_div(term).ok_or_else(overflow)?;
        let installment = monthly_interest
            .checked_add(monthly_principal)
            .ok_or_else(overflow)?;
        // monthly_interest * term
        let total_interest = principal
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(term))
            .and_then(|v| v.checked_div(MONTHLY_RATE_DIVISOR))
            .ok_or_else(overflow)?;
        let total_payable = principal.checked_add(total_interest).ok_or_else(overflow)?;

        Ok(Loan {
            member,
            kind,
            principal,
            term_months,
            monthly_interest,
            monthly_principal,
            installment,
            total_interest,
            total_payable,
        })
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn kind(&self) -> LoanKind {
        self.kind
    }

    pub fn principal(&self) -> Decimal {
        self.principal
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    /// Interest portion of each monthly payment
    pub fn monthly_interest(&self) -> Decimal {
        self.monthly_interest
    }

    /// Principal portion of each monthly payment
    pub fn monthly_principal(&self) -> Decimal {
        self.monthly_principal
    }

    /// Fixed monthly payment ("angsuran")
    pub fn installment(&self) -> Decimal {
        self.installment
    }

    pub fn total_interest(&self) -> Decimal {
        self.total_interest
    }

    pub fn total_payable(&self) -> Decimal {
        self.total_payable
    }

    /// Flatten into primitive fields for storage or display
    pub fn to_record(&self) -> LoanRecord {
        LoanRecord {
            nomor_anggota: self.member.id.clone(),
            nama_anggota: self.member.name.clone(),
            kode_pinjaman: self.kind.code().to_string(),
            jenis_pinjaman: self.kind.name().to_string(),
            tingkat_bunga: self.kind.rate(),
            jumlah_pinjaman: self.principal,
            lama_bulan: self.term_months,
            angsuran: self.installment,
        }
    }

    /// Rebuild a loan from a record.
    ///
    /// The kind comes from `kode_pinjaman`; the stored kind name, rate and
    /// installment are not trusted and are derived again.
    pub fn from_record(record: &LoanRecord) -> Result<Self> {
        let member = Member::new(&record.nomor_anggota, &record.nama_anggota)?;
        let kind = LoanKind::from_code(&record.kode_pinjaman)?;
        Loan::new(member, kind, record.jumlah_pinjaman, record.lama_bulan)
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pinjaman({}, {}, Rp{}, {} bulan)",
            self.member.name,
            self.kind.name(),
            self.principal.round_dp(0),
            self.term_months
        )
    }
}

// ============================================================================
// LOAN RECORD
// ============================================================================

/// Flat view of a loan, keyed by the field names used in reports and exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub nomor_anggota: String,
    pub nama_anggota: String,
    pub kode_pinjaman: String,
    pub jenis_pinjaman: String,
    pub tingkat_bunga: u32,
    pub jumlah_pinjaman: Decimal,
    pub lama_bulan: u32,
    pub angsuran: Decimal,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_loan(kind: LoanKind, principal: Decimal, term: u32) -> Loan {
        let member = Member::new("1001", "Budi Santoso").unwrap();
        Loan::new(member, kind, principal, term).unwrap()
    }

    #[test]
    fn test_member_trims_fields() {
        let member = Member::new("  1001 ", "  Budi  ").unwrap();
        assert_eq!(member.id(), "1001");
        assert_eq!(member.name(), "Budi");
    }

    #[test]
    fn test_member_rejects_blank_fields() {
        assert!(Member::new("", "Budi").unwrap_err().is_validation());
        assert!(Member::new("   ", "Budi").is_err());
        assert!(Member::new("1001", "").is_err());
        assert!(Member::new("1001", "  \t").is_err());
    }

    #[test]
    fn test_kind_lookup_is_case_insensitive() {
        assert_eq!(LoanKind::from_code("A").unwrap(), LoanKind::Consumer);
        assert_eq!(LoanKind::from_code("a").unwrap(), LoanKind::Consumer);
        assert_eq!(LoanKind::from_code("b").unwrap(), LoanKind::Capital);
        assert_eq!(LoanKind::from_code(" B ").unwrap(), LoanKind::Capital);
    }

    #[test]
    fn test_kind_lookup_unknown_code() {
        let err = LoanKind::from_code("C").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("C"));
        assert!(LoanKind::from_code("").is_err());
    }

    #[test]
    fn test_kind_table() {
        assert_eq!(LoanKind::Consumer.code(), "A");
        assert_eq!(LoanKind::Consumer.name(), "Konsumtif");
        assert_eq!(LoanKind::Consumer.rate(), 15);
        assert_eq!(LoanKind::Capital.code(), "B");
        assert_eq!(LoanKind::Capital.name(), "Modal");
        assert_eq!(LoanKind::Capital.rate(), 10);
    }

    #[test]
    fn test_loan_rejects_non_positive_principal() {
        let member = Member::new("1001", "Budi").unwrap();
        assert!(Loan::new(member.clone(), LoanKind::Consumer, Decimal::ZERO, 12).is_err());
        assert!(Loan::new(member, LoanKind::Consumer, dec!(-5), 12).is_err());
    }

    #[test]
    fn test_loan_rejects_zero_term() {
        let member = Member::new("1001", "Budi").unwrap();
        let err = Loan::new(member, LoanKind::Consumer, dec!(1000000), 0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_loan_rejects_overflowing_principal() {
        let member = Member::new("1001", "Budi").unwrap();
        let result = Loan::new(member, LoanKind::Consumer, Decimal::MAX, 120);
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_consumer_loan_figures() {
        let loan = create_test_loan(LoanKind::Consumer, dec!(10000000), 12);

        assert_eq!(loan.monthly_interest(), dec!(125000));
        assert_eq!(loan.monthly_principal().round_dp(2), dec!(833333.33));
        assert_eq!(loan.installment().round_dp(2), dec!(958333.33));
        assert_eq!(loan.total_interest(), dec!(1500000));
        assert_eq!(loan.total_payable(), dec!(11500000));
    }

    #[test]
    fn test_capital_loan_figures() {
        let loan = create_test_loan(LoanKind::Capital, dec!(5000000), 24);

        assert_eq!(loan.monthly_interest().round_dp(2), dec!(41666.67));
        assert_eq!(loan.monthly_principal().round_dp(2), dec!(208333.33));
        assert_eq!(loan.installment().round_dp(2), dec!(250000.00));
        assert_eq!(loan.total_interest(), dec!(1000000));
        assert_eq!(loan.total_payable(), dec!(6000000));
    }

    #[test]
    fn test_installment_is_stable() {
        let loan = create_test_loan(LoanKind::Capital, dec!(7500000), 36);
        let first = loan.installment();
        assert_eq!(loan.installment(), first);
        assert_eq!(loan.clone().installment(), first);
    }

    #[test]
    fn test_to_record_fields() {
        let loan = create_test_loan(LoanKind::Consumer, dec!(10000000), 12);
        let record = loan.to_record();

        assert_eq!(record.nomor_anggota, "1001");
        assert_eq!(record.nama_anggota, "Budi Santoso");
        assert_eq!(record.kode_pinjaman, "A");
        assert_eq!(record.jenis_pinjaman, "Konsumtif");
        assert_eq!(record.tingkat_bunga, 15);
        assert_eq!(record.jumlah_pinjaman, dec!(10000000));
        assert_eq!(record.lama_bulan, 12);
        assert_eq!(record.angsuran, loan.installment());
    }

    #[test]
    fn test_from_record_uses_code_not_stored_name() {
        let loan = create_test_loan(LoanKind::Capital, dec!(2000000), 10);
        let mut record = loan.to_record();
        record.jenis_pinjaman = "Konsumtif".to_string();
        record.tingkat_bunga = 99;
        record.angsuran = dec!(1);

        let rebuilt = Loan::from_record(&record).unwrap();
        assert_eq!(rebuilt.kind(), LoanKind::Capital);
        assert_eq!(rebuilt, loan);
    }

    #[test]
    fn test_from_record_rejects_bad_fields() {
        let loan = create_test_loan(LoanKind::Consumer, dec!(2000000), 10);

        let mut record = loan.to_record();
        record.kode_pinjaman = "Z".to_string();
        assert!(Loan::from_record(&record).is_err());

        let mut record = loan.to_record();
        record.nama_anggota = " ".to_string();
        assert!(Loan::from_record(&record).is_err());

        let mut record = loan.to_record();
        record.lama_bulan = 0;
        assert!(Loan::from_record(&record).is_err());
    }

    #[test]
    fn test_record_json_missing_field_rejected() {
        let json = r#"{"nomor_anggota":"1001","nama_anggota":"Budi","kode_pinjaman":"A"}"#;
        assert!(serde_json::from_str::<LoanRecord>(json).is_err());
    }

    #[test]
    fn test_display() {
        let loan = create_test_loan(LoanKind::Consumer, dec!(1500000), 6);
        assert_eq!(loan.to_string(), "Pinjaman(Budi Santoso, Konsumtif, Rp1500000, 6 bulan)");
    }

    proptest! {
        #[test]
        fn prop_installment_matches_formula(amount in 1u64..1_000_000_000_000u64, term in 1u32..=120, capital in any::<bool>()) {
            let kind = if capital { LoanKind::Capital } else { LoanKind::Consumer };
            let principal = Decimal::from(amount);
            let loan = create_test_loan(kind, principal, term);

            let rate = Decimal::from(kind.rate());
            let expected = (rate / dec!(100) / dec!(12)) * principal + principal / Decimal::from(term);
            prop_assert!((loan.installment() - expected).abs() < dec!(0.000001));
        }

        #[test]
        fn prop_record_round_trip(amount in 1u64..1_000_000_000_000u64, term in 1u32..=120, capital in any::<bool>(), id in "[0-9]{4}", name in "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]") {
            let kind = if capital { LoanKind::Capital } else { LoanKind::Consumer };
            let member = Member::new(&id, &name).unwrap();
            let loan = Loan::new(member, kind, Decimal::from(amount), term).unwrap();

            let rebuilt = Loan::from_record(&loan.to_record()).unwrap();
            prop_assert_eq!(rebuilt, loan);
        }
    }
}
