// ⚠️ Error kinds for the loan ledger core
//
// Validation -> bad or out-of-policy input, caller re-prompts
// Storage    -> the data file could not be read or written
// Parse      -> one stored row is malformed (logged and skipped by the reader)
// Overflow   -> a total over the saved loans does not fit in a Decimal

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    /// Input rejected by a business rule or a model invariant
    #[error("{0}")]
    Validation(String),

    /// Reading or writing the data file failed
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A stored row could not be turned back into a loan
    #[error("Baris data tidak valid: {0}")]
    Parse(String),

    /// Aggregate figure too large to represent
    #[error("Total {0} terlalu besar untuk dihitung")]
    Overflow(&'static str),
}

impl LoanError {
    pub fn validation(message: impl Into<String>) -> Self {
        LoanError::Validation(message.into())
    }

    pub fn storage<E>(context: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        LoanError::Storage {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LoanError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
