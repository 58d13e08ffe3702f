// Koperasi Loan Ledger - Core Library
// Exposes all modules for use in the CLI and tests

pub mod error;
pub mod model;
pub mod statistics;
pub mod storage;
pub mod service;
pub mod migration;  // Legacy pinjaman.txt import
pub mod config;
pub mod logging;
pub mod console;    // Interactive menu + report screen

// Re-export commonly used types
pub use error::{LoanError, Result};
pub use model::{Loan, LoanKind, LoanRecord, Member};
pub use statistics::StatisticsSnapshot;
pub use storage::{CsvLoanRepository, LoanRepository, CSV_HEADERS};
pub use service::{validate_kind_code, LoanService, MAX_TERM_MONTHS, MIN_LOAN_AMOUNT};
pub use migration::{migrate_legacy, parse_legacy_line, MigrationReport};
pub use config::AppConfig;
pub use console::{format_rupiah, Console};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
