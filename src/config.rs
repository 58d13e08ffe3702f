// ⚙️ Application configuration
// Data file path: --data flag > KOPERASI_DATA_FILE > pinjaman.csv

use crossterm::tty::IsTty;
use std::env;
use std::io;
use std::path::PathBuf;

pub const DATA_FILE_ENV: &str = "KOPERASI_DATA_FILE";
pub const DEFAULT_DATA_FILE: &str = "pinjaman.csv";
pub const DEFAULT_LOG_FILE: &str = "koperasi.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Loan data file (CSV)
    pub data_file: PathBuf,

    /// Log file, rotated at start-up
    pub log_file: PathBuf,

    /// ANSI colours and screen clearing in the console
    pub use_colors: bool,
}

impl AppConfig {
    /// Build from the process environment
    pub fn from_env(data_flag: Option<PathBuf>) -> Self {
        AppConfig::resolve(
            data_flag,
            env::var(DATA_FILE_ENV).ok(),
            io::stdout().is_tty(),
        )
    }

    pub fn resolve(data_flag: Option<PathBuf>, env_value: Option<String>, use_colors: bool) -> Self {
        let data_file = data_flag
            .or_else(|| {
                env_value
                    .filter(|value| !value.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        AppConfig {
            data_file,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            use_colors,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::resolve(None, None, false)
    }
}
