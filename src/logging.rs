// 📝 Logging setup
//
// File layer: INFO and above (RUST_LOG overrides), no ANSI
// Console layer: WARN and above on stderr
// The log file is rotated at start-up once it passes MAX_LOG_BYTES.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// 5 MiB
pub const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;

/// Rotated files kept: koperasi.log.1 .. koperasi.log.3
pub const LOG_BACKUPS: usize = 3;

pub fn init(config: &AppConfig) -> Result<()> {
    rotate_if_needed(&config.log_file, MAX_LOG_BYTES, LOG_BACKUPS)
        .with_context(|| format!("Failed to rotate {}", config.log_file.display()))?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open {}", config.log_file.display()))?;

    let file_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .with_filter(file_filter);

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Shift `path` to `path.1` (and older backups up by one) when it is larger than
/// `max_bytes`. The oldest backup beyond `backups` is dropped.
pub fn rotate_if_needed(path: &Path, max_bytes: u64, backups: usize) -> io::Result<bool> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    if size <= max_bytes || backups == 0 {
        return Ok(false);
    }

    let oldest = backup_path(path, backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for index in (1..backups).rev() {
        let from = backup_path(path, index);
        if from.exists() {
            fs::rename(&from, backup_path(path, index + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))?;

    Ok(true)
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
