// 🔁 Legacy Import - pinjaman.txt (pipe-delimited) → pinjaman.csv
//
// Legacy line layout (at least 8 fields):
//   [0] seq | [1] member id | [2] name | [3] kind code | [4] kind name
//   | [5] rate | [6] amount | [7] term months | ...
// Fields are copied as text; values are checked later when the CSV is read.

use crate::storage::{ExclusiveLock, CSV_HEADERS};
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const LEGACY_DELIMITER: char = '|';
const LEGACY_MIN_FIELDS: usize = 8;

/// Outcome of one import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// False when the legacy file does not exist (nothing is written)
    pub source_found: bool,
    pub migrated: usize,
    pub skipped: usize,
    pub backup: Option<PathBuf>,
}

/// Extract the five current-format fields from one legacy line
pub fn parse_legacy_line(line: &str) -> Option<[String; 5]> {
    let parts: Vec<&str> = line.split(LEGACY_DELIMITER).collect();
    if parts.len() < LEGACY_MIN_FIELDS {
        return None;
    }

    Some([
        parts[1].trim().to_string(),
        parts[2].trim().to_string(),
        parts[3].trim().to_string(),
        parts[6].trim().to_string(),
        parts[7].trim().to_string(),
    ])
}

/// Convert `old_file` into a fresh CSV data file at `new_file` (overwritten).
///
/// With `backup`, the legacy file is first copied to `<old_file>.backup`. The new file
/// is rewritten under the same exclusive lock appends take, so a running session
/// cannot interleave rows with the import.
pub fn migrate_legacy(old_file: &Path, new_file: &Path, backup: bool) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    if !old_file.exists() {
        info!(path = %old_file.display(), "Legacy file not found, nothing to migrate");
        return Ok(report);
    }
    report.source_found = true;

    if backup {
        let backup_path = backup_path_for(old_file);
        fs::copy(old_file, &backup_path)
            .with_context(|| format!("Failed to back up {}", old_file.display()))?;
        info!(path = %backup_path.display(), "Backup created");
        report.backup = Some(backup_path);
    }

    let content = fs::read_to_string(old_file)
        .with_context(|| format!("Failed to read legacy file {}", old_file.display()))?;

    let mut rows = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_legacy_line(line) {
            Some(row) => rows.push(row),
            None => {
                warn!(line = index + 1, "Legacy line has too few fields, skipping");
                report.skipped += 1;
            }
        }
    }
    info!(count = rows.len(), path = %old_file.display(), "Legacy records read");

    let target = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(new_file)
        .with_context(|| format!("Failed to create {}", new_file.display()))?;
    let _lock = ExclusiveLock::acquire(&target)
        .with_context(|| format!("Failed to lock {}", new_file.display()))?;
    target
        .set_len(0)
        .with_context(|| format!("Failed to truncate {}", new_file.display()))?;

    let mut writer = csv::Writer::from_writer(&target);
    writer.write_record(CSV_HEADERS)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush().context("Failed to flush migrated data")?;

    report.migrated = rows.len();
    info!(count = report.migrated, path = %new_file.display(), "Migration finished");

    Ok(report)
}

fn backup_path_for(old_file: &Path) -> PathBuf {
    let mut name = old_file.as_os_str().to_os_string();
    name.push(".backup");
    PathBuf::from(name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CsvLoanRepository, LoanRepository};
    use fs2::FileExt;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    const LEGACY: &str = "\
1|1001|Budi Santoso|A|Konsumtif|15|10000000|12|958333
2|1002|Siti|B|Modal|10|5000000|24|250000

broken|line
3|1003|Andi, Jr|b|Modal|10|2000000|6|350000
";

    #[test]
    fn test_parse_legacy_line_positions() {
        let row = parse_legacy_line("9| 1004 | Dewi |A|x|y| 750000 | 18 ").unwrap();
        assert_eq!(row, ["1004", "Dewi", "A", "750000", "18"].map(String::from));
    }

    #[test]
    fn test_parse_legacy_line_too_short() {
        assert!(parse_legacy_line("1|1001|Budi|A|Konsumtif|15|1000000").is_none());
        assert!(parse_legacy_line("").is_none());
    }

    #[test]
    fn test_migrate_writes_current_format() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("pinjaman.txt");
        let new = dir.path().join("pinjaman.csv");
        fs::write(&old, LEGACY).unwrap();

        let report = migrate_legacy(&old, &new, false).unwrap();
        assert!(report.source_found);
        assert_eq!(report.migrated, 3);
        assert_eq!(report.skipped, 1);
        assert!(report.backup.is_none());

        let content = fs::read_to_string(&new).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(CSV_HEADERS.join(",").as_str()));
        assert_eq!(lines.next(), Some("1001,Budi Santoso,A,10000000,12"));
    }

    #[test]
    fn test_migrated_file_is_readable() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("pinjaman.txt");
        let new = dir.path().join("pinjaman.csv");
        fs::write(&old, LEGACY).unwrap();

        migrate_legacy(&old, &new, false).unwrap();

        let mut repo = CsvLoanRepository::new(&new);
        let loans = repo.read_all().unwrap();
        assert_eq!(loans.len(), 3);
        assert_eq!(loans[2].member().name(), "Andi, Jr");
        assert_eq!(loans[2].term_months(), 6);
    }

    #[test]
    fn test_migrate_with_backup() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("pinjaman.txt");
        let new = dir.path().join("pinjaman.csv");
        fs::write(&old, LEGACY).unwrap();

        let report = migrate_legacy(&old, &new, true).unwrap();
        let backup = report.backup.unwrap();
        assert_eq!(backup, dir.path().join("pinjaman.txt.backup"));
        assert_eq!(fs::read_to_string(backup).unwrap(), LEGACY);
    }

    #[test]
    fn test_migrate_replaces_longer_existing_file() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("pinjaman.txt");
        let new = dir.path().join("pinjaman.csv");
        fs::write(&old, "1|1001|Budi|A|Konsumtif|15|1000000|12|0\n").unwrap();
        fs::write(&new, "x".repeat(4096)).unwrap();

        migrate_legacy(&old, &new, false).unwrap();

        let content = fs::read_to_string(&new).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains('x'));
    }

    #[test]
    fn test_migrate_waits_for_data_file_lock() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("pinjaman.txt");
        let new = dir.path().join("pinjaman.csv");
        fs::write(&old, LEGACY).unwrap();
        fs::write(&new, "").unwrap();

        let holder = fs::File::open(&new).unwrap();
        holder.lock_exclusive().unwrap();

        let (old_path, new_path) = (old.clone(), new.clone());
        let handle = thread::spawn(move || migrate_legacy(&old_path, &new_path, false));

        thread::sleep(Duration::from_millis(200));
        assert!(!handle.is_finished());
        assert_eq!(fs::read_to_string(&new).unwrap(), "");

        FileExt::unlock(&holder).unwrap();
        let report = handle.join().unwrap().unwrap();
        assert_eq!(report.migrated, 3);
        assert!(fs::read_to_string(&new).unwrap().starts_with("nomor_anggota"));
    }

    #[test]
    fn test_missing_legacy_file() {
        let dir = TempDir::new().unwrap();
        let new = dir.path().join("pinjaman.csv");

        let report = migrate_legacy(&dir.path().join("nope.txt"), &new, true).unwrap();
        assert_eq!(report, MigrationReport::default());
        assert!(!new.exists());
    }
}
