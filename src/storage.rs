// 🗄️ Storage Engine - CSV file + read cache + exclusive write lock
//
// One loan per line, header first:
//   nomor_anggota,nama_anggota,kode_pinjaman,jumlah_pinjaman,lama_bulan
//
// Appends are serialized across processes with an advisory whole-file lock.
// Reads never lock.

use crate::error::{LoanError, Result};
use crate::model::{Loan, LoanKind, Member};
use fs2::FileExt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, error, info, warn};

/// Column names, in file order
pub const CSV_HEADERS: [&str; 5] = [
    "nomor_anggota",
    "nama_anggota",
    "kode_pinjaman",
    "jumlah_pinjaman",
    "lama_bulan",
];

// ============================================================================
// REPOSITORY TRAIT
// ============================================================================

/// LoanRepository - persistence seam used by the service
///
/// Implementations own the authoritative, ordered sequence of saved loans.
pub trait LoanRepository {
    /// Persist one loan at the end of the sequence
    fn append(&mut self, loan: &Loan) -> Result<()>;

    /// All saved loans, in save order
    fn read_all(&mut self) -> Result<Vec<Loan>>;

    /// Saved loans whose member id matches exactly
    fn read_by_member(&mut self, member_id: &str) -> Result<Vec<Loan>> {
        let loans = self.read_all()?;
        Ok(loans
            .into_iter()
            .filter(|loan| loan.member().id() == member_id)
            .collect())
    }

    /// Remove every saved loan
    fn clear(&mut self) -> Result<()>;
}

// ============================================================================
// STORED ROW
// ============================================================================

/// One data row as it sits in the file. Kept as text so a bad value in one row
/// becomes a parse failure for that row only.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredLoan {
    nomor_anggota: String,
    nama_anggota: String,
    kode_pinjaman: String,
    jumlah_pinjaman: String,
    lama_bulan: String,
}

impl From<&Loan> for StoredLoan {
    fn from(loan: &Loan) -> Self {
        StoredLoan {
            nomor_anggota: loan.member().id().to_string(),
            nama_anggota: loan.member().name().to_string(),
            kode_pinjaman: loan.kind().code().to_string(),
            // whole currency units only
            jumlah_pinjaman: loan.principal().trunc().to_string(),
            lama_bulan: loan.term_months().to_string(),
        }
    }
}

impl StoredLoan {
    fn into_loan(self) -> Result<Loan> {
        let principal = Decimal::from_str(self.jumlah_pinjaman.trim()).map_err(|e| {
            LoanError::Parse(format!("jumlah_pinjaman '{}': {}", self.jumlah_pinjaman, e))
        })?;
        let term_months = self.lama_bulan.trim().parse::<u32>().map_err(|e| {
            LoanError::Parse(format!("lama_bulan '{}': {}", self.lama_bulan, e))
        })?;

        let member = Member::new(&self.nomor_anggota, &self.nama_anggota).map_err(into_parse)?;
        let kind = LoanKind::from_code(&self.kode_pinjaman).map_err(into_parse)?;

        Loan::new(member, kind, principal, term_months).map_err(into_parse)
    }
}

fn into_parse(err: LoanError) -> LoanError {
    match err {
        LoanError::Parse(_) => err,
        other => LoanError::Parse(other.to_string()),
    }
}

// ============================================================================
// FILE LOCK
// ============================================================================

/// Exclusive advisory lock, released when dropped (every exit path)
pub(crate) struct ExclusiveLock<'a> {
    file: &'a File,
}

impl<'a> ExclusiveLock<'a> {
    pub(crate) fn acquire(file: &'a File) -> io::Result<Self> {
        file.lock_exclusive()?;
        Ok(ExclusiveLock { file })
    }
}

impl Drop for ExclusiveLock<'_> {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(self.file) {
            warn!(error = %err, "Failed to release data file lock");
        }
    }
}

// ============================================================================
// CSV REPOSITORY
// ============================================================================

/// CSV-file repository with a read-through cache.
///
/// The cache is filled by `read_all` and dropped by every successful `append` or
/// `clear` made through this instance. Changes written to the file by another
/// process are NOT detected: a cached instance keeps serving its old view until it
/// writes itself. One writer process per file is assumed.
#[derive(Debug)]
pub struct CsvLoanRepository {
    path: PathBuf,
    cache: Option<Vec<Loan>>,
}

impl CsvLoanRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvLoanRepository {
            path: path.into(),
            cache: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the next `read_all` will be served from memory
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    fn write_loan(&self, loan: &Loan) -> Result<()> {
        let context = format!("Gagal menyimpan data ke file {}", self.path.display());

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| LoanError::storage(context.clone(), e))?;

        let _lock = ExclusiveLock::acquire(&file).map_err(|e| LoanError::storage(context.clone(), e))?;

        let mut target = &file;
        let previous_len = target.size().map_err(|e| LoanError::storage(context.clone(), e))?;

        // Empty means new (or cleared): header goes first
        let buffer = encode_row(loan, previous_len == 0).map_err(|e| LoanError::storage(context.clone(), e))?;

        append_or_rollback(&mut target, previous_len, &buffer).map_err(|e| LoanError::storage(context, e))
    }

    fn load(&self) -> Result<Option<Vec<Loan>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Data file does not exist yet, returning empty list");
                return Ok(None);
            }
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "Failed to open data file");
                return Err(LoanError::storage("Gagal membaca data dari file", err));
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let mut loans = Vec::new();
        let mut skipped = 0usize;

        for (index, row) in reader.deserialize::<StoredLoan>().enumerate() {
            let record = index + 1;

            let row = match row {
                Ok(row) => row,
                Err(err) if err.is_io_error() => {
                    error!(error = %err, "Failed to read data file");
                    return Err(LoanError::storage("Gagal membaca data dari file", err));
                }
                Err(err) => {
                    warn!(record, error = %err, "Skipping corrupted row");
                    skipped += 1;
                    continue;
                }
            };

            match row.into_loan() {
                Ok(loan) => loans.push(loan),
                Err(err) => {
                    warn!(record, error = %err, "Skipping corrupted row");
                    skipped += 1;
                }
            }
        }

        debug!(loaded = loans.len(), skipped, "Data file parsed");
        Ok(Some(loans))
    }
}

/// Write side of an append: a byte sink that can report and restore its length
trait AppendTarget: Write {
    fn size(&self) -> io::Result<u64>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl AppendTarget for &File {
    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Write `buffer` in full or leave the target at `previous_len`.
///
/// A failed `write_all` may already have written part of the buffer; that tail is
/// cut off so the next append starts on a clean line.
fn append_or_rollback<T: AppendTarget>(target: &mut T, previous_len: u64, buffer: &[u8]) -> io::Result<()> {
    let written = target.write_all(buffer).and_then(|_| target.flush());

    if let Err(err) = written {
        if let Err(rollback) = target.truncate_to(previous_len) {
            error!(error = %rollback, "Failed to roll back partial append");
        } else {
            warn!(len = previous_len, "Partial append rolled back");
        }
        return Err(err);
    }

    Ok(())
}

fn encode_row(loan: &Loan, with_header: bool) -> io::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(Vec::new());

    writer.serialize(StoredLoan::from(loan))?;
    writer.into_inner().map_err(|e| e.into_error())
}

impl LoanRepository for CsvLoanRepository {
    fn append(&mut self, loan: &Loan) -> Result<()> {
        match self.write_loan(loan) {
            Ok(()) => {
                self.cache = None;
                info!(member_id = loan.member().id(), "Loan saved");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Failed to save loan");
                Err(err)
            }
        }
    }

    fn read_all(&mut self) -> Result<Vec<Loan>> {
        if let Some(cached) = &self.cache {
            return Ok(cached.clone());
        }

        match self.load()? {
            Some(loans) => {
                self.cache = Some(loans.clone());
                Ok(loans)
            }
            None => Ok(Vec::new()),
        }
    }

    fn clear(&mut self) -> Result<()> {
        let context = "Gagal menghapus data";

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| LoanError::storage(context, e))?;
        let _lock = ExclusiveLock::acquire(&file).map_err(|e| LoanError::storage(context, e))?;
        file.set_len(0).map_err(|e| LoanError::storage(context, e))?;

        self.cache = None;
        info!(path = %self.path.display(), "All loan data cleared");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
