use anyhow::{bail, Context, Result};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::info;

use koperasi::{
    logging, migrate_legacy, AppConfig, Console, CsvLoanRepository, LoanRecord, LoanService,
    StatisticsSnapshot,
};

const DEFAULT_LEGACY_FILE: &str = "pinjaman.txt";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (data_flag, args) = take_data_flag(args)?;

    let config = AppConfig::from_env(data_flag);
    logging::init(&config)?;
    info!(version = koperasi::VERSION, data_file = %config.data_file.display(), "Starting");

    match args.first().map(String::as_str) {
        None => run_interactive(&config)?,
        Some("report") => run_report(&config, args.iter().any(|a| a == "--json"))?,
        Some("migrate") => run_migrate(&config, &args[1..])?,
        Some("reset") => run_reset(&config)?,
        Some("help") | Some("--help") | Some("-h") => print_usage(),
        Some(other) => {
            print_usage();
            bail!("Unknown command: {}", other);
        }
    }

    Ok(())
}

/// Pull `--data <path>` out of the argument list, wherever it appears
fn take_data_flag(args: Vec<String>) -> Result<(Option<PathBuf>, Vec<String>)> {
    let mut data = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        if arg == "--data" {
            let path = iter.next().context("--data needs a file path")?;
            data = Some(PathBuf::from(path));
        } else {
            rest.push(arg);
        }
    }

    Ok((data, rest))
}

fn print_usage() {
    println!("Usage: koperasi [--data <file>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          interactive menu");
    println!("  report [--json]                 print loan report");
    println!("  migrate [OLD] [NEW] [--no-backup]  import legacy pinjaman.txt");
    println!("  reset                           delete all loan data");
}

fn service_for(config: &AppConfig) -> LoanService<CsvLoanRepository> {
    LoanService::new(CsvLoanRepository::new(&config.data_file))
}

fn run_interactive(config: &AppConfig) -> Result<()> {
    let mut service = service_for(config);
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout(), config.use_colors);
    console.run(&mut service)
}

fn run_report(config: &AppConfig, as_json: bool) -> Result<()> {
    let mut service = service_for(config);
    let loans = service.list_all()?;
    let stats = service.statistics()?;

    if as_json {
        let records: Vec<LoanRecord> = loans.iter().map(|loan| loan.to_record()).collect();
        let report = JsonReport {
            statistics: &stats,
            records,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut console = Console::new(io::empty(), io::stdout(), config.use_colors);
    console.print_report(&loans, &stats)
}

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    statistics: &'a StatisticsSnapshot,
    records: Vec<LoanRecord>,
}

fn run_migrate(config: &AppConfig, args: &[String]) -> Result<()> {
    let backup = !args.iter().any(|a| a == "--no-backup");
    let mut paths = args.iter().filter(|a| !a.starts_with("--"));

    let old_file = paths
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LEGACY_FILE));
    let new_file = paths
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_file.clone());

    println!("🔁 Migrasi data: {} → {}", old_file.display(), new_file.display());

    let report = migrate_legacy(&old_file, &new_file, backup)?;

    if !report.source_found {
        println!("ℹ File lama tidak ditemukan: {}", old_file.display());
        return Ok(());
    }
    if let Some(path) = &report.backup {
        println!("✓ Backup dibuat: {}", path.display());
    }
    println!("✓ {} data berhasil dimigrasi", report.migrated);
    if report.skipped > 0 {
        println!("⚠ {} baris dilewati (format tidak valid)", report.skipped);
    }

    Ok(())
}

fn run_reset(config: &AppConfig) -> Result<()> {
    let mut service = service_for(config);
    service.reset()?;
    println!("✓ Semua data pinjaman dihapus: {}", config.data_file.display());
    Ok(())
}
