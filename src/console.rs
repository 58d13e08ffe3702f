// 🖥️ Console - menu loop, data entry form and loan report
//
// Generic over input/output so the whole flow can be driven from tests.
// Money is converted to whole-rupiah text here and nowhere else.

use crate::error::LoanError;
use crate::model::{Loan, LoanKind};
use crate::service::{validate_kind_code, LoanService};
use crate::statistics::StatisticsSnapshot;
use crate::storage::LoanRepository;
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::error;

const APP_TITLE: &str = "SISTEM PINJAMAN KOPERASI BERSAMA";
const WIDE: usize = 100;
const NARROW: usize = 49;

/// What the menu loop should do after a screen finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Whole rupiah with thousands separators: 10000000.4 -> "10,000,000"
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp(0);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// One decimal place: 33.333.. -> "33.3%"
pub fn format_percent(value: Decimal) -> String {
    format!("{:.1}%", value.round_dp(1))
}

/// Accepts "1000000", "1000000.50", "1e6"
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let input = input.trim();
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .ok()
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn center(text: &str, width: usize) -> String {
    format!("{:^width$}", text, width = width)
}

fn kind_color(kind: LoanKind) -> Color {
    match kind {
        LoanKind::Consumer => Color::Yellow,
        LoanKind::Capital => Color::Magenta,
    }
}

// ============================================================================
// CONSOLE
// ============================================================================

pub struct Console<R: BufRead, W: Write> {
    input: R,
    output: W,
    use_colors: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, use_colors: bool) -> Self {
        Console {
            input,
            output,
            use_colors,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Main menu loop. Returns when the user exits or input ends.
    pub fn run<S: LoanRepository>(&mut self, service: &mut LoanService<S>) -> Result<()> {
        self.clear_screen()?;

        loop {
            self.show_main_menu()?;

            let Some(choice) = self.prompt("Pilih menu [1-3]")? else {
                self.show_exit()?;
                return Ok(());
            };

            let outcome = match choice.as_str() {
                "1" => self.handle_entry(service),
                "2" => self.handle_report(service),
                "3" => Ok(Flow::Exit),
                _ => {
                    self.show_error("Pilihan tidak valid! Silakan pilih 1-3.")?;
                    self.pause().map(|_| Flow::Continue)
                }
            };

            match outcome {
                Ok(Flow::Continue) => self.clear_screen()?,
                Ok(Flow::Exit) => {
                    self.clear_screen()?;
                    self.show_exit()?;
                    return Ok(());
                }
                Err(err) => {
                    // Unexpected failures are reported and the menu keeps running
                    error!(error = %err, "Unexpected error in console");
                    self.show_error(&format!("Error tidak terduga: {}", err))?;
                    if !self.pause()? {
                        return Ok(());
                    }
                    self.clear_screen()?;
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Entry
    // ------------------------------------------------------------------------

    fn handle_entry<S: LoanRepository>(&mut self, service: &mut LoanService<S>) -> Result<Flow> {
        self.clear_screen()?;

        loop {
            self.show_header("ENTRY DATA PINJAMAN KOPERASI")?;

            let loan = match self.input_loan(service) {
                Ok(Some(loan)) => loan,
                Ok(None) => return Ok(Flow::Exit),
                Err(err) => match err.downcast_ref::<LoanError>() {
                    Some(loan_err) if loan_err.is_validation() => {
                        self.show_error(&loan_err.to_string())?;
                        if !self.pause()? {
                            return Ok(Flow::Exit);
                        }
                        self.clear_screen()?;
                        continue;
                    }
                    _ => return Err(err),
                },
            };

            self.show_loan_summary(&loan)?;
            self.blank()?;

            match self.confirm("Simpan data ini?")? {
                Some(true) => match service.save(&loan) {
                    Ok(()) => self.show_success("Data berhasil disimpan!")?,
                    Err(err) => self.show_error(&format!("Gagal menyimpan data! {}", err))?,
                },
                Some(false) => self.show_info("Data dibatalkan")?,
                None => return Ok(Flow::Exit),
            }

            self.blank()?;
            match self.confirm("Masih ada data yang akan diinputkan?")? {
                Some(true) => self.clear_screen()?,
                Some(false) => break,
                None => return Ok(Flow::Exit),
            }
        }

        Ok(if self.pause()? { Flow::Continue } else { Flow::Exit })
    }

    /// Walk the entry form. `Ok(None)` means input ended.
    fn input_loan<S: LoanRepository>(&mut self, service: &LoanService<S>) -> Result<Option<Loan>> {
        let Some(member_id) = self.prompt("No. Anggota [4 digit]")? else {
            return Ok(None);
        };
        if member_id.is_empty() {
            return Err(LoanError::validation("Nomor anggota tidak boleh kosong").into());
        }

        let Some(member_name) = self.prompt("Nama Anggota")? else {
            return Ok(None);
        };
        if member_name.is_empty() {
            return Err(LoanError::validation("Nama anggota tidak boleh kosong").into());
        }

        self.show_kind_choices()?;
        let Some(kind_code) = self.prompt("Kode Pinjaman [A/B]")? else {
            return Ok(None);
        };
        let kind = validate_kind_code(&kind_code)?;
        self.show_success(&format!("Jenis: {} - Bunga {}%", kind.name(), kind.rate()))?;
        self.blank()?;

        let amount = loop {
            let Some(raw) = self.prompt("Jumlah Pinjaman [Rp]")? else {
                return Ok(None);
            };
            match parse_amount(&raw) {
                Some(amount) => break amount,
                None => self.show_error("Masukkan angka yang valid!")?,
            }
        };

        let term_months = loop {
            let Some(raw) = self.prompt("Lama Pinjaman [Bulan]")? else {
                return Ok(None);
            };
            match raw.parse::<i64>() {
                Ok(term) => break term,
                Err(_) => self.show_error("Masukkan angka yang valid!")?,
            }
        };

        let loan = service.create_loan(&member_id, &member_name, kind.code(), amount, term_months)?;
        Ok(Some(loan))
    }

    // ------------------------------------------------------------------------
    // Report
    // ------------------------------------------------------------------------

    fn handle_report<S: LoanRepository>(&mut self, service: &mut LoanService<S>) -> Result<Flow> {
        self.clear_screen()?;

        let result = service
            .list_all()
            .and_then(|loans| service.statistics().map(|stats| (loans, stats)));

        match result {
            Ok((loans, stats)) => self.print_report(&loans, &stats)?,
            Err(err) => {
                error!(error = %err, "Failed to build report");
                self.show_error(&format!("Error saat menampilkan laporan: {}", err))?;
            }
        }

        Ok(if self.pause()? { Flow::Continue } else { Flow::Exit })
    }

    /// Report screen: loan table followed by the summary block
    pub fn print_report(&mut self, loans: &[Loan], stats: &StatisticsSnapshot) -> Result<()> {
        self.show_header("LAPORAN DATA PINJAMAN KOPERASI BERSAMA")?;

        if loans.is_empty() {
            self.show_info("Belum ada data untuk ditampilkan.")?;
            self.show_info("Silakan entry data terlebih dahulu.")?;
            return Ok(());
        }

        self.show_loan_table(loans)?;
        self.show_statistics(stats)?;
        Ok(())
    }

    fn show_loan_table(&mut self, loans: &[Loan]) -> Result<()> {
        let rule = format!("  {}", "-".repeat(WIDE));
        self.blank()?;
        self.line(Color::Green, true, &rule)?;
        self.line(
            Color::Green,
            true,
            "  No | Nama Anggota    | Kode |   Jenis    | Bunga |   Pinjaman    | Lama  |   Angsuran",
        )?;
        self.line(
            Color::Green,
            true,
            "     |                 |      |  Pinjaman  |   %   |      (Rp)     | Bulan |     (Rp)",
        )?;
        self.line(Color::Green, true, &rule)?;

        for (index, loan) in loans.iter().enumerate() {
            let number = index + 1;
            let row_color = if number % 2 == 0 { Color::Cyan } else { Color::White };
            let kind = loan.kind();

            self.segments(&[
                (row_color, format!("  {:<3}", number)),
                (Color::Green, "| ".to_string()),
                (row_color, format!("{:<15}", truncate(loan.member().name(), 15))),
                (Color::Green, " | ".to_string()),
                (kind_color(kind), format!("{:^4}", kind.code())),
                (Color::Green, " | ".to_string()),
                (kind_color(kind), format!("{:<10}", truncate(kind.name(), 10))),
                (Color::Green, " |".to_string()),
                (row_color, format!(" {:>3}%  ", kind.rate())),
                (Color::Green, "|".to_string()),
                (row_color, format!(" {:>13} ", format_rupiah(loan.principal()))),
                (Color::Green, "|".to_string()),
                (row_color, format!(" {:>4}  ", loan.term_months())),
                (Color::Green, "|".to_string()),
                (row_color, format!(" {:>14}", format_rupiah(loan.installment()))),
            ])?;
        }

        self.line(Color::Green, true, &rule)?;
        Ok(())
    }

    fn show_statistics(&mut self, stats: &StatisticsSnapshot) -> Result<()> {
        let rule = format!("  {}", "-".repeat(86));
        self.blank()?;
        self.line(Color::Blue, true, &rule)?;
        self.line(Color::White, true, &format!("  {}", center("RINGKASAN DATA", 86)))?;
        self.line(Color::Blue, true, &rule)?;

        self.field("Total Data Pinjaman       ", &format!("{:>3} data", stats.total_data))?;
        self.money_field("Total Pinjaman Keseluruhan", stats.total_pinjaman)?;
        self.money_field("Total Bunga Keseluruhan   ", stats.total_bunga)?;
        self.money_field("Total Bayar Keseluruhan   ", stats.total_bayar_keseluruhan)?;
        self.money_field("Rata-rata Pinjaman        ", stats.rata_rata_pinjaman)?;
        self.money_field("Total Angsuran per Bulan  ", stats.total_angsuran)?;
        self.money_field("Rata-rata Angsuran        ", stats.rata_rata_angsuran)?;
        self.field(
            "Pinjaman Konsumtif [A]    ",
            &format!(
                "{:>3} data ({})",
                stats.jumlah_konsumtif,
                format_percent(stats.persentase_konsumtif)
            ),
        )?;
        self.field(
            "Pinjaman Modal [B]        ",
            &format!(
                "{:>3} data ({})",
                stats.jumlah_modal,
                format_percent(stats.persentase_modal)
            ),
        )?;
        self.line(Color::Blue, true, &rule)?;

        let legend_rule = format!("  {}", "-".repeat(60));
        self.blank()?;
        self.line(Color::Magenta, false, &legend_rule)?;
        self.line(Color::Cyan, false, "  Keterangan:")?;
        for kind in LoanKind::ALL {
            self.line(
                kind_color(kind),
                false,
                &format!(
                    "  [{}] = Pinjaman {} (Bunga {}% per tahun)",
                    kind.code(),
                    kind.name(),
                    kind.rate()
                ),
            )?;
        }
        self.line(Color::Magenta, false, &legend_rule)?;
        Ok(())
    }

    fn money_field(&mut self, label: &str, amount: Decimal) -> Result<()> {
        self.field(label, &format!("Rp {:>15}", format_rupiah(amount)))
    }

    // ------------------------------------------------------------------------
    // Screens
    // ------------------------------------------------------------------------

    fn show_main_menu(&mut self) -> Result<()> {
        self.show_header(APP_TITLE)?;

        let rule = format!("  {}", "-".repeat(NARROW));
        self.line(Color::Green, true, &rule)?;
        self.line(Color::White, true, &format!("  {}", center("MENU UTAMA", NARROW)))?;
        self.line(Color::Green, true, &rule)?;
        self.segments(&[(Color::Yellow, "  [1]".to_string()), (Color::White, " Entry Data Pinjaman".to_string())])?;
        self.segments(&[(Color::Yellow, "  [2]".to_string()), (Color::White, " Laporan Data Pinjaman".to_string())])?;
        self.segments(&[(Color::Red, "  [3]".to_string()), (Color::White, " Exit".to_string())])?;
        self.line(Color::Green, true, &rule)?;
        self.blank()?;
        Ok(())
    }

    fn show_kind_choices(&mut self) -> Result<()> {
        let rule = format!("  {}", "-".repeat(NARROW));
        self.blank()?;
        self.line(Color::Green, false, &rule)?;
        self.line(Color::Yellow, false, "  Jenis Pinjaman")?;
        self.line(Color::Green, false, &rule)?;
        for kind in LoanKind::ALL {
            self.line(
                Color::White,
                false,
                &format!("  [{}] {} (Bunga {}% per tahun)", kind.code(), kind.name(), kind.rate()),
            )?;
        }
        Ok(())
    }

    fn show_loan_summary(&mut self, loan: &Loan) -> Result<()> {
        let rule = format!("  {}", "-".repeat(NARROW));
        self.blank()?;
        self.line(Color::Blue, true, &rule)?;
        self.line(Color::White, true, &format!("  {}", center("RINGKASAN DATA PINJAMAN", NARROW)))?;
        self.line(Color::Blue, true, &rule)?;
        self.field("No. Anggota     ", loan.member().id())?;
        self.field("Nama Anggota    ", loan.member().name())?;
        self.field("Kode Pinjaman   ", loan.kind().code())?;
        self.field("Jenis Pinjaman  ", loan.kind().name())?;
        self.field("Tingkat Bunga   ", &format!("{}% per tahun", loan.kind().rate()))?;
        self.field("Jumlah Pinjaman ", &format!("Rp {}", format_rupiah(loan.principal())))?;
        self.field("Lama Pinjaman   ", &format!("{} bulan", loan.term_months()))?;
        self.field("Jumlah Angsuran ", &format!("Rp {}/bln", format_rupiah(loan.installment())))?;
        self.line(Color::Blue, true, &rule)?;
        Ok(())
    }

    fn show_header(&mut self, title: &str) -> Result<()> {
        let rule = format!("  {}", "-".repeat(65));
        self.blank()?;
        self.line(Color::Cyan, true, &rule)?;
        self.line(Color::Cyan, true, &format!("  {}", center(title, 65)))?;
        self.line(Color::Cyan, true, &rule)?;
        self.blank()?;
        Ok(())
    }

    fn show_exit(&mut self) -> Result<()> {
        let rule = format!("  {}", "-".repeat(NARROW));
        self.blank()?;
        self.line(Color::Magenta, true, &rule)?;
        self.line(Color::Magenta, true, &format!("  {}", center("TERIMA KASIH TELAH MENGGUNAKAN", NARROW)))?;
        self.line(Color::Magenta, true, &format!("  {}", center(APP_TITLE, NARROW)))?;
        self.line(Color::Magenta, true, &format!("  {}", center("Program Selesai", NARROW)))?;
        self.line(Color::Magenta, true, &rule)?;
        self.blank()?;
        Ok(())
    }

    fn show_success(&mut self, message: &str) -> Result<()> {
        self.blank()?;
        self.line(Color::Green, false, &format!("  ✓ {}", message))
    }

    fn show_error(&mut self, message: &str) -> Result<()> {
        self.blank()?;
        self.line(Color::Red, false, &format!("  ✗ {}", message))
    }

    fn show_info(&mut self, message: &str) -> Result<()> {
        self.blank()?;
        self.line(Color::Cyan, false, &format!("  ℹ {}", message))
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Trimmed line, or `None` at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        self.paint(Color::Cyan, false, &format!("  ➤ {}: ", label))?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Y/T question; anything other than "Y" is a no
    fn confirm(&mut self, question: &str) -> Result<Option<bool>> {
        let answer = self.prompt(&format!("{} [Y/T]", question))?;
        Ok(answer.map(|a| a.eq_ignore_ascii_case("y")))
    }

    /// Wait for Enter. Returns false at end of input.
    fn pause(&mut self) -> Result<bool> {
        self.blank()?;
        self.paint(Color::Cyan, false, "Press Enter to Continue...")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            self.blank()?;
        }
        Ok(read > 0)
    }

    // ------------------------------------------------------------------------
    // Output primitives
    // ------------------------------------------------------------------------

    fn clear_screen(&mut self) -> Result<()> {
        if self.use_colors {
            queue!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
            self.output.flush()?;
        }
        Ok(())
    }

    fn paint(&mut self, color: Color, bold: bool, text: &str) -> Result<()> {
        if !self.use_colors {
            write!(self.output, "{}", text)?;
            return Ok(());
        }

        queue!(self.output, SetForegroundColor(color))?;
        if bold {
            queue!(self.output, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.output,
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        Ok(())
    }

    fn line(&mut self, color: Color, bold: bool, text: &str) -> Result<()> {
        self.paint(color, bold, text)?;
        writeln!(self.output)?;
        Ok(())
    }

    fn segments(&mut self, parts: &[(Color, String)]) -> Result<()> {
        for (color, text) in parts {
            self.paint(*color, false, text)?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    fn field(&mut self, label: &str, value: &str) -> Result<()> {
        self.segments(&[
            (Color::White, format!("  {}: ", label)),
            (Color::Yellow, value.to_string()),
        ])
    }

    fn blank(&mut self) -> Result<()> {
        writeln!(self.output)?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CsvLoanRepository;
    use rust_decimal_macros::dec;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LoanService<CsvLoanRepository>) {
        let dir = TempDir::new().unwrap();
        let repo = CsvLoanRepository::new(dir.path().join("pinjaman.csv"));
        (dir, LoanService::new(repo))
    }

    fn run_script(service: &mut LoanService<CsvLoanRepository>, script: &str) -> String {
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new(), false);
        console.run(service).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(dec!(0)), "0");
        assert_eq!(format_rupiah(dec!(999)), "999");
        assert_eq!(format_rupiah(dec!(1000)), "1,000");
        assert_eq!(format_rupiah(dec!(10000000)), "10,000,000");
        assert_eq!(format_rupiah(dec!(958333.333333)), "958,333");
        assert_eq!(format_rupiah(dec!(41666.67)), "41,667");
        assert_eq!(format_rupiah(dec!(-1234567)), "-1,234,567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(50)), "50.0%");
        assert_eq!(format_percent(dec!(33.3333333)), "33.3%");
        assert_eq!(format_percent(Decimal::ZERO), "0.0%");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 1000000 "), Some(dec!(1000000)));
        assert_eq!(parse_amount("150000.5"), Some(dec!(150000.5)));
        assert_eq!(parse_amount("1e6"), Some(dec!(1000000)));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_entry_flow_saves_loan() {
        let (_dir, mut service) = setup();
        let output = run_script(&mut service, "1\n1001\nBudi\nA\n10000000\n12\nY\nT\n\n3\n");

        let loans = service.list_all().unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].member().name(), "Budi");
        assert!(output.contains("Data berhasil disimpan!"));
        assert!(output.contains("Rp 958,333/bln"));
        assert!(output.contains("Program Selesai"));
    }

    #[test]
    fn test_entry_cancelled_is_not_saved() {
        let (_dir, mut service) = setup();
        let output = run_script(&mut service, "1\n1001\nBudi\nB\n2000000\n24\nT\nT\n\n3\n");

        assert!(service.list_all().unwrap().is_empty());
        assert!(output.contains("Data dibatalkan"));
    }

    #[test]
    fn test_entry_reprompts_for_bad_numbers() {
        let (_dir, mut service) = setup();
        let output = run_script(&mut service, "1\n1001\nBudi\nA\nbanyak\n1000000\ndua\n12\nY\nT\n\n3\n");

        assert_eq!(output.matches("Masukkan angka yang valid!").count(), 2);
        assert_eq!(service.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_validation_error_shown_and_nothing_saved() {
        let (_dir, mut service) = setup();
        // invalid id, then input ends at the next form
        let output = run_script(&mut service, "1\n12\nBudi\nA\n1000000\n12\n\n");

        assert!(output.contains("4 digit"));
        assert!(service.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_small_amount_rejected_in_form() {
        let (_dir, mut service) = setup();
        let output = run_script(&mut service, "1\n1001\nBudi\nA\n50000\n12\n\n");

        assert!(output.contains("minimal Rp 100,000"));
        assert!(service.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_kind_rejected_before_amount() {
        let (_dir, mut service) = setup();
        let output = run_script(&mut service, "1\n1001\nBudi\nX\n\n");

        assert!(output.contains("Kode jenis harus A (Konsumtif) atau B (Modal)"));
        assert!(!output.contains("Jumlah Pinjaman [Rp]"));
    }

    #[test]
    fn test_invalid_menu_choice() {
        let (_dir, mut service) = setup();
        let output = run_script(&mut service, "9\n\n3\n");
        assert!(output.contains("Pilihan tidak valid!"));
        assert!(output.contains("Program Selesai"));
    }

    #[test]
    fn test_empty_report() {
        let (_dir, mut service) = setup();
        let output = run_script(&mut service, "2\n\n3\n");
        assert!(output.contains("Belum ada data untuk ditampilkan."));
    }

    #[test]
    fn test_report_lists_loans_and_summary() {
        let (_dir, mut service) = setup();
        let first = service.create_loan("1001", "Budi Santoso Wijaya Kusuma", "A", dec!(10000000), 12).unwrap();
        let second = service.create_loan("1002", "Siti", "B", dec!(5000000), 24).unwrap();
        service.save(&first).unwrap();
        service.save(&second).unwrap();

        let output = run_script(&mut service, "2\n\n3\n");

        assert!(output.contains("Budi Santoso Wi "));
        assert!(!output.contains("Budi Santoso Wijaya"));
        assert!(output.contains("RINGKASAN DATA"));
        assert!(output.contains("  2 data"));
        assert!(output.contains("15,000,000"));
        assert!(output.contains("50.0%"));
        assert!(output.contains("[B] = Pinjaman Modal (Bunga 10% per tahun)"));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let (_dir, mut service) = setup();
        let output = run_script(&mut service, "");
        assert!(output.contains("MENU UTAMA"));
        assert!(output.contains("Program Selesai"));
    }

    #[test]
    fn test_colored_output_has_escape_codes() {
        let loans: Vec<Loan> = Vec::new();
        let stats = StatisticsSnapshot::from_loans(&loans).unwrap();
        let mut console = Console::new(std::io::empty(), Vec::new(), true);
        console.print_report(&loans, &stats).unwrap();

        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("\u{1b}["));
    }
}
