use std::fmt::Write as _;
use std::path::Path;

use owo_colors::OwoColorize;

use crate::report::finding::Report;

/// Plain text for one report, framed the way it is printed
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== SCAN REPORT ===\n");
    let _ = writeln!(out, "{}", report.render_text());
    let _ = writeln!(out, "\n{}\n", "=".repeat(60));
    out
}

/// Announce the file about to be analyzed
pub fn print_start(path: &Path) {
    println!();
    println!("{}  Analyzing {}", "🔍".bold(), path.display().bold());
}

/// Print a per-file failure to stderr
pub fn print_error(message: &str) {
    eprintln!("{}  {}", "❌".red().bold(), message.red());
}

/// Closing summary after all files are processed
pub fn print_summary(reports: &[Report], failed: usize) {
    let findings: usize = reports.iter().map(|r| r.findings.len()).sum();

    println!("{}", "━".repeat(60));
    let mut parts = vec![format!("{} files analyzed", reports.len())];
    if failed > 0 {
        parts.push(format!("{} failed", failed).red().bold().to_string());
    }
    let findings_text = format!("{} findings", findings);
    parts.push(if findings > 0 {
        findings_text.yellow().bold().to_string()
    } else {
        findings_text.green().to_string()
    });
    println!(" {}", parts.join(", "));
    println!("{}", "━".repeat(60));
}
