//! Plain-text summary of a run for the terminal.

use std::fmt::Write;

use matchwiki_sync::RunReport;

const RULE_WIDTH: usize = 40;

/// Counts, then one line per failed match.
pub fn render(report: &RunReport) -> String {
    let mut out = String::new();
    let rule = "─".repeat(RULE_WIDTH);

    let _ = writeln!(out, "{rule}");
    let rows = [
        ("created", report.created),
        ("updated", report.updated),
        ("unchanged", report.unchanged),
        ("not saved", report.dry_run),
        ("failed", report.failures.len()),
    ];
    for (label, count) in rows {
        let _ = writeln!(out, "  {label:<12}{count:>6}");
    }
    let _ = writeln!(out, "  {:<12}{:>6}", "total", report.processed());

    if !report.failures.is_empty() {
        let _ = writeln!(out, "{rule}");
        for failure in &report.failures {
            let _ = writeln!(out, "  {}: {}", failure.title, failure.error);
        }
    }
    let _ = writeln!(out, "{rule}");
    out
}
