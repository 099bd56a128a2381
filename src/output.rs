//! CLI output formatting.
//!
//! Formatting is pure (`format_*` returns lines) so it can be tested; the
//! `print_*` wrappers write to stdout.
//!
//! ```text
//! Resumen
//!     Invitados registrados: 3
//!     Confirmados: 2
//!     Pendientes: 1
//!     Total invitados declarados: 5
//!
//! invitados-boda.xlsx → out/invitados-boda.xlsx (6.1 KB)
//! ```

use crate::labels;
use crate::types::{RenderedReport, ReportSummary};
use std::path::Path;

fn indent(line: String) -> String {
    format!("    {line}")
}

/// Byte count as B, KB or MB with one decimal.
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

pub fn format_summary(summary: &ReportSummary) -> Vec<String> {
    let mut lines = vec!["Resumen".to_string()];
    lines.extend(
        [
            (labels::REGISTERED, summary.total as u64),
            (labels::CONFIRMED, summary.confirmed as u64),
            (labels::PENDING, summary.pending as u64),
            (labels::DECLARED_GUESTS, summary.guests),
        ]
        .into_iter()
        .map(|(label, value)| indent(format!("{label}: {value}"))),
    );
    lines
}

pub fn print_summary(summary: &ReportSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

pub fn format_written(report: &RenderedReport, path: &Path) -> String {
    format!(
        "{} → {} ({})",
        report.filename(),
        path.display(),
        format_size(report.bytes.len())
    )
}

pub fn print_written(report: &RenderedReport, path: &Path) {
    println!("{}", format_written(report, path));
}
