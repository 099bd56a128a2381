//! Fixed presentation strings shared by the spreadsheet and the PDF.
//!
//! The export is for one couple and one audience; labels are Spanish and
//! not configurable.

use chrono::{DateTime, FixedOffset, Locale};

pub const COUPLE: &str = "Boda Rosaura & José";
pub const SPREADSHEET_TITLE: &str = "Lista de Invitados - Boda Rosaura & José";
pub const SHEET_NAME: &str = "Invitados";

pub const SUMMARY_HEADING: &str = "RESUMEN";
pub const REGISTERED: &str = "Invitados registrados";
pub const CONFIRMED: &str = "Confirmados";
pub const PENDING: &str = "Pendientes";
pub const DECLARED_GUESTS: &str = "Total invitados declarados";

/// Column headings of the spreadsheet guest table, in column order.
pub const COLUMNS: [&str; 5] = [
    "Nombre completo",
    "# de invitados",
    "Teléfono",
    "Nota",
    "Confirmado",
];

/// Guest table headings in the PDF; only the count column is worded differently.
pub const PDF_COLUMNS: [&str; 5] = [
    "Nombre completo",
    "# invitados",
    "Teléfono",
    "Nota",
    "Confirmado",
];

pub const YES: &str = "Sí";
pub const NO: &str = "No";

/// Attendance token shown in the last column.
pub fn attending_label(attending: bool) -> &'static str {
    if attending { YES } else { NO }
}

/// Human-readable timestamp, e.g. `14 mar 2026, 18:30`.
pub fn format_generated_at(at: &DateTime<FixedOffset>) -> String {
    at.format_localized("%d %b %Y, %H:%M", Locale::es_MX)
        .to_string()
}
