//! HTML guest list that the browser prints to PDF.
//!
//! Built with maud so the structure is checked at compile time. Guest-supplied
//! text goes through [`Text`], which also escapes single quotes; maud's own
//! escaping leaves those alone.

use crate::labels;
use crate::types::{GuestRsvp, ReportSummary};
use maud::{DOCTYPE, Markup, PreEscaped, Render, html};

const CSS: &str = include_str!("../../static/guest-list.css");

const LOGO_URL: &str = "https://storage.googleapis.com/joseyrosaura/dw-gray-logo.svg";
const FOOTER_NOTE: &str = "Boda Rosaura & José 2026 | Documento por DevWorks Studios | Generado automáticamente para uso interno.";
const EMPTY_TABLE: &str = "No hay invitados aún.";
const PLACEHOLDER: &str = "—";

/// Guest-supplied text, escaped for `&`, `<`, `>`, `"` and `'`.
pub struct Text<'a>(pub &'a str);

impl Render for Text<'_> {
    fn render_to(&self, buffer: &mut String) {
        escape_into(self.0, buffer);
    }
}

fn escape_into(value: &str, buffer: &mut String) {
    for c in value.chars() {
        match c {
            '&' => buffer.push_str("&amp;"),
            '<' => buffer.push_str("&lt;"),
            '>' => buffer.push_str("&gt;"),
            '"' => buffer.push_str("&quot;"),
            '\'' => buffer.push_str("&#039;"),
            _ => buffer.push(c),
        }
    }
}

/// The full printable document.
pub fn guest_list_document(rows: &[GuestRsvp], summary: &ReportSummary, generated_on: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="UTF-8";
                title { "Invitados | " (labels::COUPLE) }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.page {
                    (page_header(generated_on))
                    (summary_cards(summary))
                    (guest_table(rows))
                    (page_footer())
                }
            }
        }
    }
}

fn page_header(generated_on: &str) -> Markup {
    html! {
        header {
            div {
                span.pill { "Lista de invitados con RSVP" }
                h1.title { (labels::COUPLE) }
                p { "Lista de invitados generada: " (generated_on) }
            }
        }
    }
}

fn summary_cards(summary: &ReportSummary) -> Markup {
    let declared = format!("# {}", labels::DECLARED_GUESTS);
    let cards = [
        (labels::REGISTERED, summary.total as u64),
        (labels::CONFIRMED, summary.confirmed as u64),
        (labels::PENDING, summary.pending as u64),
        (declared.as_str(), summary.guests),
    ];

    html! {
        div.meta {
            @for (title, value) in cards {
                div.meta-card {
                    p.meta-title { (title) }
                    p.meta-value { (value) }
                }
            }
        }
    }
}

fn guest_table(rows: &[GuestRsvp]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    @for heading in labels::PDF_COLUMNS {
                        th { (heading) }
                    }
                }
            }
            tbody {
                @if rows.is_empty() {
                    tr { td.empty colspan="5" { (EMPTY_TABLE) } }
                }
                @for (index, row) in rows.iter().enumerate() {
                    (guest_row(index, row))
                }
            }
        }
    }
}

/// Even rows carry the stripe; the attendance cell is classed `yes` or `no`.
fn guest_row(index: usize, row: &GuestRsvp) -> Markup {
    let attending_class = if row.attending { "yes" } else { "no" };
    html! {
        tr class=[(index % 2 == 0).then_some("striped")] {
            td { (Text(&row.full_name)) }
            td {
                @match row.guests_count {
                    Some(n) => { (n) },
                    None => { "-" },
                }
            }
            td { (Text(row.phone().unwrap_or(PLACEHOLDER))) }
            td { (Text(row.notes().unwrap_or(PLACEHOLDER))) }
            td class=(attending_class) { (labels::attending_label(row.attending)) }
        }
    }
}

fn page_footer() -> Markup {
    html! {
        footer {
            img.brand-logo src=(LOGO_URL) alt="DevWorks Studios";
            p.disclaimer { (FOOTER_NOTE) }
        }
    }
}
