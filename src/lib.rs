//! # RSVP Report
//!
//! Administrator downloads for a wedding RSVP site: the guest list as a
//! styled XLSX spreadsheet and as an A4 PDF printed by headless Chrome.
//!
//! Both exports take the rows exactly as stored (newest first), compute the
//! same summary, and keep the row order. Neither sorts, filters, nor
//! deduplicates.
//!
//! ```text
//! rows ─┬─ summarize ─┬─ spreadsheet ─→ .xlsx bytes
//!       │             └─ pdf::document ─→ HTML ─→ Chrome ─→ .pdf bytes
//!       └────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Row and summary types, export formats and download headers |
//! | [`summary`] | Totals: registered, confirmed, pending, declared guests |
//! | [`labels`] | Spanish labels and date formatting shared by both exports |
//! | [`spreadsheet`] | Sheet layout, per-cell styling, XLSX writing |
//! | [`pdf`] | HTML document, print settings, browser engine and launch |
//! | [`export`] | Entry points returning downloadable reports and public errors |
//! | [`config`] | `rsvp-report.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Pure Layout, Styling at Write Time
//!
//! The spreadsheet is described as a grid of values plus a pure
//! `style_for(row, col, value)` function. Neither touches `rust_xlsxwriter`
//! until the final write, so banding, colors, and placement are unit tested
//! without opening the generated file.
//!
//! ## One Browser per PDF
//!
//! Each PDF call launches its own Chrome and owns it through a guard that
//! closes it on every exit path. Nothing is pooled, so concurrent exports
//! never share a page. The engine sits behind a trait and the whole pipeline
//! is tested against a recording mock.
//!
//! ## Lenient Rows
//!
//! Rows come from a database export and are decoded leniently: a guest count
//! that is not a whole non-negative number is unknown, null text is empty,
//! and unknown fields are ignored. Only I/O, browser, and serialization
//! failures are errors.

pub mod config;
pub mod export;
pub mod labels;
pub mod output;
pub mod pdf;
pub mod spreadsheet;
pub mod summary;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
