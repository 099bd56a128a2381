//! Export entry points for the HTTP layer and the CLI.
//!
//! Each call renders one format and wraps the bytes in a [`RenderedReport`]
//! that knows its download headers. On failure the detailed cause is logged
//! and the caller gets a [`ReportError`] whose
//! [`public_message`](ReportError::public_message) is safe to show.

use crate::config::EngineConfig;
use crate::pdf::chrome::HeadlessChrome;
use crate::pdf::engine::{LaunchConfig, RenderEngine};
use crate::pdf::launch::resolve_launch;
use crate::pdf::{PdfError, render_pdf};
use crate::spreadsheet::{SpreadsheetError, render_spreadsheet};
use crate::types::{GuestRsvp, RenderedReport, ReportFormat};
use chrono::{DateTime, FixedOffset};
use log::error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("spreadsheet export failed: {0}")]
    Spreadsheet(#[from] SpreadsheetError),
    #[error("PDF export failed: {0}")]
    Pdf(#[from] PdfError),
}

impl ReportError {
    pub fn format(&self) -> ReportFormat {
        match self {
            Self::Spreadsheet(_) => ReportFormat::Spreadsheet,
            Self::Pdf(_) => ReportFormat::Pdf,
        }
    }

    /// Body for the 500 response. Never includes internal detail.
    pub fn public_message(&self) -> &'static str {
        match self.format() {
            ReportFormat::Spreadsheet => "No se pudo generar el Excel.",
            ReportFormat::Pdf => "No se pudo generar el PDF.",
        }
    }
}

fn logged<T>(result: Result<T, ReportError>) -> Result<T, ReportError> {
    if let Err(e) = &result {
        error!("{e}");
    }
    result
}

pub fn export_spreadsheet(
    rows: &[GuestRsvp],
    generated_at: &DateTime<FixedOffset>,
) -> Result<RenderedReport, ReportError> {
    logged(
        render_spreadsheet(rows, generated_at)
            .map(|bytes| RenderedReport {
                format: ReportFormat::Spreadsheet,
                bytes,
            })
            .map_err(ReportError::from),
    )
}

/// PDF export through any engine.
pub fn export_pdf<E: RenderEngine>(
    engine: &E,
    launch: &LaunchConfig,
    rows: &[GuestRsvp],
    generated_at: &DateTime<FixedOffset>,
) -> Result<RenderedReport, ReportError> {
    logged(
        render_pdf(engine, launch, rows, generated_at)
            .map(|bytes| RenderedReport {
                format: ReportFormat::Pdf,
                bytes,
            })
            .map_err(ReportError::from),
    )
}

/// PDF export with headless Chrome, launched per the configured profile.
pub fn export_pdf_with_chrome(
    engine: &EngineConfig,
    rows: &[GuestRsvp],
    generated_at: &DateTime<FixedOffset>,
) -> Result<RenderedReport, ReportError> {
    let launch = logged(
        resolve_launch(engine)
            .map_err(PdfError::from)
            .map_err(ReportError::from),
    )?;
    export_pdf(&HeadlessChrome, &launch, rows, generated_at)
}
