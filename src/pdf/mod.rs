//! PDF export of the guest list.
//!
//! The document is plain HTML ([`document`]) printed by a headless browser.
//! The browser sits behind the [`engine::RenderEngine`] seam so the pipeline
//! can be exercised without Chrome; [`chrome::HeadlessChrome`] is the real
//! implementation.
//!
//! | Module | Role |
//! |--------|------|
//! | [`document`] | maud markup and embedded stylesheet |
//! | [`params`] | paper size, margins, print flags |
//! | [`engine`] | engine traits and the scoped session guard |
//! | [`launch`] | hosted vs local profile, executable lookup |
//! | [`pack`] | download cache for the hosted headless shell |
//! | [`chrome`] | headless_chrome implementation |

pub mod chrome;
pub mod document;
pub mod engine;
pub mod launch;
pub mod pack;
pub mod params;

use crate::labels;
use crate::summary::summarize;
use crate::types::GuestRsvp;
use chrono::{DateTime, FixedOffset};
use engine::{EngineError, EngineSession, LaunchConfig, RenderEngine, ScopedSession};
use launch::LaunchError;
use log::debug;
use params::PdfParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("render engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("launch setup error: {0}")]
    Launch(#[from] LaunchError),
}

/// Render the guest list to PDF bytes.
///
/// One browser per call: launched here, closed before returning on every
/// path. A close failure is logged and does not affect the result.
pub fn render_pdf<E: RenderEngine>(
    engine: &E,
    launch: &LaunchConfig,
    rows: &[GuestRsvp],
    generated_at: &DateTime<FixedOffset>,
) -> Result<Vec<u8>, PdfError> {
    let summary = summarize(rows);
    let generated_on = labels::format_generated_at(generated_at);
    let html = document::guest_list_document(rows, &summary, &generated_on).into_string();

    let mut session = ScopedSession::launch(engine, launch)?;
    session.open_page()?;
    session.set_content(&html)?;
    debug!("document loaded, {} rows", rows.len());
    let pdf = session.export_pdf(&PdfParams::default())?;
    session.close();

    if pdf.is_empty() {
        return Err(EngineError::Export("engine returned an empty document".into()).into());
    }
    debug!("exported {} bytes", pdf.len());
    Ok(pdf)
}
