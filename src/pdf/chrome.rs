//! [`RenderEngine`] backed by a real Chrome via `headless_chrome`.
//!
//! Markup is written to a temporary `.html` file and loaded with a `file://`
//! navigation, so the load event covers the stylesheet and remote images
//! before printing starts. The browser process ends when the session's
//! [`Browser`] handle is dropped.

use super::engine::{EngineError, EngineSession, LaunchConfig, RenderEngine};
use super::params::{PdfParams, mm_to_inches};
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::debug;
use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use url::Url;

/// Launches a fresh Chrome per render.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessChrome;

pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
    page_file: Option<NamedTempFile>,
}

impl RenderEngine for HeadlessChrome {
    type Session = ChromeSession;

    fn launch(&self, config: &LaunchConfig) -> Result<ChromeSession, EngineError> {
        let options = LaunchOptions {
            headless: config.headless,
            sandbox: config.sandbox,
            window_size: Some(config.viewport),
            ignore_certificate_errors: true,
            path: Some(config.executable.clone()),
            args: config.args.iter().map(OsStr::new).collect(),
            idle_browser_timeout: config.idle_timeout,
            ..Default::default()
        };
        debug!("launching {}", config.executable.display());
        let browser = Browser::new(options).map_err(|e| EngineError::Launch(e.to_string()))?;
        Ok(ChromeSession {
            browser: Some(browser),
            tab: None,
            page_file: None,
        })
    }
}

/// `file://` URL for a local page, percent-encoded and in platform form.
pub fn page_url(path: &Path) -> Result<String, EngineError> {
    Url::from_file_path(path)
        .map(String::from)
        .map_err(|()| EngineError::Load(format!("not an absolute path: {}", path.display())))
}

impl ChromeSession {
    fn tab(&self) -> Result<&Arc<Tab>, EngineError> {
        self.tab
            .as_ref()
            .ok_or_else(|| EngineError::Page("no page open".into()))
    }
}

impl EngineSession for ChromeSession {
    fn open_page(&mut self) -> Result<(), EngineError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| EngineError::Page("browser already closed".into()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| EngineError::Page(e.to_string()))?;
        self.tab = Some(tab);
        Ok(())
    }

    fn set_content(&mut self, html: &str) -> Result<(), EngineError> {
        let mut file = tempfile::Builder::new()
            .prefix("rsvp-report-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        file.flush()?;

        let url = page_url(file.path())?;
        self.tab()?
            .navigate_to(&url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| EngineError::Load(e.to_string()))?;

        // The file must outlive the page that reads it.
        self.page_file = Some(file);
        Ok(())
    }

    fn export_pdf(&mut self, params: &PdfParams) -> Result<Vec<u8>, EngineError> {
        let (width, height) = params.paper.millimetres();
        let options = PrintToPdfOptions {
            print_background: Some(params.print_background),
            prefer_css_page_size: Some(params.prefer_css_page_size),
            paper_width: Some(mm_to_inches(width)),
            paper_height: Some(mm_to_inches(height)),
            margin_top: Some(mm_to_inches(params.margins.top)),
            margin_right: Some(mm_to_inches(params.margins.right)),
            margin_bottom: Some(mm_to_inches(params.margins.bottom)),
            margin_left: Some(mm_to_inches(params.margins.left)),
            ..Default::default()
        };
        self.tab()?
            .print_to_pdf(Some(options))
            .map_err(|e| EngineError::Export(e.to_string()))
    }

    fn close(&mut self) -> Result<(), EngineError> {
        let tab_result = match self.tab.take() {
            Some(tab) => tab.close(false).map(|_| ()),
            None => Ok(()),
        };
        // Dropping the handle kills the process.
        self.browser.take();
        self.page_file.take();
        tab_result.map_err(|e| EngineError::Close(e.to_string()))
    }
}
