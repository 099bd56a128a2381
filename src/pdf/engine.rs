//! The rendering-engine seam and scoped ownership of a running engine.
//!
//! [`RenderEngine`] launches a browser process; the returned
//! [`EngineSession`] loads markup and prints it. The production
//! implementation is [`HeadlessChrome`](super::chrome::HeadlessChrome).
//!
//! A session is never handled bare by the PDF pipeline: it lives inside a
//! [`ScopedSession`], which closes it exactly once, either explicitly or when
//! the guard is dropped on an early return. Close failures are logged and
//! never replace the error that caused the early return.

use super::params::PdfParams;
use log::warn;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("could not launch browser: {0}")]
    Launch(String),
    #[error("could not open page: {0}")]
    Page(String),
    #[error("page failed to load: {0}")]
    Load(String),
    #[error("PDF export failed: {0}")]
    Export(String),
    #[error("browser did not close cleanly: {0}")]
    Close(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything needed to start one browser process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub headless: bool,
    pub sandbox: bool,
    /// Default viewport as `(width, height)` in CSS pixels.
    pub viewport: (u32, u32),
    /// How long the browser may sit idle between DevTools calls.
    pub idle_timeout: Duration,
}

/// Starts browser processes.
pub trait RenderEngine {
    type Session: EngineSession;

    fn launch(&self, config: &LaunchConfig) -> Result<Self::Session, EngineError>;
}

/// One running browser owned by a single render call.
pub trait EngineSession {
    /// Open the page the document will be loaded into.
    fn open_page(&mut self) -> Result<(), EngineError>;

    /// Load markup and block until it and its resources have loaded.
    fn set_content(&mut self, html: &str) -> Result<(), EngineError>;

    /// Paginate the loaded page and return the PDF bytes.
    fn export_pdf(&mut self, params: &PdfParams) -> Result<Vec<u8>, EngineError>;

    /// Terminate the browser process.
    fn close(&mut self) -> Result<(), EngineError>;
}

/// Owns a launched session and closes it exactly once.
pub struct ScopedSession<S: EngineSession> {
    session: S,
    closed: bool,
}

impl<S: EngineSession> ScopedSession<S> {
    pub fn launch<E>(engine: &E, config: &LaunchConfig) -> Result<Self, EngineError>
    where
        E: RenderEngine<Session = S>,
    {
        Ok(Self {
            session: engine.launch(config)?,
            closed: false,
        })
    }

    /// Close now instead of at drop.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.session.close() {
            warn!("render engine cleanup failed: {e}");
        }
    }
}

impl<S: EngineSession> Deref for ScopedSession<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: EngineSession> DerefMut for ScopedSession<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: EngineSession> Drop for ScopedSession<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Where the mock should fail, if anywhere.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailAt {
        Nowhere,
        Launch,
        OpenPage,
        SetContent,
        Export,
        Close,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Launch(LaunchConfig),
        OpenPage,
        SetContent(String),
        Export(PdfParams),
        Close,
    }

    /// Engine that records calls instead of starting a browser.
    /// Sessions share the engine's log so tests can inspect it after the render.
    pub struct MockEngine {
        pub ops: Arc<Mutex<Vec<RecordedOp>>>,
        pub fail_at: FailAt,
        pub output: Vec<u8>,
    }

    pub struct MockSession {
        ops: Arc<Mutex<Vec<RecordedOp>>>,
        fail_at: FailAt,
        output: Vec<u8>,
    }

    impl MockEngine {
        pub fn new() -> Self {
            Self {
                ops: Arc::new(Mutex::new(Vec::new())),
                fail_at: FailAt::Nowhere,
                output: b"%PDF-1.7 mock".to_vec(),
            }
        }

        pub fn failing_at(fail_at: FailAt) -> Self {
            Self {
                fail_at,
                ..Self::new()
            }
        }

        pub fn returning(output: &[u8]) -> Self {
            Self {
                output: output.to_vec(),
                ..Self::new()
            }
        }

        pub fn operations(&self) -> Vec<RecordedOp> {
            self.ops.lock().unwrap().clone()
        }

        pub fn close_count(&self) -> usize {
            self.operations()
                .iter()
                .filter(|op| **op == RecordedOp::Close)
                .count()
        }
    }

    impl RenderEngine for MockEngine {
        type Session = MockSession;

        fn launch(&self, config: &LaunchConfig) -> Result<MockSession, EngineError> {
            self.ops
                .lock()
                .unwrap()
                .push(RecordedOp::Launch(config.clone()));
            if self.fail_at == FailAt::Launch {
                return Err(EngineError::Launch("mock launch failure".into()));
            }
            Ok(MockSession {
                ops: Arc::clone(&self.ops),
                fail_at: self.fail_at,
                output: self.output.clone(),
            })
        }
    }

    impl MockSession {
        fn record(&self, op: RecordedOp) {
            self.ops.lock().unwrap().push(op);
        }
    }

    impl EngineSession for MockSession {
        fn open_page(&mut self) -> Result<(), EngineError> {
            self.record(RecordedOp::OpenPage);
            if self.fail_at == FailAt::OpenPage {
                return Err(EngineError::Page("mock page failure".into()));
            }
            Ok(())
        }

        fn set_content(&mut self, html: &str) -> Result<(), EngineError> {
            self.record(RecordedOp::SetContent(html.to_string()));
            if self.fail_at == FailAt::SetContent {
                return Err(EngineError::Load("mock load failure".into()));
            }
            Ok(())
        }

        fn export_pdf(&mut self, params: &PdfParams) -> Result<Vec<u8>, EngineError> {
            self.record(RecordedOp::Export(*params));
            if self.fail_at == FailAt::Export {
                return Err(EngineError::Export("mock export failure".into()));
            }
            Ok(self.output.clone())
        }

        fn close(&mut self) -> Result<(), EngineError> {
            self.record(RecordedOp::Close);
            if self.fail_at == FailAt::Close {
                return Err(EngineError::Close("mock close failure".into()));
            }
            Ok(())
        }
    }

    pub fn launch_config() -> LaunchConfig {
        LaunchConfig {
            executable: PathBuf::from("/opt/chrome/chrome"),
            args: vec!["--no-sandbox".to_string()],
            headless: true,
            sandbox: false,
            viewport: (1920, 1080),
            idle_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn dropping_guard_closes_session() {
        let engine = MockEngine::new();
        {
            let _session = ScopedSession::launch(&engine, &launch_config()).unwrap();
        }
        assert_eq!(engine.close_count(), 1);
    }

    #[test]
    fn explicit_close_is_not_repeated_on_drop() {
        let engine = MockEngine::new();
        let session = ScopedSession::launch(&engine, &launch_config()).unwrap();
        session.close();
        assert_eq!(engine.close_count(), 1);
    }

    #[test]
    fn early_return_still_closes() {
        fn attempt(engine: &MockEngine) -> Result<Vec<u8>, EngineError> {
            let mut session = ScopedSession::launch(engine, &launch_config())?;
            session.open_page()?;
            session.set_content("<p>hola</p>")?;
            session.export_pdf(&PdfParams::default())
        }

        let engine = MockEngine::failing_at(FailAt::SetContent);
        let err = attempt(&engine).unwrap_err();
        assert!(matches!(err, EngineError::Load(_)));
        assert_eq!(engine.close_count(), 1);
        assert!(!engine
            .operations()
            .iter()
            .any(|op| matches!(op, RecordedOp::Export(_))));
    }

    #[test]
    fn failed_launch_has_nothing_to_close() {
        let engine = MockEngine::failing_at(FailAt::Launch);
        assert!(ScopedSession::launch(&engine, &launch_config()).is_err());
        assert_eq!(engine.close_count(), 0);
    }

    #[test]
    fn close_failure_is_swallowed() {
        let engine = MockEngine::failing_at(FailAt::Close);
        let session = ScopedSession::launch(&engine, &launch_config()).unwrap();
        session.close();
        assert_eq!(engine.close_count(), 1);
    }
}
