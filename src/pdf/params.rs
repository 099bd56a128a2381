//! Print settings for the PDF export.

/// Paper sizes the export knows about. The guest list always prints on A4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    A4,
}

impl PaperSize {
    /// Width and height in millimetres, portrait.
    pub fn millimetres(self) -> (f64, f64) {
        match self {
            Self::A4 => (210.0, 297.0),
        }
    }
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfParams {
    pub paper: PaperSize,
    pub margins: Margins,
    pub print_background: bool,
    /// Let an `@page` rule in the stylesheet override `paper` and `margins`.
    pub prefer_css_page_size: bool,
}

impl Default for PdfParams {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            margins: Margins {
                top: 16.0,
                right: 14.0,
                bottom: 16.0,
                left: 14.0,
            },
            print_background: true,
            prefer_css_page_size: true,
        }
    }
}

/// DevTools takes paper and margin sizes in inches.
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / 25.4
}
