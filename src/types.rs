//! Row shape and report types shared by both renderers.
//!
//! Rows arrive already queried and sorted by the caller (newest first in the
//! admin export). Renderers never reorder, deduplicate, or mutate them.
//!
//! Decoding is forgiving for the fields the intake form writes
//! loosely: a guest count that is not a non-negative whole number becomes
//! "unknown", and empty phone/notes strings read as absent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One RSVP as stored by the intake handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRsvp {
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    /// `None` when the stored value is missing, negative, fractional or not a number.
    #[serde(default, deserialize_with = "lenient_count")]
    pub guests_count: Option<u32>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attending: bool,
}

impl GuestRsvp {
    /// Phone number, treating an empty string as absent.
    pub fn phone(&self) -> Option<&str> {
        non_empty(self.phone.as_deref())
    }

    /// Free-text note, treating an empty string as absent.
    pub fn notes(&self) -> Option<&str> {
        non_empty(self.notes.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

/// Interpret a stored guest count.
///
/// Accepts JSON numbers that are non-negative, whole-valued and fit in
/// `u32`. Everything else, numeric strings included, is unknown.
pub fn count_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(v) => u32::try_from(v).ok(),
            None => n
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .filter(|f| *f <= f64::from(u32::MAX))
                .map(|f| f as u32),
        },
        _ => None,
    }
}

/// Aggregate counts shown in both reports.
///
/// Always satisfies `confirmed + pending == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub guests: u64,
}

/// The two export formats offered to the administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Spreadsheet,
    Pdf,
}

impl ReportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Pdf => "application/pdf",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            Self::Spreadsheet => "invitados-boda.xlsx",
            Self::Pdf => "invitados-boda.pdf",
        }
    }
}

/// A finished export, ready to hand to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
}

impl RenderedReport {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn filename(&self) -> &'static str {
        self.format.filename()
    }

    /// Response headers for a download: type, attachment disposition, no caching.
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            ("Content-Type", self.content_type().to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename()),
            ),
            ("Cache-Control", "private, no-store".to_string()),
        ]
    }
}
