//! Report configuration.
//!
//! Loads `rsvp-report.toml`, merges it over stock defaults, and validates the
//! result. Only the rendering engine is configurable; the report's labels,
//! palette, and layout are fixed.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [engine]
//! profile = "auto"             # auto | hosted | local
//! # executable_path = "/usr/bin/chromium"
//! viewport = [1920, 1080]      # default page viewport in CSS pixels
//! idle_timeout_secs = 60       # browser idle timeout between DevTools calls
//! extra_args = []              # appended to the profile's flags
//!
//! [engine.hosted]
//! chrome_version = "131.0.6778.85"
//! download_base = "https://storage.googleapis.com/chrome-for-testing-public"
//! # sha256 = "..."             # expected digest of the downloaded zip
//! # cache_dir = "/tmp/rsvp-report-chrome"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [engine]
//! profile = "local"
//! executable_path = "/opt/google/chrome/chrome"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "rsvp-report.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Browser engine used for the PDF export.
    pub engine: EngineConfig,
}

/// Which launch profile to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileChoice {
    /// Hosted when a serverless marker is present in the environment, else local.
    #[default]
    Auto,
    Hosted,
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub profile: ProfileChoice,
    /// Explicit browser binary. Takes precedence over every other lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_path: Option<PathBuf>,
    /// `[width, height]` in CSS pixels.
    pub viewport: [u32; 2],
    pub idle_timeout_secs: u64,
    pub extra_args: Vec<String>,
    pub hosted: HostedConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: ProfileChoice::Auto,
            executable_path: None,
            viewport: [1920, 1080],
            idle_timeout_secs: 60,
            extra_args: Vec::new(),
            hosted: HostedConfig::default(),
        }
    }
}

/// Where the hosted profile gets its headless-shell binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostedConfig {
    /// Pinned Chrome for Testing release.
    pub chrome_version: String,
    pub download_base: String,
    /// Expected SHA-256 of the downloaded zip, lowercase hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Defaults to a directory under the system temp dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            chrome_version: "131.0.6778.85".to_string(),
            download_base: "https://storage.googleapis.com/chrome-for-testing-public".to_string(),
            sha256: None,
            cache_dir: None,
        }
    }
}

impl ReportConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let engine = &self.engine;
        if engine.viewport[0] == 0 || engine.viewport[1] == 0 {
            return Err(ConfigError::Validation(
                "engine.viewport values must be non-zero".into(),
            ));
        }
        if engine.idle_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "engine.idle_timeout_secs must be at least 1".into(),
            ));
        }
        if engine.hosted.chrome_version.trim().is_empty() {
            return Err(ConfigError::Validation(
                "engine.hosted.chrome_version must not be empty".into(),
            ));
        }
        if !engine.hosted.download_base.starts_with("https://")
            && !engine.hosted.download_base.starts_with("http://")
        {
            return Err(ConfigError::Validation(
                "engine.hosted.download_base must be an http(s) URL".into(),
            ));
        }
        if let Some(digest) = &engine.hosted.sha256 {
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Validation(
                    "engine.hosted.sha256 must be 64 hex characters".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ReportConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ReportConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ReportConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file path.
///
/// A missing file yields the stock defaults; a file that exists but does not
/// parse, has unknown keys, or fails validation is an error.
pub fn load_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    let overlay = if path.exists() {
        let content = fs::read_to_string(path)?;
        Some(toml::from_str::<toml::Value>(&content)?)
    } else {
        None
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `rsvp-report.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# RSVP Report Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# PDF rendering engine (headless Chrome)
# ---------------------------------------------------------------------------
[engine]
# "auto" picks "hosted" when VERCEL or AWS_LAMBDA_FUNCTION_VERSION is set,
# otherwise "local".
profile = "auto"

# Browser binary for the local profile. When unset, CHROME_EXECUTABLE_PATH is
# used, then well-known install locations, then a PATH search.
# executable_path = "/usr/bin/chromium"

# Default viewport [width, height] in CSS pixels.
viewport = [1920, 1080]

# Seconds the browser may sit idle between DevTools calls before giving up.
idle_timeout_secs = 60

# Extra command-line flags appended to the profile's own.
extra_args = []

# ---------------------------------------------------------------------------
# Hosted profile: headless-shell fetched from Chrome for Testing
# ---------------------------------------------------------------------------
[engine.hosted]
chrome_version = "131.0.6778.85"
download_base = "https://storage.googleapis.com/chrome-for-testing-public"

# Expected SHA-256 of the downloaded zip (lowercase hex). Unset skips the check.
# sha256 = ""

# Where the extracted binary is cached. Defaults to the system temp dir.
# cache_dir = "/tmp/rsvp-report-chrome"
"##
}
