//! Choosing how to start the browser.
//!
//! Serverless hosts (Vercel, AWS Lambda) have no browser installed and run
//! without user namespaces, so they get the downloaded headless shell and the
//! full set of sandbox-free flags. Everywhere else an installed Chrome is
//! looked up and started with relaxed sandboxing.
//!
//! Environment lookups go through a closure so detection is testable without
//! touching the process environment.

use super::engine::LaunchConfig;
use super::pack::{self, PackError};
use crate::config::{EngineConfig, ProfileChoice};
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Any of these set to a non-empty value marks a serverless host.
pub const HOSTED_MARKERS: [&str; 2] = ["VERCEL", "AWS_LAMBDA_FUNCTION_VERSION"];

/// Variables naming a browser binary for the local profile, in lookup order.
pub const EXECUTABLE_VARS: [&str; 2] = ["CHROME_EXECUTABLE_PATH", "PUPPETEER_EXECUTABLE_PATH"];

const HOSTED_ARGS: &[&str] = &[
    "--no-sandbox",
    "--no-zygote",
    "--single-process",
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-setuid-sandbox",
    "--hide-scrollbars",
    "--mute-audio",
    "--no-first-run",
];

const LOCAL_ARGS: &[&str] = &["--no-sandbox", "--disable-setuid-sandbox"];

#[cfg(target_os = "macos")]
const WELL_KNOWN: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(target_os = "windows")]
const WELL_KNOWN: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const WELL_KNOWN: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
];

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error(
        "no Chrome executable found; set engine.executable_path or CHROME_EXECUTABLE_PATH"
    )]
    NotFound,
    #[error("headless shell unavailable: {0}")]
    Pack(#[from] PackError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchProfile {
    Hosted,
    Local,
}

impl LaunchProfile {
    pub fn detect(env: impl Fn(&str) -> Option<String>) -> Self {
        let hosted = HOSTED_MARKERS
            .iter()
            .any(|&key| env(key).is_some_and(|v| !v.is_empty()));
        if hosted { Self::Hosted } else { Self::Local }
    }

    /// Apply a configured choice, falling back to detection for `auto`.
    pub fn choose(choice: ProfileChoice, env: impl Fn(&str) -> Option<String>) -> Self {
        match choice {
            ProfileChoice::Auto => Self::detect(env),
            ProfileChoice::Hosted => Self::Hosted,
            ProfileChoice::Local => Self::Local,
        }
    }

    pub fn from_env(choice: ProfileChoice) -> Self {
        Self::choose(choice, |key| std::env::var(key).ok())
    }

    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::Hosted => HOSTED_ARGS,
            Self::Local => LOCAL_ARGS,
        }
    }
}

/// Find an installed browser for the local profile.
///
/// Order: the configured path, then [`EXECUTABLE_VARS`], then the first
/// well-known install location that exists. Explicit settings are returned
/// as-is so a wrong path fails loudly at launch instead of being skipped.
pub fn locate_local(
    configured: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    exists: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    if let Some(path) = configured {
        return Some(path.to_path_buf());
    }
    if let Some(path) = EXECUTABLE_VARS
        .iter()
        .filter_map(|&key| env(key))
        .find(|v| !v.is_empty())
    {
        return Some(PathBuf::from(path));
    }
    WELL_KNOWN
        .iter()
        .map(PathBuf::from)
        .find(|path| exists(path.as_path()))
}

/// Assemble the launch settings for a profile and a resolved executable.
pub fn launch_config(profile: LaunchProfile, executable: PathBuf, engine: &EngineConfig) -> LaunchConfig {
    let mut args: Vec<String> = profile.args().iter().map(|a| a.to_string()).collect();
    args.extend(engine.extra_args.iter().cloned());
    LaunchConfig {
        executable,
        args,
        headless: true,
        sandbox: false,
        viewport: (engine.viewport[0], engine.viewport[1]),
        idle_timeout: Duration::from_secs(engine.idle_timeout_secs),
    }
}

/// Resolve the profile from config and environment and find its executable.
///
/// The hosted profile may download and unpack the headless shell.
pub fn resolve_launch(engine: &EngineConfig) -> Result<LaunchConfig, LaunchError> {
    let profile = LaunchProfile::from_env(engine.profile);
    debug!("launch profile: {profile:?}");

    let executable = match profile {
        LaunchProfile::Hosted => pack::ensure_executable(&engine.hosted)?,
        LaunchProfile::Local => locate_local(
            engine.executable_path.as_deref(),
            |key| std::env::var(key).ok(),
            Path::exists,
        )
        .or_else(|| headless_chrome::browser::default_executable().ok())
        .ok_or(LaunchError::NotFound)?,
    };
    debug!("browser executable: {}", executable.display());

    Ok(launch_config(profile, executable, engine))
}
