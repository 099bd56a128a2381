//! Headless-shell binary for the hosted launch profile.
//!
//! Serverless images ship without a browser, so the hosted profile fetches
//! the `chrome-headless-shell` build of a pinned Chrome for Testing release,
//! extracts it into a cache directory, and reuses it on later calls:
//!
//! ```text
//! <cache_root>/
//! └── 131.0.6778.85/
//!     └── linux64/
//!         └── chrome-headless-shell-linux64/
//!             └── chrome-headless-shell
//! ```
//!
//! Extraction goes through a temporary sibling directory that is renamed into
//! place, so a half-extracted tree is never mistaken for a cached one.

use crate::config::HostedConfig;
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const USER_AGENT: &str = concat!("rsvp-report/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum PackError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("download failed: {0}")]
    Download(String),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Checksum { expected: String, actual: String },
    #[error("no headless-shell build for this platform")]
    UnsupportedPlatform,
    #[error("archive did not contain {0}")]
    MissingExecutable(&'static str),
}

/// Chrome for Testing platform name for the running target.
pub fn platform_tag() -> Option<&'static str> {
    if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
        Some("linux64")
    } else if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
        Some("mac-arm64")
    } else if cfg!(all(target_os = "macos", target_arch = "x86_64")) {
        Some("mac-x64")
    } else if cfg!(all(target_os = "windows", target_arch = "x86_64")) {
        Some("win64")
    } else if cfg!(all(target_os = "windows", target_arch = "x86")) {
        Some("win32")
    } else {
        None
    }
}

pub fn executable_name() -> &'static str {
    if cfg!(windows) {
        "chrome-headless-shell.exe"
    } else {
        "chrome-headless-shell"
    }
}

pub fn pack_url(base: &str, version: &str, platform: &str) -> String {
    format!(
        "{}/{version}/{platform}/chrome-headless-shell-{platform}.zip",
        base.trim_end_matches('/')
    )
}

pub fn cache_root(hosted: &HostedConfig) -> PathBuf {
    hosted
        .cache_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("rsvp-report-chrome"))
}

/// Return the cached headless-shell binary, downloading it first if needed.
pub fn ensure_executable(hosted: &HostedConfig) -> Result<PathBuf, PackError> {
    let platform = platform_tag().ok_or(PackError::UnsupportedPlatform)?;
    let root = cache_root(hosted);
    let dest = root.join(&hosted.chrome_version).join(platform);

    if let Some(exe) = find_executable(&dest) {
        debug!("using cached headless shell at {}", exe.display());
        return Ok(exe);
    }

    let url = pack_url(&hosted.download_base, &hosted.chrome_version, platform);
    info!("downloading headless shell {} from {url}", hosted.chrome_version);
    let body = http_get_bytes(&url)?;
    if let Some(expected) = &hosted.sha256 {
        verify_sha256(&body, expected)?;
    }

    let parent = dest.parent().unwrap_or(root.as_path());
    fs::create_dir_all(parent)?;
    let staging = tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(parent)?;
    extract_zip(&body, staging.path())?;

    place_extracted(&staging.keep(), &dest)
}

/// Move a finished extraction to `dest` and return its executable.
///
/// When the rename fails because another process already filled `dest`, the
/// staged copy is discarded and the existing tree is used. Any other failure
/// is returned.
pub fn place_extracted(staged: &Path, dest: &Path) -> Result<PathBuf, PackError> {
    if let Err(e) = fs::rename(staged, dest) {
        fs::remove_dir_all(staged)?;
        return match find_executable(dest) {
            Some(exe) => {
                debug!("headless shell already extracted at {}", dest.display());
                Ok(exe)
            }
            None => Err(e.into()),
        };
    }
    find_executable(dest).ok_or(PackError::MissingExecutable(executable_name()))
}

/// Download a URL with HTTP GET.
pub fn http_get_bytes(url: &str) -> Result<Vec<u8>, PackError> {
    let resp = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| PackError::Download(e.to_string()))?;
    let len = resp
        .header("Content-Length")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(0);
    let mut data = Vec::with_capacity(len);
    resp.into_reader().read_to_end(&mut data)?;
    Ok(data)
}

pub fn verify_sha256(bytes: &[u8], expected: &str) -> Result<(), PackError> {
    let actual = format!("{:x}", Sha256::digest(bytes));
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(PackError::Checksum {
            expected: expected.to_ascii_lowercase(),
            actual,
        })
    }
}

/// Unpack a zip into `dest`, keeping unix permissions.
/// Entries whose names would escape `dest` are skipped.
pub fn extract_zip(bytes: &[u8], dest: &Path) -> Result<(), PackError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            debug!("skipping unsafe archive entry {}", entry.name());
            continue;
        };
        let out = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&out)?;
        io::copy(&mut entry, &mut file)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out, fs::Permissions::from_mode(mode))?;
        }
    }
    Ok(())
}

/// First file under `dir` named like the headless-shell binary.
pub fn find_executable(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .find(|e| e.file_type().is_file() && e.file_name() == executable_name())
        .map(|e| e.into_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().unix_permissions(0o755);
        for (name, body) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn pack_url_layout() {
        assert_eq!(
            pack_url(
                "https://storage.googleapis.com/chrome-for-testing-public/",
                "131.0.6778.85",
                "linux64"
            ),
            "https://storage.googleapis.com/chrome-for-testing-public/131.0.6778.85/linux64/chrome-headless-shell-linux64.zip"
        );
    }

    #[test]
    fn pack_url_per_platform() {
        for platform in ["linux64", "mac-arm64", "mac-x64", "win64"] {
            let url = pack_url("https://example.test", "1.2.3", platform);
            assert!(url.ends_with(&format!("/1.2.3/{platform}/chrome-headless-shell-{platform}.zip")));
        }
    }

    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    #[test]
    fn linux_x86_64_maps_to_linux64() {
        assert_eq!(platform_tag(), Some("linux64"));
        assert_eq!(executable_name(), "chrome-headless-shell");
    }

    #[test]
    fn sha256_matches_known_digest() {
        let digest = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert!(verify_sha256(b"abc", digest).is_ok());
        assert!(verify_sha256(b"abc", &digest.to_uppercase()).is_ok());
    }

    #[test]
    fn sha256_mismatch_reports_both_digests() {
        let err = verify_sha256(b"abd", &"0".repeat(64)).unwrap_err();
        match err {
            PackError::Checksum { expected, actual } => {
                assert_eq!(expected, "0".repeat(64));
                assert_eq!(actual.len(), 64);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extract_zip_writes_nested_files() {
        let tmp = TempDir::new().unwrap();
        let zip = build_zip(&[
            ("chrome-headless-shell-linux64/chrome-headless-shell", b"binary"),
            ("chrome-headless-shell-linux64/locales/es.pak", b"pak"),
        ]);
        extract_zip(&zip, tmp.path()).unwrap();

        let exe = tmp
            .path()
            .join("chrome-headless-shell-linux64")
            .join("chrome-headless-shell");
        assert_eq!(fs::read(&exe).unwrap(), b"binary");
        assert!(tmp.path().join("chrome-headless-shell-linux64/locales/es.pak").exists());
    }

    #[cfg(unix)]
    #[test]
    fn extract_zip_keeps_executable_bit() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        extract_zip(&build_zip(&[("shell/run", b"#!/bin/sh")]), tmp.path()).unwrap();
        let mode = fs::metadata(tmp.path().join("shell/run")).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn extract_zip_skips_escaping_entries() {
        let tmp = TempDir::new().unwrap();
        let inner = tmp.path().join("inner");
        fs::create_dir(&inner).unwrap();
        extract_zip(&build_zip(&[("../evil.txt", b"x"), ("ok.txt", b"y")]), &inner).unwrap();
        assert!(!tmp.path().join("evil.txt").exists());
        assert!(inner.join("ok.txt").exists());
    }

    #[test]
    fn extract_zip_rejects_non_zip() {
        let tmp = TempDir::new().unwrap();
        let err = extract_zip(b"definitely not a zip", tmp.path()).unwrap_err();
        assert!(matches!(err, PackError::Archive(_)));
    }

    #[test]
    fn find_executable_searches_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join(executable_name()), b"").unwrap();
        assert_eq!(find_executable(tmp.path()), Some(nested.join(executable_name())));
    }

    #[test]
    fn find_executable_missing_dir_is_none() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_executable(&tmp.path().join("nope")), None);
    }

    fn staged_tree(root: &Path) -> PathBuf {
        let staged = root.join(".extract-test");
        fs::create_dir_all(staged.join("shell")).unwrap();
        fs::write(staged.join("shell").join(executable_name()), b"new").unwrap();
        staged
    }

    #[test]
    fn place_extracted_moves_tree_into_place() {
        let tmp = TempDir::new().unwrap();
        let staged = staged_tree(tmp.path());
        let dest = tmp.path().join("linux64");

        let exe = place_extracted(&staged, &dest).unwrap();
        assert_eq!(exe, dest.join("shell").join(executable_name()));
        assert!(!staged.exists());
    }

    #[test]
    fn place_extracted_keeps_tree_finished_elsewhere() {
        let tmp = TempDir::new().unwrap();
        let staged = staged_tree(tmp.path());
        let dest = tmp.path().join("linux64");
        fs::create_dir_all(dest.join("other")).unwrap();
        fs::write(dest.join("other").join(executable_name()), b"old").unwrap();

        let exe = place_extracted(&staged, &dest).unwrap();
        assert_eq!(exe, dest.join("other").join(executable_name()));
        assert_eq!(fs::read(&exe).unwrap(), b"old");
        assert!(!staged.exists());
    }

    #[test]
    fn place_extracted_reports_rename_failure() {
        let tmp = TempDir::new().unwrap();
        let staged = staged_tree(tmp.path());
        let dest = tmp.path().join("linux64");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("unrelated.txt"), b"x").unwrap();

        let err = place_extracted(&staged, &dest).unwrap_err();
        assert!(matches!(err, PackError::Io(_)), "unexpected error: {err}");
        assert!(!staged.exists());
    }

    #[test]
    fn place_extracted_without_executable_is_missing() {
        let tmp = TempDir::new().unwrap();
        let staged = tmp.path().join(".extract-empty");
        fs::create_dir_all(&staged).unwrap();
        fs::write(staged.join("README"), b"").unwrap();

        let err = place_extracted(&staged, &tmp.path().join("linux64")).unwrap_err();
        assert!(matches!(err, PackError::MissingExecutable(_)));
    }

    #[test]
    fn cache_root_prefers_configured_dir() {
        let mut hosted = HostedConfig::default();
        assert!(cache_root(&hosted).starts_with(std::env::temp_dir()));
        hosted.cache_dir = Some(PathBuf::from("/var/cache/chrome"));
        assert_eq!(cache_root(&hosted), PathBuf::from("/var/cache/chrome"));
    }

    #[test]
    fn cached_executable_skips_download() {
        let Some(platform) = platform_tag() else {
            return;
        };
        let tmp = TempDir::new().unwrap();
        let hosted = HostedConfig {
            cache_dir: Some(tmp.path().to_path_buf()),
            // Unreachable base: reaching the network would fail the test.
            download_base: "http://127.0.0.1:9".to_string(),
            ..HostedConfig::default()
        };
        let dir = tmp
            .path()
            .join(&hosted.chrome_version)
            .join(platform)
            .join(format!("chrome-headless-shell-{platform}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(executable_name()), b"").unwrap();

        assert_eq!(ensure_executable(&hosted).unwrap(), dir.join(executable_name()));
    }
}
