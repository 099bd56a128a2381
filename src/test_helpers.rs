//! Shared test utilities: row builders, a fixed timestamp, and readers for
//! the parts of a rendered XLSX package.

use crate::types::GuestRsvp;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::io::{Cursor, Read};

/// A guest with no phone or notes.
pub fn guest(name: &str, guests_count: Option<u32>, attending: bool) -> GuestRsvp {
    guest_with(name, guests_count, None, None, attending)
}

pub fn guest_with(
    name: &str,
    guests_count: Option<u32>,
    phone: Option<&str>,
    notes: Option<&str>,
    attending: bool,
) -> GuestRsvp {
    GuestRsvp {
        full_name: name.to_string(),
        guests_count,
        phone: phone.map(str::to_string),
        notes: notes.map(str::to_string),
        attending,
    }
}

/// 14 March 2026, 18:30 in Mexico City (UTC-6).
pub fn fixed_time() -> DateTime<FixedOffset> {
    FixedOffset::west_opt(6 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 14, 18, 30, 0)
        .unwrap()
}

/// Names of every entry in an XLSX (zip) package.
pub fn xlsx_entries(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("not a zip package");
    archive.file_names().map(str::to_string).collect()
}

/// Read one XML part of an XLSX package. Panics with the available parts on miss.
pub fn xlsx_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("not a zip package");
    let available: Vec<String> = archive.file_names().map(str::to_string).collect();
    let mut file = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("part '{name}' not found. Available: {available:?}"));
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}
