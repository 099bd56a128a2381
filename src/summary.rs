//! Aggregate counts for the summary block of both reports.

use crate::types::{GuestRsvp, ReportSummary};

/// Count registered, confirmed and pending rows and add up declared guests.
///
/// Rows with an unknown guest count still count toward the totals; they
/// simply add nothing to `guests`.
pub fn summarize(rows: &[GuestRsvp]) -> ReportSummary {
    let total = rows.len();
    let confirmed = rows.iter().filter(|r| r.attending).count();
    let guests = rows
        .iter()
        .filter_map(|r| r.guests_count)
        .map(u64::from)
        .sum();

    ReportSummary {
        total,
        confirmed,
        pending: total - confirmed,
        guests,
    }
}
