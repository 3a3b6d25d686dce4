//! Detect bookings that overlap a proposed appointment interval.
//!
//! Intervals are half-open: a booking that ends exactly when the proposal
//! starts (or starts exactly when it ends) is NOT a conflict.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Result, SlotError};
use crate::model::Booking;
use crate::occupancy::OccupancyPolicy;

/// A booking that collides with a proposed interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub booking: Booking,
    pub overlap_minutes: i64,
}

/// Half-open overlap test between `[s, e)` and `[a, b)`.
#[inline]
pub fn overlaps(s: NaiveDateTime, e: NaiveDateTime, a: NaiveDateTime, b: NaiveDateTime) -> bool {
    s < b && e > a
}

/// Find every occupying booking that overlaps `[start, end)`.
///
/// Bookings whose status the `policy` does not count as occupying are skipped,
/// as is the booking whose id equals `exclude_id` (a booking being
/// rescheduled never conflicts with itself). Results keep input order.
///
/// # Errors
/// `SlotError::InvalidInput` when `end <= start`.
pub fn find_conflicts(
    start: NaiveDateTime,
    end: NaiveDateTime,
    bookings: &[Booking],
    policy: OccupancyPolicy,
    exclude_id: Option<&str>,
) -> Result<Vec<Conflict>> {
    if end <= start {
        return Err(SlotError::invalid(format!(
            "proposed interval {} - {} is empty or reversed",
            start, end
        )));
    }

    let conflicts = bookings
        .iter()
        .filter(|b| policy.occupies(b.status))
        .filter(|b| exclude_id != Some(b.id.as_str()))
        .filter(|b| overlaps(start, end, b.start, b.end))
        .map(|b| Conflict {
            booking: b.clone(),
            overlap_minutes: (end.min(b.end) - start.max(b.start)).num_minutes(),
        })
        .collect();

    Ok(conflicts)
}
