//! Day timeline: merged booked and unavailable blocks plus the free gaps.
//!
//! Sorts intervals by start time, merges overlapping or adjacent periods, then
//! computes the gaps between merged periods within the workday.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::Result;
use crate::evaluator::{check_intervals, SlotRequest};
use crate::model::{Booking, UnavailabilityWindow};

/// A contiguous stretch of time within the workday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_minutes: i64,
}

impl TimeBlock {
    fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

/// The workday of one therapist, split into booked, unavailable and free time.
///
/// `booked` and `unavailable` are each merged and sorted. Where a booking and
/// an unavailability window overlap, both blocks are reported; `free` holds
/// only time covered by neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTimeline {
    pub day: NaiveDate,
    pub booked: Vec<TimeBlock>,
    pub unavailable: Vec<TimeBlock>,
    pub free: Vec<TimeBlock>,
}

impl DayTimeline {
    /// Total free minutes in the workday.
    pub fn free_minutes(&self) -> i64 {
        self.free.iter().map(|b| b.duration_minutes).sum()
    }

    /// The first free block of at least `min_minutes`.
    pub fn first_free_block(&self, min_minutes: i64) -> Option<&TimeBlock> {
        self.free.iter().find(|b| b.duration_minutes >= min_minutes)
    }
}

/// Merge overlapping or adjacent intervals, clipped to the given window.
///
/// Returns a sorted, non-overlapping list of `(start, end)` intervals.
/// Intervals entirely outside the window and empty intervals are dropped.
pub fn merge_intervals(
    intervals: impl IntoIterator<Item = (NaiveDateTime, NaiveDateTime)>,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    let mut clipped: Vec<(NaiveDateTime, NaiveDateTime)> = intervals
        .into_iter()
        .filter(|&(start, end)| start < window_end && end > window_start && start < end)
        .map(|(start, end)| (start.max(window_start), end.min(window_end)))
        .collect();

    clipped.sort_unstable();

    let mut merged: Vec<(NaiveDateTime, NaiveDateTime)> = Vec::with_capacity(clipped.len());
    for (start, end) in clipped {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}

/// Build the timeline of `day` within the request's workday bounds.
///
/// The occupancy policy and `exclude_booking_id` apply exactly as in
/// [`crate::evaluate_slots`]. Duration and granularity are validated but do not
/// affect the result.
pub fn day_timeline(
    day: NaiveDate,
    request: &SlotRequest,
    bookings: &[Booking],
    windows: &[UnavailabilityWindow],
    exclude_booking_id: Option<&str>,
) -> Result<DayTimeline> {
    request.validate()?;
    check_intervals(bookings, windows)?;

    let window_start = day.and_time(request.workday_start);
    let window_end = day.and_time(request.workday_end);

    let booked = merge_intervals(
        bookings
            .iter()
            .filter(|b| request.policy.occupies(b.status))
            .filter(|b| exclude_booking_id != Some(b.id.as_str()))
            .map(|b| (b.start, b.end)),
        window_start,
        window_end,
    );
    let unavailable = merge_intervals(
        windows.iter().map(|w| (w.start, w.end)),
        window_start,
        window_end,
    );
    let busy = merge_intervals(
        booked.iter().chain(unavailable.iter()).copied(),
        window_start,
        window_end,
    );

    let mut free = Vec::new();
    let mut cursor = window_start;
    for &(busy_start, busy_end) in &busy {
        if cursor < busy_start {
            free.push(TimeBlock::new(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }
    if cursor < window_end {
        free.push(TimeBlock::new(cursor, window_end));
    }

    let to_blocks = |v: Vec<(NaiveDateTime, NaiveDateTime)>| -> Vec<TimeBlock> {
        v.into_iter().map(|(s, e)| TimeBlock::new(s, e)).collect()
    };

    Ok(DayTimeline {
        day,
        booked: to_blocks(booked),
        unavailable: to_blocks(unavailable),
        free,
    })
}
