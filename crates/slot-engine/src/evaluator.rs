//! Slot availability evaluation for a single civil day.
//!
//! Candidate start times are generated on a fixed granularity between the
//! workday bounds. Each candidate `[s, s + duration)` is classified with a
//! fixed precedence:
//!
//! 1. overlaps an occupying booking → [`SlotStatus::Booked`]
//! 2. runs past the workday end, or overlaps an unavailability window →
//!    [`SlotStatus::Unavailable`]
//! 3. otherwise → [`SlotStatus::Available`]
//!
//! The evaluator is a pure function of its inputs. It never reads the clock
//! and never mutates the supplied bookings or windows.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::conflict::overlaps;
use crate::error::{Result, SlotError};
use crate::model::{add_minutes, Booking, SlotAvailability, SlotStatus, UnavailabilityWindow};
use crate::occupancy::OccupancyPolicy;

/// Upper bound for both the appointment length and the candidate spacing.
pub const MAX_SLOT_MINUTES: i64 = 24 * 60;

const DEFAULT_WORKDAY_START: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(t) => t,
    None => panic!("invalid default workday start"),
};

const DEFAULT_WORKDAY_END: NaiveTime = match NaiveTime::from_hms_opt(17, 0, 0) {
    Some(t) => t,
    None => panic!("invalid default workday end"),
};

/// Parameters of one availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    /// First candidate start time.
    #[serde(with = "crate::parse::hhmm")]
    pub workday_start: NaiveTime,
    /// Candidates start strictly before this and must end at or before it.
    #[serde(with = "crate::parse::hhmm")]
    pub workday_end: NaiveTime,
    /// Spacing between candidate start times.
    pub granularity_minutes: i64,
    /// Length of the appointment being placed.
    pub duration_minutes: i64,
    #[serde(default)]
    pub policy: OccupancyPolicy,
}

impl Default for SlotRequest {
    fn default() -> Self {
        Self {
            workday_start: DEFAULT_WORKDAY_START,
            workday_end: DEFAULT_WORKDAY_END,
            granularity_minutes: 60,
            duration_minutes: 60,
            policy: OccupancyPolicy::default(),
        }
    }
}

impl SlotRequest {
    /// A request for `duration_minutes` using the default 09:00-17:00 workday
    /// and hourly candidates.
    pub fn new(duration_minutes: i64) -> Self {
        Self {
            duration_minutes,
            ..Self::default()
        }
    }

    pub fn workday(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.workday_start = start;
        self.workday_end = end;
        self
    }

    pub fn granularity(mut self, minutes: i64) -> Self {
        self.granularity_minutes = minutes;
        self
    }

    pub fn policy(mut self, policy: OccupancyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check the request itself. Called by every evaluation entry point.
    ///
    /// # Errors
    /// `SlotError::InvalidInput` for a duration or granularity outside
    /// `1..=MAX_SLOT_MINUTES`, or a workday that ends at or before it starts.
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes <= 0 {
            return Err(SlotError::invalid(format!(
                "duration must be positive, got {} min",
                self.duration_minutes
            )));
        }
        if self.granularity_minutes <= 0 {
            return Err(SlotError::invalid(format!(
                "slot granularity must be positive, got {} min",
                self.granularity_minutes
            )));
        }
        if self.duration_minutes > MAX_SLOT_MINUTES {
            return Err(SlotError::invalid(format!(
                "duration {} min exceeds {} min",
                self.duration_minutes, MAX_SLOT_MINUTES
            )));
        }
        if self.granularity_minutes > MAX_SLOT_MINUTES {
            return Err(SlotError::invalid(format!(
                "slot granularity {} min exceeds {} min",
                self.granularity_minutes, MAX_SLOT_MINUTES
            )));
        }
        if self.workday_end <= self.workday_start {
            return Err(SlotError::invalid(format!(
                "workday end {} is not after workday start {}",
                self.workday_end, self.workday_start
            )));
        }
        Ok(())
    }
}

/// Classify every candidate slot of `day`.
///
/// `exclude_booking_id` removes one booking from the conflict set, for
/// evaluating where an existing booking could be moved to.
///
/// # Errors
/// `SlotError::InvalidInput` when the request is invalid (see
/// [`SlotRequest::validate`]) or a supplied booking or window ends before it
/// starts.
pub fn evaluate_slots(
    day: NaiveDate,
    request: &SlotRequest,
    bookings: &[Booking],
    windows: &[UnavailabilityWindow],
    exclude_booking_id: Option<&str>,
) -> Result<Vec<SlotAvailability>> {
    request.validate()?;
    check_intervals(bookings, windows)?;

    let day_start = day.and_time(request.workday_start);
    let day_end = day.and_time(request.workday_end);

    let occupying: Vec<&Booking> = bookings
        .iter()
        .filter(|b| request.policy.occupies(b.status))
        .filter(|b| exclude_booking_id != Some(b.id.as_str()))
        .collect();

    let mut slots = Vec::new();
    let mut start = day_start;
    while start < day_end {
        let end = add_minutes(start, request.duration_minutes)?;
        let status = classify(start, end, day_end, &occupying, windows);
        slots.push(SlotAvailability { start, end, status });
        start = add_minutes(start, request.granularity_minutes)?;
    }

    debug!(
        %day,
        candidates = slots.len(),
        available = count(&slots, SlotStatus::Available),
        booked = count(&slots, SlotStatus::Booked),
        unavailable = count(&slots, SlotStatus::Unavailable),
        excluded = exclude_booking_id.unwrap_or("-"),
        "evaluated slots"
    );

    Ok(slots)
}

/// The first bookable candidate of `day`, if any.
pub fn first_available(
    day: NaiveDate,
    request: &SlotRequest,
    bookings: &[Booking],
    windows: &[UnavailabilityWindow],
    exclude_booking_id: Option<&str>,
) -> Result<Option<SlotAvailability>> {
    let slots = evaluate_slots(day, request, bookings, windows, exclude_booking_id)?;
    Ok(slots.into_iter().find(SlotAvailability::is_bookable))
}

/// Start times of the bookable candidates of `day`, in order.
pub fn bookable_starts(
    day: NaiveDate,
    request: &SlotRequest,
    bookings: &[Booking],
    windows: &[UnavailabilityWindow],
    exclude_booking_id: Option<&str>,
) -> Result<Vec<NaiveDateTime>> {
    let slots = evaluate_slots(day, request, bookings, windows, exclude_booking_id)?;
    Ok(slots
        .into_iter()
        .filter(SlotAvailability::is_bookable)
        .map(|s| s.start)
        .collect())
}

fn classify(
    start: NaiveDateTime,
    end: NaiveDateTime,
    day_end: NaiveDateTime,
    occupying: &[&Booking],
    windows: &[UnavailabilityWindow],
) -> SlotStatus {
    if occupying
        .iter()
        .any(|b| overlaps(start, end, b.start, b.end))
    {
        SlotStatus::Booked
    } else if end > day_end || windows.iter().any(|w| overlaps(start, end, w.start, w.end)) {
        SlotStatus::Unavailable
    } else {
        SlotStatus::Available
    }
}

/// Reject reversed intervals and note overlapping windows, which are tolerated.
pub(crate) fn check_intervals(bookings: &[Booking], windows: &[UnavailabilityWindow]) -> Result<()> {
    if let Some(b) = bookings.iter().find(|b| b.end < b.start) {
        return Err(SlotError::invalid(format!(
            "booking '{}' ends ({}) before it starts ({})",
            b.id, b.end, b.start
        )));
    }
    if let Some(w) = windows.iter().find(|w| w.end < w.start) {
        return Err(SlotError::invalid(format!(
            "unavailability window '{}' ends ({}) before it starts ({})",
            w.reason, w.end, w.start
        )));
    }

    let mut sorted: Vec<&UnavailabilityWindow> = windows.iter().collect();
    sorted.sort_by_key(|w| (w.start, w.end));
    let overlapping = sorted
        .windows(2)
        .filter(|pair| overlaps(pair[0].start, pair[0].end, pair[1].start, pair[1].end))
        .count();
    if overlapping > 0 {
        warn!(overlapping, "unavailability windows overlap; treating them as their union");
    }
    Ok(())
}

fn count(slots: &[SlotAvailability], status: SlotStatus) -> usize {
    slots.iter().filter(|s| s.status == status).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn default_request_is_nine_to_five_hourly() {
        let r = SlotRequest::default();
        assert_eq!(r.workday_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(r.workday_end, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert_eq!(r.granularity_minutes, 60);
        assert_eq!(r.duration_minutes, 60);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn reversed_workday_rejected() {
        let r = SlotRequest::new(30).workday(hm(17, 0), hm(9, 0));
        assert!(matches!(r.validate(), Err(SlotError::InvalidInput(_))));
    }

    #[test]
    fn zero_granularity_rejected() {
        assert!(SlotRequest::new(30).granularity(0).validate().is_err());
    }

    #[test]
    fn full_day_is_the_largest_accepted_length() {
        assert!(SlotRequest::new(MAX_SLOT_MINUTES).validate().is_ok());
        assert!(SlotRequest::new(MAX_SLOT_MINUTES + 1).validate().is_err());
        assert!(SlotRequest::new(60).granularity(MAX_SLOT_MINUTES + 1).validate().is_err());
    }
}
