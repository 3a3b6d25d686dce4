//! Backend snapshot ingestion.
//!
//! A [`DaySnapshot`] is the JSON a front end assembles from the backend's
//! appointment and unavailability listings for one therapist and one day.
//! [`DaySnapshot::resolve`] validates it into civil-time [`Booking`] and
//! [`UnavailabilityWindow`] values ready for evaluation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::conflict::{find_conflicts, Conflict};
use crate::error::{Result, SlotError};
use crate::evaluator::{evaluate_slots, first_available, SlotRequest};
use crate::freebusy::{day_timeline, DayTimeline};
use crate::model::{add_minutes, Booking, BookingStatus, SlotAvailability, UnavailabilityWindow};
use crate::parse::{parse_day, parse_timestamp, parse_timezone};

/// Booking identifiers arrive either as numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// One appointment as listed by the backend.
///
/// Exactly one of `end` or `duration_minutes` is expected; `end` wins when
/// both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: RecordId,
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailabilityRecord {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySnapshot {
    /// `YYYY-MM-DD`
    pub day: String,
    /// IANA zone of the clinic. Falls back to the resolver's default.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub bookings: Vec<BookingRecord>,
    #[serde(default, alias = "unavailability_windows")]
    pub unavailability: Vec<UnavailabilityRecord>,
}

impl DaySnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve with UTC as the fallback timezone.
    pub fn resolve(&self) -> Result<ResolvedDay> {
        self.resolve_in(Tz::UTC)
    }

    /// Resolve using `default_tz` when the snapshot names no timezone.
    ///
    /// Records that do not touch the snapshot's day are dropped.
    ///
    /// # Errors
    /// `SlotError::InvalidInput` for a malformed day, timestamp or status, or
    /// an interval that ends before it starts. `SlotError::InvalidTimezone`
    /// for an unknown zone name.
    pub fn resolve_in(&self, default_tz: Tz) -> Result<ResolvedDay> {
        let day = parse_day(&self.day)?;
        let timezone = match &self.timezone {
            Some(name) => parse_timezone(name)?,
            None => default_tz,
        };

        let midnight = day.and_time(NaiveTime::MIN);
        let next_midnight = day
            .succ_opt()
            .map(|d| d.and_time(NaiveTime::MIN))
            .ok_or_else(|| SlotError::invalid(format!("day {} has no successor", day)))?;
        let touches_day = |start: NaiveDateTime, end: NaiveDateTime| {
            start < next_midnight && (end > midnight || start >= midnight)
        };

        let mut bookings = Vec::with_capacity(self.bookings.len());
        for record in &self.bookings {
            let booking = record.to_booking(timezone)?;
            if touches_day(booking.start, booking.end) {
                bookings.push(booking);
            } else {
                trace!(id = %booking.id, "dropping booking outside {}", day);
            }
        }

        let mut windows = Vec::with_capacity(self.unavailability.len());
        for record in &self.unavailability {
            let window = UnavailabilityWindow::new(
                parse_timestamp(&record.start, timezone)?,
                parse_timestamp(&record.end, timezone)?,
                record.reason.clone(),
            )?;
            if touches_day(window.start, window.end) {
                windows.push(window);
            } else {
                trace!(reason = %window.reason, "dropping unavailability outside {}", day);
            }
        }

        Ok(ResolvedDay {
            day,
            timezone,
            bookings,
            windows,
        })
    }
}

impl BookingRecord {
    fn to_booking(&self, tz: Tz) -> Result<Booking> {
        let id = self.id.to_string();
        let status: BookingStatus = self.status.parse()?;
        let start = parse_timestamp(&self.start, tz)?;
        match (&self.end, self.duration_minutes) {
            (Some(end), _) => Booking::new(id, start, parse_timestamp(end, tz)?, status),
            (None, Some(minutes)) => Booking::with_duration(id, start, minutes, status),
            (None, None) => Err(SlotError::invalid(format!(
                "booking '{}' has neither an end nor a duration",
                id
            ))),
        }
    }
}

/// A validated snapshot: civil-time bookings and windows for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDay {
    pub day: NaiveDate,
    pub timezone: Tz,
    pub bookings: Vec<Booking>,
    pub windows: Vec<UnavailabilityWindow>,
}

impl ResolvedDay {
    pub fn evaluate(&self, request: &SlotRequest, exclude: Option<&str>) -> Result<Vec<SlotAvailability>> {
        evaluate_slots(self.day, request, &self.bookings, &self.windows, exclude)
    }

    pub fn first_available(
        &self,
        request: &SlotRequest,
        exclude: Option<&str>,
    ) -> Result<Option<SlotAvailability>> {
        first_available(self.day, request, &self.bookings, &self.windows, exclude)
    }

    pub fn timeline(&self, request: &SlotRequest, exclude: Option<&str>) -> Result<DayTimeline> {
        day_timeline(self.day, request, &self.bookings, &self.windows, exclude)
    }

    /// Conflicts for an appointment of `request.duration_minutes` starting at
    /// `start` on this day.
    pub fn conflicts_at(
        &self,
        start: NaiveTime,
        request: &SlotRequest,
        exclude: Option<&str>,
    ) -> Result<Vec<Conflict>> {
        request.validate()?;
        let start = self.day.and_time(start);
        let end = add_minutes(start, request.duration_minutes)?;
        find_conflicts(start, end, &self.bookings, request.policy, exclude)
    }
}
