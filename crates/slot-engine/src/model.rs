//! Bookings, unavailability windows and derived slot statuses.
//!
//! All timestamps are civil (`NaiveDateTime`) in the clinic's local time.
//! Conversion from backend timestamps happens in [`crate::snapshot`].

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Lifecycle status of a booking as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Scheduled,
    Completed,
    Cancelled,
    Pending,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Scheduled,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(BookingStatus::Scheduled),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            "pending" => Ok(BookingStatus::Pending),
            other => Err(SlotError::invalid(format!(
                "unknown booking status '{}'",
                other
            ))),
        }
    }
}

/// A session between a therapist and a patient occupying `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
}

impl Booking {
    /// Build a booking from explicit start and end.
    ///
    /// # Errors
    /// `SlotError::InvalidInput` when `end` is before `start`.
    pub fn new(
        id: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        status: BookingStatus,
    ) -> Result<Self> {
        let id = id.into();
        if end < start {
            return Err(SlotError::invalid(format!(
                "booking '{}' ends ({}) before it starts ({})",
                id, end, start
            )));
        }
        Ok(Self {
            id,
            start,
            end,
            status,
        })
    }

    /// Build a booking from a start time and a length in minutes.
    ///
    /// # Errors
    /// `SlotError::InvalidInput` when `duration_minutes` is not positive or the
    /// end falls outside the representable date range.
    pub fn with_duration(
        id: impl Into<String>,
        start: NaiveDateTime,
        duration_minutes: i64,
        status: BookingStatus,
    ) -> Result<Self> {
        let id = id.into();
        if duration_minutes <= 0 {
            return Err(SlotError::invalid(format!(
                "booking '{}' has non-positive duration {} min",
                id, duration_minutes
            )));
        }
        let end = add_minutes(start, duration_minutes)?;
        Self::new(id, start, end, status)
    }
}

/// `start + minutes`, or `InvalidInput` when the result is not representable.
pub(crate) fn add_minutes(start: NaiveDateTime, minutes: i64) -> Result<NaiveDateTime> {
    Duration::try_minutes(minutes)
        .and_then(|d| start.checked_add_signed(d))
        .ok_or_else(|| {
            SlotError::invalid(format!("{} min after {} is out of range", minutes, start))
        })
}

/// Therapist-declared non-working time, independent of bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailabilityWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub reason: String,
}

impl UnavailabilityWindow {
    /// # Errors
    /// `SlotError::InvalidInput` when `end` is before `start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, reason: impl Into<String>) -> Result<Self> {
        if end < start {
            return Err(SlotError::invalid(format!(
                "unavailability window ends ({}) before it starts ({})",
                end, start
            )));
        }
        Ok(Self {
            start,
            end,
            reason: reason.into(),
        })
    }
}

/// Classification of a candidate slot. Derived on every evaluation, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Unavailable,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlotStatus::Available => "available",
            SlotStatus::Booked => "booked",
            SlotStatus::Unavailable => "unavailable",
        })
    }
}

/// One evaluated candidate: `[start, end)` and its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: SlotStatus,
}

impl SlotAvailability {
    pub fn is_bookable(&self) -> bool {
        self.status == SlotStatus::Available
    }
}
