//! Which booking statuses count as using their time interval.

use serde::{Deserialize, Serialize};

use crate::model::BookingStatus;

/// Occupancy policy applied when deciding whether a booking blocks a slot.
///
/// `Cancelled` never occupies under any policy. `Pending` occupies unless the
/// caller opts into [`OccupancyPolicy::Confirmed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OccupancyPolicy {
    /// `Scheduled`, `Completed` and `Pending` block.
    #[default]
    IncludingPending,
    /// Only `Scheduled` and `Completed` block.
    Confirmed,
}

impl OccupancyPolicy {
    pub fn occupies(&self, status: BookingStatus) -> bool {
        match status {
            BookingStatus::Scheduled | BookingStatus::Completed => true,
            BookingStatus::Pending => *self == OccupancyPolicy::IncludingPending,
            BookingStatus::Cancelled => false,
        }
    }
}
