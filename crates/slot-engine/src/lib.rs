//! # slot-engine
//!
//! Deterministic appointment slot availability for clinic scheduling front ends.
//!
//! Given one civil day, the therapist's bookings for that day and their
//! declared unavailability, the engine classifies each fixed-granularity
//! candidate start time as `Available`, `Booked` or `Unavailable` for a
//! requested appointment length. It is a pure computation over a snapshot:
//! it does not prevent two clients from booking the same slot, which remains
//! the backend's commit-time check.
//!
//! ## Modules
//!
//! - [`model`] — bookings, unavailability windows, slot statuses
//! - [`occupancy`] — which booking statuses block a slot
//! - [`evaluator`] — candidate generation and classification
//! - [`conflict`] — overlap test and conflict pre-check for one proposal
//! - [`freebusy`] — merged booked/unavailable/free blocks for a day
//! - [`snapshot`] — backend JSON snapshot → validated civil-time inputs
//! - [`refresh`] — last-write-wins ordering of fetches, poll interval
//! - [`config`] — TOML engine configuration
//! - [`parse`] — day, time-of-day and timestamp parsing
//! - [`error`] — Error types

pub mod config;
pub mod conflict;
pub mod error;
pub mod evaluator;
pub mod freebusy;
pub mod model;
pub mod occupancy;
pub mod parse;
pub mod refresh;
pub mod snapshot;

pub use config::EngineConfig;
pub use conflict::{find_conflicts, overlaps, Conflict};
pub use error::SlotError;
pub use evaluator::{bookable_starts, evaluate_slots, first_available, SlotRequest};
pub use freebusy::{day_timeline, DayTimeline, TimeBlock};
pub use model::{Booking, BookingStatus, SlotAvailability, SlotStatus, UnavailabilityWindow};
pub use occupancy::OccupancyPolicy;
pub use refresh::{FetchTicket, PollSchedule, SnapshotSlot};
pub use snapshot::{DaySnapshot, ResolvedDay};
