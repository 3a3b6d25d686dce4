//! Ordering of asynchronous snapshot fetches.
//!
//! A view fetches the bookings and unavailability for the visible day whenever
//! the user navigates or a poll interval elapses. Responses can resolve out of
//! order; [`SnapshotSlot`] keeps only the newest one (last write wins by issue
//! order, not by arrival order). No timers run here: callers own the clock and
//! ask [`PollSchedule`] when the next fetch is due.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Result, SlotError};

/// Issue-ordered token for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

/// Holds the most recently *issued* fetch result that has resolved.
#[derive(Debug)]
pub struct SnapshotSlot<T> {
    issued: u64,
    applied: u64,
    cancelled_through: u64,
    value: Option<T>,
}

impl<T> Default for SnapshotSlot<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            applied: 0,
            cancelled_through: 0,
            value: None,
        }
    }
}

impl<T> SnapshotSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch.
    pub fn begin(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Offer a fetch result. Returns `true` when it became the current value.
    ///
    /// Results of fetches older than the one already applied, or issued before
    /// the last [`cancel`](Self::cancel), are discarded.
    pub fn resolve(&mut self, ticket: FetchTicket, value: T) -> bool {
        if ticket.0 <= self.cancelled_through || ticket.0 <= self.applied {
            debug!(ticket = ticket.0, applied = self.applied, "discarding superseded snapshot");
            return false;
        }
        self.applied = ticket.0;
        self.value = Some(value);
        true
    }

    /// Invalidate every outstanding fetch, e.g. when the view goes away.
    pub fn cancel(&mut self) {
        self.cancelled_through = self.issued;
    }

    pub fn current(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Whether a fetch has been issued that has neither resolved nor been
    /// superseded or cancelled.
    pub fn is_pending(&self) -> bool {
        self.issued > self.applied.max(self.cancelled_through)
    }
}

/// Longest accepted refresh interval.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// A fixed refresh interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    interval: Duration,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}

impl PollSchedule {
    /// # Errors
    /// `SlotError::InvalidInput` for a zero interval or one longer than
    /// [`MAX_POLL_INTERVAL`].
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(SlotError::invalid("poll interval must be positive"));
        }
        if interval > MAX_POLL_INTERVAL {
            return Err(SlotError::invalid(format!(
                "poll interval {}s exceeds {}s",
                interval.as_secs(),
                MAX_POLL_INTERVAL.as_secs()
            )));
        }
        Ok(Self { interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `None` when `last_fetch + interval` is not representable on this
    /// platform, i.e. the next poll never comes due.
    pub fn next_due(&self, last_fetch: Instant) -> Option<Instant> {
        last_fetch.checked_add(self.interval)
    }

    pub fn is_due(&self, last_fetch: Instant, now: Instant) -> bool {
        self.next_due(last_fetch).is_some_and(|due| now >= due)
    }
}
