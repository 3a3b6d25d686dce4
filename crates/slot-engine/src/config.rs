//! Engine configuration loaded from TOML.
//!
//! ```toml
//! workday_start = "08:30"
//! workday_end = "18:00"
//! granularity_minutes = 30
//! duration_minutes = 45
//! occupancy = "confirmed"
//! timezone = "Europe/Zurich"
//! poll_interval_secs = 60
//! ```
//!
//! Every key is optional; missing keys take the defaults of
//! [`EngineConfig::default`].

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::evaluator::SlotRequest;
use crate::occupancy::OccupancyPolicy;
use crate::parse::{parse_time_of_day, parse_timezone};
use crate::refresh::PollSchedule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub workday_start: String,
    pub workday_end: String,
    pub granularity_minutes: i64,
    pub duration_minutes: i64,
    pub occupancy: OccupancyPolicy,
    pub timezone: String,
    pub poll_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workday_start: "09:00".to_string(),
            workday_end: "17:00".to_string(),
            granularity_minutes: 60,
            duration_minutes: 60,
            occupancy: OccupancyPolicy::default(),
            timezone: "UTC".to_string(),
            poll_interval_secs: 30,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Validated slot request built from this configuration.
    pub fn slot_request(&self) -> Result<SlotRequest> {
        let request = SlotRequest {
            workday_start: parse_time_of_day(&self.workday_start)?,
            workday_end: parse_time_of_day(&self.workday_end)?,
            granularity_minutes: self.granularity_minutes,
            duration_minutes: self.duration_minutes,
            policy: self.occupancy,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    pub fn poll_schedule(&self) -> Result<PollSchedule> {
        PollSchedule::new(Duration::from_secs(self.poll_interval_secs))
    }
}
