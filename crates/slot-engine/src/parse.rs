//! String parsing for days, times of day and backend timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};

/// Parse a civil day in `YYYY-MM-DD` form.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| SlotError::invalid(format!("malformed day '{}': {}", s, e)))
}

/// Parse a time of day in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| SlotError::invalid(format!("malformed time of day '{}': {}", s, e)))
}

/// Parse an IANA timezone name.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(s.to_string()))
}

/// Parse a backend timestamp into civil time in `tz`.
///
/// RFC 3339 values carry an offset and are converted into `tz`. Naive values
/// (`YYYY-MM-DDTHH:MM[:SS]`, `T` or space separated) are taken as already
/// being civil time in `tz`.
pub fn parse_timestamp(s: &str, tz: Tz) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz).naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| SlotError::invalid(format!("malformed timestamp '{}'", s)))
}

/// Serde adapter for `NaiveTime` as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn day_accepts_iso_and_rejects_garbage() {
        assert_eq!(parse_day("2026-03-16").unwrap(), NaiveDate::from_ymd_opt(2026, 3, 16).unwrap());
        assert!(parse_day("2026-02-30").is_err());
        assert!(parse_day("16/03/2026").is_err());
    }

    #[test]
    fn time_of_day_with_and_without_seconds() {
        assert_eq!(parse_time_of_day("09:30").unwrap().minute(), 30);
        assert_eq!(parse_time_of_day("17:00:00").unwrap().hour(), 17);
        assert!(parse_time_of_day("25:00").is_err());
    }

    #[test]
    fn rfc3339_timestamp_converted_to_zone() {
        let tz = parse_timezone("Europe/Zurich").unwrap();
        let t = parse_timestamp("2026-03-16T09:00:00Z", tz).unwrap();
        // CET is UTC+1 in March before the DST switch.
        assert_eq!(t.hour(), 10);
    }

    #[test]
    fn naive_timestamp_kept_as_civil_time() {
        let t = parse_timestamp("2026-03-16 09:15", Tz::UTC).unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 15));
    }

    #[test]
    fn unknown_timezone_rejected() {
        assert!(matches!(parse_timezone("Mars/Olympus"), Err(SlotError::InvalidTimezone(_))));
    }
}
