//! Absolute UTC instants with second resolution.
//!
//! `Instant` is the single time currency of the scanner: every predicate,
//! interval boundary, and event record is expressed in it. Local-time
//! rendering belongs to the presentation layer.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::TimeError;
use crate::julian::{SECONDS_PER_DAY, UNIX_EPOCH_JD};

/// UTC timestamp, seconds since 1970-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(i64);

impl Instant {
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub const fn unix_seconds(self) -> i64 {
        self.0
    }

    /// Build from UTC calendar fields.
    pub fn from_utc(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, TimeError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(TimeError::InvalidCalendar("no such day"))?;
        let dt = date
            .and_hms_opt(hour, minute, second)
            .ok_or(TimeError::InvalidCalendar("no such time of day"))?;
        Ok(Self(dt.and_utc().timestamp()))
    }

    /// The instant as a chrono UTC datetime, if it lies within chrono's range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.0, 0)
    }

    /// Julian Date on the UTC time scale.
    pub fn to_jd_utc(self) -> f64 {
        self.0 as f64 / SECONDS_PER_DAY + UNIX_EPOCH_JD
    }

    /// Nearest whole-second instant for a UTC Julian Date.
    pub fn from_jd_utc(jd: f64) -> Self {
        Self(((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY).round() as i64)
    }

    pub fn checked_add_seconds(self, seconds: i64) -> Option<Self> {
        self.0.checked_add(seconds).map(Self)
    }

    pub fn saturating_add_seconds(self, seconds: i64) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Signed seconds from `self` to `later`.
    pub fn seconds_until(self, later: Instant) -> i64 {
        later.0 - self.0
    }

    /// Midpoint rounded toward `self`.
    pub fn midpoint(self, other: Instant) -> Self {
        Self(self.0 + (other.0 - self.0).div_euclid(2))
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }
}

impl Display for Instant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%SZ")),
            None => write!(f, "@{}", self.0),
        }
    }
}

impl FromStr for Instant {
    type Err = TimeError;

    /// Accepts RFC 3339 (any offset, converted to UTC) or a bare
    /// `YYYY-MM-DD HH:MM[:SS]` taken as UTC. Fractional seconds are dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.with_timezone(&Utc).timestamp()));
        }
        for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(Self(Utc.from_utc_datetime(&naive).timestamp()));
            }
        }
        Err(TimeError::Parse {
            input: s.to_string(),
            reason: "expected RFC 3339 or 'YYYY-MM-DD HH:MM[:SS]'".to_string(),
        })
    }
}

impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
