//! Wall-clock time of day with one-second resolution.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Seconds in one calendar day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// A time of day, ordered by seconds since midnight.
///
/// Serialized as an `HH:MM:SS` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay {
    secs: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { secs: 0 };
    pub const LAST_SECOND: TimeOfDay = TimeOfDay {
        secs: SECONDS_PER_DAY - 1,
    };

    /// Build from components, rejecting anything outside `23:59:59`.
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(ValidationError::InvalidTimeOfDay {
                hour,
                minute,
                second,
            });
        }
        Ok(Self {
            secs: hour * 3600 + minute * 60 + second,
        })
    }

    /// Build from seconds since midnight, wrapping past the end of the day.
    pub fn from_seconds(secs: u32) -> Self {
        Self {
            secs: secs % SECONDS_PER_DAY,
        }
    }

    pub fn seconds(self) -> u32 {
        self.secs
    }

    pub fn hour(self) -> u32 {
        self.secs / 3600
    }

    pub fn minute(self) -> u32 {
        (self.secs % 3600) / 60
    }

    pub fn second(self) -> u32 {
        self.secs % 60
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt(self.secs, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Drops the sub-second part.
    fn from(t: NaiveTime) -> Self {
        Self {
            secs: t.num_seconds_from_midnight(),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    /// Strict `HH:MM:SS`, the format used for persisted settings and exports.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedTime(s.to_string());
        let mut parts = s.trim().split(':');
        let mut next = || -> Result<u32, ValidationError> {
            let part = parts.next().ok_or_else(malformed)?;
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse().map_err(|_| malformed())
        };
        let (h, m, sec) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(malformed());
        }
        TimeOfDay::new(h, m, sec)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
