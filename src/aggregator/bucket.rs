//! Time buckets.
//!
//! A bucket is a collection timestamp truncated to minute or hour precision
//! and rendered as a fixed-width string, e.g. `2024-01-01 13:07` or
//! `2024-01-01 13`. Sorting bucket strings sorts them chronologically.

use crate::utils::config::{HOUR_BUCKET_FORMAT, MINUTE_BUCKET_FORMAT};
use crate::utils::error::SelectionError;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of a time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Minute,
    Hour,
}

impl Granularity {
    /// strftime pattern shared by SQLite and chrono
    pub fn format(self) -> &'static str {
        match self {
            Granularity::Minute => MINUTE_BUCKET_FORMAT,
            Granularity::Hour => HOUR_BUCKET_FORMAT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
        }
    }

    /// Capitalised label for chart titles ("Minute", "Hour")
    pub fn label(self) -> &'static str {
        match self {
            Granularity::Minute => "Minute",
            Granularity::Hour => "Hour",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minute" => Ok(Granularity::Minute),
            "hour" => Ok(Granularity::Hour),
            other => Err(SelectionError::InvalidGranularity(other.to_string())),
        }
    }
}

/// Convert an epoch-millisecond timestamp into its bucket key (UTC)
///
/// Milliseconds are divided by 1000 with truncation, matching SQLite's
/// integer division in `datetime(collected_at / 1000, 'unixepoch')`.
///
/// Returns `None` if the timestamp is outside chrono's representable range.
pub fn bucket_key(collected_at_ms: i64, granularity: Granularity) -> Option<String> {
    let secs = collected_at_ms / 1000;
    let at = DateTime::from_timestamp(secs, 0)?;
    Some(at.format(granularity.format()).to_string())
}
