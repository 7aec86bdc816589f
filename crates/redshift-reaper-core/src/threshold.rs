//! Age threshold and duration parsing

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::error::{CoreError, Result};

/// A point in time (seconds since the epoch) before which resources are eligible
///
/// Comparison is strict: a resource created exactly at the threshold is kept.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct AgeThreshold(f64);

impl AgeThreshold {
    /// Threshold at an absolute epoch timestamp
    pub fn from_epoch_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Threshold `age` before now
    pub fn older_than(age: Duration) -> Self {
        Self::older_than_at(age, Utc::now())
    }

    /// Threshold `age` before `now`
    pub fn older_than_at(age: Duration, now: DateTime<Utc>) -> Self {
        let now_secs = now.timestamp_millis() as f64 / 1000.0;
        Self(now_secs - age.as_secs_f64())
    }

    pub fn epoch_secs(&self) -> f64 {
        self.0
    }

    /// True when a resource created at `created_at` is old enough
    pub fn admits(&self, created_at: f64) -> bool {
        created_at < self.0
    }

    /// Same as [`admits`](Self::admits), undated resources are never admitted
    pub fn admits_opt(&self, created_at: Option<f64>) -> bool {
        created_at.is_some_and(|t| self.admits(t))
    }
}

impl std::fmt::Display for AgeThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis((self.0 * 1000.0) as i64) {
            Some(at) => write!(f, "{}", at.to_rfc3339()),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Parse a duration string like "7d", "12h", "2w", "1m" (30 days) or "90s"
///
/// A bare number is read as days.
pub fn parse_duration(duration_str: &str) -> Result<Duration> {
    let duration_str = duration_str.trim();

    let (num_str, unit) = match duration_str.find(|c: char| c.is_alphabetic()) {
        Some(pos) => {
            let (num, unit) = duration_str.split_at(pos);
            (num, Some(unit))
        }
        None => (duration_str, None),
    };

    let value: u64 = num_str.trim().parse().map_err(|_| {
        CoreError::Validation(format!(
            "Invalid duration '{}'. Expected a number followed by an optional unit",
            duration_str
        ))
    })?;

    let unit_secs: u64 = match unit {
        Some("s") | Some("S") => 1,
        Some("h") | Some("H") => 60 * 60,
        None | Some("d") | Some("D") => 24 * 60 * 60,
        Some("w") | Some("W") => 7 * 24 * 60 * 60,
        // Months are approximated as 30 days
        Some("m") | Some("M") => 30 * 24 * 60 * 60,
        Some(unknown) => {
            return Err(CoreError::Validation(format!(
                "Invalid duration unit '{}'. Supported units: s, h, d, w, m (30 days)",
                unknown
            )));
        }
    };

    let seconds = value.checked_mul(unit_secs).ok_or_else(|| {
        CoreError::Validation(format!("Duration '{}' is too large", duration_str))
    })?;

    Ok(Duration::from_secs(seconds))
}
