//! # Temporal Types: UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only instant truncated to millisecond
//! precision. Credentials hash their creation time as epoch milliseconds,
//! so sub-millisecond components must never leak into an instant that is
//! later compared or re-encoded.
//!
//! ## Parsing
//!
//! [`Timestamp::parse()`] accepts only `Z`-suffixed RFC 3339 input. Offsets
//! such as `+00:00` or `+05:30` are rejected; use
//! [`Timestamp::parse_lenient()`] for external data that may carry offsets.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC-only timestamp, truncated to millisecond precision.
///
/// Deserialization goes through [`Timestamp::from_utc()`], so decoded
/// values are truncated like constructed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "DateTime<Utc>")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time.
    pub fn now() -> Self {
        Self(truncate_to_millis(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-millis.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(dt))
    }

    /// Midnight UTC at the start of the given calendar date.
    pub fn start_of_day(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::default()).and_utc())
    }

    /// Parse a `Z`-suffixed RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTimestamp` for non-RFC 3339 input or any
    /// offset other than `Z`.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        Self::parse_lenient(s)
    }

    /// Parse an RFC 3339 timestamp with any offset, converting to UTC.
    pub fn parse_lenient(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::InvalidTimestamp(format!("{s:?}: {e}")))?;
        Ok(Self(truncate_to_millis(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from Unix epoch milliseconds.
    pub fn from_epoch_millis(millis: i64) -> Result<Self, CoreError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidTimestamp(format!("epoch millis out of range: {millis}")))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch timestamp in milliseconds.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// This instant shifted by `millis` (negative moves backwards).
    ///
    /// Saturates at the representable range instead of overflowing.
    pub fn plus_millis(&self, millis: i64) -> Self {
        self.0
            .checked_add_signed(Duration::milliseconds(millis))
            .map(Self)
            .unwrap_or(*self)
    }

    /// Milliseconds from `self` until `later` (negative if `later` is earlier).
    pub fn millis_until(&self, later: &Timestamp) -> i64 {
        later.epoch_millis() - self.epoch_millis()
    }

    /// Render as ISO 8601 with millisecond precision and `Z` suffix.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.nanosecond() / 1_000_000 * 1_000_000;
    dt.with_nanosecond(millis).unwrap_or(dt)
}
