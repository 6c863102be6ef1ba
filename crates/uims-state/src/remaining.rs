//! # Time Remaining
//!
//! Pure countdown presentation for a capsule: a function of `(now,
//! unlock_at)` only. It never consults the cached lock flag, so a reader
//! between the deadline and the next tick already sees "Unlocked".

use serde::Serialize;
use uims_core::Timestamp;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Countdown until a capsule's unlock instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum TimeRemaining {
    /// `unlock_at <= now`.
    Unlocked,
    /// Whole units left; sub-second remainders are truncated.
    Pending {
        days: i64,
        hours: u8,
        minutes: u8,
        seconds: u8,
    },
}

impl TimeRemaining {
    /// Decompose the time from `now` until `unlock_at`.
    pub fn between(now: &Timestamp, unlock_at: &Timestamp) -> Self {
        let total = now.millis_until(unlock_at);
        if total <= 0 {
            return Self::Unlocked;
        }
        // Each remainder is below its unit's modulus, so the casts cannot truncate.
        Self::Pending {
            days: total / MILLIS_PER_DAY,
            hours: ((total % MILLIS_PER_DAY) / MILLIS_PER_HOUR) as u8,
            minutes: ((total % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE) as u8,
            seconds: ((total % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND) as u8,
        }
    }

    /// Whether the unlock instant has passed.
    pub fn is_unlocked(&self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

impl std::fmt::Display for TimeRemaining {
    /// `"Unlocked"`, or e.g. `"2d 0h 5m 9s"` with leading zero units omitted.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Unlocked => f.write_str("Unlocked"),
            Self::Pending {
                days,
                hours,
                minutes,
                seconds,
            } => {
                if days > 0 {
                    write!(f, "{days}d ")?;
                }
                if days > 0 || hours > 0 {
                    write!(f, "{hours}h ")?;
                }
                if days > 0 || hours > 0 || minutes > 0 {
                    write!(f, "{minutes}m ")?;
                }
                write!(f, "{seconds}s")
            }
        }
    }
}
