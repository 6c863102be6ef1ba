//! # Clock Sources
//!
//! The host supplies time through [`ClockSource`]. Nothing in UIMS calls
//! `Utc::now()` directly outside [`SystemClock`], so every time-gated
//! transition can be driven deterministically in tests with
//! [`ManualClock`].
//!
//! Implementations must be monotonically non-decreasing for the capsule
//! unlock guarantee ("never earlier than `unlock_at`") to hold.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ClockError;
use crate::temporal::Timestamp;

/// A source of the current time.
pub trait ClockSource: Send + Sync {
    /// Read the current time.
    ///
    /// # Errors
    ///
    /// Returns `ClockError::Unavailable` if the host cannot produce a time.
    fn now(&self) -> Result<Timestamp, ClockError>;
}

impl<C: ClockSource + ?Sized> ClockSource for Arc<C> {
    fn now(&self) -> Result<Timestamp, ClockError> {
        (**self).now()
    }
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        Ok(Timestamp::now())
    }
}

#[derive(Debug)]
struct ManualState {
    now: Timestamp,
    available: bool,
}

/// A settable clock shared between clones.
///
/// Every clone observes the same instant, so a test can hand one clone to
/// a store or scheduler and move time forward through another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                now: start,
                available: true,
            })),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now: Timestamp) {
        self.state.lock().now = now;
    }

    /// Move forward by `millis`.
    pub fn advance_millis(&self, millis: i64) {
        let mut state = self.state.lock();
        state.now = state.now.plus_millis(millis);
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn set_available(&self, available: bool) {
        self.state.lock().available = available;
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        let state = self.state.lock();
        if state.available {
            Ok(state.now)
        } else {
            Err(ClockError::Unavailable("manual clock disabled".to_string()))
        }
    }
}
