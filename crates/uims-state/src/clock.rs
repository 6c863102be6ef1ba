//! # Capsule Clock
//!
//! The only writer of `is_locked`. Each tick reads the host clock, advances
//! a monotone cursor, and flips every locked capsule whose `unlock_at` is at
//! or before the cursor.
//!
//! The check is level-triggered: a capsule already due when the process
//! starts unlocks on the first tick. Ticks missed while the process was down
//! are not replayed; the guarantee is "never unlocked before `unlock_at`".
//!
//! ## Modes
//!
//! - [`CapsuleClock::tick_once()`] runs one evaluation synchronously, for
//!   deterministic tests and callers that drive their own schedule.
//! - [`CapsuleClock::spawn()`] runs on a `tokio` interval until the returned
//!   [`ClockHandle`] is stopped or dropped, or the host clock fails.

use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use uims_core::{CapsuleId, ClockSource, Timestamp};

use crate::error::CapsuleError;
use crate::metrics;
use crate::store::CapsuleStore;

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// The clock cursor this tick evaluated against.
    pub now: Timestamp,
    /// Capsules flipped by this tick.
    pub unlocked: Vec<CapsuleId>,
}

/// Totals over the life of a clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClockStats {
    pub ticks: u64,
    pub unlocked: u64,
}

/// Recurring unlock scan over a [`CapsuleStore`].
#[derive(Debug)]
pub struct CapsuleClock<C> {
    store: CapsuleStore,
    source: C,
    cursor: Option<Timestamp>,
    stats: ClockStats,
}

impl<C: ClockSource> CapsuleClock<C> {
    /// Create a clock over `store` reading time from `source`.
    pub fn new(store: CapsuleStore, source: C) -> Self {
        Self {
            store,
            source,
            cursor: None,
            stats: ClockStats::default(),
        }
    }

    /// The latest instant a tick evaluated against.
    pub fn cursor(&self) -> Option<Timestamp> {
        self.cursor
    }

    /// Totals so far.
    pub fn stats(&self) -> ClockStats {
        self.stats
    }

    /// Run one unlock scan.
    ///
    /// The cursor never moves backwards: if the host clock steps back, the
    /// tick evaluates against the previous cursor.
    ///
    /// # Errors
    ///
    /// `ClockUnavailable` if the host clock fails. No capsule is touched.
    pub fn tick_once(&mut self) -> Result<TickReport, CapsuleError> {
        let read = self.source.now().map_err(|e| {
            tracing::error!(error = %e, "capsule clock cannot read time");
            CapsuleError::ClockUnavailable(e)
        })?;
        let now = match self.cursor {
            Some(prev) if prev > read => {
                tracing::warn!(cursor = %prev, read = %read, "host clock stepped back; holding cursor");
                prev
            }
            _ => read,
        };
        self.cursor = Some(now);

        let unlocked = self.store.unlock_due(&now);
        for id in &unlocked {
            tracing::info!(capsule_id = %id, now = %now, "capsule unlocked");
        }
        self.stats.ticks += 1;
        self.stats.unlocked += unlocked.len() as u64;
        metrics::tick_completed(unlocked.len());
        tracing::debug!(now = %now, unlocked = unlocked.len(), "capsule clock tick");

        Ok(TickReport { now, unlocked })
    }
}

impl<C: ClockSource + 'static> CapsuleClock<C> {
    /// Run the clock on a fixed period in a background task.
    ///
    /// The first tick fires immediately. Ticks delayed by a busy runtime are
    /// skipped rather than burst.
    ///
    /// # Errors
    ///
    /// `InvalidTickInterval` for a zero period, `NoRuntime` when called
    /// outside a tokio runtime.
    pub fn spawn(mut self, period: Duration) -> Result<ClockHandle, CapsuleError> {
        if period.is_zero() {
            return Err(CapsuleError::InvalidTickInterval);
        }
        let runtime = Handle::try_current().map_err(|_| CapsuleError::NoRuntime)?;
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => {
                        tracing::debug!(ticks = self.stats.ticks, "capsule clock stopped");
                        return Ok(self.stats);
                    }
                    _ = interval.tick() => {
                        if let Err(e) = self.tick_once() {
                            tracing::error!(error = %e, ticks = self.stats.ticks, "capsule clock halted");
                            return Err(e);
                        }
                    }
                }
            }
        });
        tracing::debug!(period_ms = period.as_millis() as u64, "capsule clock started");
        Ok(ClockHandle {
            guard: token.drop_guard(),
            task,
        })
    }
}

/// Handle to a running clock task. Dropping it stops the clock.
#[derive(Debug)]
pub struct ClockHandle {
    guard: DropGuard,
    task: JoinHandle<Result<ClockStats, CapsuleError>>,
}

impl ClockHandle {
    /// Whether the task has ended (stopped or failed).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the clock and wait for the task to end.
    ///
    /// # Errors
    ///
    /// `ClockUnavailable` if the task had already ended on a clock failure,
    /// `TaskFailed` if it panicked.
    pub async fn stop(self) -> Result<ClockStats, CapsuleError> {
        let Self { guard, task } = self;
        drop(guard);
        join(task).await
    }

    /// Wait for the task to end on its own, i.e. on a clock failure.
    pub async fn join(self) -> Result<ClockStats, CapsuleError> {
        let Self { guard, task } = self;
        let result = join(task).await;
        drop(guard);
        result
    }
}

async fn join(
    task: JoinHandle<Result<ClockStats, CapsuleError>>,
) -> Result<ClockStats, CapsuleError> {
    task.await
        .map_err(|e| CapsuleError::TaskFailed(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capsule::{CapsuleDraft, CapsuleType};
    use uims_core::ManualClock;

    fn t(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn seal(store: &CapsuleStore, clock: &ManualClock, unlock_in_ms: i64) -> CapsuleId {
        let unlock_at = clock.now().unwrap().plus_millis(unlock_in_ms);
        store
            .create_capsule(
                CapsuleDraft {
                    capsule_type: Some(CapsuleType::Message),
                    title: "hello future".to_string(),
                    unlock_at: Some(unlock_at),
                    ..CapsuleDraft::default()
                },
                clock,
            )
            .unwrap()
            .id
    }

    #[test]
    fn tick_reports_unlocked_ids() {
        let clock = ManualClock::new(t("2026-01-01T00:00:00Z"));
        let store = CapsuleStore::new();
        let due = seal(&store, &clock, -1_000);
        let later = seal(&store, &clock, 60_000);

        let mut capsule_clock = CapsuleClock::new(store.clone(), clock.clone());
        let report = capsule_clock.tick_once().unwrap();
        assert_eq!(report.unlocked, vec![due]);
        assert!(store.get(&later).unwrap().is_locked);
        assert_eq!(capsule_clock.stats(), ClockStats { ticks: 1, unlocked: 1 });
    }

    #[test]
    fn cursor_holds_when_host_clock_steps_back() {
        let clock = ManualClock::new(t("2026-01-01T00:00:10Z"));
        let store = CapsuleStore::new();
        let mut capsule_clock = CapsuleClock::new(store, clock.clone());

        capsule_clock.tick_once().unwrap();
        clock.set(t("2026-01-01T00:00:05Z"));
        let report = capsule_clock.tick_once().unwrap();
        assert_eq!(report.now, t("2026-01-01T00:00:10Z"));
        assert_eq!(capsule_clock.cursor(), Some(t("2026-01-01T00:00:10Z")));
    }

    #[test]
    fn unavailable_clock_fails_tick_without_changes() {
        let clock = ManualClock::new(t("2026-01-01T00:00:00Z"));
        let store = CapsuleStore::new();
        let id = seal(&store, &clock, -1);
        clock.set_available(false);

        let mut capsule_clock = CapsuleClock::new(store.clone(), clock);
        assert!(matches!(
            capsule_clock.tick_once(),
            Err(CapsuleError::ClockUnavailable(_))
        ));
        assert!(store.get(&id).unwrap().is_locked);
        assert_eq!(capsule_clock.stats().ticks, 0);
    }

    #[tokio::test]
    async fn zero_period_is_rejected() {
        let clock = ManualClock::new(t("2026-01-01T00:00:00Z"));
        let capsule_clock = CapsuleClock::new(CapsuleStore::new(), clock);
        assert!(matches!(
            capsule_clock.spawn(Duration::ZERO),
            Err(CapsuleError::InvalidTickInterval)
        ));
    }

    #[test]
    fn spawn_outside_runtime_is_an_error() {
        let clock = ManualClock::new(t("2026-01-01T00:00:00Z"));
        let store = CapsuleStore::new();
        let id = seal(&store, &clock, 0);
        let capsule_clock = CapsuleClock::new(store.clone(), clock);
        assert!(matches!(
            capsule_clock.spawn(Duration::from_millis(10)),
            Err(CapsuleError::NoRuntime)
        ));
        assert!(store.get(&id).unwrap().is_locked);
    }
}
