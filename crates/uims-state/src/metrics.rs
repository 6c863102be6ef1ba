//! Metrics emitted by the capsule clock.

/// Metric names.
pub mod names {
    /// Total capsules flipped to unlocked.
    pub const CAPSULES_UNLOCKED_TOTAL: &str = "uims_capsules_unlocked_total";
    /// Total completed clock ticks.
    pub const CLOCK_TICKS_TOTAL: &str = "uims_clock_ticks_total";
}

/// Record a completed tick and the capsules it unlocked.
#[inline]
pub fn tick_completed(unlocked: usize) {
    metrics::counter!(names::CLOCK_TICKS_TOTAL).increment(1);
    if unlocked > 0 {
        metrics::counter!(names::CAPSULES_UNLOCKED_TOTAL).increment(unlocked as u64);
    }
}
