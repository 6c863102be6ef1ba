//! # Capsule Error Types

use thiserror::Error;
use uims_core::{CapsuleId, ClockError, Timestamp};

/// Failures of capsule operations and the capsule clock.
#[derive(Error, Debug)]
pub enum CapsuleError {
    /// A required draft field is absent or blank.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    /// Not one of the known capsule types.
    #[error("unknown capsule type: {0:?}")]
    UnknownCapsuleType(String),

    /// No capsule with this id is stored.
    #[error("unknown {0}")]
    UnknownCapsule(CapsuleId),

    /// The capsule cannot be opened before it unlocks.
    #[error("{id} is locked until {unlock_at}")]
    StillLocked { id: CapsuleId, unlock_at: Timestamp },

    /// The host clock failed. Fatal to the tick; the clock stops.
    #[error("clock unavailable: {0}")]
    ClockUnavailable(#[from] ClockError),

    /// The recurring tick period must be non-zero.
    #[error("tick interval must be greater than zero")]
    InvalidTickInterval,

    /// `spawn` was called outside a tokio runtime.
    #[error("no tokio runtime to run the capsule clock on")]
    NoRuntime,

    /// The clock task panicked or was aborted.
    #[error("clock task failed: {0}")]
    TaskFailed(String),
}
