//! # uims-state: Time Capsules and the Unlock Clock
//!
//! - **Capsule** (`capsule.rs`): the capsule record and its one-way
//!   `LOCKED → UNLOCKED` transition.
//!
//! - **Store** (`store.rs`): shared capsule collection; creation, filtered
//!   listing, opening unlocked capsules.
//!
//! - **Clock** (`clock.rs`): the recurring unlock scan, with a synchronous
//!   `tick_once()` and a `tokio` background mode that can be stopped.
//!
//! - **Remaining** (`remaining.rs`): countdown presentation computed from
//!   `(now, unlock_at)` alone.
//!
//! ## Invariants
//!
//! - A capsule is never unlocked before its `unlock_at`.
//! - A due capsule unlocks on the first tick at or after `unlock_at`.
//! - `is_locked` goes `true → false` once and never back.

pub mod capsule;
pub mod clock;
pub mod error;
pub mod metrics;
pub mod remaining;
pub mod store;

pub use capsule::{CapsuleDraft, CapsuleType, TimeCapsule};
pub use clock::{CapsuleClock, ClockHandle, ClockStats, TickReport};
pub use error::CapsuleError;
pub use remaining::TimeRemaining;
pub use store::{CapsuleStore, CapsuleSummary};
