//! # Capsule Store
//!
//! An in-memory capsule collection behind a cloneable handle. The clock task
//! and any number of readers hold clones of the same store.
//!
//! ## Visibility
//!
//! A tick applies all of its flips under one write lock; readers take the
//! read lock and receive owned snapshots. No reader can observe a capsule
//! mid-flip or a tick half-applied.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use uims_core::{CapsuleId, ClockSource, Timestamp};

use crate::capsule::{CapsuleDraft, CapsuleType, TimeCapsule};
use crate::error::CapsuleError;

/// Lock-state counts for dashboards and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleSummary {
    pub total: usize,
    pub locked: usize,
    pub unlocked: usize,
    pub by_type: BTreeMap<CapsuleType, usize>,
}

/// Shared capsule collection, in creation order.
#[derive(Debug, Clone, Default)]
pub struct CapsuleStore {
    capsules: Arc<RwLock<Vec<TimeCapsule>>>,
}

impl CapsuleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored capsules.
    pub fn len(&self) -> usize {
        self.capsules.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.capsules.read().is_empty()
    }

    /// Seal and store a new capsule.
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` for an incomplete draft, `ClockUnavailable` if
    /// the creation time cannot be read.
    pub fn create_capsule<C: ClockSource>(
        &self,
        draft: CapsuleDraft,
        clock: &C,
    ) -> Result<TimeCapsule, CapsuleError> {
        let capsule = TimeCapsule::seal(draft, clock.now()?)?;
        self.capsules.write().push(capsule.clone());
        tracing::info!(
            capsule_id = %capsule.id,
            capsule_type = %capsule.capsule_type,
            unlock_at = %capsule.unlock_at,
            "capsule sealed"
        );
        Ok(capsule)
    }

    /// Snapshot of capsules, optionally restricted to one type.
    pub fn list_capsules(&self, filter: Option<CapsuleType>) -> Vec<TimeCapsule> {
        self.capsules
            .read()
            .iter()
            .filter(|c| filter.map_or(true, |t| c.capsule_type == t))
            .cloned()
            .collect()
    }

    /// Snapshot of one capsule.
    pub fn get(&self, id: &CapsuleId) -> Option<TimeCapsule> {
        self.capsules.read().iter().find(|c| &c.id == id).cloned()
    }

    /// Read a capsule's content. Only unlocked capsules can be opened.
    pub fn open_capsule(&self, id: &CapsuleId) -> Result<String, CapsuleError> {
        let capsules = self.capsules.read();
        let capsule = capsules
            .iter()
            .find(|c| &c.id == id)
            .ok_or(CapsuleError::UnknownCapsule(*id))?;
        if capsule.is_locked {
            return Err(CapsuleError::StillLocked {
                id: *id,
                unlock_at: capsule.unlock_at,
            });
        }
        Ok(capsule.content.clone())
    }

    /// Lock-state and per-type counts.
    pub fn summary(&self) -> CapsuleSummary {
        let capsules = self.capsules.read();
        let mut summary = CapsuleSummary {
            total: capsules.len(),
            ..CapsuleSummary::default()
        };
        for capsule in capsules.iter() {
            if capsule.is_locked {
                summary.locked += 1;
            } else {
                summary.unlocked += 1;
            }
            *summary.by_type.entry(capsule.capsule_type).or_default() += 1;
        }
        summary
    }

    /// Flip every locked capsule whose unlock instant is at or before `now`.
    ///
    /// Returns the ids flipped by this call, in store order. Only the
    /// capsule clock calls this.
    pub(crate) fn unlock_due(&self, now: &Timestamp) -> Vec<CapsuleId> {
        let mut capsules = self.capsules.write();
        capsules
            .iter_mut()
            .filter(|c| c.is_locked && c.is_due(now))
            .map(|c| {
                c.is_locked = false;
                c.id
            })
            .collect()
    }
}
