//! # Network Context
//!
//! Identifies the chain or deployment a signature is produced under. The
//! network id is read once per credential creation and hashed into the
//! credential message, so a signature from one network cannot be replayed
//! on another.

/// Supplies the current network identifier.
pub trait NetworkContext: Send + Sync {
    /// The integer id of the active network.
    fn current_network_id(&self) -> u64;
}

/// A fixed network id, set at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticNetwork(pub u64);

impl NetworkContext for StaticNetwork {
    fn current_network_id(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_network_reports_id() {
        assert_eq!(StaticNetwork(137).current_network_id(), 137);
    }
}
