//! Seams to the SSDP discovery collaborator

use avcontrol_model::DiscoveryRecord;

use crate::error::DiscoveryError;

/// Receives raw discovery snapshots
///
/// The discovery collaborator calls this on every tick with everything it
/// currently knows about, not just what changed.
pub trait SnapshotObserver: Send + Sync {
    fn on_snapshot_update(&self, snapshot: &[DiscoveryRecord]);
}

/// Control surface of the SSDP discovery engine
///
/// The registry only ever asks it to start, stop, restart or search. It never
/// reads the engine's cache directly; results come back through
/// [`SnapshotObserver`].
pub trait DiscoverySource: Send + Sync {
    fn start(&self) -> Result<(), DiscoveryError>;

    fn stop(&self) -> Result<(), DiscoveryError>;

    fn restart(&self) -> Result<(), DiscoveryError>;

    /// Sends a fresh M-SEARCH
    fn search(&self) -> Result<(), DiscoveryError>;
}
