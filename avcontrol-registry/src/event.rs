//! Notifications emitted by reconciliation

use avcontrol_model::{Device, Service, UniqueServiceName};

/// A device entered or left the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    Added(Device),
    Removed(Device),
}

impl DeviceEvent {
    pub fn usn(&self) -> &UniqueServiceName {
        &self.device().usn
    }

    pub fn device(&self) -> &Device {
        match self {
            DeviceEvent::Added(device) | DeviceEvent::Removed(device) => device,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, DeviceEvent::Added(_))
    }
}

/// A root service entered or left the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    Added(Service),
    Removed(Service),
}

impl ServiceEvent {
    pub fn usn(&self) -> &UniqueServiceName {
        &self.service().usn
    }

    pub fn service(&self) -> &Service {
        match self {
            ServiceEvent::Added(service) | ServiceEvent::Removed(service) => service,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, ServiceEvent::Added(_))
    }
}

/// Counts for one table after a reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSummary {
    pub added: usize,
    pub kept: usize,
    pub removed: usize,
}

impl TableSummary {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Outcome of one `on_snapshot_update` pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub devices: TableSummary,
    pub services: TableSummary,
}

impl ReconcileSummary {
    /// True when the pass emitted no notifications
    pub fn is_unchanged(&self) -> bool {
        self.devices.is_unchanged() && self.services.is_unchanged()
    }
}
