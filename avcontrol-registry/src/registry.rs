//! The device and service registry

use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use avcontrol_model::{
    Device, DeviceLookup, DiscoveredEntity, DiscoveryRecord, EntityFactory, Service,
    UniqueServiceName,
};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::discovery::{DiscoverySource, SnapshotObserver};
use crate::error::{DiscoveryError, RegistryError, Result};
use crate::event::{DeviceEvent, ReconcileSummary, ServiceEvent};
use crate::iter::Notifications;
use crate::reconcile::reconcile;

#[derive(Debug, Default)]
struct RegistryTable {
    devices: HashMap<UniqueServiceName, Device>,
    services: HashMap<UniqueServiceName, Service>,
}

/// Fan-out of one notification topic to every live subscriber
struct Topic<E> {
    subscribers: Mutex<Vec<mpsc::Sender<E>>>,
}

impl<E: Clone> Topic<E> {
    fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn subscribe(&self) -> Notifications<E> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        Notifications::new(rx)
    }

    /// Sends every event to every subscriber, dropping closed subscribers
    fn publish(&self, events: &[E]) {
        if events.is_empty() {
            return;
        }

        self.subscribers.lock().retain(|tx| {
            events
                .iter()
                .all(|event| tx.send(event.clone()).is_ok())
        });
    }
}

/// Authoritative table of discovered root devices and root services
///
/// Any number of readers run in parallel. A reconciliation pass holds the
/// table exclusively, so readers never observe a half-applied pass.
/// Notifications go out after the table is released, in pass order.
///
/// # Example
///
/// ```rust
/// use avcontrol_model::{DiscoveryRecord, DeviceKind};
/// use avcontrol_registry::Registry;
///
/// let registry = Registry::new();
/// let devices = registry.subscribe_devices();
///
/// registry.on_snapshot_update(&[DiscoveryRecord::device(
///     "renderer-1",
///     DeviceKind::MediaRenderer.urn(1),
///     "http://192.168.1.20:49152/description.xml",
/// )]);
///
/// assert_eq!(registry.device_count(), 1);
/// assert!(devices.try_recv().unwrap().is_added());
/// ```
pub struct Registry {
    table: RwLock<RegistryTable>,
    factory: EntityFactory,
    devices: Topic<DeviceEvent>,
    services: Topic<ServiceEvent>,
    /// Held while a pass publishes so consecutive passes notify in order
    dispatch: Mutex<()>,
    discovery: Option<Arc<dyn DiscoverySource>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_factory(EntityFactory::new())
    }

    pub fn with_factory(factory: EntityFactory) -> Self {
        Self {
            table: RwLock::new(RegistryTable::default()),
            factory,
            devices: Topic::new(),
            services: Topic::new(),
            dispatch: Mutex::new(()),
            discovery: None,
        }
    }

    /// Attaches the discovery engine this registry controls
    pub fn with_discovery(mut self, source: Arc<dyn DiscoverySource>) -> Self {
        self.discovery = Some(source);
        self
    }

    pub fn factory(&self) -> &EntityFactory {
        &self.factory
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    // ========================================================================
    // Reads
    // ========================================================================

    /// Every device currently in the table, ordered by USN
    pub fn current_devices(&self) -> Vec<Device> {
        let mut devices: Vec<Device> = self.table.read().devices.values().cloned().collect();
        devices.sort_by(|a, b| a.usn.cmp(&b.usn));
        devices
    }

    /// Every root service currently in the table, ordered by USN
    pub fn current_services(&self) -> Vec<Service> {
        let mut services: Vec<Service> = self.table.read().services.values().cloned().collect();
        services.sort_by(|a, b| a.usn.cmp(&b.usn));
        services
    }

    pub fn device(&self, usn: &UniqueServiceName) -> Option<Device> {
        self.table.read().devices.get(usn).cloned()
    }

    pub fn service(&self, usn: &UniqueServiceName) -> Option<Service> {
        self.table.read().services.get(usn).cloned()
    }

    /// Root services advertised under `uuid`, ordered by USN
    pub fn services_for_uuid(&self, uuid: &str) -> Vec<Service> {
        let mut services: Vec<Service> = self
            .table
            .read()
            .services
            .values()
            .filter(|service| service.usn.uuid() == uuid)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.usn.cmp(&b.usn));
        services
    }

    pub fn device_count(&self) -> usize {
        self.table.read().devices.len()
    }

    pub fn service_count(&self) -> usize {
        self.table.read().services.len()
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    pub fn subscribe_devices(&self) -> Notifications<DeviceEvent> {
        self.devices.subscribe()
    }

    pub fn subscribe_services(&self) -> Notifications<ServiceEvent> {
        self.services.subscribe()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Reconciles both tables against a discovery snapshot
    ///
    /// This is the only path that removes entries from the registry.
    pub fn on_snapshot_update(&self, snapshot: &[DiscoveryRecord]) -> ReconcileSummary {
        let mut table = self.table.write();

        let device_diff = reconcile(
            &mut table.devices,
            snapshot.iter().filter(|record| record.is_device),
            |record| self.factory.create_device(record),
        );
        let service_diff = reconcile(
            &mut table.services,
            snapshot.iter().filter(|record| record.is_service),
            |record| self.factory.create_service(record),
        );

        let summary = ReconcileSummary {
            devices: device_diff.summary(),
            services: service_diff.summary(),
        };

        let device_events: Vec<DeviceEvent> = device_diff
            .removed
            .into_iter()
            .map(DeviceEvent::Removed)
            .chain(device_diff.added.into_iter().map(DeviceEvent::Added))
            .collect();
        let service_events: Vec<ServiceEvent> = service_diff
            .removed
            .into_iter()
            .map(ServiceEvent::Removed)
            .chain(service_diff.added.into_iter().map(ServiceEvent::Added))
            .collect();

        let _dispatch = self.dispatch.lock();
        drop(table);

        self.devices.publish(&device_events);
        self.services.publish(&service_events);

        debug!(
            "Reconciled snapshot of {} records: devices +{} ={} -{}, services +{} ={} -{}",
            snapshot.len(),
            summary.devices.added,
            summary.devices.kept,
            summary.devices.removed,
            summary.services.added,
            summary.services.kept,
            summary.services.removed,
        );

        summary
    }

    /// Warm-starts the tables from archived entities
    ///
    /// Entities whose USN is already present are left alone. Returns the
    /// number of entities added.
    pub fn restore<I>(&self, entities: I) -> usize
    where
        I: IntoIterator<Item = DiscoveredEntity>,
    {
        let mut table = self.table.write();
        let mut device_events = Vec::new();
        let mut service_events = Vec::new();

        for entity in entities {
            match entity {
                DiscoveredEntity::Device(device) => {
                    if !table.devices.contains_key(&device.usn) {
                        table.devices.insert(device.usn.clone(), device.clone());
                        device_events.push(DeviceEvent::Added(device));
                    }
                }
                DiscoveredEntity::Service(service) => {
                    if !table.services.contains_key(&service.usn) {
                        table.services.insert(service.usn.clone(), service.clone());
                        service_events.push(ServiceEvent::Added(service));
                    }
                }
            }
        }

        let _dispatch = self.dispatch.lock();
        drop(table);

        self.devices.publish(&device_events);
        self.services.publish(&service_events);

        let restored = device_events.len() + service_events.len();
        info!("Restored {} entities from archive", restored);
        restored
    }

    /// Runs reconciliation on a dedicated thread fed by `snapshots`
    ///
    /// The thread exits when every sender of the channel has been dropped.
    pub fn spawn_snapshot_listener(
        self: &Arc<Self>,
        snapshots: mpsc::Receiver<Vec<DiscoveryRecord>>,
    ) -> Result<JoinHandle<()>> {
        let registry = Arc::clone(self);

        let handle = thread::Builder::new()
            .name("avcontrol-registry".to_string())
            .spawn(move || {
                for snapshot in snapshots {
                    registry.on_snapshot_update(&snapshot);
                }
                debug!("Snapshot channel closed, listener exiting");
            })?;

        Ok(handle)
    }

    // ========================================================================
    // Discovery control
    // ========================================================================

    pub fn start_discovery(&self) -> Result<()> {
        self.with_source("start", |source| source.start())
    }

    pub fn stop_discovery(&self) -> Result<()> {
        self.with_source("stop", |source| source.stop())
    }

    pub fn restart_discovery(&self) -> Result<()> {
        self.with_source("restart", |source| source.restart())
    }

    pub fn search(&self) -> Result<()> {
        self.with_source("search", |source| source.search())
    }

    fn with_source<F>(&self, operation: &'static str, f: F) -> Result<()>
    where
        F: FnOnce(&dyn DiscoverySource) -> std::result::Result<(), DiscoveryError>,
    {
        let source = self
            .discovery
            .as_deref()
            .ok_or(RegistryError::DiscoveryUnavailable)?;

        f(source).map_err(|source| {
            warn!("Discovery {} failed: {}", operation, source);
            RegistryError::Discovery { operation, source }
        })
    }
}

impl SnapshotObserver for Registry {
    fn on_snapshot_update(&self, snapshot: &[DiscoveryRecord]) {
        Registry::on_snapshot_update(self, snapshot);
    }
}

impl DeviceLookup for Registry {
    /// Matches the exact USN, then the device sharing the uuid
    fn lookup_device(&self, usn: &UniqueServiceName) -> Option<Device> {
        let table = self.table.read();
        if let Some(device) = table.devices.get(usn) {
            return Some(device.clone());
        }

        table
            .devices
            .values()
            .filter(|device| device.usn.uuid() == usn.uuid())
            .min_by(|a, b| a.usn.cmp(&b.usn))
            .cloned()
    }
}
