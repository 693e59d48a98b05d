//! ControlPoint - composition root of the SDK
//!
//! Owns one registry, one playback controller and one archive store, and
//! wires them to the collaborators the application supplies.

use std::collections::HashMap;
use std::sync::Arc;

use avcontrol_archive::{ArchiveStore, FileArchiveStore};
use avcontrol_model::{Device, DiscoveredEntity, UniqueServiceName, FRIENDLY_NAME_KEY};
use avcontrol_player::{AvTransport, MediaRenderer, PlaybackController};
use avcontrol_registry::{DiscoverySource, Registry, SnapshotObserver};
use tracing::{debug, info, warn};

use crate::config::ControlPointConfig;
use crate::error::{Result, SdkError};

/// Supplies the AVTransport collaborator of a renderer device
pub trait TransportProvider: Send + Sync {
    /// `None` when the renderer cannot be reached or has no AVTransport
    fn av_transport(&self, renderer: &Device) -> Option<Arc<dyn AvTransport>>;
}

/// Outcome of [`ControlPoint::restore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Entities added to the registry
    pub added: usize,
    /// Archived records that were corrupt or could not be modelled
    pub skipped: usize,
}

/// UPnP media control point
///
/// Must be created inside a tokio runtime, which the playback controller
/// runs on.
///
/// # Example
///
/// ```rust,ignore
/// use avcontrol_sdk::{ControlPoint, ControlPointConfig};
///
/// let control_point = ControlPoint::new(ControlPointConfig::default(), transports)?;
/// control_point.restore()?;
///
/// if let Some(renderer) = control_point.media_renderers().first() {
///     control_point.select_renderer(&renderer.usn)?;
///     control_point.player().start_playback("http://192.168.1.10:8200/MediaItems/22.mp4");
/// }
/// ```
pub struct ControlPoint {
    config: ControlPointConfig,
    registry: Arc<Registry>,
    player: PlaybackController,
    store: Arc<dyn ArchiveStore>,
    transports: Arc<dyn TransportProvider>,
}

impl ControlPoint {
    /// Control point archiving to the configured directory, or the user
    /// cache directory when none is set
    pub fn new(config: ControlPointConfig, transports: Arc<dyn TransportProvider>) -> Result<Self> {
        Self::builder(config).build(transports)
    }

    pub fn builder(config: ControlPointConfig) -> ControlPointBuilder {
        ControlPointBuilder {
            config,
            discovery: None,
            store: None,
        }
    }

    pub fn config(&self) -> &ControlPointConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Observer the SSDP collaborator delivers snapshots to
    pub fn snapshot_observer(&self) -> Arc<dyn SnapshotObserver> {
        self.registry.clone()
    }

    pub fn player(&self) -> &PlaybackController {
        &self.player
    }

    pub fn media_servers(&self) -> Vec<Device> {
        self.devices_where(Device::is_media_server)
    }

    pub fn media_renderers(&self) -> Vec<Device> {
        self.devices_where(Device::is_media_renderer)
    }

    fn devices_where(&self, predicate: fn(&Device) -> bool) -> Vec<Device> {
        self.registry
            .current_devices()
            .into_iter()
            .filter(|device| predicate(device))
            .collect()
    }

    /// Attaches the player to the renderer registered under `usn`
    pub fn select_renderer(&self, usn: &UniqueServiceName) -> Result<MediaRenderer> {
        let device = self
            .registry
            .device(usn)
            .ok_or_else(|| SdkError::DeviceNotFound(usn.clone()))?;

        if !device.is_media_renderer() {
            return Err(SdkError::NotARenderer(usn.clone()));
        }

        let transport = self
            .transports
            .av_transport(&device)
            .ok_or_else(|| SdkError::TransportUnavailable(usn.clone()))?;

        let renderer = MediaRenderer::new(device, transport);
        self.player.set_renderer(Some(renderer.clone()));
        Ok(renderer)
    }

    pub fn clear_renderer(&self) {
        self.player.set_renderer(None);
    }

    /// Saves every registered entity to the archive store
    ///
    /// Device friendly names are always archived; `metadata_fn` may add
    /// more per entity. Returns the number of archived entities.
    pub fn archive<F>(&self, metadata_fn: F) -> Result<usize>
    where
        F: Fn(&DiscoveredEntity) -> HashMap<String, String>,
    {
        let entities: Vec<DiscoveredEntity> = self
            .registry
            .current_devices()
            .into_iter()
            .map(DiscoveredEntity::from)
            .chain(
                self.registry
                    .current_services()
                    .into_iter()
                    .map(DiscoveredEntity::from),
            )
            .collect();

        let bytes = avcontrol_archive::serialize(&entities, |entity| {
            let mut metadata = metadata_fn(entity);
            if let Some(device) = entity.as_device() {
                if !device.friendly_name.is_empty() {
                    metadata.insert(FRIENDLY_NAME_KEY.to_string(), device.friendly_name.clone());
                }
            }
            metadata
        })?;

        self.store.save(&self.config.archive_key, &bytes)?;
        info!("Archived {} entities", entities.len());
        Ok(entities.len())
    }

    /// Warm-starts the registry from the archive store
    ///
    /// A missing archive restores nothing.
    pub fn restore(&self) -> Result<RestoreSummary> {
        let Some(bytes) = self.store.load(&self.config.archive_key)? else {
            debug!("No archive stored under '{}'", self.config.archive_key);
            return Ok(RestoreSummary::default());
        };

        let restored = avcontrol_archive::restore(&bytes, self.registry.factory())?;
        if restored.skipped > 0 {
            warn!("Skipped {} archived records", restored.skipped);
        }

        Ok(RestoreSummary {
            added: self.registry.restore(restored.entities),
            skipped: restored.skipped,
        })
    }

    /// Detaches the renderer and stops the playback controller
    pub fn shutdown(&self) {
        self.player.shutdown();
    }
}

/// Builder for [`ControlPoint`] with optional collaborators
pub struct ControlPointBuilder {
    config: ControlPointConfig,
    discovery: Option<Arc<dyn DiscoverySource>>,
    store: Option<Arc<dyn ArchiveStore>>,
}

impl ControlPointBuilder {
    pub fn with_discovery(mut self, source: Arc<dyn DiscoverySource>) -> Self {
        self.discovery = Some(source);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ArchiveStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self, transports: Arc<dyn TransportProvider>) -> Result<ControlPoint> {
        let store: Arc<dyn ArchiveStore> = match (self.store, &self.config.archive_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Arc::new(FileArchiveStore::new(dir.clone())),
            (None, None) => Arc::new(FileArchiveStore::in_cache_dir()?),
        };

        let mut registry = Registry::new();
        if let Some(source) = self.discovery {
            registry = registry.with_discovery(source);
        }

        let player = PlaybackController::new(self.config.player.clone())?;

        Ok(ControlPoint {
            config: self.config,
            registry: Arc::new(registry),
            player,
            store,
            transports,
        })
    }
}
