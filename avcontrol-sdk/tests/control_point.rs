//! End-to-end tests of the control point with in-process collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use avcontrol_player::{EventCallback, PositionInfo, SubscriptionHandle, TransportError};
use avcontrol_sdk::{
    ArchiveStore, AvTransport, ControlPoint, ControlPointConfig, Device, DeviceKind,
    DiscoveryRecord, FileArchiveStore, MemoryArchiveStore, PlayerEvent, PlayerState, SdkError,
    ServiceKind, TransportProvider, UniqueServiceName,
};
use proptest::prelude::*;

// ============================================================================
// Collaborators
// ============================================================================

#[derive(Default)]
struct StubTransport {
    observers: Mutex<Vec<(u64, EventCallback)>>,
    plays: AtomicUsize,
}

impl StubTransport {
    fn emit_state(&self, state: &str) {
        let body = format!(
            concat!(
                r#"<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0"><e:property><LastChange>"#,
                r#"&lt;Event xmlns="urn:schemas-upnp-org:metadata-1-0/AVT/"&gt;"#,
                r#"&lt;InstanceID val="0"&gt;&lt;TransportState val="{}"/&gt;&lt;/InstanceID&gt;"#,
                r#"&lt;/Event&gt;</LastChange></e:property></e:propertyset>"#,
            ),
            state
        );
        let callbacks: Vec<EventCallback> = self
            .observers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback(body.clone().into());
        }
    }
}

#[async_trait]
impl AvTransport for StubTransport {
    async fn set_av_transport_uri(&self, _: &str, _: &str, _: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn set_next_av_transport_uri(&self, _: &str, _: &str, _: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn play(&self, _: &str, _: &str) -> Result<(), TransportError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn pause(&self, _: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn stop(&self, _: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn get_position_info(&self, _: &str) -> Result<PositionInfo, TransportError> {
        Ok(PositionInfo::default())
    }

    fn add_event_observer(&self, callback: EventCallback) -> SubscriptionHandle {
        let mut observers = self.observers.lock().unwrap();
        let id = observers.len() as u64 + 1;
        observers.push((id, callback));
        SubscriptionHandle(id)
    }

    fn remove_event_observer(&self, handle: SubscriptionHandle) {
        self.observers.lock().unwrap().retain(|(id, _)| *id != handle.0);
    }
}

/// Hands out one shared transport for every renderer
#[derive(Default)]
struct StubProvider {
    transport: Arc<StubTransport>,
    unreachable: bool,
}

impl TransportProvider for StubProvider {
    fn av_transport(&self, _renderer: &Device) -> Option<Arc<dyn AvTransport>> {
        if self.unreachable {
            None
        } else {
            Some(self.transport.clone())
        }
    }
}

fn snapshot() -> Vec<DiscoveryRecord> {
    vec![
        DiscoveryRecord::device(
            "renderer-1",
            DeviceKind::MediaRenderer.urn(1),
            "http://192.168.1.20:49152/description.xml",
        ),
        DiscoveryRecord::service(
            "renderer-1",
            ServiceKind::AVTransport.urn(1),
            "http://192.168.1.20:49152/description.xml",
        ),
        DiscoveryRecord::device(
            "server-1",
            DeviceKind::MediaServer.urn(1),
            "http://192.168.1.10:8200/rootDesc.xml",
        ),
        DiscoveryRecord::service(
            "server-1",
            ServiceKind::ContentDirectory.urn(1),
            "http://192.168.1.10:8200/rootDesc.xml",
        ),
    ]
}

fn control_point(store: Arc<dyn ArchiveStore>, provider: Arc<StubProvider>) -> ControlPoint {
    ControlPoint::builder(ControlPointConfig::default())
        .with_store(store)
        .build(provider)
        .unwrap()
}

fn renderer_usn() -> UniqueServiceName {
    UniqueServiceName::new("renderer-1", DeviceKind::MediaRenderer.urn(1))
}

// ============================================================================
// Discovery and selection
// ============================================================================

#[tokio::test]
async fn test_devices_split_by_kind() {
    let cp = control_point(Arc::new(MemoryArchiveStore::new()), Arc::default());
    cp.snapshot_observer().on_snapshot_update(&snapshot());

    let renderers = cp.media_renderers();
    let servers = cp.media_servers();
    assert_eq!(renderers.len(), 1);
    assert_eq!(servers.len(), 1);
    assert_eq!(renderers[0].usn.uuid(), "renderer-1");
    assert_eq!(servers[0].usn.uuid(), "server-1");
    assert_eq!(cp.registry().service_count(), 2);
}

#[tokio::test]
async fn test_select_renderer_drives_player() {
    let provider = Arc::new(StubProvider::default());
    let cp = control_point(Arc::new(MemoryArchiveStore::new()), provider.clone());
    cp.registry().on_snapshot_update(&snapshot());
    let mut events = cp.player().subscribe();

    let renderer = cp.select_renderer(&renderer_usn()).unwrap();
    assert_eq!(renderer.device.usn, renderer_usn());

    provider.transport.emit_state("PLAYING");
    assert_eq!(
        events.recv().await,
        Some(PlayerEvent::StateChanged(PlayerState::Playing))
    );

    cp.clear_renderer();
    assert!(cp.player().renderer().is_none());
    assert!(provider.transport.observers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_select_renderer_errors() {
    let cp = control_point(
        Arc::new(MemoryArchiveStore::new()),
        Arc::new(StubProvider {
            unreachable: true,
            ..Default::default()
        }),
    );
    cp.registry().on_snapshot_update(&snapshot());

    let missing = UniqueServiceName::new("renderer-9", DeviceKind::MediaRenderer.urn(1));
    assert!(matches!(
        cp.select_renderer(&missing),
        Err(SdkError::DeviceNotFound(_))
    ));

    let server = UniqueServiceName::new("server-1", DeviceKind::MediaServer.urn(1));
    assert!(matches!(
        cp.select_renderer(&server),
        Err(SdkError::NotARenderer(_))
    ));

    assert!(matches!(
        cp.select_renderer(&renderer_usn()),
        Err(SdkError::TransportUnavailable(_))
    ));
}

// ============================================================================
// Archive
// ============================================================================

#[tokio::test]
async fn test_archive_then_restore_warm_starts_registry() {
    let store: Arc<dyn ArchiveStore> = Arc::new(MemoryArchiveStore::new());
    let first = control_point(store.clone(), Arc::default());
    first.registry().on_snapshot_update(&snapshot());

    assert_eq!(first.archive(|_| HashMap::new()).unwrap(), 4);

    let second = control_point(store, Arc::default());
    let summary = second.restore().unwrap();

    assert_eq!(summary.added, 4);
    assert_eq!(summary.skipped, 0);
    assert_eq!(second.registry().current_devices(), first.registry().current_devices());
    assert_eq!(second.registry().current_services(), first.registry().current_services());

    // Restoring again adds nothing
    assert_eq!(second.restore().unwrap().added, 0);
}

#[tokio::test]
async fn test_restore_without_archive_is_empty() {
    let cp = control_point(Arc::new(MemoryArchiveStore::new()), Arc::default());

    let summary = cp.restore().unwrap();
    assert_eq!(summary.added, 0);
    assert_eq!(cp.registry().device_count(), 0);
}

#[tokio::test]
async fn test_restore_rejects_unreadable_archive() {
    let store = Arc::new(MemoryArchiveStore::new());
    store.save("upnp-archive", b"not json").unwrap();
    let cp = control_point(store, Arc::default());

    assert!(matches!(cp.restore(), Err(SdkError::Archive(_))));
}

#[tokio::test]
async fn test_archive_to_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = ControlPointConfig::default()
        .with_archive_dir(dir.path())
        .with_archive_key("living-room");

    let cp = ControlPoint::new(config, Arc::new(StubProvider::default())).unwrap();
    cp.registry().on_snapshot_update(&snapshot());
    cp.archive(|_| HashMap::new()).unwrap();

    let store = FileArchiveStore::new(dir.path());
    assert!(store.path_for("living-room").exists());
    assert!(store.load("living-room").unwrap().is_some());
}

// ============================================================================
// Property: archive/restore preserves every supported entity
// ============================================================================

fn record_strategy() -> impl Strategy<Value = DiscoveryRecord> {
    (
        0u8..6,
        prop_oneof![
            Just(DeviceKind::MediaRenderer.urn(1)),
            Just(DeviceKind::MediaServer.urn(1)),
            Just(ServiceKind::AVTransport.urn(1)),
            Just(ServiceKind::RenderingControl.urn(1)),
            Just("urn:schemas-upnp-org:device:Printer:1".to_string()),
        ],
    )
        .prop_map(|(host, urn)| {
            let uuid = format!("device-{}", host);
            let location = format!("http://192.168.1.{}:49152/description.xml", 20 + host);
            if urn.contains(":device:") {
                DiscoveryRecord::device(uuid, urn, location)
            } else {
                DiscoveryRecord::service(uuid, urn, location)
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_archive_round_trip_preserves_tables(records in prop::collection::vec(record_strategy(), 0..12)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let _guard = runtime.enter();

        let store: Arc<dyn ArchiveStore> = Arc::new(MemoryArchiveStore::new());
        let first = control_point(store.clone(), Arc::default());
        first.registry().on_snapshot_update(&records);
        first.archive(|_| HashMap::new()).unwrap();

        let second = control_point(store, Arc::default());
        second.restore().unwrap();

        prop_assert_eq!(second.registry().current_devices(), first.registry().current_devices());
        prop_assert_eq!(second.registry().current_services(), first.registry().current_services());
    }
}
