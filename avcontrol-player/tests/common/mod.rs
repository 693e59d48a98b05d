//! Mock AVTransport collaborator for controller tests.
//!
//! Records every action it receives, lets a test fail chosen actions, and
//! hands out the registered event observers so tests can push raw event
//! bodies as the renderer would.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use avcontrol_model::{DeviceKind, DiscoveryRecord, EntityFactory};
use avcontrol_player::{
    AvTransport, EventCallback, MediaRenderer, PlayerEvent, PlayerEvents, PositionInfo,
    SubscriptionHandle, TransportAction, TransportError,
};
use bytes::Bytes;

pub struct MockTransport {
    observers: Mutex<HashMap<u64, EventCallback>>,
    next_handle: AtomicU64,
    removed: Mutex<Vec<SubscriptionHandle>>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<TransportAction>>,
    position: Mutex<Result<PositionInfo, TransportError>>,
    position_calls: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            observers: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(0),
            removed: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            position: Mutex::new(Ok(position("0:03:00", "0:01:00"))),
            position_calls: AtomicUsize::new(0),
        })
    }

    /// Makes every later call of `action` fail with a UPnP fault
    pub fn fail(&self, action: TransportAction) {
        self.failing.lock().unwrap().insert(action);
    }

    pub fn set_position(&self, result: Result<PositionInfo, TransportError>) {
        *self.position.lock().unwrap() = result;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn position_calls(&self) -> usize {
        self.position_calls.load(Ordering::SeqCst)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().unwrap().len()
    }

    pub fn removed(&self) -> Vec<SubscriptionHandle> {
        self.removed.lock().unwrap().clone()
    }

    /// Any currently registered observer
    pub fn observer(&self) -> Option<EventCallback> {
        self.observers.lock().unwrap().values().next().cloned()
    }

    /// Delivers a raw event body to every registered observer
    pub fn emit(&self, body: impl Into<Bytes>) {
        let body = body.into();
        let callbacks: Vec<EventCallback> =
            self.observers.lock().unwrap().values().cloned().collect();
        for callback in callbacks {
            callback(body.clone());
        }
    }

    pub fn emit_state(&self, transport_state: &str) {
        self.emit(transport_state_event(transport_state));
    }

    fn record(&self, action: TransportAction, detail: &str) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", action, detail).trim_end().to_string());

        if self.failing.lock().unwrap().contains(&action) {
            Err(TransportError::Fault(701))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AvTransport for MockTransport {
    async fn set_av_transport_uri(
        &self,
        _instance_id: &str,
        uri: &str,
        _metadata: &str,
    ) -> Result<(), TransportError> {
        self.record(TransportAction::SetAVTransportURI, uri)
    }

    async fn set_next_av_transport_uri(
        &self,
        _instance_id: &str,
        uri: &str,
        _metadata: &str,
    ) -> Result<(), TransportError> {
        self.record(TransportAction::SetNextAVTransportURI, uri)
    }

    async fn play(&self, _instance_id: &str, speed: &str) -> Result<(), TransportError> {
        self.record(TransportAction::Play, speed)
    }

    async fn pause(&self, _instance_id: &str) -> Result<(), TransportError> {
        self.record(TransportAction::Pause, "")
    }

    async fn stop(&self, _instance_id: &str) -> Result<(), TransportError> {
        self.record(TransportAction::Stop, "")
    }

    async fn get_position_info(&self, _instance_id: &str) -> Result<PositionInfo, TransportError> {
        self.position_calls.fetch_add(1, Ordering::SeqCst);
        self.position.lock().unwrap().clone()
    }

    fn add_event_observer(&self, callback: EventCallback) -> SubscriptionHandle {
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst) + 1;
        self.observers.lock().unwrap().insert(id, callback);
        SubscriptionHandle(id)
    }

    fn remove_event_observer(&self, handle: SubscriptionHandle) {
        self.observers.lock().unwrap().remove(&handle.0);
        self.removed.lock().unwrap().push(handle);
    }
}

pub fn position(duration: &str, elapsed: &str) -> PositionInfo {
    PositionInfo {
        track: 1,
        track_duration: duration.to_string(),
        rel_time: elapsed.to_string(),
        abs_time: "NOT_IMPLEMENTED".to_string(),
        ..Default::default()
    }
}

pub fn renderer(uuid: &str, transport: Arc<MockTransport>) -> MediaRenderer {
    let record = DiscoveryRecord::device(
        uuid,
        DeviceKind::MediaRenderer.urn(1),
        "http://192.168.1.20:49152/description.xml",
    );
    let device = EntityFactory::new()
        .create_device(&record)
        .expect("media renderer record should build a device");
    MediaRenderer::new(device, transport)
}

/// Property set whose LastChange reports `transport_state` for instance 0
pub fn transport_state_event(transport_state: &str) -> String {
    format!(
        concat!(
            r#"<e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0"><e:property><LastChange>"#,
            r#"&lt;Event xmlns="urn:schemas-upnp-org:metadata-1-0/AVT/"&gt;"#,
            r#"&lt;InstanceID val="0"&gt;&lt;TransportState val="{}"/&gt;&lt;/InstanceID&gt;"#,
            r#"&lt;/Event&gt;</LastChange></e:property></e:propertyset>"#,
        ),
        transport_state
    )
}

/// Next event that is not a position report
pub async fn next_non_position(events: &mut PlayerEvents) -> Option<PlayerEvent> {
    loop {
        match events.recv().await? {
            PlayerEvent::PositionChanged { .. } => continue,
            event => return Some(event),
        }
    }
}
