//! Seam to the AVTransport collaborator of a renderer

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use avcontrol_model::Device;
use bytes::Bytes;

use crate::error::TransportError;

/// Callback receiving raw event bodies from a renderer's event channel
pub type EventCallback = Arc<dyn Fn(Bytes) + Send + Sync>;

/// Identifies one registered event observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u64);

/// Response of `GetPositionInfo`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionInfo {
    pub track: u32,
    pub track_duration: String,
    pub track_meta_data: String,
    pub track_uri: String,
    pub rel_time: String,
    pub abs_time: String,
    pub rel_count: i32,
    pub abs_count: i32,
}

/// AVTransport actions and event channel of one renderer
///
/// The collaborator owns the SOAP requests and the GENA subscription; no
/// timeout is imposed on top of its own request lifecycle.
#[async_trait]
pub trait AvTransport: Send + Sync {
    async fn set_av_transport_uri(
        &self,
        instance_id: &str,
        uri: &str,
        metadata: &str,
    ) -> Result<(), TransportError>;

    async fn set_next_av_transport_uri(
        &self,
        instance_id: &str,
        uri: &str,
        metadata: &str,
    ) -> Result<(), TransportError>;

    async fn play(&self, instance_id: &str, speed: &str) -> Result<(), TransportError>;

    async fn pause(&self, instance_id: &str) -> Result<(), TransportError>;

    async fn stop(&self, instance_id: &str) -> Result<(), TransportError>;

    async fn get_position_info(&self, instance_id: &str) -> Result<PositionInfo, TransportError>;

    /// Registers `callback` for every event body the renderer sends
    fn add_event_observer(&self, callback: EventCallback) -> SubscriptionHandle;

    fn remove_event_observer(&self, handle: SubscriptionHandle);
}

/// A media renderer device together with its AVTransport collaborator
#[derive(Clone)]
pub struct MediaRenderer {
    pub device: Device,
    pub av_transport: Arc<dyn AvTransport>,
}

impl MediaRenderer {
    pub fn new(device: Device, av_transport: Arc<dyn AvTransport>) -> Self {
        Self {
            device,
            av_transport,
        }
    }
}

impl fmt::Debug for MediaRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaRenderer")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

/// Event observer registration that is released when dropped
pub struct EventSubscription {
    transport: Arc<dyn AvTransport>,
    handle: Option<SubscriptionHandle>,
}

impl EventSubscription {
    pub fn subscribe(transport: Arc<dyn AvTransport>, callback: EventCallback) -> Self {
        let handle = transport.add_event_observer(callback);
        Self {
            transport,
            handle: Some(handle),
        }
    }

    pub fn handle(&self) -> Option<SubscriptionHandle> {
        self.handle
    }

    /// Removes the observer now
    pub fn release(mut self) {
        self.unsubscribe();
    }

    fn unsubscribe(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.transport.remove_event_observer(handle);
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSubscription")
            .field("handle", &self.handle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Observers {
        added: Mutex<Vec<SubscriptionHandle>>,
        removed: Mutex<Vec<SubscriptionHandle>>,
    }

    #[async_trait]
    impl AvTransport for Observers {
        async fn set_av_transport_uri(&self, _: &str, _: &str, _: &str) -> Result<(), TransportError> {
            Ok(())
        }

        async fn set_next_av_transport_uri(&self, _: &str, _: &str, _: &str) -> Result<(), TransportError> {
            Ok(())
        }

        async fn play(&self, _: &str, _: &str) -> Result<(), TransportError> {
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

        fn add_event_observer(&self, _callback: EventCallback) -> SubscriptionHandle {
            let mut added = self.added.lock();
            let handle = SubscriptionHandle(added.len() as u64 + 1);
            added.push(handle);
            handle
        }

        fn remove_event_observer(&self, handle: SubscriptionHandle) {
            self.removed.lock().push(handle);
        }
    }

    #[test]
    fn test_subscription_released_on_drop() {
        let transport = Arc::new(Observers::default());
        let subscription = EventSubscription::subscribe(transport.clone(), Arc::new(|_: Bytes| {}));

        assert_eq!(subscription.handle(), Some(SubscriptionHandle(1)));
        assert!(transport.removed.lock().is_empty());

        drop(subscription);
        assert_eq!(*transport.removed.lock(), vec![SubscriptionHandle(1)]);
    }

    #[test]
    fn test_explicit_release_happens_once() {
        let transport = Arc::new(Observers::default());
        let subscription = EventSubscription::subscribe(transport.clone(), Arc::new(|_: Bytes| {}));

        subscription.release();
        assert_eq!(transport.removed.lock().len(), 1);
    }
}
