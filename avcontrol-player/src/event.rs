//! Notifications emitted by the playback controller

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::PlayerError;
use crate::state::PlayerState;

/// Something the controller observed or failed to do
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A transport-state event was applied
    StateChanged(PlayerState),
    /// A position poll succeeded; both values in seconds
    PositionChanged { duration: f64, elapsed: f64 },
    /// The renderer stopped at the end of the media
    PlaybackEnded,
    PlayFailed(PlayerError),
    PauseFailed(PlayerError),
    StopFailed(PlayerError),
}

/// Async stream of [`PlayerEvent`]s for one subscriber
#[derive(Debug)]
pub struct PlayerEvents {
    rx: mpsc::UnboundedReceiver<PlayerEvent>,
}

impl PlayerEvents {
    /// Wait for the next event
    ///
    /// Returns `None` once the controller has shut down.
    pub async fn recv(&mut self) -> Option<PlayerEvent> {
        self.rx.recv().await
    }

    /// Take the next event if one is already queued
    pub fn try_recv(&mut self) -> Option<PlayerEvent> {
        self.rx.try_recv().ok()
    }
}

/// Fan-out to every live subscriber
#[derive(Debug, Default)]
pub(crate) struct Notifier {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<PlayerEvent>>>,
}

impl Notifier {
    pub fn subscribe(&self) -> PlayerEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        PlayerEvents { rx }
    }

    pub fn publish(&self, event: PlayerEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Drops every subscriber so their streams end
    pub fn close(&self) {
        self.subscribers.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let notifier = Notifier::default();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.publish(PlayerEvent::PlaybackEnded);

        assert_eq!(first.try_recv(), Some(PlayerEvent::PlaybackEnded));
        assert_eq!(second.try_recv(), Some(PlayerEvent::PlaybackEnded));
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let notifier = Notifier::default();
        drop(notifier.subscribe());
        let mut live = notifier.subscribe();

        notifier.publish(PlayerEvent::StateChanged(PlayerState::Playing));

        assert_eq!(notifier.subscribers.lock().len(), 1);
        assert!(live.try_recv().is_some());
    }

    #[tokio::test]
    async fn test_close_ends_streams() {
        let notifier = Notifier::default();
        let mut events = notifier.subscribe();

        notifier.close();
        assert_eq!(events.recv().await, None);
    }
}
