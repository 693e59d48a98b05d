//! The playback controller
//!
//! All state-machine state (player state, pending end-of-media flag, poll
//! task) lives in one actor task. Renderer events and poll results reach it
//! through a single channel, so a tick and an event can never interleave
//! halfway through a transition. Commands are issued directly from the
//! handle on the runtime and report failures to subscribers.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use avcontrol_parser::{decode_av_transport, parse_duration_secs};
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};

use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result, TransportAction, TransportError};
use crate::event::{Notifier, PlayerEvent, PlayerEvents};
use crate::poller::PositionPoller;
use crate::state::PlayerState;
use crate::transport::{AvTransport, EventCallback, EventSubscription, MediaRenderer, PositionInfo};

/// Inputs serialized through the actor
enum Input {
    /// A renderer was attached (or detached, with no transport)
    Attach {
        session: u64,
        transport: Option<Arc<dyn AvTransport>>,
    },
    /// Raw AVTransport event body from the subscription of `session`
    Event { session: u64, body: Bytes },
    /// Result of one query of poll `poll`
    Position {
        poll: u64,
        result: std::result::Result<PositionInfo, TransportError>,
    },
    Shutdown,
}

/// How a command failure is surfaced
#[derive(Debug, Clone, Copy)]
enum Report {
    Play,
    Pause,
    Stop,
    /// Logged only
    Log,
}

impl Report {
    fn failed(self, notifier: &Notifier, error: PlayerError) {
        warn!("Command failed: {}", error);
        let event = match self {
            Report::Play => PlayerEvent::PlayFailed(error),
            Report::Pause => PlayerEvent::PauseFailed(error),
            Report::Stop => PlayerEvent::StopFailed(error),
            Report::Log => return,
        };
        notifier.publish(event);
    }
}

fn failed(action: TransportAction) -> impl Fn(TransportError) -> PlayerError {
    move |source| PlayerError::TransportActionFailed { action, source }
}

struct Attachment {
    renderer: MediaRenderer,
    _subscription: EventSubscription,
}

/// Drives playback on one media renderer at a time
///
/// Player state changes only when the renderer reports a new transport
/// state. Commands request an action and return immediately; their failures
/// arrive as [`PlayerEvent`]s.
///
/// Must be created inside a tokio runtime.
pub struct PlaybackController {
    config: Arc<PlayerConfig>,
    runtime: Handle,
    inputs: mpsc::UnboundedSender<Input>,
    notifier: Arc<Notifier>,
    state: watch::Receiver<PlayerState>,
    attachment: Mutex<Option<Attachment>>,
    next_session: AtomicU64,
    shut_down: AtomicBool,
}

impl PlaybackController {
    /// Creates a controller with no renderer attached, in state `Stopped`
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::NoRuntime` outside a tokio runtime, or
    /// `PlayerError::Configuration` for an invalid config.
    pub fn new(config: PlayerConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| PlayerError::NoRuntime)?;

        let config = Arc::new(config);
        let notifier = Arc::new(Notifier::default());
        let (inputs, input_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PlayerState::default());

        let actor = Actor {
            config: Arc::clone(&config),
            inputs: inputs.clone(),
            notifier: Arc::clone(&notifier),
            state: state_tx,
            session: 0,
            transport: None,
            poller: None,
            next_poll: 0,
            pending_end: false,
        };
        runtime.spawn(actor.run(input_rx));

        Ok(Self {
            config,
            runtime,
            inputs,
            notifier,
            state: state_rx,
            attachment: Mutex::new(None),
            next_session: AtomicU64::new(0),
            shut_down: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// New stream of player events; any number of subscribers may exist
    pub fn subscribe(&self) -> PlayerEvents {
        self.notifier.subscribe()
    }

    /// Last state reported by the renderer
    pub fn state(&self) -> PlayerState {
        *self.state.borrow()
    }

    pub fn renderer(&self) -> Option<MediaRenderer> {
        self.attachment
            .lock()
            .as_ref()
            .map(|attachment| attachment.renderer.clone())
    }

    /// Attaches to `renderer`, or detaches with `None`
    ///
    /// The observer on the previous renderer is removed before the new one
    /// is registered. Events still queued from the previous renderer are
    /// discarded.
    pub fn set_renderer(&self, renderer: Option<MediaRenderer>) {
        if self.shut_down.load(Ordering::SeqCst) {
            warn!("Ignoring renderer change after shutdown");
            return;
        }

        let mut attachment = self.attachment.lock();
        if let Some(previous) = attachment.take() {
            debug!("Detaching from renderer {}", previous.renderer.device.usn);
            drop(previous);
        }

        let session = self.next_session.fetch_add(1, Ordering::SeqCst) + 1;
        let transport = renderer.as_ref().map(|r| Arc::clone(&r.av_transport));
        let _ = self.inputs.send(Input::Attach { session, transport });

        if let Some(renderer) = renderer {
            let inputs = self.inputs.clone();
            let callback: EventCallback = Arc::new(move |body: Bytes| {
                let _ = inputs.send(Input::Event { session, body });
            });
            let subscription =
                EventSubscription::subscribe(Arc::clone(&renderer.av_transport), callback);

            info!("Attached to renderer {}", renderer.device.usn);
            *attachment = Some(Attachment {
                renderer,
                _subscription: subscription,
            });
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Loads `uri` and starts playing it; either step failing is a `PlayFailed`
    pub fn start_playback(&self, uri: impl Into<String>) {
        let uri = uri.into();
        self.spawn_command(Report::Play, move |transport, config| async move {
            transport
                .set_av_transport_uri(&config.instance_id, &uri, "")
                .await
                .map_err(failed(TransportAction::SetAVTransportURI))?;
            transport
                .play(&config.instance_id, &config.play_speed)
                .await
                .map_err(failed(TransportAction::Play))
        });
    }

    /// Queues `uri` to follow the current media; failures are only logged
    pub fn start_next_playback(&self, uri: impl Into<String>) {
        self.set_next_transport_uri(uri, "");
    }

    pub fn set_transport_uri(&self, uri: impl Into<String>, metadata: impl Into<String>) {
        let (uri, metadata) = (uri.into(), metadata.into());
        self.spawn_command(Report::Play, move |transport, config| async move {
            transport
                .set_av_transport_uri(&config.instance_id, &uri, &metadata)
                .await
                .map_err(failed(TransportAction::SetAVTransportURI))
        });
    }

    pub fn set_next_transport_uri(&self, uri: impl Into<String>, metadata: impl Into<String>) {
        let (uri, metadata) = (uri.into(), metadata.into());
        self.spawn_command(Report::Log, move |transport, config| async move {
            transport
                .set_next_av_transport_uri(&config.instance_id, &uri, &metadata)
                .await
                .map_err(failed(TransportAction::SetNextAVTransportURI))
        });
    }

    pub fn play(&self) {
        self.spawn_command(Report::Play, |transport, config| async move {
            transport
                .play(&config.instance_id, &config.play_speed)
                .await
                .map_err(failed(TransportAction::Play))
        });
    }

    pub fn pause(&self) {
        self.spawn_command(Report::Pause, |transport, config| async move {
            transport
                .pause(&config.instance_id)
                .await
                .map_err(failed(TransportAction::Pause))
        });
    }

    pub fn stop(&self) {
        self.spawn_command(Report::Stop, |transport, config| async move {
            transport
                .stop(&config.instance_id)
                .await
                .map_err(failed(TransportAction::Stop))
        });
    }

    /// Pauses while playing, plays while paused or stopped
    ///
    /// In `Unknown` nothing is sent and a `PlayFailed` is reported.
    pub fn toggle_play_pause(&self) {
        match self.state() {
            PlayerState::Playing => self.pause(),
            PlayerState::Paused | PlayerState::Stopped => self.play(),
            state @ PlayerState::Unknown => Report::Play.failed(
                &self.notifier,
                PlayerError::InvalidCommandForState {
                    command: "toggle_play_pause",
                    state,
                },
            ),
        }
    }

    /// Stops while playing or paused; otherwise reports a `StopFailed`
    pub fn stop_playback(&self) {
        match self.state() {
            PlayerState::Playing | PlayerState::Paused => self.stop(),
            state => Report::Stop.failed(
                &self.notifier,
                PlayerError::InvalidCommandForState {
                    command: "stop_playback",
                    state,
                },
            ),
        }
    }

    /// Detaches the renderer and stops the actor; idempotent
    ///
    /// Subscriber streams end once the actor has exited.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }

        self.attachment.lock().take();
        let _ = self.inputs.send(Input::Shutdown);
    }

    fn transport(&self) -> Option<Arc<dyn AvTransport>> {
        self.attachment
            .lock()
            .as_ref()
            .map(|attachment| Arc::clone(&attachment.renderer.av_transport))
    }

    fn spawn_command<F, Fut>(&self, report: Report, command: F)
    where
        F: FnOnce(Arc<dyn AvTransport>, Arc<PlayerConfig>) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let Some(transport) = self.transport() else {
            report.failed(&self.notifier, PlayerError::NoRenderer);
            return;
        };

        let command = command(transport, Arc::clone(&self.config));
        let notifier = Arc::clone(&self.notifier);
        self.runtime.spawn(async move {
            if let Err(error) = command.await {
                report.failed(&notifier, error);
            }
        });
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Owner of the state machine
struct Actor {
    config: Arc<PlayerConfig>,
    inputs: mpsc::UnboundedSender<Input>,
    notifier: Arc<Notifier>,
    state: watch::Sender<PlayerState>,
    session: u64,
    transport: Option<Arc<dyn AvTransport>>,
    poller: Option<PositionPoller>,
    next_poll: u64,
    pending_end: bool,
}

impl Actor {
    async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<Input>) {
        while let Some(input) = inputs.recv().await {
            match input {
                Input::Attach { session, transport } => self.attach(session, transport),
                Input::Event { session, body } => self.on_event(session, &body),
                Input::Position { poll, result } => self.on_position(poll, result),
                Input::Shutdown => break,
            }
        }

        self.stop_polling();
        self.notifier.close();
        debug!("Playback controller stopped");
    }

    fn attach(&mut self, session: u64, transport: Option<Arc<dyn AvTransport>>) {
        self.stop_polling();
        self.session = session;
        self.transport = transport;
        self.pending_end = false;
    }

    fn on_event(&mut self, session: u64, body: &[u8]) {
        if session != self.session {
            debug!("Discarding event from detached renderer subscription {}", session);
            return;
        }

        let instance = match decode_av_transport(body) {
            Ok(instance) => instance,
            Err(e) => {
                warn!("Discarding AVTransport event: {}", e);
                return;
            }
        };

        match instance.transport_state() {
            Some(transport_state) => {
                self.transition(PlayerState::from_transport_state(transport_state))
            }
            None => trace!("AVTransport event without TransportState"),
        }
    }

    fn transition(&mut self, next: PlayerState) {
        self.state.send_replace(next);

        if next == PlayerState::Playing {
            self.start_polling();
        } else {
            self.stop_polling();
        }

        self.notifier.publish(PlayerEvent::StateChanged(next));

        if next == PlayerState::Stopped && self.pending_end {
            self.pending_end = false;
            info!("Playback reached end of media");
            self.notifier.publish(PlayerEvent::PlaybackEnded);
        }
    }

    fn start_polling(&mut self) {
        if self.poller.is_some() {
            return;
        }
        let Some(transport) = self.transport.clone() else {
            return;
        };

        self.next_poll += 1;
        let poll = self.next_poll;
        let inputs = self.inputs.clone();

        self.poller = Some(PositionPoller::start(
            poll,
            transport,
            self.config.instance_id.clone(),
            self.config.poll_interval,
            move |result| inputs.send(Input::Position { poll, result }).is_ok(),
        ));
    }

    fn stop_polling(&mut self) {
        self.poller = None;
    }

    fn on_position(&mut self, poll: u64, result: std::result::Result<PositionInfo, TransportError>) {
        if self.poller.as_ref().map(PositionPoller::id) != Some(poll) {
            debug!("Discarding position result from stopped poll {}", poll);
            return;
        }

        let info = match result {
            Ok(info) => info,
            Err(e) => {
                warn!("Position query failed: {}", e);
                return;
            }
        };

        let (Some(duration), Some(elapsed)) = (
            parse_duration_secs(&info.track_duration),
            parse_duration_secs(&info.rel_time),
        ) else {
            debug!(
                "Unparsable position (duration {:?}, elapsed {:?})",
                info.track_duration, info.rel_time
            );
            return;
        };

        self.notifier
            .publish(PlayerEvent::PositionChanged { duration, elapsed });
        self.pending_end = duration - elapsed <= self.config.end_of_media_tolerance;
    }
}
