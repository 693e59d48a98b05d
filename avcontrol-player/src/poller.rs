//! Periodic position polling

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::error::TransportError;
use crate::transport::{AvTransport, PositionInfo};

/// Background task querying `GetPositionInfo` once per period
///
/// The first query happens one period after start. Queries never overlap: a
/// slow response delays the next tick. Dropping the poller cancels the task,
/// including any query in flight.
#[derive(Debug)]
pub(crate) struct PositionPoller {
    id: u64,
    task: JoinHandle<()>,
}

impl PositionPoller {
    /// Starts polling; `on_result` returning `false` ends the task
    pub fn start<F>(
        id: u64,
        transport: Arc<dyn AvTransport>,
        instance_id: String,
        period: Duration,
        on_result: F,
    ) -> Self
    where
        F: Fn(Result<PositionInfo, TransportError>) -> bool + Send + 'static,
    {
        let task = tokio::spawn(async move {
            debug!("Starting position poll {} (interval: {:?})", id, period);

            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let result = transport.get_position_info(&instance_id).await;
                if !on_result(result) {
                    break;
                }
            }
        });

        Self { id, task }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for PositionPoller {
    fn drop(&mut self) {
        debug!("Stopping position poll {}", self.id);
        self.task.abort();
    }
}
