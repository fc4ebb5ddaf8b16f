//! Poller loop: the drive shaft of the messaging layer.
//!
//! One poller per input slot. Each tick: try_consume, dispatch inside a
//! failure boundary, then sleep the interval. At most one job per tick, no
//! batching, no backoff. Handler failures are logged and the loop keeps
//! going; nothing a handler does can take the poller down.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::HandlerError;
use crate::ports::SlotStore;

/// Default tick interval: poll each slot once a second.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A consumer of one input slot.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// The slot this handler drains.
    fn slot(&self) -> &'static str;

    /// Process one job. Errors are typed so tests can inspect the failure
    /// kind; the poller only logs them.
    async fn handle(&self, payload: Value) -> Result<(), HandlerError>;
}

/// Handle to a set of running pollers.
/// - `request_shutdown` stops taking new jobs; in-flight handlers finish.
/// - `shutdown_and_join` waits for every loop to exit.
pub struct PollerGroup {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl PollerGroup {
    /// Spawn one poller per handler, all consuming from `store` at the same
    /// fixed interval.
    pub fn spawn(
        store: Arc<dyn SlotStore>,
        handlers: Vec<Arc<dyn JobHandler>>,
        interval: Duration,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut joins = Vec::with_capacity(handlers.len());
        for handler in handlers {
            let store = Arc::clone(&store);
            let mut rx = shutdown_rx.clone();
            joins.push(tokio::spawn(async move {
                poll_loop(store, handler, interval, &mut rx).await;
            }));
        }

        Self { shutdown_tx, joins }
    }

    pub fn request_shutdown(&self) {
        // ignore send error: receivers may already be dropped
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for j in self.joins {
            let _ = j.await;
        }
    }
}

async fn poll_loop(
    store: Arc<dyn SlotStore>,
    handler: Arc<dyn JobHandler>,
    interval: Duration,
    shutdown_rx: &mut watch::Receiver<bool>,
) {
    let slot = handler.slot();
    debug!(slot, "poller started");

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        match store.try_consume(slot).await {
            Ok(Some(payload)) => {
                debug!(slot, "job consumed, dispatching");
                if let Err(err) = handler.handle(payload).await {
                    // The job is already consumed; it is dropped, not
                    // retried. The producer sees a missing result.
                    warn!(slot, error = %err, "handler failed, job dropped");
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(slot, error = %err, "consume failed, retrying next tick");
            }
        }

        // One job per tick: sleep the full interval even after a consume.
        tokio::select! {
            _ = shutdown_rx.changed() => {}
            _ = tokio::time::sleep(interval) => {}
        }
    }

    debug!(slot, "poller stopped");
}
