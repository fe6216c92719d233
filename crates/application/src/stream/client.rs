use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use domain::{ConnectionState, FeedError, FeedEvent, StateFeed};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::volume::VolumeWatcher;

/// Reconnection behaviour of the state stream client.
///
/// Attempts are unbounded and evenly spaced; there is no backoff growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub retry_delay: Duration,
    pub connect_timeout: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_millis(1000),
            connect_timeout: Duration::from_millis(5000),
        }
    }
}

struct Running {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Keeps a subscription to the push-state feed alive and forwards volume
/// readings to the [`VolumeWatcher`].
pub struct StateStreamClient {
    feed: Arc<dyn StateFeed>,
    watcher: Arc<VolumeWatcher>,
    policy: ReconnectPolicy,
    state: Arc<RwLock<ConnectionState>>,
    running: Mutex<Option<Running>>,
}

impl StateStreamClient {
    pub fn new(feed: Arc<dyn StateFeed>, watcher: Arc<VolumeWatcher>, policy: ReconnectPolicy) -> Self {
        Self {
            feed,
            watcher,
            policy,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            running: Mutex::new(None),
        }
    }

    /// Spawn the connection loop. Does nothing if it is already running.
    pub fn start(&self) {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if running.is_some() {
            debug!("State stream client already running");
            return;
        }

        transition(&self.state, |s| s.to_connecting());

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            self.feed.clone(),
            self.watcher.clone(),
            self.policy,
            self.state.clone(),
            cancel_token.clone(),
        ));

        *running = Some(Running {
            cancel_token,
            handle,
        });
    }

    /// Stop the connection loop and forget the volume baseline.
    ///
    /// Returns once no connection attempt can be in progress. Safe to call
    /// repeatedly and before `start`.
    pub async fn close(&self) {
        let running = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(Running {
            cancel_token,
            handle,
        }) = running
        {
            cancel_token.cancel();
            if let Err(e) = handle.await {
                warn!(error = %e, "State stream task ended abnormally");
            }
            info!(endpoint = %self.feed.endpoint(), "State stream closed");
        }

        self.watcher.reset_baseline();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let stopped = state.to_disconnected();
        *state = stopped;
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Drop for StateStreamClient {
    fn drop(&mut self) {
        let running = self
            .running
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(Running { cancel_token, .. }) = running {
            cancel_token.cancel();
        }
    }
}

async fn run_loop(
    feed: Arc<dyn StateFeed>,
    watcher: Arc<VolumeWatcher>,
    policy: ReconnectPolicy,
    state: Arc<RwLock<ConnectionState>>,
    cancel_token: CancellationToken,
) {
    let endpoint = feed.endpoint().to_string();
    let mut attempt: u64 = 0;

    loop {
        attempt += 1;
        debug!(endpoint = %endpoint, attempt, "Connecting to state feed");

        let result = tokio::select! {
            _ = cancel_token.cancelled() => return,
            result = timeout(policy.connect_timeout, feed.subscribe()) => result,
        };

        match result {
            Ok(Ok(mut subscription)) => {
                info!(endpoint = %endpoint, "🔌 socket connected");
                transition(&state, |s| s.to_connected());
                // Every (re)connection starts with a full state snapshot
                watcher.reset_baseline();
                attempt = 0;

                let reason = loop {
                    tokio::select! {
                        _ = cancel_token.cancelled() => {
                            subscription.close().await;
                            return;
                        }
                        event = subscription.next_event() => match event {
                            FeedEvent::Snapshot(snapshot) => {
                                watcher.on_snapshot(&snapshot);
                            }
                            FeedEvent::Disconnected(reason) => break reason,
                        }
                    }
                };

                warn!(endpoint = %endpoint, reason = %reason, "socket disconnected");
            }
            Ok(Err(e)) => {
                error!(endpoint = %endpoint, attempt, error = %e, "connect_error");
            }
            Err(_) => {
                let e = FeedError::TimedOut(policy.connect_timeout.as_millis() as u64);
                error!(endpoint = %endpoint, attempt, error = %e, "connect_error");
            }
        }

        transition(&state, |s| s.to_reconnecting());

        tokio::select! {
            _ = cancel_token.cancelled() => return,
            _ = sleep(policy.retry_delay) => {}
        }
    }
}

fn transition(
    state: &RwLock<ConnectionState>,
    next: impl FnOnce(&ConnectionState) -> Result<ConnectionState, &'static str>,
) {
    let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
    match next(&*guard) {
        Ok(new_state) => *guard = new_state,
        Err(reason) => debug!(from = ?*guard, "Connection state unchanged: {}", reason),
    }
}
