use std::sync::Arc;

use anyhow::{Result, bail};
use application::{
    DispatchOutcome, InfraredDispatcher, NotificationDebouncer, ReconnectPolicy, StateStreamClient,
    VolumeWatcher,
};
use domain::{IrTransmitter, Notifier, StateFeed};
use infrastructure::AmpConfig;
use tracing::{debug, info, warn};

/// The running service: state feed in, IR pulses and notifications out
pub struct Bridge {
    dispatcher: Arc<InfraredDispatcher>,
    debouncer: Option<Arc<NotificationDebouncer>>,
    watcher: Arc<VolumeWatcher>,
    client: StateStreamClient,
}

impl Bridge {
    pub fn new(
        config: &AmpConfig,
        transmitter: Arc<dyn IrTransmitter>,
        feed: Arc<dyn StateFeed>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let dispatcher = Arc::new(InfraredDispatcher::new(transmitter, config.ir.clone()));

        let debouncer = if config.notify.enabled {
            Some(Arc::new(NotificationDebouncer::new(notifier)))
        } else {
            debug!("Notifications disabled");
            None
        };

        let watcher = Arc::new(VolumeWatcher::new(dispatcher.clone(), debouncer.clone()));
        let client = StateStreamClient::new(feed, watcher.clone(), ReconnectPolicy::default());

        Self {
            dispatcher,
            debouncer,
            watcher,
            client,
        }
    }

    /// Start watching the state feed.
    ///
    /// A bridge is single-use: once shut down its dispatcher stays closed,
    /// so starting it again is refused.
    pub fn start(&self) {
        if self.dispatcher.is_closed() {
            warn!("Bridge already shut down, not restarting");
            return;
        }
        self.client.start();
    }

    pub fn dispatcher(&self) -> &Arc<InfraredDispatcher> {
        &self.dispatcher
    }

    pub fn watcher(&self) -> &Arc<VolumeWatcher> {
        &self.watcher
    }

    pub fn client(&self) -> &StateStreamClient {
        &self.client
    }

    /// Stop the stream first so no new readings arrive, then cancel timers
    pub async fn shutdown(&self) {
        self.client.close().await;
        self.dispatcher.shutdown().await;
        if let Some(debouncer) = &self.debouncer {
            debouncer.shutdown().await;
        }
        info!("Bridge stopped");
    }
}

/// One-shot dispatch by action name. Waits for the transmission and its cooldown.
pub async fn send_action(dispatcher: &InfraredDispatcher, action: &str) -> Result<()> {
    match dispatcher.dispatch_named(action) {
        DispatchOutcome::Started => {
            dispatcher.drain().await;
            info!(action = %action, "📡 IR command sent");
            Ok(())
        }
        DispatchOutcome::Unmapped => bail!("Unknown or unmapped action '{}'", action),
        DispatchOutcome::Busy => bail!("Transmitter busy, '{}' dropped", action),
        DispatchOutcome::Closed => bail!("Dispatcher is shut down"),
    }
}
