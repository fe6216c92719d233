use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use domain::{IrRequest, IrTransmitter, LogicalAction, TransmitError};
use infrastructure::IrConfig;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

/// Upper bound for a single external transmission
pub const TRANSMIT_TIMEOUT: Duration = Duration::from_millis(1500);

/// What `dispatch` did with a request. None of these is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Transmission started in the background
    Started,
    /// Transmitter busy or cooling down; request dropped
    Busy,
    /// No signal file for this action
    Unmapped,
    /// Dispatcher has been shut down
    Closed,
}

/// Serializes access to the single IR transmitter.
///
/// A dispatch claims the busy flag, runs the transmission in the background
/// and releases the flag only after the cooldown has elapsed, counted from
/// the moment the transmission finished. Requests arriving in between are
/// dropped, never queued.
pub struct InfraredDispatcher {
    transmitter: Arc<dyn IrTransmitter>,
    config: IrConfig,
    busy: Arc<AtomicBool>,
    cancel_token: CancellationToken,
    tasks: TaskTracker,
}

impl InfraredDispatcher {
    pub fn new(transmitter: Arc<dyn IrTransmitter>, config: IrConfig) -> Self {
        info!(
            device = %config.device,
            carrier = config.carrier_hz,
            cooldown_ms = config.cooldown.as_millis() as u64,
            signals = %config.signals_dir.display(),
            "IR dispatcher ready"
        );
        Self {
            transmitter,
            config,
            busy: Arc::new(AtomicBool::new(false)),
            cancel_token: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    pub fn dispatch(&self, action: LogicalAction) -> DispatchOutcome {
        if self.cancel_token.is_cancelled() {
            return DispatchOutcome::Closed;
        }

        let Some(file) = self.config.command_map.resolve(action) else {
            return DispatchOutcome::Unmapped;
        };

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(action = %action, "IR transmitter busy, dropping command");
            return DispatchOutcome::Busy;
        }

        let request = IrRequest {
            device: self.config.device.clone(),
            signal_file: self.config.signals_dir.join(file),
            carrier_hz: self.config.carrier_hz,
        };
        let transmitter = self.transmitter.clone();
        let busy = self.busy.clone();
        let cancel_token = self.cancel_token.clone();
        let cooldown = self.config.cooldown;

        self.tasks.spawn(async move {
            let result = tokio::select! {
                _ = cancel_token.cancelled() => Err(TransmitError::Cancelled),
                result = transmit_bounded(transmitter.as_ref(), &request) => result,
            };

            match result {
                Ok(()) => debug!(action = %action, "IR command sent"),
                Err(TransmitError::Cancelled) => {}
                Err(e) => error!(
                    action = %action,
                    file = %request.signal_file.display(),
                    error = %e,
                    "IR send failed"
                ),
            }

            tokio::select! {
                _ = cancel_token.cancelled() => {}
                _ = sleep(cooldown) => {}
            }
            busy.store(false, Ordering::Release);
        });

        DispatchOutcome::Started
    }

    /// Dispatch by wire name (`"power"`, `"volUp"`, ...). Unknown names are ignored.
    pub fn dispatch_named(&self, name: &str) -> DispatchOutcome {
        match name.parse::<LogicalAction>() {
            Ok(action) => self.dispatch(action),
            Err(_) => DispatchOutcome::Unmapped,
        }
    }

    /// `true` once [`shutdown`](Self::shutdown) has been called
    pub fn is_closed(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn cooldown(&self) -> Duration {
        self.config.cooldown
    }

    /// Wait until every started transmission and its cooldown has finished
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Abort in-flight work, cancel pending cooldowns and release the transmitter
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        self.busy.store(false, Ordering::Release);
    }
}

/// Run one transmission, bounded by [`TRANSMIT_TIMEOUT`]
pub(crate) async fn transmit_bounded(
    transmitter: &dyn IrTransmitter,
    request: &IrRequest,
) -> Result<(), TransmitError> {
    match timeout(TRANSMIT_TIMEOUT, transmitter.transmit(request)).await {
        Ok(result) => result,
        Err(_) => Err(TransmitError::TimedOut(TRANSMIT_TIMEOUT.as_millis() as u64)),
    }
}
