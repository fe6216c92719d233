use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use domain::{Direction, Notification, NotificationLevel, Notifier};
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

/// Minimum spacing between two user-visible notifications
pub const NOTIFICATION_WINDOW: Duration = Duration::from_millis(1500);
pub const NOTIFICATION_TITLE: &str = "Amp Volume";

/// Lets at most one notification through per window.
///
/// The window is unrelated to the IR dispatcher's cooldown.
pub struct NotificationDebouncer {
    notifier: Arc<dyn Notifier>,
    window: Duration,
    cooling: Arc<AtomicBool>,
    cancel_token: CancellationToken,
    tasks: TaskTracker,
}

impl NotificationDebouncer {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            window: NOTIFICATION_WINDOW,
            cooling: Arc::new(AtomicBool::new(false)),
            cancel_token: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    /// Returns `true` if a notification was emitted
    pub fn maybe_notify(&self, direction: Direction) -> bool {
        if self.cancel_token.is_cancelled() {
            return false;
        }

        if self
            .cooling
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(direction = %direction, "Notification suppressed");
            return false;
        }

        let notification = Notification::new(
            NotificationLevel::Success,
            NOTIFICATION_TITLE,
            format!("Volume {}", direction),
        );
        let reset_at = Instant::now() + self.window;
        let notifier = self.notifier.clone();
        let cooling = self.cooling.clone();
        let cancel_token = self.cancel_token.clone();

        // The window is timed independently of the sink call
        let sink_cancel = cancel_token.clone();
        self.tasks.spawn(async move {
            tokio::select! {
                biased;
                result = notifier.notify(&notification) => {
                    if let Err(e) = result {
                        warn!(error = %e, "Failed to push notification");
                    }
                }
                _ = sink_cancel.cancelled() => {
                    debug!("Pending notification abandoned");
                }
            }
        });

        self.tasks.spawn(async move {
            tokio::select! {
                _ = cancel_token.cancelled() => {}
                _ = sleep_until(reset_at) => {}
            }
            cooling.store(false, Ordering::Release);
        });

        true
    }

    pub fn is_cooling(&self) -> bool {
        self.cooling.load(Ordering::Acquire)
    }

    /// Cancel the pending window reset, abandon in-flight sink calls and stop emitting
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        self.cooling.store(false, Ordering::Release);
    }
}
