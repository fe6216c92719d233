use async_trait::async_trait;
use domain::{Notification, NotificationLevel, Notifier, NotifyError};
use tracing::{error, info, warn};

/// Notification sink that writes to the service log
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let Notification {
            level,
            title,
            message,
        } = notification;

        match level {
            NotificationLevel::Success | NotificationLevel::Info => {
                info!(title = %title, "🔔 {}", message)
            }
            NotificationLevel::Warning => warn!(title = %title, "🔔 {}", message),
            NotificationLevel::Error => error!(title = %title, "🔔 {}", message),
        }
        Ok(())
    }
}
