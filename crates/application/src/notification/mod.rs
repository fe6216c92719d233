pub mod debouncer;

pub use debouncer::{NOTIFICATION_TITLE, NOTIFICATION_WINDOW, NotificationDebouncer};
