//! Application layer - Use cases and background workers

pub mod ir;
pub mod notification;
pub mod stream;
pub mod volume;

pub use ir::{DispatchOutcome, InfraredDispatcher};
pub use notification::NotificationDebouncer;
pub use stream::{ReconnectPolicy, StateStreamClient};
pub use volume::VolumeWatcher;
