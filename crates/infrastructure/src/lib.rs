//! Infrastructure layer - External integrations

pub mod config;
pub mod feed;
pub mod ir;
pub mod notifier;

pub use config::{AmpConfig, IrConfig, NotifyConfig, StreamConfig};
pub use feed::{EngineIoVersion, SocketIoFeed};
pub use ir::{IrCtlTransmitter, MockTransmitter};
pub use notifier::LogNotifier;
