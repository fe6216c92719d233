pub mod engineio;
pub mod socketio_feed;

pub use engineio::{EnginePacket, EngineIoVersion, OpenInfo, SocketPacket};
pub use socketio_feed::SocketIoFeed;
