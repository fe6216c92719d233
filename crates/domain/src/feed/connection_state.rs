use serde::{Deserialize, Serialize};

/// Connection state of the push-state subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConnectionState {
    /// Not connected, no active connection attempt
    #[default]
    Disconnected,
    /// Attempting the first connection after start
    Connecting,
    /// Subscribed and receiving snapshots
    Connected,
    /// Waiting for or attempting a reconnection after a drop or failure
    Reconnecting,
}

impl ConnectionState {
    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Check if in a transitional state
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Connecting | Self::Reconnecting)
    }

    /// Transition to connecting state
    pub fn to_connecting(&self) -> Result<Self, &'static str> {
        match self {
            Self::Disconnected => Ok(Self::Connecting),
            _ => Err("Can only connect from Disconnected state"),
        }
    }

    /// Transition to connected state
    pub fn to_connected(&self) -> Result<Self, &'static str> {
        match self {
            Self::Connecting | Self::Reconnecting => Ok(Self::Connected),
            _ => Err("Can only complete connection from Connecting or Reconnecting state"),
        }
    }

    /// Transition to reconnecting state
    pub fn to_reconnecting(&self) -> Result<Self, &'static str> {
        match self {
            Self::Connecting | Self::Connected | Self::Reconnecting => Ok(Self::Reconnecting),
            Self::Disconnected => Err("Cannot reconnect a stopped subscriber"),
        }
    }

    /// Transition to disconnected state
    pub fn to_disconnected(&self) -> Self {
        Self::Disconnected
    }
}
