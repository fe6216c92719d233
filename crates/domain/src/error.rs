use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unknown logical action: {0}")]
    UnknownAction(String),
}

/// Failure of a single infrared transmission
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransmitError {
    #[error("Failed to start transmitter process: {0}")]
    Spawn(String),

    #[error("Transmitter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Transmission timed out after {0} ms")]
    TimedOut(u64),

    #[error("Transmission cancelled")]
    Cancelled,
}

/// Errors raised by a push-state feed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Connection timed out after {0} ms")]
    TimedOut(u64),

    #[error("Connection closed: {0}")]
    Closed(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("Notification sink unavailable: {0}")]
    Unavailable(String),
}
