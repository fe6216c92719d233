use async_trait::async_trait;

use crate::error::FeedError;

/// Something that happened on a live subscription
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A pushed state snapshot
    Snapshot(serde_json::Value),
    /// The subscription ended; the string is a human-readable reason
    Disconnected(String),
}

/// An established subscription to a push-state feed
#[async_trait]
pub trait StateSubscription: Send {
    /// Wait for the next event.
    ///
    /// After `Disconnected` is returned the subscription is dead and must be
    /// dropped.
    async fn next_event(&mut self) -> FeedEvent;

    /// Close the subscription. Calling it more than once is harmless.
    async fn close(&mut self);
}

/// Push-state feed that infrastructure implementations must provide
#[async_trait]
pub trait StateFeed: Send + Sync {
    /// Open a new subscription. Each call is one connection attempt.
    async fn subscribe(&self) -> Result<Box<dyn StateSubscription>, FeedError>;

    /// Human-readable endpoint, for logging
    fn endpoint(&self) -> &str;
}
