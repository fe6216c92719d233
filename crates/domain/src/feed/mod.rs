mod connection_state;
mod state_feed;

pub use connection_state::ConnectionState;
pub use state_feed::{FeedEvent, StateFeed, StateSubscription};
