pub mod client;

pub use client::{ReconnectPolicy, StateStreamClient};
