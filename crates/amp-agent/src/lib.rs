pub mod bridge;
pub mod cli;

pub use bridge::{Bridge, send_action};
pub use cli::{Args, Command};
