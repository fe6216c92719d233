mod command_map;
mod logical_action;

pub use command_map::CommandMap;
pub use logical_action::LogicalAction;
