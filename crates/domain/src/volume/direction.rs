use serde::{Deserialize, Serialize};

use crate::action::LogicalAction;

/// Direction of an accepted volume change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// IR action that reproduces this change on the amplifier
    pub fn action(&self) -> LogicalAction {
        match self {
            Self::Up => LogicalAction::VolUp,
            Self::Down => LogicalAction::VolDown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
