use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Amplifier remote-control actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalAction {
    Power,
    VolUp,
    VolDown,
    LinePhono,
    LineCd,
    LineOne,
    LineTwo,
}

impl LogicalAction {
    pub const ALL: [LogicalAction; 7] = [
        Self::Power,
        Self::VolUp,
        Self::VolDown,
        Self::LinePhono,
        Self::LineCd,
        Self::LineOne,
        Self::LineTwo,
    ];

    /// Wire name used by callers and configuration keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::VolUp => "volUp",
            Self::VolDown => "volDown",
            Self::LinePhono => "linePhono",
            Self::LineCd => "lineCd",
            Self::LineOne => "lineOne",
            Self::LineTwo => "lineTwo",
        }
    }
}

impl FromStr for LogicalAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DomainError::UnknownAction(s.to_string()))
    }
}

impl std::fmt::Display for LogicalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
