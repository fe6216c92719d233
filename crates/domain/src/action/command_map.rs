use std::collections::HashMap;

use super::LogicalAction;

/// Lookup table from logical action to IR signal file name
///
/// The default table covers every action. Entries can be replaced or removed
/// at startup; an action without an entry cannot be transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMap {
    entries: HashMap<LogicalAction, String>,
}

impl CommandMap {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Resolve an action to its signal file name
    pub fn resolve(&self, action: LogicalAction) -> Option<&str> {
        self.entries.get(&action).map(String::as_str)
    }

    pub fn insert(&mut self, action: LogicalAction, file: impl Into<String>) {
        self.entries.insert(action, file.into());
    }

    pub fn remove(&mut self, action: LogicalAction) -> Option<String> {
        self.entries.remove(&action)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CommandMap {
    fn default() -> Self {
        let entries = [
            (LogicalAction::Power, "power.ir"),
            (LogicalAction::VolUp, "vol_up.ir"),
            (LogicalAction::VolDown, "vol_down.ir"),
            (LogicalAction::LinePhono, "line_phono.ir"),
            (LogicalAction::LineCd, "line_cd.ir"),
            (LogicalAction::LineOne, "line_one.ir"),
            (LogicalAction::LineTwo, "line_two.ir"),
        ]
        .into_iter()
        .map(|(action, file)| (action, file.to_string()))
        .collect();

        Self { entries }
    }
}
