use super::Direction;

/// Turns absolute volume readings into discrete direction events.
///
/// The first reading after construction or [`reset`](Self::reset) only sets
/// the baseline. Afterwards every distinct reading yields exactly one event
/// and becomes the new baseline; repeated equal readings yield nothing.
#[derive(Debug, Default, Clone)]
pub struct VolumeDeltaDetector {
    baseline: Option<i64>,
}

impl VolumeDeltaDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, reading: i64) -> Option<Direction> {
        let Some(baseline) = self.baseline else {
            self.baseline = Some(reading);
            return None;
        };

        if reading == baseline {
            return None;
        }

        self.baseline = Some(reading);
        if reading > baseline {
            Some(Direction::Up)
        } else {
            Some(Direction::Down)
        }
    }

    pub fn baseline(&self) -> Option<i64> {
        self.baseline
    }

    /// Forget the baseline so the next reading is treated as a fresh snapshot
    pub fn reset(&mut self) {
        self.baseline = None;
    }
}
