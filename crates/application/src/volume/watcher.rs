use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use domain::volume::volume_from_snapshot;
use domain::{Direction, VolumeDeltaDetector};
use serde_json::Value;
use tracing::info;

use crate::ir::InfraredDispatcher;
use crate::notification::NotificationDebouncer;

/// Turns volume readings into IR pulses and notifications
pub struct VolumeWatcher {
    detector: Mutex<VolumeDeltaDetector>,
    dispatcher: Arc<InfraredDispatcher>,
    debouncer: Option<Arc<NotificationDebouncer>>,
}

impl VolumeWatcher {
    pub fn new(
        dispatcher: Arc<InfraredDispatcher>,
        debouncer: Option<Arc<NotificationDebouncer>>,
    ) -> Self {
        Self {
            detector: Mutex::new(VolumeDeltaDetector::new()),
            dispatcher,
            debouncer,
        }
    }

    /// Feed a raw state snapshot. Snapshots without a numeric volume are ignored.
    pub fn on_snapshot(&self, snapshot: &Value) -> Option<Direction> {
        let reading = volume_from_snapshot(snapshot)?;
        self.on_reading(reading)
    }

    pub fn on_reading(&self, reading: i64) -> Option<Direction> {
        let (previous, direction) = {
            let mut detector = self.detector();
            let previous = detector.baseline();
            (previous, detector.observe(reading))
        };

        let Some(previous) = previous else {
            info!("initial volume={}", reading);
            return None;
        };
        let direction = direction?;

        info!("🔊 volume {} {} -> {}", direction, previous, reading);
        self.dispatcher.dispatch(direction.action());
        if let Some(debouncer) = &self.debouncer {
            debouncer.maybe_notify(direction);
        }

        Some(direction)
    }

    pub fn baseline(&self) -> Option<i64> {
        self.detector().baseline()
    }

    /// Treat the next reading as an initial snapshot
    pub fn reset_baseline(&self) {
        self.detector().reset();
    }

    fn detector(&self) -> MutexGuard<'_, VolumeDeltaDetector> {
        self.detector.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
