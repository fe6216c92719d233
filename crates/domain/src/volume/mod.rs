mod detector;
mod direction;
mod reading;

pub use detector::VolumeDeltaDetector;
pub use direction::Direction;
pub use reading::volume_from_snapshot;
