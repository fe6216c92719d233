pub mod watcher;

pub use watcher::VolumeWatcher;
