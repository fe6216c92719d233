//! Domain layer - Pure amplifier control logic with no external dependencies
//!
//! This crate contains:
//! - Value Objects (LogicalAction, Direction, IrRequest, Notification)
//! - The volume delta detector
//! - Collaborator interfaces (traits) for the IR transmitter, notification
//!   sink and push-state feed
//!
//! Principles:
//! - No dependencies on infrastructure or on an async runtime
//! - Testable in isolation

pub mod action;
pub mod error;
pub mod feed;
pub mod ir;
pub mod notification;
pub mod volume;

// Re-export commonly used types
pub use action::{CommandMap, LogicalAction};
pub use error::{DomainError, FeedError, NotifyError, TransmitError};
pub use feed::{ConnectionState, FeedEvent, StateFeed, StateSubscription};
pub use ir::{IrRequest, IrTransmitter};
pub use notification::{Notification, NotificationLevel, Notifier};
pub use volume::{Direction, VolumeDeltaDetector};
