use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::TransmitError;

/// A single infrared emission request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrRequest {
    /// Kernel IR device node, e.g. `/dev/lirc0`
    pub device: String,
    /// Full path of the recorded signal file
    pub signal_file: PathBuf,
    /// Carrier frequency in Hz
    pub carrier_hz: u32,
}

#[async_trait]
pub trait IrTransmitter: Send + Sync {
    /// Emit the signal described by `request`.
    ///
    /// Implementations must be cancel-safe: dropping the future aborts the
    /// emission.
    async fn transmit(&self, request: &IrRequest) -> Result<(), TransmitError>;
}
