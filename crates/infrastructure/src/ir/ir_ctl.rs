use async_trait::async_trait;
use domain::{IrRequest, IrTransmitter, TransmitError};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Transmitter backed by the `ir-ctl` tool from v4l-utils
pub struct IrCtlTransmitter {
    program: String,
}

impl IrCtlTransmitter {
    pub fn new() -> Self {
        Self::with_program("ir-ctl")
    }

    /// Use a different executable with the same command line
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, request: &IrRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-d")
            .arg(&request.device)
            .arg(format!("--send={}", request.signal_file.display()))
            .arg(format!("--carrier={}", request.carrier_hz))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The dispatcher bounds each send with a timeout; dropping the
            // future must not leave the process holding the device.
            .kill_on_drop(true);
        cmd
    }
}

impl Default for IrCtlTransmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IrTransmitter for IrCtlTransmitter {
    async fn transmit(&self, request: &IrRequest) -> Result<(), TransmitError> {
        debug!(
            program = %self.program,
            device = %request.device,
            file = %request.signal_file.display(),
            carrier = request.carrier_hz,
            "Invoking IR transmitter"
        );

        let output = self
            .command(request)
            .output()
            .await
            .map_err(|e| TransmitError::Spawn(format!("{}: {}", self.program, e)))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(TransmitError::Failed {
            status: output.status.to_string(),
            stderr,
        })
    }
}
