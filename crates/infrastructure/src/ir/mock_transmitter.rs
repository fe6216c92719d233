use async_trait::async_trait;
use domain::{IrRequest, IrTransmitter, TransmitError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// A recorded transmission with its start and completion instants
#[derive(Debug, Clone)]
pub struct RecordedTransmission {
    pub request: IrRequest,
    pub started_at: Instant,
    pub finished_at: Option<Instant>,
}

/// In-memory transmitter for tests and dry runs
#[derive(Clone, Default)]
pub struct MockTransmitter {
    pub sent: Arc<Mutex<Vec<RecordedTransmission>>>,
    pub delay: Duration,
    pub should_fail: Arc<AtomicBool>,
}

impl MockTransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every transmission takes `delay` to complete
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn fail_next(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn invocations(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn recorded(&self) -> Vec<RecordedTransmission> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_files(&self) -> Vec<String> {
        self.recorded()
            .iter()
            .filter_map(|t| {
                t.request
                    .signal_file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .collect()
    }
}

#[async_trait]
impl IrTransmitter for MockTransmitter {
    async fn transmit(&self, request: &IrRequest) -> Result<(), TransmitError> {
        let index = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(RecordedTransmission {
                request: request.clone(),
                started_at: Instant::now(),
                finished_at: None,
            });
            sent.len() - 1
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.sent.lock().unwrap()[index].finished_at = Some(Instant::now());

        if self.should_fail.load(Ordering::SeqCst) {
            return Err(TransmitError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "Simulated transmitter failure".to_string(),
            });
        }
        Ok(())
    }
}
