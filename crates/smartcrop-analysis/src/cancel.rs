//! Cancellation and deadline checks for long analyses.

use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::error::{CropError, CropResult};

/// Checked between pipeline stages and periodically while scoring.
///
/// Aborting leaves nothing to clean up: every stage owns its buffers, so
/// in-flight work is simply dropped.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    cancel_rx: Option<watch::Receiver<bool>>,
    deadline: Option<(Instant, Duration)>,
}

impl Interrupt {
    /// Build from an optional cancel signal and timeout; the timeout starts
    /// counting now.
    pub fn new(cancel_rx: Option<watch::Receiver<bool>>, timeout: Option<Duration>) -> Self {
        Self {
            cancel_rx,
            deadline: timeout.map(|t| (Instant::now() + t, t)),
        }
    }

    /// Fail with `Cancelled` or `Timeout` if the analysis should stop.
    pub fn check(&self) -> CropResult<()> {
        if let Some(ref cancel_rx) = self.cancel_rx {
            if *cancel_rx.borrow() {
                return Err(CropError::Cancelled);
            }
        }

        if let Some((deadline, timeout)) = self.deadline {
            if Instant::now() >= deadline {
                return Err(CropError::Timeout(timeout));
            }
        }

        Ok(())
    }
}
