//! Deferred task bodies: the scan, connect, and disconnect routines.
//!
//! Each body runs on its own Tokio task, started by the executor after the
//! admission call that queued it has returned.  A body either completes
//! (and fires exactly one completion callback) or is abandoned because its
//! wait for the interface lock was interrupted, in which case it fires
//! nothing and leaves the pending state as it was.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use vwifi_core::{ConnectResult, ScanInfo, StatusCode, SyntheticAccessPoint, TimeoutReason};

use crate::application::announcer::SyntheticAnnouncer;
use crate::application::context::InterfaceContext;
use crate::application::executor::{Job, JobRunner};
use crate::application::lock::{Interrupt, LockInterrupted};
use crate::application::upper_stack::UpperStack;

/// Why a task body gave up without signalling completion.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TaskAbandoned {
    #[error("interrupted during the simulated scan delay")]
    ScanDelay,
    #[error(transparent)]
    Lock(#[from] LockInterrupted),
}

/// Runs the three task bodies against one interface.
pub struct TaskRunner {
    context: Arc<InterfaceContext>,
    upper: Arc<dyn UpperStack>,
    announcer: SyntheticAnnouncer,
    scan_delay: Duration,
    shutdown: Interrupt,
}

impl TaskRunner {
    pub fn new(
        context: Arc<InterfaceContext>,
        upper: Arc<dyn UpperStack>,
        scan_delay: Duration,
        shutdown: Interrupt,
    ) -> Self {
        Self {
            announcer: SyntheticAnnouncer::new(Arc::clone(&upper)),
            context,
            upper,
            scan_delay,
            shutdown,
        }
    }

    /// Waits out the simulated scan time, announces the synthetic BSS, then
    /// completes the pending scan.
    ///
    /// The delay keeps the completion from racing the admission call that
    /// queued this task.
    pub async fn scan(&self) -> Result<(), TaskAbandoned> {
        tokio::select! {
            biased;
            _ = self.shutdown.triggered() => return Err(TaskAbandoned::ScanDelay),
            _ = tokio::time::sleep(self.scan_delay) => {}
        }

        self.announcer.announce();

        let mut state = self.context.lock(&self.shutdown).await?;
        match state.pending_scan.take() {
            Some(request) => {
                debug!(scan_id = %request.id, "scan complete");
                self.upper.scan_complete(request, ScanInfo { aborted: false });
            }
            None => warn!("scan task ran with no pending scan request"),
        }
        Ok(())
    }

    /// Resolves the pending connect attempt against the synthetic network.
    pub async fn connect(&self) -> Result<(), TaskAbandoned> {
        let target = {
            let state = self.context.lock(&self.shutdown).await?;
            state.connecting_ssid.clone()
        };

        if SyntheticAccessPoint::matches(&target) {
            self.announcer.announce();
            debug!(ssid = %target, "connect succeeded");
            self.upper.connect_result(ConnectResult::Connected {
                bssid: SyntheticAccessPoint::BSSID,
                status: StatusCode::Success,
            });
        } else {
            debug!(ssid = %target, "unknown network; connect timed out in scan phase");
            self.upper.connect_result(ConnectResult::TimedOut {
                reason: TimeoutReason::Scan,
            });
        }

        let mut state = self.context.lock(&self.shutdown).await?;
        state.connecting_ssid.clear();
        Ok(())
    }

    /// Delivers the pending disconnect as a locally generated event.
    pub async fn disconnect(&self) -> Result<(), TaskAbandoned> {
        let mut state = self.context.lock(&self.shutdown).await?;
        let reason_code = state.pending_disconnect_reason;
        debug!(reason_code, "disconnected");
        self.upper.disconnected(reason_code, true);
        state.pending_disconnect_reason = 0;
        Ok(())
    }
}

#[async_trait]
impl JobRunner for TaskRunner {
    async fn run(&self, job: Job) {
        let outcome = match job {
            Job::Scan => self.scan().await,
            Job::Connect => self.connect().await,
            Job::Disconnect => self.disconnect().await,
        };
        if let Err(reason) = outcome {
            warn!(%job, %reason, "task abandoned without completion");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
