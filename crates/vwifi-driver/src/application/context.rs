//! Shared interface state.
//!
//! [`InterfaceContext`] is the single source of truth for in-flight request
//! data.  It holds no behaviour of its own: admission calls and task bodies
//! read and write its fields, always while holding its lock.
//!
//! | Field                       | Set by               | Cleared by       |
//! |-----------------------------|----------------------|------------------|
//! | `pending_scan`              | scan admission       | scan task        |
//! | `connecting_ssid`           | connect admission    | connect task     |
//! | `pending_disconnect_reason` | disconnect admission | disconnect task  |

use tokio::sync::MutexGuard;
use vwifi_core::{ScanRequest, Ssid};

use crate::application::lock::{Interrupt, InterruptibleMutex, LockInterrupted};

/// The fields guarded by the interface lock.
#[derive(Debug, Default)]
pub struct InterfaceState {
    /// The outstanding scan.  `Some` exactly while a scan is in flight.
    pub pending_scan: Option<ScanRequest>,
    /// Bounded SSID of the connect attempt being resolved; empty when none.
    pub connecting_ssid: Ssid,
    /// Reason code of the pending disconnect; 0 when none.
    pub pending_disconnect_reason: u16,
}

/// A point-in-time copy of [`InterfaceState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub pending_scan: Option<ScanRequest>,
    pub connecting_ssid: Ssid,
    pub pending_disconnect_reason: u16,
}

impl StateSnapshot {
    /// Returns `true` if no request of any kind is in flight.
    pub fn is_idle(&self) -> bool {
        self.pending_scan.is_none()
            && self.connecting_ssid.is_empty()
            && self.pending_disconnect_reason == 0
    }
}

/// Per-interface shared state, created at bring-up and dropped after
/// teardown has drained every task.
#[derive(Debug, Default)]
pub struct InterfaceContext {
    state: InterruptibleMutex<InterfaceState>,
}

impl InterfaceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the interface lock, giving up if `interrupt` fires while
    /// waiting.
    ///
    /// # Errors
    ///
    /// Returns [`LockInterrupted`] if the wait was interrupted.
    pub async fn lock(
        &self,
        interrupt: &Interrupt,
    ) -> Result<MutexGuard<'_, InterfaceState>, LockInterrupted> {
        self.state.lock(interrupt).await
    }

    /// Acquires the interface lock without a way out.
    pub async fn lock_uninterruptible(&self) -> MutexGuard<'_, InterfaceState> {
        self.state.lock_uninterruptible().await
    }

    /// Copies the current state.
    pub async fn snapshot(&self) -> StateSnapshot {
        let state = self.state.lock_uninterruptible().await;
        StateSnapshot {
            pending_scan: state.pending_scan.clone(),
            connecting_ssid: state.connecting_ssid.clone(),
            pending_disconnect_reason: state.pending_disconnect_reason,
        }
    }
}
