//! Recording upper stack for tests.
//!
//! Every callback is appended to a `Mutex<Vec<...>>` field so assertions can
//! inspect exactly what was reported and in what order.
//!
//! ```ignore
//! let upper = Arc::new(RecordingUpperStack::new());
//! let iface = WirelessInterface::bring_up(settings, Arc::clone(&upper) as Arc<dyn UpperStack>);
//!
//! iface.start_disconnect(7, &Interrupt::new()).await?;
//! upper.wait_for_calls(1, Duration::from_secs(1)).await;
//!
//! assert_eq!(*upper.disconnects.lock().unwrap(), vec![(7, true)]);
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;
use uuid::Uuid;
use vwifi_core::{BssAdvertisement, ConnectResult, ScanInfo, ScanRequest};

use crate::application::upper_stack::{BssHandle, UpperStack};

/// Which callback fired, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedCall {
    BssDiscovered,
    ScanComplete,
    ConnectResult,
    Disconnected,
}

/// An upper stack that records all callbacks.
#[derive(Default)]
pub struct RecordingUpperStack {
    /// Every callback, in order.
    pub calls: Mutex<Vec<RecordedCall>>,
    /// BSS records; this is the upper stack's own reference.
    pub bss: Mutex<Vec<BssHandle>>,
    /// `(request id, aborted)` per scan completion.
    pub scans_completed: Mutex<Vec<(Uuid, bool)>>,
    pub connect_results: Mutex<Vec<ConnectResult>>,
    /// `(reason code, locally generated)` per disconnect.
    pub disconnects: Mutex<Vec<(u16, bool)>>,
    notify: Notify,
}

impl RecordingUpperStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Waits until at least `count` callbacks have been recorded or `limit`
    /// elapses.  Returns whether the count was reached.
    pub async fn wait_for_calls(&self, count: usize, limit: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.notify.notified();
                if self.calls.lock().unwrap().len() >= count {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(limit, wait).await.is_ok()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
        self.notify.notify_waiters();
    }
}

impl UpperStack for RecordingUpperStack {
    fn bss_discovered(&self, advertisement: BssAdvertisement) -> BssHandle {
        let handle = Arc::new(advertisement);
        self.bss.lock().unwrap().push(Arc::clone(&handle));
        self.record(RecordedCall::BssDiscovered);
        handle
    }

    fn scan_complete(&self, request: ScanRequest, info: ScanInfo) {
        self.scans_completed
            .lock()
            .unwrap()
            .push((request.id, info.aborted));
        self.record(RecordedCall::ScanComplete);
    }

    fn connect_result(&self, result: ConnectResult) {
        self.connect_results.lock().unwrap().push(result);
        self.record(RecordedCall::ConnectResult);
    }

    fn disconnected(&self, reason_code: u16, locally_generated: bool) {
        self.disconnects
            .lock()
            .unwrap()
            .push((reason_code, locally_generated));
        self.record(RecordedCall::Disconnected);
    }
}
