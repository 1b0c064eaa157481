//! `UpperStack` adapters.
//!
//! [`ChannelUpperStack`] turns every completion callback into an
//! [`UpperStackEvent`] on an unbounded channel, so an async consumer (the
//! `vwifi` binary, integration tests) can `recv().await` results.  It also
//! owns the BSS table: announced records live here until replaced by a newer
//! announcement of the same BSSID.
//!
//! The channel is unbounded because callbacks run inside deferred tasks and
//! must never block.

pub mod mock;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, trace};
use vwifi_core::{BssAdvertisement, ConnectResult, MacAddr, ScanInfo, ScanRequest};

use crate::application::upper_stack::{BssHandle, UpperStack};

/// One completion callback, as delivered to the event consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpperStackEvent {
    BssDiscovered { bssid: MacAddr, center_freq: u32 },
    ScanComplete { request: ScanRequest, info: ScanInfo },
    ConnectResult(ConnectResult),
    Disconnected { reason_code: u16, locally_generated: bool },
}

/// Event-forwarding upper stack with an owned BSS table.
pub struct ChannelUpperStack {
    events: mpsc::UnboundedSender<UpperStackEvent>,
    bss_table: Mutex<HashMap<MacAddr, BssHandle>>,
}

impl ChannelUpperStack {
    /// Creates the adapter and the receiving end of its event stream.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UpperStackEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let stack = Self {
            events,
            bss_table: Mutex::new(HashMap::new()),
        };
        (stack, rx)
    }

    /// Looks up the stored record for `bssid`.
    pub fn bss(&self, bssid: &MacAddr) -> Option<BssHandle> {
        self.bss_table
            .lock()
            .ok()
            .and_then(|table| table.get(bssid).cloned())
    }

    /// Number of distinct access points in the table.
    pub fn bss_count(&self) -> usize {
        self.bss_table.lock().map(|table| table.len()).unwrap_or(0)
    }

    fn emit(&self, event: UpperStackEvent) {
        trace!(?event, "upper stack event");
        if self.events.send(event).is_err() {
            debug!("upper stack event dropped: receiver closed");
        }
    }
}

impl UpperStack for ChannelUpperStack {
    fn bss_discovered(&self, advertisement: BssAdvertisement) -> BssHandle {
        let handle: BssHandle = Arc::new(advertisement);
        if let Ok(mut table) = self.bss_table.lock() {
            table.insert(handle.bssid, Arc::clone(&handle));
        }
        self.emit(UpperStackEvent::BssDiscovered {
            bssid: handle.bssid,
            center_freq: handle.channel.center_freq,
        });
        handle
    }

    fn scan_complete(&self, request: ScanRequest, info: ScanInfo) {
        self.emit(UpperStackEvent::ScanComplete { request, info });
    }

    fn connect_result(&self, result: ConnectResult) {
        self.emit(UpperStackEvent::ConnectResult(result));
    }

    fn disconnected(&self, reason_code: u16, locally_generated: bool) {
        self.emit(UpperStackEvent::Disconnected {
            reason_code,
            locally_generated,
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
