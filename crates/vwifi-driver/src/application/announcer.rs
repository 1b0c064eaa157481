//! Synthetic network announcer.
//!
//! The simulated radio always sees exactly one access point.  Announcing it
//! means building a fresh advertisement and registering it with the upper
//! stack, which keeps the record.  The handle we get back is only borrowed
//! long enough to log it.

use std::sync::Arc;

use tracing::debug;
use vwifi_core::SyntheticAccessPoint;

use crate::application::upper_stack::UpperStack;

/// Announces the synthetic access point to the upper stack.
pub struct SyntheticAnnouncer {
    upper: Arc<dyn UpperStack>,
}

impl SyntheticAnnouncer {
    pub fn new(upper: Arc<dyn UpperStack>) -> Self {
        Self { upper }
    }

    /// Hands one new advertisement to the upper stack and releases the
    /// returned handle.
    pub fn announce(&self) {
        let handle = self.upper.bss_discovered(SyntheticAccessPoint::advertisement());
        debug!(
            bssid = %handle.bssid,
            freq = handle.channel.center_freq,
            signal = handle.signal,
            "announced synthetic BSS"
        );
        drop(handle);
    }
}
