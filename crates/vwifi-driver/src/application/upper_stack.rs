//! The upper networking stack, as seen from the control plane.
//!
//! The control plane never returns results from its admission calls; it
//! reports them later, from a deferred task, through this trait.  Adapters
//! live in the infrastructure layer (`infrastructure::upper_stack`).

use std::sync::Arc;

use vwifi_core::{BssAdvertisement, ConnectResult, ScanInfo, ScanRequest};

/// Shared handle to an access point record held in the upper stack's BSS
/// table.
///
/// The upper stack keeps its own reference; whoever receives a handle from
/// [`UpperStack::bss_discovered`] must drop it once done.
pub type BssHandle = Arc<BssAdvertisement>;

/// Completion callbacks exposed by the upper stack.
///
/// Every method is called from a deferred task, never from an admission
/// call, and at most once per admitted request.  Implementations must not
/// block.
pub trait UpperStack: Send + Sync {
    /// Registers a discovered access point and returns a handle to the
    /// stored record.
    fn bss_discovered(&self, advertisement: BssAdvertisement) -> BssHandle;

    /// Reports that the scan described by `request` has finished.
    fn scan_complete(&self, request: ScanRequest, info: ScanInfo);

    /// Reports the outcome of a connect attempt.
    fn connect_result(&self, result: ConnectResult);

    /// Reports that the interface disconnected.
    fn disconnected(&self, reason_code: u16, locally_generated: bool);
}
