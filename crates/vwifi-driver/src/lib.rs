//! vwifi-driver library entry point.
//!
//! Control plane for a simulated wireless interface.  The upper networking
//! stack asks it to scan, connect, or disconnect; each request is admitted
//! quickly and then carried out by a deferred task that reports back through
//! completion callbacks.  The radio is fake: it always sees exactly one
//! access point, `MyAwesomeWiFi`.
//!
//! Integration tests in `tests/` and the `vwifi` binary share this module tree.

/// Application layer: admission, shared state, deferred tasks.
pub mod application;

/// Infrastructure layer: upper stack adapters and configuration storage.
pub mod infrastructure;
