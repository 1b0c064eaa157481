//! # vwifi-core
//!
//! Shared domain library for the vwifi simulated wireless interface.
//!
//! This crate holds every value that travels between the control plane and
//! the upper networking stack, plus the fixed tables that describe the
//! simulated radio.  It has no async runtime, no locks and no I/O, so every
//! type here can be built and checked in isolation.
//!
//! - **`domain::ssid`** – network names and the bounded form stored while a
//!   connect attempt is being resolved.
//! - **`domain::bss`** – MAC addresses, channels, and the one synthetic access
//!   point the simulated radio ever sees.
//! - **`domain::ie`** – 802.11 information elements (the TLV block carried in
//!   beacons and probe responses).
//! - **`domain::capabilities`** – the PHY capability table advertised to the
//!   host (modes, band, channel, bitrates, scan limits).
//! - **`domain::requests`** – scan requests and the completion values handed
//!   back through the upper stack's callbacks.

pub mod domain;

pub use domain::bss::{BssAdvertisement, Channel, MacAddr, SyntheticAccessPoint};
pub use domain::capabilities::WiphyCapabilities;
pub use domain::ie::{InformationElement, IeError};
pub use domain::requests::{ConnectResult, ScanInfo, ScanRequest, StatusCode, TimeoutReason};
pub use domain::ssid::{Ssid, SsidError, MAX_CONNECT_SSID_LEN, MAX_SSID_LEN};
