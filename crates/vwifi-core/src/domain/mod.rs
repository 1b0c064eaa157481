//! Domain entities for the simulated wireless interface.
//!
//! Nothing in this module blocks, allocates a runtime, or touches the host.
//! The driver crate builds its state machine on top of these types.

/// Network names (SSIDs) and their bounded connect-time form.
pub mod ssid;

/// Access point records and the synthetic network constants.
pub mod bss;

/// 802.11 information element encoding and parsing.
pub mod ie;

/// Static PHY capability tables.
pub mod capabilities;

/// Scan requests and completion values exchanged with the upper stack.
pub mod requests;
