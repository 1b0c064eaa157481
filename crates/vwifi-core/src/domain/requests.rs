//! Request and completion values exchanged with the upper stack.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::bss::MacAddr;
use crate::domain::ssid::Ssid;

/// An outstanding scan, owned by the interface until the scan completes.
///
/// The upper stack creates the request, the interface holds it while the
/// scan is in flight, and it is handed back through the scan-complete
/// callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub id: Uuid,
    /// SSIDs to probe for.  Empty means a wildcard scan.
    pub ssids: Vec<Ssid>,
}

impl ScanRequest {
    /// Creates a wildcard scan request with a fresh ID.
    pub fn new() -> Self {
        Self::with_ssids(Vec::new())
    }

    /// Creates a directed scan request with a fresh ID.
    pub fn with_ssids(ssids: Vec<Ssid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            ssids,
        }
    }
}

impl Default for ScanRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome attached to a scan-complete notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInfo {
    /// `true` if the scan was cut short by the user or by a driver fault.
    pub aborted: bool,
}

/// 802.11 association status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum StatusCode {
    Success = 0,
    UnspecifiedFailure = 1,
}

/// Which phase a failed connect attempt timed out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TimeoutReason {
    Unspecified = 0,
    Scan = 1,
    Auth = 2,
    Assoc = 3,
}

impl fmt::Display for TimeoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unspecified => "unspecified",
            Self::Scan => "scan",
            Self::Auth => "authentication",
            Self::Assoc => "association",
        };
        f.write_str(s)
    }
}

/// Result of a connect attempt, reported through the connect callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectResult {
    /// Associated with `bssid`.
    Connected { bssid: MacAddr, status: StatusCode },
    /// The attempt gave up.
    TimedOut { reason: TimeoutReason },
}

impl ConnectResult {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Connected {
                status: StatusCode::Success,
                ..
            }
        )
    }

    /// Returns the timeout reason for a failed attempt.
    pub fn timeout_reason(&self) -> Option<TimeoutReason> {
        match self {
            Self::TimedOut { reason } => Some(*reason),
            Self::Connected { .. } => None,
        }
    }
}
