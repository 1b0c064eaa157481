//! Service Set Identifiers.
//!
//! An SSID is an opaque byte string of at most 32 bytes.  It is usually UTF-8
//! but nothing in 802.11 requires it, so [`Ssid`] stores raw bytes and only
//! renders them lossily for logs.
//!
//! While a connect attempt is in flight the control plane keeps a *bounded*
//! copy of the requested SSID: the first [`MAX_CONNECT_SSID_LEN`] bytes.  The
//! known network is compared against that bounded copy, so a long SSID that
//! merely starts with the known name does not match.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum SSID length allowed by IEEE 802.11.
pub const MAX_SSID_LEN: usize = 32;

/// Number of SSID bytes retained for an in-flight connect attempt.
pub const MAX_CONNECT_SSID_LEN: usize = 15;

/// Error type for SSID construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SsidError {
    #[error("SSID is {len} bytes; the maximum is {MAX_SSID_LEN}")]
    TooLong { len: usize },
}

/// A network name.
///
/// The empty SSID is valid and is used by the control plane to mean "no
/// connect attempt outstanding".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ssid(Vec<u8>);

impl Ssid {
    /// Builds an SSID from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SsidError::TooLong`] if `bytes` exceeds [`MAX_SSID_LEN`].
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SsidError> {
        let bytes = bytes.into();
        if bytes.len() > MAX_SSID_LEN {
            return Err(SsidError::TooLong { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    /// Builds an SSID from the first `limit` bytes of `bytes`.
    ///
    /// Never fails: anything past `limit` (or past [`MAX_SSID_LEN`], whichever
    /// is smaller) is discarded.
    pub fn truncated(bytes: &[u8], limit: usize) -> Self {
        let keep = bytes.len().min(limit).min(MAX_SSID_LEN);
        Self(bytes[..keep].to_vec())
    }

    /// Wraps bytes already known to be a valid SSID.
    pub(crate) fn from_known(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= MAX_SSID_LEN);
        Self(bytes.to_vec())
    }

    /// Returns the bounded copy of this SSID that a connect attempt stores.
    pub fn to_connect_form(&self) -> Self {
        Self::truncated(&self.0, MAX_CONNECT_SSID_LEN)
    }

    /// The empty SSID.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resets to the empty SSID, keeping the allocation.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl TryFrom<&str> for Ssid {
    type Error = SsidError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.as_bytes())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
