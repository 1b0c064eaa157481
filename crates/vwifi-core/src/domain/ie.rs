//! 802.11 information elements.
//!
//! Beacons and probe responses carry a block of tag-length-value records
//! called information elements (IEs):
//!
//! ```text
//! ┌──────────┬──────────┬─────────────────────┐
//! │ EID (u8) │ len (u8) │ payload (len bytes) │ ... repeated
//! └──────────┴──────────┴─────────────────────┘
//! ```
//!
//! The simulated radio only ever emits a single SSID element, but the parser
//! accepts any well-formed block so the upper stack can inspect what it was
//! handed.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::domain::ssid::{Ssid, SsidError};

/// Element ID of the SSID element.
pub const EID_SSID: u8 = 0;

/// Largest payload a single element can carry.
pub const MAX_ELEMENT_LEN: usize = u8::MAX as usize;

/// Error type for information element encoding and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IeError {
    /// The block ended in the middle of an element header or payload.
    #[error("element {eid} at offset {offset} is truncated: needs {needed} bytes, {available} available")]
    Truncated {
        eid: u8,
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// An element payload is longer than the one-byte length field allows.
    #[error("element {eid} payload is {len} bytes; the maximum is {MAX_ELEMENT_LEN}")]
    PayloadTooLong { eid: u8, len: usize },
    /// An SSID element carries an invalid SSID.
    #[error("invalid SSID element: {0}")]
    InvalidSsid(#[from] SsidError),
}

/// One information element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InformationElement {
    /// EID 0: the network name.
    Ssid(Ssid),
    /// Any element this crate does not interpret.
    Unknown { eid: u8, payload: Vec<u8> },
}

impl InformationElement {
    /// Returns the element ID.
    pub fn eid(&self) -> u8 {
        match self {
            Self::Ssid(_) => EID_SSID,
            Self::Unknown { eid, .. } => *eid,
        }
    }

    fn payload(&self) -> &[u8] {
        match self {
            Self::Ssid(ssid) => ssid.as_bytes(),
            Self::Unknown { payload, .. } => payload,
        }
    }
}

/// Encodes `elements` into a contiguous IE block.
///
/// # Errors
///
/// Returns [`IeError::PayloadTooLong`] if an element payload exceeds 255 bytes.
pub fn encode(elements: &[InformationElement]) -> Result<Vec<u8>, IeError> {
    let mut out = Vec::with_capacity(elements.iter().map(|e| 2 + e.payload().len()).sum());
    for element in elements {
        let payload = element.payload();
        let len = u8::try_from(payload.len()).map_err(|_| IeError::PayloadTooLong {
            eid: element.eid(),
            len: payload.len(),
        })?;
        out.push(element.eid());
        out.push(len);
        out.extend_from_slice(payload);
    }
    Ok(out)
}

/// Encodes a block holding just the SSID element.
///
/// Infallible: an [`Ssid`] never exceeds 32 bytes.
pub fn encode_ssid(ssid: &Ssid) -> Vec<u8> {
    let payload = ssid.as_bytes();
    let mut out = Vec::with_capacity(2 + payload.len());
    out.push(EID_SSID);
    out.push(payload.len() as u8);
    out.extend_from_slice(payload);
    out
}

/// Parses an IE block into its elements.
///
/// # Errors
///
/// Returns [`IeError::Truncated`] if the block ends inside an element and
/// [`IeError::InvalidSsid`] if an SSID element exceeds 32 bytes.
pub fn parse(block: &[u8]) -> Result<Vec<InformationElement>, IeError> {
    let mut elements = Vec::new();
    let mut offset = 0;

    while offset < block.len() {
        let eid = block[offset];
        let Some(&len) = block.get(offset + 1) else {
            return Err(IeError::Truncated {
                eid,
                offset,
                needed: 2,
                available: block.len() - offset,
            });
        };
        let start = offset + 2;
        let end = start + len as usize;
        if end > block.len() {
            return Err(IeError::Truncated {
                eid,
                offset,
                needed: 2 + len as usize,
                available: block.len() - offset,
            });
        }

        let payload = &block[start..end];
        elements.push(match eid {
            EID_SSID => InformationElement::Ssid(Ssid::new(payload)?),
            _ => {
                trace!(eid, len, "uninterpreted information element");
                InformationElement::Unknown {
                    eid,
                    payload: payload.to_vec(),
                }
            }
        });
        offset = end;
    }

    Ok(elements)
}

/// Returns the first SSID element in `block`, if any.
///
/// # Errors
///
/// Propagates any [`parse`] error.
pub fn find_ssid(block: &[u8]) -> Result<Option<Ssid>, IeError> {
    Ok(parse(block)?.into_iter().find_map(|element| match element {
        InformationElement::Ssid(ssid) => Some(ssid),
        InformationElement::Unknown { .. } => None,
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
