//! Access point records and the synthetic network.
//!
//! A BSS (basic service set) is what a scan discovers: one access point's
//! identity (BSSID), where it lives (channel), how loud it is (signal), and
//! what it advertises (capability bits and information elements).
//!
//! The simulated radio observes exactly one BSS, described by
//! [`SyntheticAccessPoint`].  Every call to
//! [`SyntheticAccessPoint::advertisement`] builds a fresh
//! [`BssAdvertisement`] that the caller hands over to the upper stack.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ie::{self, IeError};
use crate::domain::ssid::Ssid;

// ── Addresses ─────────────────────────────────────────────────────────────────

/// A 48-bit IEEE MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddr(pub [u8; 6]);

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

// ── Channels ──────────────────────────────────────────────────────────────────

/// Frequency band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    /// 2.4 GHz.
    Band2Ghz,
}

/// Channel bandwidth reported with a BSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelWidth {
    Mhz20,
}

/// A radio channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    pub band: Band,
    /// Driver-specific channel number.
    pub hw_value: u16,
    /// Centre frequency in MHz.
    pub center_freq: u32,
}

// ── Capability bits ───────────────────────────────────────────────────────────

/// The 16-bit capability information field of a beacon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityInfo(pub u16);

impl CapabilityInfo {
    /// Infrastructure-mode access point (extended service set).
    pub const ESS: u16 = 1 << 0;
    /// Independent (ad-hoc) BSS.
    pub const IBSS: u16 = 1 << 1;
    /// Privacy (WEP/WPA) required.
    pub const PRIVACY: u16 = 1 << 4;

    /// Returns `true` if the ESS bit is set.
    pub fn is_ess(&self) -> bool {
        self.0 & Self::ESS != 0
    }
}

/// Which frame a BSS record was learned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    Unknown,
    Beacon,
    ProbeResponse,
}

// ── Advertisement ─────────────────────────────────────────────────────────────

/// A discovered access point, as handed to the upper stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BssAdvertisement {
    pub channel: Channel,
    pub width: ChannelWidth,
    /// Signal strength.  The unit is left to the driver.
    pub signal: i32,
    pub frame_type: FrameType,
    pub bssid: MacAddr,
    /// Timing synchronisation function value from the beacon.
    pub tsf: u64,
    pub capability: CapabilityInfo,
    /// Beacon interval in time units (1 TU = 1024 µs).
    pub beacon_interval: u16,
    /// Encoded information element block.
    pub ies: Vec<u8>,
}

impl BssAdvertisement {
    /// Returns the SSID carried in the IE block, if any.
    ///
    /// # Errors
    ///
    /// Returns [`IeError`] if the IE block is malformed.
    pub fn ssid(&self) -> Result<Option<Ssid>, IeError> {
        ie::find_ssid(&self.ies)
    }
}

// ── The synthetic network ─────────────────────────────────────────────────────

/// Constants describing the one network the simulated radio can see.
pub struct SyntheticAccessPoint;

impl SyntheticAccessPoint {
    /// The network name.
    pub const SSID: &'static str = "MyAwesomeWiFi";
    pub const BSSID: MacAddr = MacAddr([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    /// Channel 6 in the 2.4 GHz band.
    pub const CHANNEL: Channel = Channel {
        band: Band::Band2Ghz,
        hw_value: 6,
        center_freq: 2437,
    };
    pub const SIGNAL: i32 = 1337;
    pub const CAPABILITY: CapabilityInfo = CapabilityInfo(CapabilityInfo::ESS);
    pub const BEACON_INTERVAL: u16 = 100;

    /// Returns the network name as an [`Ssid`].
    pub fn ssid() -> Ssid {
        Ssid::from_known(Self::SSID.as_bytes())
    }

    /// Returns `true` if `candidate` names this network.
    ///
    /// `candidate` is expected in connect form (already bounded); the known
    /// name is bounded the same way before the byte-for-byte comparison.
    pub fn matches(candidate: &Ssid) -> bool {
        Self::ssid().to_connect_form() == *candidate
    }

    /// Builds a fresh advertisement for this network.
    pub fn advertisement() -> BssAdvertisement {
        BssAdvertisement {
            channel: Self::CHANNEL,
            width: ChannelWidth::Mhz20,
            signal: Self::SIGNAL,
            frame_type: FrameType::Unknown,
            bssid: Self::BSSID,
            tsf: 0,
            capability: Self::CAPABILITY,
            beacon_interval: Self::BEACON_INTERVAL,
            ies: ie::encode_ssid(&Self::ssid()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
