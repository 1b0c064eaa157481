//! PHY capability tables.
//!
//! These are the fixed facts the interface advertises when it registers with
//! the host: which interface modes it supports, which band and channel it can
//! tune to, which bitrates it offers, and how many SSIDs one scan request may
//! carry.  None of them influence the control-plane state machine.

use serde::{Deserialize, Serialize};

use crate::domain::bss::{Band, Channel, SyntheticAccessPoint};

/// Interface operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceMode {
    /// Client of an access point.
    Station,
}

/// A supported legacy bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bitrate {
    /// Rate in units of 100 kbps (so 55 means 5.5 Mbps).
    pub rate_100kbps: u16,
    /// Driver-specific rate index.
    pub hw_value: u16,
}

impl Bitrate {
    /// Returns the rate in Mbps.
    pub fn mbps(&self) -> f32 {
        f32::from(self.rate_100kbps) / 10.0
    }
}

/// High-throughput (802.11n) capabilities of a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtCapabilities {
    pub ht_supported: bool,
    /// Raw HT capability bits.
    pub cap: u16,
}

impl HtCapabilities {
    /// Short guard interval on 20 MHz channels.
    pub const SGI_20: u16 = 1 << 5;
}

/// One supported band with its channels and bitrates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedBand {
    pub band: Band,
    pub channels: Vec<Channel>,
    pub bitrates: Vec<Bitrate>,
    pub ht: HtCapabilities,
}

/// Everything the interface advertises about its PHY.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WiphyCapabilities {
    pub interface_modes: Vec<InterfaceMode>,
    pub bands: Vec<SupportedBand>,
    pub max_scan_ssids: u8,
}

impl WiphyCapabilities {
    /// The capability table of the simulated PHY.
    pub fn dummy() -> Self {
        const RATES: [(u16, u16); 4] = [(10, 0x1), (20, 0x2), (55, 0x4), (110, 0x8)];

        Self {
            interface_modes: vec![InterfaceMode::Station],
            bands: vec![SupportedBand {
                band: Band::Band2Ghz,
                channels: vec![SyntheticAccessPoint::CHANNEL],
                bitrates: RATES
                    .iter()
                    .map(|&(rate_100kbps, hw_value)| Bitrate {
                        rate_100kbps,
                        hw_value,
                    })
                    .collect(),
                ht: HtCapabilities {
                    ht_supported: false,
                    cap: HtCapabilities::SGI_20,
                },
            }],
            max_scan_ssids: 69,
        }
    }

    /// Returns `true` if `mode` is supported.
    pub fn supports_mode(&self, mode: InterfaceMode) -> bool {
        self.interface_modes.contains(&mode)
    }

    /// Looks up the band descriptor for `band`.
    pub fn band(&self, band: Band) -> Option<&SupportedBand> {
        self.bands.iter().find(|b| b.band == band)
    }
}
