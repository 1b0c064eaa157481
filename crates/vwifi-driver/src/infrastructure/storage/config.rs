//! TOML-based configuration for the simulated interface.
//!
//! ```toml
//! [interface]
//! wiphy_name = "dummy"
//! netdev_name = "dummy%d"
//! log_level = "info"
//!
//! [scan]
//! delay_ms = 100
//!
//! [executor]
//! queue_depth = 16
//!
//! [admission]
//! strict_connect = false
//! ```
//!
//! Every section and every field is optional; anything missing takes the
//! value shown above.  A missing file is the same as an empty one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::control_plane::{
    ControlPlaneSettings, DEFAULT_NETDEV_NAME, DEFAULT_QUEUE_DEPTH, DEFAULT_SCAN_DELAY_MS,
    DEFAULT_WIPHY_NAME,
};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "vwifi.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The config parsed but a value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriverConfig {
    #[serde(default)]
    pub interface: InterfaceConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub admission: AdmissionConfig,
}

/// Naming and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceConfig {
    /// Name of the simulated PHY.
    #[serde(default = "default_wiphy_name")]
    pub wiphy_name: String,
    /// Network device name template; `%d` is the unit number.
    #[serde(default = "default_netdev_name")]
    pub netdev_name: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    /// Simulated hardware scan latency in milliseconds.  Must be non-zero.
    #[serde(default = "default_scan_delay_ms")]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Capacity of the deferred task queue.  Must be at least 1.
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdmissionConfig {
    /// Reject a connect while another attempt is still outstanding.
    #[serde(default)]
    pub strict_connect: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_wiphy_name() -> String {
    DEFAULT_WIPHY_NAME.to_string()
}
fn default_netdev_name() -> String {
    DEFAULT_NETDEV_NAME.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_scan_delay_ms() -> u64 {
    DEFAULT_SCAN_DELAY_MS
}
fn default_queue_depth() -> usize {
    DEFAULT_QUEUE_DEPTH
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            wiphy_name: default_wiphy_name(),
            netdev_name: default_netdev_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_scan_delay_ms(),
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            queue_depth: default_queue_depth(),
        }
    }
}

impl DriverConfig {
    /// Checks value ranges that the TOML schema cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero scan delay, a zero queue
    /// depth, or an empty interface name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "scan.delay_ms must be greater than zero".to_string(),
            ));
        }
        if self.executor.queue_depth == 0 {
            return Err(ConfigError::Invalid(
                "executor.queue_depth must be at least 1".to_string(),
            ));
        }
        if self.interface.wiphy_name.is_empty() || self.interface.netdev_name.is_empty() {
            return Err(ConfigError::Invalid(
                "interface names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Converts to the runtime settings of the control plane.
    pub fn to_settings(&self) -> ControlPlaneSettings {
        ControlPlaneSettings {
            wiphy_name: self.interface.wiphy_name.clone(),
            netdev_name: self.interface.netdev_name.clone(),
            scan_delay: Duration::from_millis(self.scan.delay_ms),
            queue_depth: self.executor.queue_depth,
            strict_connect: self.admission.strict_connect,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Loads and validates `DriverConfig` from `path`, returning
/// `DriverConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed, and
/// [`ConfigError::Invalid`] if a value is out of range.
pub fn load_config(path: &Path) -> Result<DriverConfig, ConfigError> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str::<DriverConfig>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => DriverConfig::default(),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &DriverConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
