//! TOML-based configuration for the bridge daemon.
//!
//! Every field has a default, so a config file only needs to state what it
//! changes:
//!
//! ```toml
//! [network]
//! bind_address = "0.0.0.0"
//! port = 5001
//!
//! [device]
//! path = "/dev/hidg0"
//!
//! [screen]
//! width = 1920
//! height = 1080
//!
//! [runtime]
//! mode = "absolute"
//! ```
//!
//! `serde` fills absent fields from the `#[serde(default = "...")]`
//! helpers, and command-line flags override whatever the file supplies.

use std::path::{Path, PathBuf};

use mousewire_core::{ProtocolMode, ScreenBounds};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::session::DEFAULT_MAX_SENDERS;

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Listen socket settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// IP address to bind the UDP socket to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// UDP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// HID device settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Path of the HID mouse device file to write to.
    #[serde(default = "default_device_path")]
    pub path: PathBuf,
}

/// Screen geometry, consulted in absolute mode only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenConfig {
    /// Maximum addressable x coordinate.
    #[serde(default = "default_screen_width")]
    pub width: i32,
    /// Maximum addressable y coordinate.
    #[serde(default = "default_screen_height")]
    pub height: i32,
    /// Maximum magnitude of one device step. 1 for single-unit devices.
    #[serde(default = "default_max_step")]
    pub max_step: i32,
}

/// Session behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    /// Which wire variant the senders speak.
    #[serde(default = "default_mode")]
    pub mode: ProtocolMode,
    /// Cap on concurrently tracked senders.
    #[serde(default = "default_max_senders")]
    pub max_senders: usize,
    /// `tracing` log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5001
}
fn default_device_path() -> PathBuf {
    PathBuf::from("/dev/hidg0")
}
fn default_screen_width() -> i32 {
    1920
}
fn default_screen_height() -> i32 {
    1080
}
fn default_max_step() -> i32 {
    1
}
fn default_mode() -> ProtocolMode {
    ProtocolMode::Absolute
}
fn default_max_senders() -> usize {
    DEFAULT_MAX_SENDERS
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            device: DeviceConfig::default(),
            screen: ScreenConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: default_device_path(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
            max_step: default_max_step(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            max_senders: default_max_senders(),
            log_level: default_log_level(),
        }
    }
}

// ── Loading and validation ────────────────────────────────────────────────────

/// Loads a [`BridgeConfig`] from the given TOML file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read (the path was
/// given explicitly, so a missing file is an error, not a default) and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: BridgeConfig = toml::from_str(&content)?;
    Ok(config)
}

impl BridgeConfig {
    /// Checks field ranges that the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=i32::from(i8::MAX)).contains(&self.screen.max_step) {
            return Err(ConfigError::Invalid(format!(
                "screen.max_step must be between 1 and 127, got {}",
                self.screen.max_step
            )));
        }
        if self.runtime.max_senders == 0 {
            return Err(ConfigError::Invalid(
                "runtime.max_senders must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the screen bounds as the domain value type.
    pub fn screen_bounds(&self) -> ScreenBounds {
        ScreenBounds {
            max_x: self.screen.width,
            max_y: self.screen.height,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
