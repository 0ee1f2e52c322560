//! Configuration for the capture engine
//!
//! Loaded from TOML. Every section falls back to its defaults, so an empty
//! file is a valid configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Poll interval bounds in milliseconds
const MIN_POLL_INTERVAL_MS: u64 = 1;
const MAX_POLL_INTERVAL_MS: u64 = 5000;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of this node; the host name when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Capture device settings
    pub capture: CaptureConfig,

    /// Which interfaces to open
    pub devices: DeviceSelection,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading configuration");
        let content =
            std::fs::read_to_string(path).map_err(|source| Error::ConfigNotFound {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::from)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let poll = self.capture.poll_interval_ms;
        if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&poll) {
            return Err(Error::config_value(
                "capture.poll_interval_ms",
                format!(
                    "Must be between {MIN_POLL_INTERVAL_MS} and {MAX_POLL_INTERVAL_MS}, got {poll}"
                ),
            ));
        }
        if self.capture.read_buffer_size == 0 {
            return Err(Error::config_value("capture.read_buffer_size", "Must be non-zero"));
        }
        if self.capture.write_buffer_size == 0 {
            return Err(Error::config_value("capture.write_buffer_size", "Must be non-zero"));
        }

        if let Some(name) = self
            .devices
            .include
            .iter()
            .find(|name| self.devices.exclude.contains(name))
        {
            return Err(Error::config_value(
                "devices",
                format!("'{name}' is both included and excluded"),
            ));
        }

        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(Error::config_value("name", "Must not be empty"));
        }

        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(Error::from)
    }
}

/// Capture device settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// How long a capture worker waits on its device before re-checking shutdown
    pub poll_interval_ms: u64,
    /// Put interfaces into promiscuous mode
    pub promiscuous: bool,
    /// Receive buffer size in bytes
    pub read_buffer_size: usize,
    /// Transmit buffer size in bytes
    pub write_buffer_size: usize,
}

impl CaptureConfig {
    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            promiscuous: true,
            read_buffer_size: 65536,
            write_buffer_size: 65536,
        }
    }
}

/// Interface selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSelection {
    /// Interfaces to open; empty means every interface that is up
    pub include: Vec<String>,
    /// Interfaces to leave alone
    pub exclude: Vec<String>,
    /// Open loopback interfaces when no explicit list is given
    pub include_loopback: bool,
}

impl DeviceSelection {
    /// Whether an interface passes the exclude list
    pub fn allows(&self, name: &str) -> bool {
        !self.exclude.iter().any(|excluded| excluded == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.name, None);
        assert_eq!(config.capture.poll_interval_ms, 200);
        assert_eq!(config.capture.poll_interval(), Duration::from_millis(200));
        assert!(config.capture.promiscuous);
        assert!(config.devices.include.is_empty());
        assert!(!config.devices.include_loopback);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_poll_interval() {
        let mut config = Config::default();
        config.capture.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        config.capture.poll_interval_ms = 5001;
        assert!(config.validate().is_err());

        config.capture.poll_interval_ms = 5000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_buffers() {
        let mut config = Config::default();
        config.capture.read_buffer_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.capture.write_buffer_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_include_exclude_overlap() {
        let mut config = Config::default();
        config.devices.include = vec!["eth0".into(), "eth1".into()];
        config.devices.exclude = vec!["eth1".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("eth1"));
    }

    #[test]
    fn test_validation_blank_name() {
        let mut config = Config::default();
        config.name = Some("  ".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.name = Some("router1".into());
        config.devices.include = vec!["eth0".into()];
        let toml = config.to_toml().unwrap();
        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_toml_parse_minimal() {
        let toml_content = r#"
name = "edge"

[capture]
poll_interval_ms = 50

[devices]
include = ["eth0", "eth1"]
"#;
        let config = Config::from_toml(toml_content).unwrap();
        assert_eq!(config.name.as_deref(), Some("edge"));
        assert_eq!(config.capture.poll_interval_ms, 50);
        assert_eq!(config.capture.read_buffer_size, 65536);
        assert_eq!(config.devices.include, vec!["eth0", "eth1"]);
    }

    #[test]
    fn test_toml_parse_invalid() {
        assert!(Config::from_toml("this is not [valid toml").is_err());
    }

    #[test]
    fn test_selection_allows() {
        let selection = DeviceSelection {
            exclude: vec!["lo".into()],
            ..Default::default()
        };
        assert!(selection.allows("eth0"));
        assert!(!selection.allows("lo"));
    }
}
