//! Errors raised while decoding frames and loading configuration

use thiserror::Error;

use crate::packet::LinkType;

/// Error type for switchyard-core
#[derive(Error, Debug)]
pub enum Error {
    /// No decoder is registered for the link type
    #[error("No decoder registered for link type {0}")]
    UnsupportedLinkType(LinkType),

    /// Frame is shorter than its first header
    #[error("Packet too small: expected at least {expected} bytes, got {actual}")]
    PacketTooSmall {
        /// Length of the first header
        expected: usize,
        /// Length of the frame
        actual: usize,
    },

    /// Configuration file could not be read
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was tried
        path: String,
        /// Underlying read failure
        #[source]
        source: std::io::Error,
    },

    /// A setting is out of range or contradicts another
    #[error("Invalid configuration value for '{key}': {message}")]
    ConfigValue {
        /// Dotted key of the setting
        key: String,
        /// What is wrong with it
        message: String,
    },

    /// Configuration file is not valid TOML for [`Config`](crate::Config)
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration could not be written as TOML
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result alias for switchyard-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Invalid setting
    pub fn config_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedLinkType(LinkType::Raw);
        assert!(err.to_string().contains("RAW"));

        let err = Error::config_value("capture.poll_interval_ms", "Must be positive");
        assert!(err.to_string().contains("capture.poll_interval_ms"));
        assert!(err.to_string().contains("Must be positive"));
    }

    #[test]
    fn test_config_not_found_keeps_source() {
        let err = Error::ConfigNotFound {
            path: "/nonexistent/switchyard.toml".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/nonexistent/switchyard.toml"));
        assert!(err.source().is_some());
    }
}
