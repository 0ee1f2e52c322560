//! Platform errors
//!
//! The receive and send paths of [`LiveNet`](crate::LiveNet) report distinct
//! variants so callers can tell "stopping" from "nothing yet" from misuse.

use thiserror::Error;

/// Platform errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Interface could not be bound for capture
    #[error("Failed to open device {device}: {reason}")]
    DeviceOpen {
        /// Interface name
        device: String,
        /// Why the open failed
        reason: String,
    },

    /// The engine is stopping; no more packets will arrive
    #[error("Capture engine is shut down")]
    Shutdown,

    /// Receive timed out while the engine is still running
    #[error("No packets received before timeout")]
    NoPackets,

    /// No open device matches the reference
    #[error("Unrecognized device: {0}")]
    UnknownDevice(String),

    /// Packet cannot be sent
    #[error("Invalid packet: {0}")]
    InvalidPacket(String),

    /// Transmission failed
    #[error("Send on {device} failed: {reason}")]
    Send {
        /// Interface name
        device: String,
        /// Error reported by the device
        reason: String,
    },

    /// Receive failed
    #[error("Capture on {device} failed: {reason}")]
    Capture {
        /// Interface name
        device: String,
        /// Error reported by the device
        reason: String,
    },

    /// Device was used after close
    #[error("Device {0} is closed")]
    DeviceClosed(String),

    /// Device selection matched nothing
    #[error("No capture devices selected")]
    NoDevices,

    /// Signal handler could not be installed
    #[error("Failed to install signal handler: {0}")]
    SignalHandler(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the core crate
    #[error(transparent)]
    Core(#[from] switchyard_core::Error),
}

impl PlatformError {
    /// Whether a receive loop should keep calling after this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlatformError::NoPackets)
    }
}

/// Platform result type
pub type Result<T> = std::result::Result<T, PlatformError>;
