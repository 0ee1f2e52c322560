//! Switchyard Platform Layer
//!
//! Live capture devices, interface discovery and the capture-aggregation
//! engine.
//!
//! ## Devices
//!
//! - **pnet datalink**: `AF_PACKET` on Linux, BPF on the BSDs and macOS
//! - **Mock**: in-memory device for tests and simulations
//!
//! ## Example
//!
//! ```rust,ignore
//! use switchyard_core::Config;
//! use switchyard_platform::{LiveNet, PlatformError};
//! use std::time::Duration;
//!
//! let net = LiveNet::open(&Config::default())?;
//! net.shutdown_handle().install_signal_handler()?;
//! loop {
//!     match net.recv_packet(Some(Duration::from_secs(1))) {
//!         Ok(received) => net.send_packet(received.ingress.as_str(), &received.packet)?,
//!         Err(PlatformError::NoPackets) => continue,
//!         Err(PlatformError::Shutdown) => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! net.shutdown();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
pub use error::{PlatformError, Result};

// Platform-agnostic device interface
mod traits;
pub use traits::{unix_timestamp, CaptureDevice, CaptureRecord, DeviceStats};

pub mod datalink;
pub use datalink::PnetDevice;

pub mod discovery;
pub mod mock;
pub use mock::MockDevice;

pub mod net;
pub use net::{LiveNet, ReceivedPacket, ShutdownHandle};
