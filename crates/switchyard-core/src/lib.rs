//! # Switchyard Core
//!
//! Platform-independent building blocks for the switchyard capture engine.
//!
//! ## Architecture
//!
//! This crate provides:
//! - **Link types and decoding** - The fixed table mapping a link-layer
//!   encapsulation to a decoder, plus the matching `encode` entry point
//! - **Packet model** - An owned, decoded frame with header views
//! - **Interface metadata** - Names, addresses and indices of capture devices
//! - **Configuration** - TOML configuration for capture and device selection
//!
//! ## Example
//!
//! ```rust
//! use switchyard_core::packet::{self, LinkType};
//!
//! let frame = [0u8; 60];
//! let packet = packet::decode(&frame, LinkType::Ethernet)?;
//! assert_eq!(packet::encode(&packet).len(), 60);
//! # Ok::<(), switchyard_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod interface;
pub mod packet;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use interface::{DeviceRef, Interface, InterfaceType};
pub use packet::{FirstHeader, LinkType, Packet};
