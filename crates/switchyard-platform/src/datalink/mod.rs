//! Live capture on pnet datalink channels
//!
//! Works on every platform pnet supports: `AF_PACKET` sockets on Linux and
//! BPF devices on the BSDs and macOS.

mod device;

pub use device::PnetDevice;
