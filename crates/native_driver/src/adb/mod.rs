//! ADB (Android Debug Bridge) module
//!
//! This module provides:
//! - `connection`: the `AdbTunnel` seam and the `adb`-binary backed `AdbConnection`

mod connection;

pub use connection::{list_devices, AdbConnection, AdbTunnel, ConnectionType, DeviceInfo};
