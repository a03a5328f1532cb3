//! native_driver: WebDriver client for native Android applications
//!
//! This library provides:
//! - ADB utilities to start the in-app NativeDriver server and forward its port
//! - A driver builder that sets up the tunnel and opens a remote session
//! - Element proxies that can find views by text and replace their text
//! - An HTTP command executor speaking the JSON wire protocol
//!
//! # Example
//!
//! ```no_run
//! use native_driver::{AdbConnection, AndroidNativeDriverBuilder, FindsByText, HasSetText};
//!
//! #[tokio::main]
//! async fn main() -> native_driver::Result<()> {
//!     let adb = AdbConnection::new().with_target_package("com.example.app");
//!     let driver = AndroidNativeDriverBuilder::new()
//!         .with_adb_connection(adb)
//!         .with_default_server()
//!         .build()
//!         .await?;
//!
//!     let field = driver.find_element_by_partial_text("Search").await?;
//!     field.set_text("hello").await?;
//!     driver.quit().await
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Device backend
pub mod adb;

// Remote protocol
pub mod by;
pub mod command;
pub mod executor;

// Driver and elements
pub mod builder;
pub mod driver;
pub mod element;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use error::{AdbError, AdbResult, DriverError, Result};

pub use config::{
    default_server_url, ConnectionTimingConfig, SessionTimingConfig, TimingConfig,
    DEFAULT_LOCAL_PORT, DEFAULT_REMOTE_PORT, DEFAULT_SERVER_PORT, DEFAULT_SERVER_URL,
    TIMING_CONFIG,
};

pub use adb::{list_devices, AdbConnection, AdbTunnel, ConnectionType, DeviceInfo};

pub use by::By;
pub use command::{Command, Response};
pub use executor::{CommandExecutor, HttpCommandExecutor};

pub use builder::AndroidNativeDriverBuilder;
pub use driver::{default_capabilities, AndroidNativeDriver, Capabilities};
pub use element::{AndroidNativeElement, HasSetText};
pub use search::{FindsByText, SearchContext};
