//! Configuration module for native_driver
//!
//! This module contains:
//! - `defaults`: Server URL and port defaults
//! - `timing`: Timing configurations for session setup and ADB calls

mod defaults;
mod timing;

pub use defaults::{
    default_server_url, DEFAULT_LOCAL_PORT, DEFAULT_REMOTE_PORT, DEFAULT_SERVER_PORT,
    DEFAULT_SERVER_URL, SERVER_INSTRUMENTATION,
};
pub use timing::{ConnectionTimingConfig, SessionTimingConfig, TimingConfig, TIMING_CONFIG};
