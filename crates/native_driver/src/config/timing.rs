//! Timing configuration for session setup, HTTP commands and ADB calls

use lazy_static::lazy_static;
use std::env;
use std::time::Duration;

/// Parse a seconds value; anything negative, NaN or infinite falls back to `default`.
fn parse_secs(raw: Option<String>, default: f64) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(default)
}

fn to_duration(secs: f64, default: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or_else(|_| Duration::from_secs_f64(default))
}

/// Timing for driver session establishment and remote commands
#[derive(Debug, Clone)]
pub struct SessionTimingConfig {
    /// Wait before the single retry of a failed session start (seconds)
    pub retry_delay: f64,
    /// Per-request timeout for HTTP commands (seconds)
    pub request_timeout: f64,
}

impl Default for SessionTimingConfig {
    fn default() -> Self {
        Self {
            retry_delay: parse_secs(env::var("NATIVE_DRIVER_RETRY_DELAY").ok(), 3.0),
            request_timeout: parse_secs(env::var("NATIVE_DRIVER_REQUEST_TIMEOUT").ok(), 30.0),
        }
    }
}

impl SessionTimingConfig {
    pub fn retry_delay(&self) -> Duration {
        to_duration(self.retry_delay, 3.0)
    }

    pub fn request_timeout(&self) -> Duration {
        to_duration(self.request_timeout, 30.0)
    }
}

/// Timing for ADB invocations
#[derive(Debug, Clone)]
pub struct ConnectionTimingConfig {
    pub adb_command_timeout: f64,
    pub list_devices_timeout: f64,
}

impl Default for ConnectionTimingConfig {
    fn default() -> Self {
        Self {
            adb_command_timeout: parse_secs(env::var("NATIVE_DRIVER_ADB_TIMEOUT").ok(), 10.0),
            list_devices_timeout: parse_secs(env::var("NATIVE_DRIVER_LIST_DEVICES_TIMEOUT").ok(), 5.0),
        }
    }
}

impl ConnectionTimingConfig {
    pub fn adb_command_timeout(&self) -> Duration {
        to_duration(self.adb_command_timeout, 10.0)
    }

    pub fn list_devices_timeout(&self) -> Duration {
        to_duration(self.list_devices_timeout, 5.0)
    }
}

/// Master timing configuration
#[derive(Debug, Clone, Default)]
pub struct TimingConfig {
    pub session: SessionTimingConfig,
    pub connection: ConnectionTimingConfig,
}

lazy_static! {
    /// Global timing configuration instance
    pub static ref TIMING_CONFIG: TimingConfig = TimingConfig::default();
}
