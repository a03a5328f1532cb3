//! ADB connection used to start the in-app server and tunnel its port

use crate::config::{SERVER_INSTRUMENTATION, TIMING_CONFIG};
use crate::error::{AdbError, AdbResult};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Operations the driver builder needs from an ADB link
#[async_trait]
pub trait AdbTunnel: Send + Sync {
    /// Start the instrumentation that hosts the NativeDriver server
    async fn instrument(&self) -> AdbResult<()>;

    /// Forward a host TCP port to a device TCP port
    async fn forward(&self, local_port: u16, remote_port: u16) -> AdbResult<()>;
}

/// Type of ADB connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    Usb,
    Remote,
}

/// Information about a connected device
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub device_id: String,
    pub status: String,
    pub connection_type: ConnectionType,
    pub model: Option<String>,
}

/// Manages the `adb` invocations for one device
#[derive(Debug, Clone)]
pub struct AdbConnection {
    adb_path: String,
    device_id: Option<String>,
    target_package: Option<String>,
}

impl AdbConnection {
    /// Create a new ADB connection targeting the only attached device
    pub fn new() -> Self {
        Self {
            adb_path: "adb".to_string(),
            device_id: None,
            target_package: None,
        }
    }

    /// Use a custom ADB binary
    pub fn with_path(mut self, adb_path: impl Into<String>) -> Self {
        self.adb_path = adb_path.into();
        self
    }

    /// Address a specific device serial
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Package of the app under test, which declares the server instrumentation
    pub fn with_target_package(mut self, package: impl Into<String>) -> Self {
        self.target_package = Some(package.into());
        self
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Component passed to `am instrument`
    pub fn instrumentation_component(&self) -> Option<String> {
        self.target_package
            .as_ref()
            .map(|package| format!("{}/{}", package, SERVER_INSTRUMENTATION))
    }

    fn prefix_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(id) = &self.device_id {
            args.push("-s".to_string());
            args.push(id.clone());
        }
        args
    }

    fn instrument_args(&self) -> AdbResult<Vec<String>> {
        let component = self.instrumentation_component().ok_or_else(|| {
            AdbError::NotConfigured("target package for instrumentation".to_string())
        })?;
        let mut args = self.prefix_args();
        args.extend(["shell", "am", "instrument"].map(String::from));
        args.push(component);
        Ok(args)
    }

    fn forward_args(&self, local_port: u16, remote_port: u16) -> Vec<String> {
        let mut args = self.prefix_args();
        args.push("forward".to_string());
        args.push(format!("tcp:{}", local_port));
        args.push(format!("tcp:{}", remote_port));
        args
    }

    async fn run(&self, args: &[String], timeout: Duration) -> AdbResult<String> {
        debug!("Running {} {}", self.adb_path, args.join(" "));

        // A timed-out adb child is killed when the dropped future releases it.
        let output = tokio::time::timeout(
            timeout,
            Command::new(&self.adb_path)
                .args(args)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| {
            AdbError::Timeout(format!(
                "adb {} timed out after {}s",
                args.join(" "),
                timeout.as_secs_f64()
            ))
        })?
        .map_err(AdbError::Io)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = format!("{}{}", stdout, stderr);

        check_output(&combined, output.status.success())
    }

    /// Remove a previously established forward
    pub async fn remove_forward(&self, local_port: u16) -> AdbResult<()> {
        let mut args = self.prefix_args();
        args.push("forward".to_string());
        args.push("--remove".to_string());
        args.push(format!("tcp:{}", local_port));

        self.run(&args, TIMING_CONFIG.connection.adb_command_timeout())
            .await?;
        Ok(())
    }

    /// List all connected devices
    pub async fn list_devices(&self) -> AdbResult<Vec<DeviceInfo>> {
        let args = vec!["devices".to_string(), "-l".to_string()];
        let stdout = self
            .run(&args, TIMING_CONFIG.connection.list_devices_timeout())
            .await?;
        Ok(parse_devices(&stdout))
    }

    /// Check if the configured device (or any device) is online
    pub async fn is_connected(&self) -> AdbResult<bool> {
        let devices = self.list_devices().await?;

        Ok(match &self.device_id {
            Some(id) => devices
                .iter()
                .any(|d| &d.device_id == id && d.status == "device"),
            None => devices.iter().any(|d| d.status == "device"),
        })
    }
}

impl Default for AdbConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdbTunnel for AdbConnection {
    async fn instrument(&self) -> AdbResult<()> {
        let args = self.instrument_args()?;
        self.run(&args, TIMING_CONFIG.connection.adb_command_timeout())
            .await?;
        info!(
            "Instrumentation started on {}",
            self.device_id.as_deref().unwrap_or("default device")
        );
        Ok(())
    }

    async fn forward(&self, local_port: u16, remote_port: u16) -> AdbResult<()> {
        let args = self.forward_args(local_port, remote_port);
        self.run(&args, TIMING_CONFIG.connection.adb_command_timeout())
            .await?;
        info!("Forwarding tcp:{} -> device tcp:{}", local_port, remote_port);
        Ok(())
    }
}

/// `am instrument` reports failures on stdout with a zero exit status.
fn check_output(combined: &str, success: bool) -> AdbResult<String> {
    let failed = !success
        || combined.contains("INSTRUMENTATION_FAILED")
        || combined
            .lines()
            .any(|line| line.trim_start().to_lowercase().starts_with("error:"));

    if failed {
        if combined.contains("device") && combined.contains("not found") {
            return Err(AdbError::DeviceNotFound(combined.trim().to_string()));
        }
        return Err(AdbError::CommandFailed(combined.trim().to_string()));
    }
    Ok(combined.to_string())
}

fn parse_devices(stdout: &str) -> Vec<DeviceInfo> {
    let mut devices = Vec::new();

    // Skip header line
    for line in stdout.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('*') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        let device_id = parts[0].to_string();
        let connection_type = if device_id.contains(':') {
            ConnectionType::Remote
        } else {
            ConnectionType::Usb
        };

        let model = parts[2..]
            .iter()
            .find_map(|part| part.strip_prefix("model:"))
            .map(|s| s.to_string());

        devices.push(DeviceInfo {
            device_id,
            status: parts[1].to_string(),
            connection_type,
            model,
        });
    }

    devices
}

/// Quick helper to list connected devices
pub async fn list_devices() -> AdbResult<Vec<DeviceInfo>> {
    AdbConnection::new().list_devices().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_args_with_device() {
        let conn = AdbConnection::new().with_device_id("emulator-5554");
        assert_eq!(
            conn.forward_args(54129, 8080),
            vec!["-s", "emulator-5554", "forward", "tcp:54129", "tcp:8080"]
        );
    }

    #[test]
    fn test_instrument_args() {
        let conn = AdbConnection::new().with_target_package("com.example.app");
        let args = conn.instrument_args().unwrap();
        assert_eq!(
            args,
            vec![
                "shell",
                "am",
                "instrument",
                "com.example.app/com.google.android.testing.nativedriver.server.ServerInstrumentation",
            ]
        );
    }

    #[test]
    fn test_instrument_requires_target_package() {
        let conn = AdbConnection::new();
        assert!(matches!(
            conn.instrument_args(),
            Err(AdbError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_check_output() {
        assert!(check_output("", true).is_ok());
        assert!(matches!(
            check_output("INSTRUMENTATION_FAILED: com.example/.Runner", true),
            Err(AdbError::CommandFailed(_))
        ));
        assert!(matches!(
            check_output("error: device 'abc' not found", false),
            Err(AdbError::DeviceNotFound(_))
        ));
        assert!(matches!(
            check_output("error: cannot bind listener", false),
            Err(AdbError::CommandFailed(_))
        ));
    }

    #[test]
    fn test_parse_devices() {
        let stdout = "List of devices attached\n\
            * daemon started successfully\n\
            emulator-5554          device product:sdk model:Android_SDK transport_id:1\n\
            192.168.1.20:5555      offline\n\n";
        let devices = parse_devices(stdout);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].device_id, "emulator-5554");
        assert_eq!(devices[0].connection_type, ConnectionType::Usb);
        assert_eq!(devices[0].model.as_deref(), Some("Android_SDK"));
        assert_eq!(devices[1].connection_type, ConnectionType::Remote);
        assert_eq!(devices[1].status, "offline");
    }
}
