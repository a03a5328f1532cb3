//! Configures and creates [`AndroidNativeDriver`] instances

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::adb::AdbTunnel;
use crate::config::{default_server_url, DEFAULT_LOCAL_PORT, DEFAULT_REMOTE_PORT, TIMING_CONFIG};
use crate::driver::{default_capabilities, AndroidNativeDriver, Capabilities};
use crate::error::{DriverError, Result};
use crate::executor::{CommandExecutor, HttpCommandExecutor};

/// Builder for [`AndroidNativeDriver`].
///
/// With an ADB connection, `build` first starts the server instrumentation
/// and forwards `local_port` to `remote_port` on the device. A failed session
/// start is retried exactly once after `retry_delay`.
pub struct AndroidNativeDriverBuilder {
    local_port: u16,
    remote_port: u16,
    command_executor: Option<Arc<dyn CommandExecutor>>,
    adb_connection: Option<Arc<dyn AdbTunnel>>,
    retry_delay: Duration,
    capabilities: Capabilities,
}

impl Default for AndroidNativeDriverBuilder {
    fn default() -> Self {
        Self {
            local_port: DEFAULT_LOCAL_PORT,
            remote_port: DEFAULT_REMOTE_PORT,
            command_executor: None,
            adb_connection: None,
            retry_delay: TIMING_CONFIG.session.retry_delay(),
            capabilities: default_capabilities(),
        }
    }
}

impl AndroidNativeDriverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adb_connection(mut self, adb_connection: impl AdbTunnel + 'static) -> Self {
        self.adb_connection = Some(Arc::new(adb_connection));
        self
    }

    /// Use the server at `http://localhost:54129/hub`
    pub fn with_default_server(self) -> Self {
        self.with_server(default_server_url())
    }

    /// Talk to the server at `url` over HTTP. The local forward port follows
    /// the URL's port; any previously set executor is replaced.
    pub fn with_server(mut self, url: Url) -> Self {
        if let Some(port) = url.port_or_known_default() {
            self.local_port = port;
        }
        self.command_executor = Some(Arc::new(HttpCommandExecutor::new(url)));
        self
    }

    /// Use a custom executor, replacing any executor derived from a URL
    pub fn with_command_executor(mut self, executor: impl CommandExecutor + 'static) -> Self {
        self.command_executor = Some(Arc::new(executor));
        self
    }

    pub fn with_local_port(mut self, port: u16) -> Self {
        self.local_port = port;
        self
    }

    pub fn with_remote_port(mut self, port: u16) -> Self {
        self.remote_port = port;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    pub fn remote_port(&self) -> u16 {
        self.remote_port
    }

    pub fn has_command_executor(&self) -> bool {
        self.command_executor.is_some()
    }

    pub async fn build(self) -> Result<AndroidNativeDriver> {
        let executor = self
            .command_executor
            .ok_or(DriverError::MissingConfiguration("command executor"))?;

        if let Some(adb) = &self.adb_connection {
            adb.instrument().await?;
            adb.forward(self.local_port, self.remote_port).await?;
            info!(
                "ADB tunnel ready: localhost:{} -> device:{}",
                self.local_port, self.remote_port
            );
        }

        match AndroidNativeDriver::start(
            executor.clone(),
            self.adb_connection.clone(),
            self.capabilities.clone(),
        )
        .await
        {
            Ok(driver) => Ok(driver),
            Err(e) => {
                warn!(
                    "Session start failed ({}), retrying in {:?}",
                    e, self.retry_delay
                );
                tokio::time::sleep(self.retry_delay).await;
                AndroidNativeDriver::start(executor, self.adb_connection, self.capabilities).await
            }
        }
    }
}
