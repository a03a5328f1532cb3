//! Recording fakes for the executor and ADB seams

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::adb::AdbTunnel;
use crate::command::{Command, Response};
use crate::error::{AdbError, AdbResult, Result};
use crate::executor::CommandExecutor;

/// Ordered log of calls shared between fakes
#[derive(Debug, Clone, Default)]
pub(crate) struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

type Handler = dyn Fn(&Command) -> Result<Response> + Send + Sync;

#[derive(Clone)]
pub(crate) struct FakeExecutor {
    log: EventLog,
    commands: Arc<Mutex<Vec<Command>>>,
    handler: Arc<Handler>,
}

impl FakeExecutor {
    pub fn new(
        log: EventLog,
        handler: impl Fn(&Command) -> Result<Response> + Send + Sync + 'static,
    ) -> Self {
        Self {
            log,
            commands: Arc::new(Mutex::new(Vec::new())),
            handler: Arc::new(handler),
        }
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for FakeExecutor {
    async fn execute(&self, command: Command) -> Result<Response> {
        self.log.push(command.name.clone());
        self.commands.lock().unwrap().push(command.clone());
        (self.handler)(&command)
    }
}

#[derive(Default)]
pub(crate) struct FakeAdb {
    log: EventLog,
    fail_instrument: bool,
    fail_forward: bool,
}

impl FakeAdb {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn failing_instrument(log: EventLog) -> Self {
        Self {
            log,
            fail_instrument: true,
            ..Default::default()
        }
    }

    pub fn failing_forward(log: EventLog) -> Self {
        Self {
            log,
            fail_forward: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl AdbTunnel for FakeAdb {
    async fn instrument(&self) -> AdbResult<()> {
        self.log.push("instrument");
        if self.fail_instrument {
            return Err(AdbError::CommandFailed(
                "INSTRUMENTATION_FAILED: com.example.app".to_string(),
            ));
        }
        Ok(())
    }

    async fn forward(&self, local_port: u16, remote_port: u16) -> AdbResult<()> {
        self.log
            .push(format!("forward {}->{}", local_port, remote_port));
        if self.fail_forward {
            return Err(AdbError::CommandFailed(
                "error: cannot bind listener".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn session_response(session_id: &str) -> Response {
    Response {
        session_id: Some(session_id.to_string()),
        status: 0,
        value: Value::Object(Default::default()),
    }
}
