//! Driver handle bound to one remote NativeDriver session

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::adb::AdbTunnel;
use crate::by::By;
use crate::command::{
    params, Command, FIND_ELEMENT, FIND_ELEMENTS, GET, GET_CURRENT_URL, GET_PAGE_SOURCE,
    NEW_SESSION, QUIT,
};
use crate::element::AndroidNativeElement;
use crate::error::{DriverError, Result};
use crate::executor::CommandExecutor;
use crate::search::{FindsByText, SearchContext};

/// Desired capabilities sent with the new-session command
pub type Capabilities = Map<String, Value>;

pub fn default_capabilities() -> Capabilities {
    params([
        ("browserName", json!("android native")),
        ("platform", json!("ANDROID")),
    ])
}

struct DriverInner {
    executor: Arc<dyn CommandExecutor>,
    adb: Option<Arc<dyn AdbTunnel>>,
    session_id: String,
}

/// Handle to a running session. Clones share the same executor and session.
#[derive(Clone)]
pub struct AndroidNativeDriver {
    inner: Arc<DriverInner>,
}

impl AndroidNativeDriver {
    /// Open a session through `executor`
    pub async fn start(
        executor: Arc<dyn CommandExecutor>,
        adb: Option<Arc<dyn AdbTunnel>>,
        capabilities: Capabilities,
    ) -> Result<Self> {
        let command = Command::new(
            NEW_SESSION,
            params([("desiredCapabilities", Value::Object(capabilities))]),
        );
        let response = executor.execute(command).await?;
        let header_session = response.session_id.clone();
        let value = response.into_value()?;

        let session_id = header_session
            .or_else(|| {
                value
                    .get("sessionId")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .ok_or_else(|| {
                DriverError::UnexpectedResponse("newSession returned no session id".to_string())
            })?;

        info!("Started NativeDriver session {}", session_id);

        Ok(Self {
            inner: Arc::new(DriverInner {
                executor,
                adb,
                session_id,
            }),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// ADB link used to set up this driver, if any
    pub fn adb(&self) -> Option<&Arc<dyn AdbTunnel>> {
        self.inner.adb.as_ref()
    }

    /// Execute a named command in this session and return its value
    pub async fn execute(&self, name: &str, parameters: Map<String, Value>) -> Result<Value> {
        debug!("Executing {} in session {}", name, self.inner.session_id);
        let command = Command::new(name, parameters).with_session(self.inner.session_id.as_str());
        self.inner.executor.execute(command).await?.into_value()
    }

    /// Navigate to `url`; `and-activity://` URLs start activities
    pub async fn get(&self, url: &str) -> Result<()> {
        self.execute(GET, params([("url", json!(url))])).await?;
        Ok(())
    }

    /// Start an activity of the app under test by class name
    pub async fn start_activity(&self, activity_class: &str) -> Result<()> {
        self.get(&format!("and-activity://{}", activity_class)).await
    }

    pub async fn current_url(&self) -> Result<String> {
        let value = self.execute(GET_CURRENT_URL, Map::new()).await?;
        string_value(GET_CURRENT_URL, value)
    }

    pub async fn page_source(&self) -> Result<String> {
        let value = self.execute(GET_PAGE_SOURCE, Map::new()).await?;
        string_value(GET_PAGE_SOURCE, value)
    }

    /// End the remote session
    pub async fn quit(&self) -> Result<()> {
        self.execute(QUIT, Map::new()).await?;
        info!("Quit NativeDriver session {}", self.inner.session_id);
        Ok(())
    }
}

impl fmt::Debug for AndroidNativeDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndroidNativeDriver")
            .field("session_id", &self.inner.session_id)
            .field("adb", &self.inner.adb.is_some())
            .finish()
    }
}

#[async_trait]
impl SearchContext for AndroidNativeDriver {
    async fn find_element(&self, by: By) -> Result<AndroidNativeElement> {
        let value = self
            .execute(
                FIND_ELEMENT,
                params([("using", json!(by.using())), ("value", json!(by.value()))]),
            )
            .await?;
        AndroidNativeElement::from_value(self, &value)
    }

    async fn find_elements(&self, by: By) -> Result<Vec<AndroidNativeElement>> {
        let value = self
            .execute(
                FIND_ELEMENTS,
                params([("using", json!(by.using())), ("value", json!(by.value()))]),
            )
            .await?;
        AndroidNativeElement::list_from_value(self, value)
    }
}

impl FindsByText for AndroidNativeDriver {}

pub(crate) fn string_value(command: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Err(DriverError::UnexpectedResponse(format!(
            "{} returned {} instead of a string",
            command, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Response;
    use crate::testing::{session_response, EventLog, FakeExecutor};

    #[tokio::test]
    async fn test_start_records_session_id() {
        let executor = FakeExecutor::new(EventLog::default(), |_| Ok(session_response("s-42")));
        let driver = AndroidNativeDriver::start(Arc::new(executor.clone()), None, default_capabilities())
            .await
            .unwrap();

        assert_eq!(driver.session_id(), "s-42");
        assert!(driver.adb().is_none());

        let commands = executor.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].name, NEW_SESSION);
        assert_eq!(
            commands[0].parameters["desiredCapabilities"]["browserName"],
            "android native"
        );
    }

    #[tokio::test]
    async fn test_start_accepts_session_id_in_value() {
        let executor = FakeExecutor::new(EventLog::default(), |_| {
            Ok(Response::success(json!({"sessionId": "w3c", "capabilities": {}})))
        });
        let driver = AndroidNativeDriver::start(Arc::new(executor), None, Capabilities::new())
            .await
            .unwrap();
        assert_eq!(driver.session_id(), "w3c");
    }

    #[tokio::test]
    async fn test_start_without_session_id_fails() {
        let executor =
            FakeExecutor::new(EventLog::default(), |_| Ok(Response::success(Value::Null)));
        let result = AndroidNativeDriver::start(Arc::new(executor), None, Capabilities::new()).await;
        assert!(matches!(result, Err(DriverError::UnexpectedResponse(_))));
    }

    #[tokio::test]
    async fn test_start_activity_navigates() {
        let executor = FakeExecutor::new(EventLog::default(), |cmd| match cmd.name.as_str() {
            NEW_SESSION => Ok(session_response("s1")),
            _ => Ok(Response::success(Value::Null)),
        });
        let driver = AndroidNativeDriver::start(Arc::new(executor.clone()), None, Capabilities::new())
            .await
            .unwrap();

        driver
            .start_activity("com.example.app.MainActivity")
            .await
            .unwrap();

        let commands = executor.commands();
        assert_eq!(commands[1].name, GET);
        assert_eq!(commands[1].session_id.as_deref(), Some("s1"));
        assert_eq!(
            commands[1].parameters["url"],
            "and-activity://com.example.app.MainActivity"
        );
    }

    #[tokio::test]
    async fn test_find_elements_by_text_preserves_order() {
        let executor = FakeExecutor::new(EventLog::default(), |cmd| match cmd.name.as_str() {
            NEW_SESSION => Ok(session_response("s1")),
            FIND_ELEMENTS => Ok(Response::success(json!([
                {"ELEMENT": "3"},
                {"ELEMENT": "1"},
                {"ELEMENT": "2"}
            ]))),
            other => panic!("unexpected command {}", other),
        });
        let driver = AndroidNativeDriver::start(Arc::new(executor.clone()), None, Capabilities::new())
            .await
            .unwrap();

        let found = driver.find_elements_by_text("Item").await.unwrap();
        let ids: Vec<&str> = found.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);

        let commands = executor.commands();
        assert_eq!(commands[1].parameters["using"], "text");
        assert_eq!(commands[1].parameters["value"], "Item");
    }

    #[tokio::test]
    async fn test_find_element_by_partial_text_missing() {
        let executor = FakeExecutor::new(EventLog::default(), |cmd| match cmd.name.as_str() {
            NEW_SESSION => Ok(session_response("s1")),
            _ => Ok(Response {
                status: 7,
                value: json!({"message": "nothing matches"}),
                ..Default::default()
            }),
        });
        let driver = AndroidNativeDriver::start(Arc::new(executor.clone()), None, Capabilities::new())
            .await
            .unwrap();

        let result = driver.find_element_by_partial_text("Sig").await;
        assert!(matches!(result, Err(DriverError::NoSuchElement(_))));
        assert_eq!(executor.commands()[1].parameters["using"], "partial text");
    }

    #[tokio::test]
    async fn test_page_source_and_quit() {
        let executor = FakeExecutor::new(EventLog::default(), |cmd| match cmd.name.as_str() {
            NEW_SESSION => Ok(session_response("s1")),
            GET_PAGE_SOURCE => Ok(Response::success(json!("<LinearLayout/>"))),
            GET_CURRENT_URL => Ok(Response::success(json!("and-activity://Main"))),
            _ => Ok(Response::success(Value::Null)),
        });
        let driver = AndroidNativeDriver::start(Arc::new(executor.clone()), None, Capabilities::new())
            .await
            .unwrap();

        assert_eq!(driver.page_source().await.unwrap(), "<LinearLayout/>");
        assert_eq!(driver.current_url().await.unwrap(), "and-activity://Main");
        driver.quit().await.unwrap();

        let names: Vec<String> = executor.commands().into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![NEW_SESSION, GET_PAGE_SOURCE, GET_CURRENT_URL, QUIT]
        );
    }

    #[test]
    fn test_string_value() {
        assert_eq!(string_value("x", json!("a")).unwrap(), "a");
        assert_eq!(string_value("x", Value::Null).unwrap(), "");
        assert!(string_value("x", json!(3)).is_err());
    }
}
