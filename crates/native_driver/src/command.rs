//! Remote commands, their HTTP routes, and JSON wire responses

use phf::phf_map;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{DriverError, Result};

pub const NEW_SESSION: &str = "newSession";
pub const QUIT: &str = "quit";
pub const GET: &str = "get";
pub const GET_CURRENT_URL: &str = "getCurrentUrl";
pub const GET_PAGE_SOURCE: &str = "getPageSource";
pub const FIND_ELEMENT: &str = "findElement";
pub const FIND_ELEMENTS: &str = "findElements";
pub const FIND_CHILD_ELEMENT: &str = "findChildElement";
pub const FIND_CHILD_ELEMENTS: &str = "findChildElements";
pub const CLICK_ELEMENT: &str = "clickElement";
pub const CLEAR_ELEMENT: &str = "clearElement";
pub const GET_ELEMENT_TEXT: &str = "getElementText";
pub const SEND_KEYS_TO_ELEMENT: &str = "sendKeysToElement";
pub const GET_ELEMENT_ATTRIBUTE: &str = "getElementAttribute";
pub const IS_ELEMENT_DISPLAYED: &str = "isElementDisplayed";
pub const IS_ELEMENT_ENABLED: &str = "isElementEnabled";
pub const SET_TEXT_TO_ELEMENT: &str = "setTextToElement";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// HTTP method and path template; `:name` segments are filled from the
/// session id or the command parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub path: &'static str,
}

const fn route(method: HttpMethod, path: &'static str) -> Route {
    Route { method, path }
}

static ROUTES: phf::Map<&'static str, Route> = phf_map! {
    "newSession" => route(HttpMethod::Post, "/session"),
    "quit" => route(HttpMethod::Delete, "/session/:sessionId"),
    "get" => route(HttpMethod::Post, "/session/:sessionId/url"),
    "getCurrentUrl" => route(HttpMethod::Get, "/session/:sessionId/url"),
    "getPageSource" => route(HttpMethod::Get, "/session/:sessionId/source"),
    "findElement" => route(HttpMethod::Post, "/session/:sessionId/element"),
    "findElements" => route(HttpMethod::Post, "/session/:sessionId/elements"),
    "findChildElement" => route(HttpMethod::Post, "/session/:sessionId/element/:id/element"),
    "findChildElements" => route(HttpMethod::Post, "/session/:sessionId/element/:id/elements"),
    "clickElement" => route(HttpMethod::Post, "/session/:sessionId/element/:id/click"),
    "clearElement" => route(HttpMethod::Post, "/session/:sessionId/element/:id/clear"),
    "getElementText" => route(HttpMethod::Get, "/session/:sessionId/element/:id/text"),
    "sendKeysToElement" => route(HttpMethod::Post, "/session/:sessionId/element/:id/value"),
    "getElementAttribute" => route(HttpMethod::Get, "/session/:sessionId/element/:id/attribute/:name"),
    "isElementDisplayed" => route(HttpMethod::Get, "/session/:sessionId/element/:id/displayed"),
    "isElementEnabled" => route(HttpMethod::Get, "/session/:sessionId/element/:id/enabled"),
    "setTextToElement" => route(HttpMethod::Post, "/session/:sessionId/element/:id/text"),
};

/// Look up the HTTP route of a command name
pub fn route_for(name: &str) -> Option<Route> {
    ROUTES.get(name).copied()
}

/// A named command with its parameters, addressed to a session
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub session_id: Option<String>,
    pub name: String,
    pub parameters: Map<String, Value>,
}

impl Command {
    pub fn new(name: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            session_id: None,
            name: name.into(),
            parameters,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// JSON wire protocol response body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub value: Value,
}

impl Response {
    /// Successful response carrying `value`
    pub fn success(value: Value) -> Self {
        Self {
            session_id: None,
            status: 0,
            value,
        }
    }

    /// Turn a non-zero status into the matching error
    pub fn into_value(self) -> Result<Value> {
        if self.status == 0 {
            return Ok(self.value);
        }

        let message = error_message(&self.value);
        Err(match self.status {
            7 => DriverError::NoSuchElement(message),
            10 => DriverError::StaleElementReference(message),
            11 => DriverError::ElementNotVisible(message),
            12 => DriverError::InvalidElementState(message),
            status => DriverError::Remote { status, message },
        })
    }
}

/// Error for a non-2xx HTTP reply whose body carries no JSON wire status.
/// W3C servers name the failure in `value.error`.
pub(crate) fn http_error(http_status: u16, value: &Value) -> DriverError {
    let message = error_message(value);
    match value.get("error").and_then(Value::as_str) {
        Some("no such element") => DriverError::NoSuchElement(message),
        Some("stale element reference") => DriverError::StaleElementReference(message),
        Some("element not interactable") => DriverError::ElementNotVisible(message),
        Some("invalid element state") => DriverError::InvalidElementState(message),
        _ => DriverError::Remote {
            status: i64::from(http_status),
            message,
        },
    }
}

fn error_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        Value::Null => "no details".to_string(),
        other => other.to_string(),
    }
}

/// Build a parameter map from `(key, value)` pairs
pub fn params<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_lookup() {
        let route = route_for(SET_TEXT_TO_ELEMENT).unwrap();
        assert_eq!(route.method, HttpMethod::Post);
        assert_eq!(route.path, "/session/:sessionId/element/:id/text");
        assert_eq!(
            route_for(GET_ELEMENT_TEXT).unwrap().method,
            HttpMethod::Get
        );
        assert!(route_for("noSuchCommand").is_none());
    }

    #[test]
    fn test_response_deserialize() {
        let response: Response =
            serde_json::from_str(r#"{"sessionId":"abc","status":0,"value":{"ELEMENT":"3"}}"#)
                .unwrap();
        assert_eq!(response.session_id.as_deref(), Some("abc"));
        assert_eq!(response.into_value().unwrap(), json!({"ELEMENT": "3"}));
    }

    #[test]
    fn test_status_mapping() {
        let missing = Response {
            status: 7,
            value: json!({"message": "no view with text OK"}),
            ..Default::default()
        };
        match missing.into_value() {
            Err(DriverError::NoSuchElement(msg)) => assert_eq!(msg, "no view with text OK"),
            other => panic!("unexpected: {:?}", other),
        }

        let unknown = Response {
            status: 13,
            value: json!("boom"),
            ..Default::default()
        };
        assert!(matches!(
            unknown.into_value(),
            Err(DriverError::Remote { status: 13, .. })
        ));
    }

    #[test]
    fn test_http_error_mapping() {
        let w3c = json!({"error": "no such element", "message": "no view with text OK"});
        match http_error(404, &w3c) {
            DriverError::NoSuchElement(msg) => assert_eq!(msg, "no view with text OK"),
            other => panic!("unexpected: {:?}", other),
        }

        let plain = json!({"message": "view is not editable"});
        match http_error(500, &plain) {
            DriverError::Remote { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "view is not editable");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_params() {
        let map = params([("using", json!("text")), ("value", json!("OK"))]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["using"], "text");
    }
}
