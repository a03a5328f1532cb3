//! Client-side proxy for a view in the app under test.
//!
//! Behaves like any remote WebDriver element and additionally supports
//! finding by text and replacing the view's text in one command.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::by::By;
use crate::command::{
    params, CLEAR_ELEMENT, CLICK_ELEMENT, FIND_CHILD_ELEMENT, FIND_CHILD_ELEMENTS,
    GET_ELEMENT_ATTRIBUTE, GET_ELEMENT_TEXT, IS_ELEMENT_DISPLAYED, IS_ELEMENT_ENABLED,
    SEND_KEYS_TO_ELEMENT, SET_TEXT_TO_ELEMENT,
};
use crate::driver::{string_value, AndroidNativeDriver};
use crate::error::{DriverError, Result};
use crate::search::{FindsByText, SearchContext};

/// JSON wire protocol key of an element reference
pub const ELEMENT_KEY: &str = "ELEMENT";
/// W3C key of an element reference
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Replace the whole text content of a view
#[async_trait]
pub trait HasSetText {
    async fn set_text(&self, value: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct AndroidNativeElement {
    parent: AndroidNativeDriver,
    id: String,
}

impl AndroidNativeElement {
    pub fn new(parent: AndroidNativeDriver, id: impl Into<String>) -> Self {
        Self {
            parent,
            id: id.into(),
        }
    }

    /// Opaque id assigned by the server
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> &AndroidNativeDriver {
        &self.parent
    }

    pub(crate) fn from_value(parent: &AndroidNativeDriver, value: &Value) -> Result<Self> {
        let id = value
            .get(ELEMENT_KEY)
            .or_else(|| value.get(W3C_ELEMENT_KEY))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DriverError::UnexpectedResponse(format!("not an element reference: {}", value))
            })?;
        Ok(Self::new(parent.clone(), id))
    }

    pub(crate) fn list_from_value(parent: &AndroidNativeDriver, value: Value) -> Result<Vec<Self>> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| Self::from_value(parent, item))
                .collect(),
            Value::Null => Ok(Vec::new()),
            other => Err(DriverError::UnexpectedResponse(format!(
                "expected a list of elements, got {}",
                other
            ))),
        }
    }

    /// Execute a command addressed to this element
    pub async fn execute(&self, name: &str, mut parameters: Map<String, Value>) -> Result<Value> {
        parameters.insert("id".to_string(), json!(self.id));
        self.parent.execute(name, parameters).await
    }

    pub async fn click(&self) -> Result<()> {
        self.execute(CLICK_ELEMENT, Map::new()).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.execute(CLEAR_ELEMENT, Map::new()).await?;
        Ok(())
    }

    pub async fn text(&self) -> Result<String> {
        let value = self.execute(GET_ELEMENT_TEXT, Map::new()).await?;
        string_value(GET_ELEMENT_TEXT, value)
    }

    /// Type `keys` into the view, one key event per character
    pub async fn send_keys(&self, keys: &str) -> Result<()> {
        let chars: Vec<String> = keys.chars().map(String::from).collect();
        self.execute(SEND_KEYS_TO_ELEMENT, params([("value", json!(chars))]))
            .await?;
        Ok(())
    }

    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let value = self
            .execute(GET_ELEMENT_ATTRIBUTE, params([("name", json!(name))]))
            .await?;
        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    pub async fn is_displayed(&self) -> Result<bool> {
        let value = self.execute(IS_ELEMENT_DISPLAYED, Map::new()).await?;
        bool_value(IS_ELEMENT_DISPLAYED, value)
    }

    pub async fn is_enabled(&self) -> Result<bool> {
        let value = self.execute(IS_ELEMENT_ENABLED, Map::new()).await?;
        bool_value(IS_ELEMENT_ENABLED, value)
    }
}

impl PartialEq for AndroidNativeElement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.parent.session_id() == other.parent.session_id()
    }
}

impl Eq for AndroidNativeElement {}

fn bool_value(command: &str, value: Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        DriverError::UnexpectedResponse(format!("{} returned {} instead of a bool", command, value))
    })
}

#[async_trait]
impl HasSetText for AndroidNativeElement {
    async fn set_text(&self, value: &str) -> Result<()> {
        self.execute(SET_TEXT_TO_ELEMENT, params([("value", json!(value))]))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SearchContext for AndroidNativeElement {
    async fn find_element(&self, by: By) -> Result<AndroidNativeElement> {
        let value = self
            .execute(
                FIND_CHILD_ELEMENT,
                params([("using", json!(by.using())), ("value", json!(by.value()))]),
            )
            .await?;
        Self::from_value(&self.parent, &value)
    }

    async fn find_elements(&self, by: By) -> Result<Vec<AndroidNativeElement>> {
        let value = self
            .execute(
                FIND_CHILD_ELEMENTS,
                params([("using", json!(by.using())), ("value", json!(by.value()))]),
            )
            .await?;
        Self::list_from_value(&self.parent, value)
    }
}

impl FindsByText for AndroidNativeElement {}
