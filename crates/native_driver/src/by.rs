//! Element locators

use std::fmt;

pub const USING_ID: &str = "id";
pub const USING_NAME: &str = "name";
pub const USING_CLASS_NAME: &str = "class name";
pub const USING_TAG_NAME: &str = "tag name";
pub const USING_XPATH: &str = "xpath";
pub const USING_LINK_TEXT: &str = "link text";
pub const USING_PARTIAL_LINK_TEXT: &str = "partial link text";
pub const USING_TEXT: &str = "text";
pub const USING_PARTIAL_TEXT: &str = "partial text";

/// Strategy and value sent with find commands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum By {
    Id(String),
    Name(String),
    ClassName(String),
    TagName(String),
    XPath(String),
    LinkText(String),
    PartialLinkText(String),
    /// Views whose text equals the value
    Text(String),
    /// Views whose text contains the value
    PartialText(String),
}

impl By {
    pub fn id(value: impl Into<String>) -> Self {
        By::Id(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        By::Name(value.into())
    }

    pub fn class_name(value: impl Into<String>) -> Self {
        By::ClassName(value.into())
    }

    pub fn tag_name(value: impl Into<String>) -> Self {
        By::TagName(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        By::XPath(value.into())
    }

    pub fn link_text(value: impl Into<String>) -> Self {
        By::LinkText(value.into())
    }

    pub fn partial_link_text(value: impl Into<String>) -> Self {
        By::PartialLinkText(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        By::Text(value.into())
    }

    pub fn partial_text(value: impl Into<String>) -> Self {
        By::PartialText(value.into())
    }

    /// The `using` tag of the wire protocol
    pub fn using(&self) -> &'static str {
        match self {
            By::Id(_) => USING_ID,
            By::Name(_) => USING_NAME,
            By::ClassName(_) => USING_CLASS_NAME,
            By::TagName(_) => USING_TAG_NAME,
            By::XPath(_) => USING_XPATH,
            By::LinkText(_) => USING_LINK_TEXT,
            By::PartialLinkText(_) => USING_PARTIAL_LINK_TEXT,
            By::Text(_) => USING_TEXT,
            By::PartialText(_) => USING_PARTIAL_TEXT,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            By::Id(v)
            | By::Name(v)
            | By::ClassName(v)
            | By::TagName(v)
            | By::XPath(v)
            | By::LinkText(v)
            | By::PartialLinkText(v)
            | By::Text(v)
            | By::PartialText(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "By.{}: {}", self.using(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_strategies_are_distinct() {
        assert_eq!(By::text("OK").using(), "text");
        assert_eq!(By::partial_text("O").using(), "partial text");
        assert_ne!(By::text("OK").using(), By::partial_text("OK").using());
    }

    #[test]
    fn test_display() {
        assert_eq!(By::partial_text("Sign").to_string(), "By.partial text: Sign");
        assert_eq!(By::id("title").value(), "title");
    }
}
