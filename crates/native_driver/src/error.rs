/// Error types for ADB and remote driver operations
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdbError {
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Connection timeout: {0}")]
    Timeout(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AdbResult<T> = std::result::Result<T, AdbError>;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Missing required configuration: {0}")]
    MissingConfiguration(&'static str),

    #[error("ADB error: {0}")]
    Adb(#[from] AdbError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing command parameter: {0}")]
    MissingParameter(String),

    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Stale element reference: {0}")]
    StaleElementReference(String),

    #[error("Element not visible: {0}")]
    ElementNotVisible(String),

    #[error("Invalid element state: {0}")]
    InvalidElementState(String),

    #[error("Remote error (status {status}): {message}")]
    Remote { status: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub type Result<T> = std::result::Result<T, DriverError>;
