//! Command executors: the seam every remote operation goes through

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::command::{http_error, route_for, Command, HttpMethod, Response};
use crate::config::TIMING_CONFIG;
use crate::error::{DriverError, Result};

/// Sends a named command to the remote session and returns its response
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command: Command) -> Result<Response>;
}

/// Executor speaking the JSON wire protocol over HTTP
#[derive(Debug, Clone)]
pub struct HttpCommandExecutor {
    base_url: Url,
    client: Client,
}

impl HttpCommandExecutor {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// Use a preconfigured HTTP client
    pub fn with_client(base_url: Url, client: Client) -> Self {
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Expand the route of `command` against `base`. Parameters consumed by
/// path placeholders are removed; the rest form the request body.
fn resolve(base: &Url, command: &Command) -> Result<(HttpMethod, Url, Map<String, Value>)> {
    let route =
        route_for(&command.name).ok_or_else(|| DriverError::UnknownCommand(command.name.clone()))?;

    let mut body = command.parameters.clone();
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| DriverError::InvalidServerUrl(base.to_string()))?;
        segments.pop_if_empty();

        for segment in route.path.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix(':') {
                Some("sessionId") => {
                    let session_id = command
                        .session_id
                        .as_deref()
                        .ok_or_else(|| DriverError::MissingParameter("sessionId".to_string()))?;
                    segments.push(session_id);
                }
                Some(name) => {
                    let value = body
                        .remove(name)
                        .ok_or_else(|| DriverError::MissingParameter(name.to_string()))?;
                    match value {
                        Value::String(s) => segments.push(&s),
                        other => segments.push(&other.to_string()),
                    };
                }
                None => {
                    segments.push(segment);
                }
            }
        }
    }

    Ok((route.method, url, body))
}

#[async_trait]
impl CommandExecutor for HttpCommandExecutor {
    async fn execute(&self, command: Command) -> Result<Response> {
        let (method, url, body) = resolve(&self.base_url, &command)?;
        debug!("{} -> {:?} {}", command.name, method, url);

        let request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url).json(&Value::Object(body)),
            HttpMethod::Delete => self.client.delete(url),
        };

        let http_response = request
            .timeout(TIMING_CONFIG.session.request_timeout())
            .send()
            .await?;
        let http_status = http_response.status();
        let text = http_response.text().await?;

        if text.trim().is_empty() {
            if http_status.is_success() {
                return Ok(Response::success(Value::Null));
            }
            return Err(DriverError::Remote {
                status: i64::from(http_status.as_u16()),
                message: format!("{} returned an empty body", command.name),
            });
        }

        match serde_json::from_str::<Response>(&text) {
            // A JSON wire status, when present, takes precedence over the HTTP code.
            Ok(response) if !http_status.is_success() && response.status == 0 => {
                Err(http_error(http_status.as_u16(), &response.value))
            }
            Ok(response) => Ok(response),
            Err(_) if !http_status.is_success() => Err(DriverError::Remote {
                status: i64::from(http_status.as_u16()),
                message: text,
            }),
            Err(e) => Err(DriverError::UnexpectedResponse(format!(
                "{}: {} ({})",
                command.name, e, text
            ))),
        }
    }
}
