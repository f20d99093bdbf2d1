use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::config::{ECHO_PATH, MESSAGE_PATH, ViewConfig};
use crate::core::logging::preview;

/// Failure of one backend call. Clone so it can ride the view's event queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a readable response.
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Body was not JSON, or lacked the expected field.
    #[error("malformed response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct EchoRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GreetingResponse {
    message: String,
}

/// Client for the two endpoints the view talks to.
pub struct ApiClient {
    client: Client,
    config: ViewConfig,
}

impl ApiClient {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// GET /api/message and pull out the `message` field.
    pub async fn fetch_message(&self) -> Result<String, ApiError> {
        let url = self.config.endpoint(MESSAGE_PATH);
        debug!(%url, "GET");

        let resp = self.client.get(&url).send().await?;
        let body = read_body(resp, &url).await?;

        let greeting: GreetingResponse = serde_json::from_str(&body)?;
        Ok(greeting.message)
    }

    /// POST /api/echo with `{"text": text}`; the reply is returned as-is.
    pub async fn echo(&self, text: &str) -> Result<Value, ApiError> {
        let url = self.config.endpoint(ECHO_PATH);
        let sent = echo_body(text)?;
        debug!(%url, body = %preview(&sent), "POST");

        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .body(sent)
            .send()
            .await?;
        let body = read_body(resp, &url).await?;

        Ok(serde_json::from_str(&body)?)
    }
}

fn echo_body(text: &str) -> Result<String, ApiError> {
    Ok(serde_json::to_string(&EchoRequest { text })?)
}

async fn read_body(resp: reqwest::Response, url: &str) -> Result<String, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    debug!(%url, %status, body = %preview(&body), "response");

    if !status.is_success() {
        warn!(%url, %status, "request rejected");
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
