//! HTTP gateway to a backend exposing `POST {base}/invoke/{command}`

use async_trait::async_trait;
use serde_json::Value;

use super::{Args, BackendError, BackendGateway};

/// Gateway speaking JSON over HTTP.
///
/// The request body is the argument object. A 2xx response body is the JSON
/// result (empty means `null`); any other status carries the error message in
/// its body, either as a JSON string, as `{"error": "..."}`, or as plain text.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/invoke/{}", self.base_url, command)
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn call(&self, command: &str, args: Args) -> Result<Value, BackendError> {
        let response = self
            .client
            .post(self.endpoint(command))
            .json(&args)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(command, status = status.as_u16(), "Backend returned an error status");
            return Err(BackendError::Remote(error_message(&body, status)));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| BackendError::decode(command, e))
    }
}

/// Extract the human-readable message from an error body
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(message)) => message,
        Ok(Value::Object(map)) => match map.get("error") {
            Some(Value::String(message)) => message.clone(),
            _ => body.to_string(),
        },
        _ if body.trim().is_empty() => format!("HTTP {status}"),
        _ => body.trim().to_string(),
    }
}
