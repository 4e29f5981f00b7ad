//! Single-attempt HTTP execution
//!
//! An executor performs exactly one network attempt for a prepared request
//! and classifies any failure as a status, network, or timeout error.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use super::request::{ApiResponse, PreparedRequest};
use crate::error::ApiError;

/// Performs one HTTP attempt
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: &PreparedRequest) -> Result<ApiResponse<Value>, ApiError>;
}

/// `reqwest`-backed executor
#[derive(Debug, Clone, Default)]
pub struct HttpExecutor {
    http: HttpClient,
}

impl HttpExecutor {
    pub fn new() -> Self {
        Self {
            http: HttpClient::new(),
        }
    }

    async fn send(&self, request: &PreparedRequest) -> Result<ApiResponse<Value>, ApiError> {
        let mut builder = self
            .http
            .request(request.method.into(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(ref body) = request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        if !is_json || text.trim().is_empty() {
            return Ok(ApiResponse::empty_success());
        }

        let data: Value = serde_json::from_str(&text)
            .map_err(|e| ApiError::Network(format!("Failed to parse response: {}", e)))?;
        Ok(ApiResponse::ok(data))
    }
}

/// Build a status error from a non-2xx response body.
///
/// The scanning backend reports errors as `detail`, the main API as
/// `message`; when neither is present the status line is used.
fn status_error(status: reqwest::StatusCode, body: &str) -> ApiError {
    let details: Option<Value> = serde_json::from_str(body).ok();

    let message = details
        .as_ref()
        .and_then(|d| {
            d.get("message")
                .or_else(|| d.get("detail"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        });

    let code = details
        .as_ref()
        .and_then(|d| d.get("code"))
        .and_then(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

    ApiError::Status {
        status: status.as_u16(),
        message,
        code,
        details,
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, request: &PreparedRequest) -> Result<ApiResponse<Value>, ApiError> {
        // Dropping the send future on expiry aborts the in-flight attempt
        match tokio::time::timeout(request.timeout, self.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(request.timeout)),
        }
    }
}
