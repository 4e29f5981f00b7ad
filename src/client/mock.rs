//! Mock request executor for testing
//!
//! Lets client tests script the outcome of each network attempt without
//! starting a server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use super::executor::RequestExecutor;
use super::request::{ApiResponse, PreparedRequest};
use crate::error::ApiError;

type Outcome = Result<ApiResponse<Value>, ApiError>;

/// Scripted executor.
///
/// Scripted outcomes are consumed one per attempt in order. Once the script
/// is exhausted, the `always_*` outcome (or an empty `{}` success) is
/// returned for every further attempt.
///
/// # Example
/// ```ignore
/// let mock = Arc::new(
///     MockExecutor::new()
///         .with_error(ApiError::Network("reset".into()))
///         .with_response(json!({"id": "a-1"})),
/// );
/// let client = ApiClient::new(ClientConfig::new("http://api.test"), mock.clone());
/// ```
#[derive(Default)]
pub struct MockExecutor {
    script: Arc<Mutex<VecDeque<Outcome>>>,
    fallback: Arc<Mutex<Option<Outcome>>>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// An attempt seen by the mock, with the (possibly paused) clock time it
/// was made at.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request: PreparedRequest,
    pub at: Instant,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next unscripted attempt with `data`
    pub fn with_response(self, data: Value) -> Self {
        self.push(Ok(ApiResponse::ok(data)));
        self
    }

    /// Fail the next unscripted attempt with `error`
    pub fn with_error(self, error: ApiError) -> Self {
        self.push(Err(error));
        self
    }

    /// Answer every attempt after the script with `data`
    pub fn always_respond(self, data: Value) -> Self {
        *lock(&self.fallback) = Some(Ok(ApiResponse::ok(data)));
        self
    }

    /// Fail every attempt after the script with `error`
    pub fn always_fail(self, error: ApiError) -> Self {
        *lock(&self.fallback) = Some(Err(error));
        self
    }

    /// Number of attempts made so far
    pub fn calls(&self) -> usize {
        lock(&self.captured).len()
    }

    pub fn captured(&self) -> Vec<CapturedRequest> {
        lock(&self.captured).clone()
    }

    fn push(&self, outcome: Outcome) {
        lock(&self.script).push_back(outcome);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    async fn execute(&self, request: &PreparedRequest) -> Outcome {
        lock(&self.captured).push(CapturedRequest {
            request: request.clone(),
            at: Instant::now(),
        });

        if let Some(outcome) = lock(&self.script).pop_front() {
            return outcome;
        }
        lock(&self.fallback)
            .clone()
            .unwrap_or_else(|| Ok(ApiResponse::ok(Value::Object(Default::default()))))
    }
}
