//! Mock scanning backend for testing

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::api::ScanApi;
use crate::client::models::{ScanResults, ScanStatus, TargetConfig};
use crate::error::{ApiError, Result};

/// Tracks calls per operation
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ScanCallCounts {
    pub launch_scan: usize,
    pub scan_status: usize,
    pub scan_results: usize,
    pub refresh_results: usize,
    pub all_scan_results: usize,
    pub cancel_scan: usize,
}

#[derive(Default)]
struct MockState {
    launch: Option<std::result::Result<ScanStatus, ApiError>>,
    launch_delay: Option<Duration>,
    launched_targets: Vec<TargetConfig>,
    statuses: VecDeque<std::result::Result<ScanStatus, ApiError>>,
    fallback_status: Option<ScanStatus>,
    results: Option<std::result::Result<ScanResults, ApiError>>,
    history: Vec<ScanResults>,
    cancel_ack: bool,
    calls: ScanCallCounts,
}

/// Scripted [`ScanApi`].
///
/// Status responses are consumed one per check; once the script runs out
/// the `always_status` response (or a `running` status) is returned.
#[derive(Default, Clone)]
pub struct MockScanApi {
    state: Arc<Mutex<MockState>>,
}

impl MockScanApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn with_launch(self, status: ScanStatus) -> Self {
        self.lock().launch = Some(Ok(status));
        self
    }

    pub fn with_launch_error(self, error: ApiError) -> Self {
        self.lock().launch = Some(Err(error));
        self
    }

    /// Make launches take `delay` before answering
    pub fn with_launch_delay(self, delay: Duration) -> Self {
        self.lock().launch_delay = Some(delay);
        self
    }

    pub fn with_status(self, status: ScanStatus) -> Self {
        self.lock().statuses.push_back(Ok(status));
        self
    }

    pub fn with_status_error(self, error: ApiError) -> Self {
        self.lock().statuses.push_back(Err(error));
        self
    }

    pub fn always_status(self, status: ScanStatus) -> Self {
        self.lock().fallback_status = Some(status);
        self
    }

    pub fn with_results(self, results: ScanResults) -> Self {
        self.lock().results = Some(Ok(results));
        self
    }

    pub fn with_results_error(self, error: ApiError) -> Self {
        self.lock().results = Some(Err(error));
        self
    }

    pub fn with_history(self, history: Vec<ScanResults>) -> Self {
        self.lock().history = history;
        self
    }

    pub fn acknowledge_cancel(self, ack: bool) -> Self {
        self.lock().cancel_ack = ack;
        self
    }

    pub fn calls(&self) -> ScanCallCounts {
        self.lock().calls.clone()
    }

    pub fn launched_targets(&self) -> Vec<TargetConfig> {
        self.lock().launched_targets.clone()
    }
}

#[async_trait]
impl ScanApi for MockScanApi {
    async fn launch_scan(&self, target: &TargetConfig) -> Result<ScanStatus> {
        let delay = {
            let mut state = self.lock();
            state.calls.launch_scan += 1;
            state.launched_targets.push(target.clone());
            state.launch_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.lock()
            .launch
            .clone()
            .unwrap_or_else(|| Ok(status_for("S1", "initiated", None)))
            .map_err(Into::into)
    }

    async fn scan_status(&self, _scan_id: &str) -> Result<ScanStatus> {
        let mut state = self.lock();
        state.calls.scan_status += 1;
        match state.statuses.pop_front() {
            Some(outcome) => outcome.map_err(Into::into),
            None => Ok(state
                .fallback_status
                .clone()
                .unwrap_or_else(|| status("running", None))),
        }
    }

    async fn scan_results(&self, scan_id: &str) -> Result<ScanResults> {
        let mut state = self.lock();
        state.calls.scan_results += 1;
        state
            .results
            .clone()
            .unwrap_or_else(|| Ok(completed_results(scan_id)))
            .map_err(Into::into)
    }

    async fn refresh_results(&self, scan_id: &str) -> Result<ScanResults> {
        let mut state = self.lock();
        state.calls.refresh_results += 1;
        state
            .results
            .clone()
            .unwrap_or_else(|| Ok(completed_results(scan_id)))
            .map_err(Into::into)
    }

    async fn all_scan_results(&self, _owner: Option<&str>) -> Result<Vec<ScanResults>> {
        let mut state = self.lock();
        state.calls.all_scan_results += 1;
        Ok(state.history.clone())
    }

    async fn cancel_scan(&self, _scan_id: &str) -> bool {
        let mut state = self.lock();
        state.calls.cancel_scan += 1;
        state.cancel_ack
    }

    async fn scanner_health(&self) -> bool {
        true
    }

    async fn results_health(&self) -> bool {
        true
    }
}

/// Status response without a scan id, as status polls return it
pub fn status(status: &str, message: Option<&str>) -> ScanStatus {
    status_for("", status, message)
}

pub fn status_for(scan_id: &str, status: &str, message: Option<&str>) -> ScanStatus {
    serde_json::from_value(json!({
        "scan_id": scan_id,
        "status": status,
        "message": message,
    }))
    .unwrap()
}

/// Completed results with no findings
pub fn completed_results(scan_id: &str) -> ScanResults {
    serde_json::from_value(json!({
        "scan_id": scan_id,
        "status": "completed",
        "results": {
            "vulnerabilities": [],
            "summary": {
                "total_vulnerabilities": 0,
                "by_severity": {},
                "scan_duration": "12m",
                "coverage": "100%"
            }
        }
    }))
    .unwrap()
}
