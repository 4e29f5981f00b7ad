//! Scan lifecycle state machine
//!
//! ```text
//! Idle ──launch──▶ Launching ──accepted──▶ Running ──completed──▶ Completed
//!                      │                     │ │
//!                      └──error──▶ Failed ◀──┘ └──cancel ack──▶ Cancelled
//! ```
//!
//! Completed, Failed, and Cancelled return to Idle on `reset`, and a new
//! scan may be launched from any of them.

use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::watch;

use super::api::ScanApi;
use super::poll::{PollOptions, poll_to_completion};
use crate::client::models::{ScanResults, ScanStatus, TargetConfig};
use crate::error::{Error, Result, ScanError};

pub const PROGRESS_READY: &str = "Ready to scan";
pub const PROGRESS_LAUNCHING: &str = "Initiating security scan...";
pub const PROGRESS_RUNNING: &str = "Security scan in progress...";
pub const PROGRESS_COMPLETED: &str = "Scan completed successfully";
pub const PROGRESS_CANCELLING: &str = "Cancelling scan...";
pub const PROGRESS_CANCELLED: &str = "Scan cancelled";
pub const PROGRESS_ERROR: &str = "Error occurred";
pub const PROGRESS_REFRESHING: &str = "Refreshing scan results...";
pub const PROGRESS_REFRESHED: &str = "Results updated";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanPhase {
    #[default]
    Idle,
    Launching,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl ScanPhase {
    /// A new scan may start from here
    pub fn can_launch(&self) -> bool {
        !self.is_in_flight()
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, ScanPhase::Launching | ScanPhase::Running)
    }
}

/// Snapshot of the orchestrator, as seen by observers
#[derive(Debug, Clone, PartialEq)]
pub struct ScanState {
    pub phase: ScanPhase,
    pub scan_id: Option<String>,
    /// Latest status reported by the scanner
    pub status: Option<ScanStatus>,
    pub results: Option<ScanResults>,
    pub error: Option<String>,
    /// Human-readable progress line; display only
    pub progress: String,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            phase: ScanPhase::Idle,
            scan_id: None,
            status: None,
            results: None,
            error: None,
            progress: PROGRESS_READY.to_string(),
        }
    }
}

impl ScanState {
    pub fn can_cancel(&self) -> bool {
        self.phase == ScanPhase::Running && self.scan_id.is_some()
    }

    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Progress line for a status update
pub fn status_progress(status: &ScanStatus) -> String {
    match status.message.as_deref() {
        Some(message) if !message.is_empty() => format!("Scan {}... {}", status.status, message),
        _ => format!("Scan {}...", status.status),
    }
}

/// Drives one scan at a time through launch, polling, and cancellation.
///
/// State lives in a watch channel: [`subscribe`](Self::subscribe) to
/// follow progress, [`state`](Self::state) for a snapshot. Every terminal
/// failure is recorded in the state before it is returned.
pub struct ScanOrchestrator {
    api: Arc<dyn ScanApi>,
    options: PollOptions,
    state: watch::Sender<ScanState>,
}

impl ScanOrchestrator {
    pub fn new(api: Arc<dyn ScanApi>, options: PollOptions) -> Self {
        Self {
            api,
            options,
            state: watch::Sender::new(ScanState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ScanState {
        self.state.borrow().clone()
    }

    pub fn api(&self) -> &dyn ScanApi {
        self.api.as_ref()
    }

    /// Start a scan and return its id.
    ///
    /// Rejected with [`ScanError::AlreadyInProgress`] while another scan is
    /// launching or running.
    pub async fn launch(&self, target: &TargetConfig) -> Result<String> {
        let accepted = self.state.send_if_modified(|state| {
            if !state.phase.can_launch() {
                return false;
            }
            *state = ScanState {
                phase: ScanPhase::Launching,
                progress: PROGRESS_LAUNCHING.to_string(),
                ..ScanState::default()
            };
            true
        });
        if !accepted {
            return Err(ScanError::AlreadyInProgress.into());
        }

        let launched = self.api.launch_scan(target).await.and_then(|status| {
            if status.scan_id.is_empty() {
                Err(ScanError::MissingScanId.into())
            } else {
                Ok(status)
            }
        });

        match launched {
            Ok(status) => {
                let scan_id = status.scan_id.clone();
                info!("Scan {} launched ({})", scan_id, status.status);
                self.state.send_modify(|state| {
                    state.phase = ScanPhase::Running;
                    state.scan_id = Some(scan_id.clone());
                    state.status = Some(status);
                    state.progress = PROGRESS_RUNNING.to_string();
                });
                Ok(scan_id)
            }
            Err(e) => {
                error!("Scan launch failed: {}", e);
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Poll the running scan until it reaches a terminal state.
    ///
    /// Ends early with [`ScanError::Cancelled`] if the scan is cancelled
    /// while polling.
    pub async fn poll(&self) -> Result<ScanResults> {
        let scan_id = {
            let state = self.state.borrow();
            match (&state.phase, &state.scan_id) {
                (ScanPhase::Running, Some(id)) => id.clone(),
                _ => return Err(ScanError::NotRunning.into()),
            }
        };

        let mut observer = self.state.subscribe();
        let cancelled = async move {
            let observed = observer
                .wait_for(|s| s.phase == ScanPhase::Cancelled)
                .await
                .is_ok();
            if !observed {
                std::future::pending::<()>().await;
            }
        };

        let outcome = poll_to_completion(
            self.api.as_ref(),
            &scan_id,
            self.options,
            |status| {
                let progress = status_progress(status);
                debug!("{}", progress);
                self.update_running(&scan_id, |state| {
                    state.status = Some(status.clone());
                    state.progress = progress;
                });
            },
            cancelled,
        )
        .await;

        match outcome {
            Ok(results) => {
                info!("Scan {} completed", scan_id);
                self.update_running(&scan_id, |state| {
                    state.phase = ScanPhase::Completed;
                    state.results = Some(results.clone());
                    state.progress = PROGRESS_COMPLETED.to_string();
                });
                Ok(results)
            }
            Err(e) => {
                if !matches!(e, Error::Scan(ScanError::Cancelled)) {
                    error!("Scan {} did not complete: {}", scan_id, e);
                    self.update_running(&scan_id, |state| {
                        state.phase = ScanPhase::Failed;
                        state.error = Some(e.to_string());
                        state.progress = PROGRESS_ERROR.to_string();
                    });
                }
                Err(e)
            }
        }
    }

    /// Track a scan launched elsewhere as the running scan, so it can be
    /// polled and cancelled like one launched here.
    pub fn attach(&self, scan_id: &str) -> Result<()> {
        if scan_id.is_empty() {
            return Err(ScanError::MissingScanId.into());
        }
        let accepted = self.state.send_if_modified(|state| {
            if !state.phase.can_launch() {
                return false;
            }
            *state = ScanState {
                phase: ScanPhase::Running,
                scan_id: Some(scan_id.to_string()),
                progress: PROGRESS_RUNNING.to_string(),
                ..ScanState::default()
            };
            true
        });
        if !accepted {
            return Err(ScanError::AlreadyInProgress.into());
        }
        debug!("Attached to scan {}", scan_id);
        Ok(())
    }

    /// Launch a scan and poll it to completion
    pub async fn run(&self, target: &TargetConfig) -> Result<ScanResults> {
        self.launch(target).await?;
        self.poll().await
    }

    /// Request cancellation of the running scan.
    ///
    /// Returns whether the scanner acknowledged. Does nothing and returns
    /// `false` unless a scan is running. An unacknowledged cancel leaves
    /// the scan running with its previous progress line.
    pub async fn cancel(&self) -> bool {
        let (scan_id, progress) = {
            let state = self.state.borrow();
            match (&state.phase, &state.scan_id) {
                (ScanPhase::Running, Some(id)) => (id.clone(), state.progress.clone()),
                _ => return false,
            }
        };

        self.update_running(&scan_id, |state| {
            state.progress = PROGRESS_CANCELLING.to_string();
        });

        let acknowledged = self.api.cancel_scan(&scan_id).await;
        if acknowledged {
            info!("Scan {} cancelled", scan_id);
            self.update_running(&scan_id, |state| {
                state.phase = ScanPhase::Cancelled;
                state.progress = PROGRESS_CANCELLED.to_string();
            });
        } else {
            error!("Failed to cancel scan {}", scan_id);
            self.update_running(&scan_id, |state| {
                state.progress = progress;
            });
        }
        acknowledged
    }

    /// Return to Idle from a terminal phase. Returns `false` while a scan
    /// is in flight.
    pub fn reset(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.phase.is_in_flight() {
                return false;
            }
            *state = ScanState::default();
            true
        })
    }

    /// Fetch the current scan's status once, outside of polling.
    ///
    /// Returns `None` when there is no scan or the check fails.
    pub async fn check_status(&self) -> Option<ScanStatus> {
        let scan_id = self.state.borrow().scan_id.clone()?;

        match self.api.scan_status(&scan_id).await {
            Ok(status) => {
                self.state.send_modify(|state| {
                    if state.scan_id.as_deref() == Some(scan_id.as_str()) {
                        state.status = Some(status.clone());
                    }
                });
                Some(status)
            }
            Err(e) => {
                error!("Failed to get scan status: {}", e);
                None
            }
        }
    }

    /// Re-read the current scan's results, bypassing cached copies.
    ///
    /// Returns `Ok(None)` when there is no scan. Only a completed scan
    /// keeps the refreshed results in its state; for any other phase they
    /// are just returned. Failures go to the caller and leave the state
    /// as it was.
    pub async fn refresh_results(&self) -> Result<Option<ScanResults>> {
        let (scan_id, progress) = {
            let state = self.state.borrow();
            match &state.scan_id {
                Some(id) => (id.clone(), state.progress.clone()),
                None => return Ok(None),
            }
        };

        self.update_scan(&scan_id, |state| {
            state.progress = PROGRESS_REFRESHING.to_string();
        });
        match self.api.refresh_results(&scan_id).await {
            Ok(results) => {
                self.update_scan(&scan_id, |state| {
                    if state.phase == ScanPhase::Completed {
                        state.results = Some(results.clone());
                        state.progress = PROGRESS_REFRESHED.to_string();
                    } else {
                        state.progress = progress;
                    }
                });
                Ok(Some(results))
            }
            Err(e) => {
                error!("Failed to refresh results for scan {}: {}", scan_id, e);
                self.update_scan(&scan_id, |state| state.progress = progress);
                Err(e)
            }
        }
    }

    /// Results of any scan; does not touch the state
    pub async fn fetch_results(&self, scan_id: &str) -> Result<ScanResults> {
        self.api.scan_results(scan_id).await
    }

    /// Historical results, optionally for one owner; does not touch the
    /// state
    pub async fn fetch_all_results(&self, owner: Option<&str>) -> Result<Vec<ScanResults>> {
        let results = self.api.all_scan_results(owner).await.inspect_err(|e| {
            error!("Failed to fetch scan results: {}", e);
        })?;
        debug!("Found {} scan results", results.len());
        Ok(results)
    }

    /// Launch failure: nothing to poll, so the scan id stays unset
    fn fail(&self, err: &Error) {
        self.state.send_modify(|state| {
            state.phase = ScanPhase::Failed;
            state.error = Some(err.to_string());
            state.progress = PROGRESS_ERROR.to_string();
        });
    }

    /// Apply `update` only while `scan_id` is still the current scan
    fn update_scan(&self, scan_id: &str, update: impl FnOnce(&mut ScanState)) {
        self.state.send_if_modified(|state| {
            let current = state.scan_id.as_deref() == Some(scan_id);
            if current {
                update(state);
            }
            current
        });
    }

    /// Apply `update` only while `scan_id` is still the running scan
    fn update_running(&self, scan_id: &str, update: impl FnOnce(&mut ScanState)) {
        self.state.send_if_modified(|state| {
            let current = state.phase == ScanPhase::Running
                && state.scan_id.as_deref() == Some(scan_id);
            if current {
                update(state);
            }
            current
        });
    }
}
