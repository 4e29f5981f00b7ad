//! Polling a scan until it reaches a terminal status

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use super::api::ScanApi;
use crate::client::models::{RemoteScanStatus, ScanResults, ScanStatus};
use crate::error::{Result, ScanError};

/// Default number of status checks before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Default wait between status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Poll budget: `max_attempts` status checks, `interval` apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Poll `scan_id` until it completes, fails, or the budget runs out.
///
/// `on_progress` sees every status obtained. A failed status check counts
/// against the budget but only aborts polling on the final attempt. On
/// `completed` the full results are fetched exactly once, never from a
/// cached copy taken while the scan was still running. If `stop`
/// resolves while waiting between checks, polling ends with
/// [`ScanError::Cancelled`].
pub async fn poll_to_completion<A, F, S>(
    api: &A,
    scan_id: &str,
    options: PollOptions,
    mut on_progress: F,
    stop: S,
) -> Result<ScanResults>
where
    A: ScanApi + ?Sized,
    F: FnMut(&ScanStatus),
    S: Future<Output = ()>,
{
    let mut stop = std::pin::pin!(stop);

    for attempt in 1..=options.max_attempts {
        let last = attempt == options.max_attempts;

        match api.scan_status(scan_id).await {
            Ok(status) => {
                on_progress(&status);
                match status.status {
                    RemoteScanStatus::Completed => return api.refresh_results(scan_id).await,
                    RemoteScanStatus::Failed => {
                        let message = status
                            .message
                            .unwrap_or_else(|| "Scan failed".to_string());
                        return Err(ScanError::Failed(message).into());
                    }
                    other => debug!(
                        "Scan {} is {} (check {}/{})",
                        scan_id, other, attempt, options.max_attempts
                    ),
                }
            }
            Err(e) if last => return Err(e),
            Err(e) => warn!(
                "Status check {}/{} for scan {} failed: {}",
                attempt, options.max_attempts, scan_id, e
            ),
        }

        if last {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(options.interval) => {}
            _ = &mut stop => {
                debug!("Polling of scan {} stopped", scan_id);
                return Err(ScanError::Cancelled.into());
            }
        }
    }

    Err(ScanError::PollTimeout {
        attempts: options.max_attempts,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, Error};
    use crate::scan::mock::{MockScanApi, completed_results, status};
    use std::future::pending;
    use tokio::time::Instant;

    fn options(max_attempts: u32) -> PollOptions {
        PollOptions {
            max_attempts,
            interval: Duration::from_secs(5),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_and_fetches_results_once() {
        let api = MockScanApi::new()
            .with_status(status("running", None))
            .with_status(status("completed", None))
            .with_results(completed_results("S1"));
        let mut seen = Vec::new();

        let results = poll_to_completion(
            &api,
            "S1",
            options(60),
            |s| seen.push(s.status),
            pending(),
        )
        .await
        .unwrap();

        assert_eq!(results, completed_results("S1"));
        assert_eq!(
            seen,
            vec![RemoteScanStatus::Running, RemoteScanStatus::Completed]
        );
        assert_eq!(api.calls().scan_status, 2);
        assert_eq!(api.calls().refresh_results, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_status_surfaces_remote_message() {
        let api = MockScanApi::new()
            .with_status(status("running", None))
            .with_status(status("failed", Some("target unreachable")));

        let err = poll_to_completion(&api, "S1", options(60), |_| {}, pending())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Scan(ScanError::Failed(ref m)) if m == "target unreachable"));
        assert_eq!(err.to_string(), "target unreachable");
        assert_eq!(api.calls().refresh_results, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_budget_is_poll_timeout() {
        let api = MockScanApi::new().always_status(status("running", None));
        let start = Instant::now();

        let err = poll_to_completion(&api, "S1", options(3), |_| {}, pending())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Scan(ScanError::PollTimeout { attempts: 3 })
        ));
        assert_eq!(api.calls().scan_status, 3);
        // No wait after the final check
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_error_does_not_abort() {
        let api = MockScanApi::new()
            .with_status_error(ApiError::Network("connection reset".to_string()))
            .with_status(status("completed", None))
            .with_results(completed_results("S1"));
        let mut progress_calls = 0;

        let results = poll_to_completion(
            &api,
            "S1",
            options(5),
            |_| progress_calls += 1,
            pending(),
        )
        .await;

        assert!(results.is_ok());
        assert_eq!(progress_calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_on_final_attempt_is_raised() {
        let api = MockScanApi::new()
            .with_status(status("running", None))
            .with_status_error(ApiError::Timeout(Duration::from_secs(30)));

        let err = poll_to_completion(&api, "S1", options(2), |_| {}, pending())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api(ApiError::Timeout(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_signal_ends_wait() {
        let api = MockScanApi::new().always_status(status("running", None));
        let stop = tokio::time::sleep(Duration::from_secs(7));

        let err = poll_to_completion(&api, "S1", options(60), |_| {}, stop)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Scan(ScanError::Cancelled)));
        assert_eq!(api.calls().scan_status, 2);
    }
}
