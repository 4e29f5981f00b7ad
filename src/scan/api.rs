//! Scanning backend API
//!
//! Scans are launched, polled, and cancelled on the scanner API; full
//! results are read from the separate results API.

use async_trait::async_trait;
use log::{error, warn};
use serde_json::Value;

use crate::cache::CacheTtl;
use crate::client::models::{LaunchRequest, ScanResultList, ScanResults, ScanStatus, TargetConfig};
use crate::client::{ApiClient, RequestDescriptor, path_segment};
use crate::error::Result;

/// Remote operations the scan lifecycle needs
#[async_trait]
pub trait ScanApi: Send + Sync {
    /// Start a scan; the response carries the new scan id
    async fn launch_scan(&self, target: &TargetConfig) -> Result<ScanStatus>;

    /// Current status of a scan, never served from cache
    async fn scan_status(&self, scan_id: &str) -> Result<ScanStatus>;

    async fn scan_results(&self, scan_id: &str) -> Result<ScanResults>;

    /// Results of one scan, bypassing anything cached for it
    async fn refresh_results(&self, scan_id: &str) -> Result<ScanResults> {
        self.scan_results(scan_id).await
    }

    /// Historical results, optionally restricted to one owner (company)
    async fn all_scan_results(&self, owner: Option<&str>) -> Result<Vec<ScanResults>>;

    /// Ask the scanner to stop a scan. Returns whether it acknowledged.
    async fn cancel_scan(&self, scan_id: &str) -> bool;

    async fn scanner_health(&self) -> bool;

    async fn results_health(&self) -> bool;
}

/// [`ScanApi`] over the scanner and results HTTP APIs
pub struct ScanService {
    scanner: ApiClient,
    results: ApiClient,
}

impl ScanService {
    pub fn new(scanner: ApiClient, results: ApiClient) -> Self {
        Self { scanner, results }
    }

    pub fn scanner(&self) -> &ApiClient {
        &self.scanner
    }

    pub fn results(&self) -> &ApiClient {
        &self.results
    }

    /// API documentation published by the scanner
    pub async fn scanner_info(&self) -> Result<Value> {
        Ok(self.scanner.request(probe("/docs")).await?.data)
    }

    /// API documentation published by the results service
    pub async fn results_info(&self) -> Result<Value> {
        Ok(self.results.request(probe("/docs")).await?.data)
    }
}

/// Single-attempt, uncached GET used for health and docs probes
fn probe(path: &str) -> RequestDescriptor {
    RequestDescriptor::get(path).no_cache().retries(0)
}

/// Healthy when `/health` answers, or failing that `/docs`
async fn check_health(client: &ApiClient, name: &str) -> bool {
    match client.request(probe("/health")).await {
        Ok(_) => true,
        Err(e) => {
            warn!("{} health check failed: {}", name, e);
            match client.request(probe("/docs")).await {
                Ok(_) => true,
                Err(e) => {
                    warn!("{} docs endpoint also failed: {}", name, e);
                    false
                }
            }
        }
    }
}

fn results_tag(scan_id: &str) -> String {
    format!("scan:{}", scan_id)
}

#[async_trait]
impl ScanApi for ScanService {
    async fn launch_scan(&self, target: &TargetConfig) -> Result<ScanStatus> {
        // An unhealthy probe is logged but does not block the launch
        self.scanner_health().await;

        // Launching is not idempotent, so a failed launch is never repeated
        let request = RequestDescriptor::post("/api/v1/scans/launch")
            .json(&LaunchRequest::penetration_test(target))?
            .retries(0);
        self.scanner.send_json(request).await.inspect_err(|e| {
            error!("Failed to launch security scan: {}", e);
        })
    }

    async fn scan_status(&self, scan_id: &str) -> Result<ScanStatus> {
        let path = format!("/api/v1/scans/{}/status", path_segment(scan_id));
        let request = RequestDescriptor::get(path).no_cache().retries(0);
        self.scanner.send_json(request).await
    }

    async fn scan_results(&self, scan_id: &str) -> Result<ScanResults> {
        self.results_health().await;

        let path = format!("/api/v1/results/{}", path_segment(scan_id));
        let request = RequestDescriptor::get(path)
            .cache_ttl(CacheTtl::SCAN_RESULTS)
            .tag(results_tag(scan_id));
        let results: ScanResults = self.results.send_json(request).await.inspect_err(|e| {
            error!("Failed to fetch scan results for {}: {}", scan_id, e);
        })?;

        // Partial results of an unfinished scan must not outlive this read
        if !results.is_final() {
            self.results.invalidate_tag(&results_tag(scan_id));
        }
        Ok(results)
    }

    async fn refresh_results(&self, scan_id: &str) -> Result<ScanResults> {
        self.results.invalidate_tag(&results_tag(scan_id));
        self.scan_results(scan_id).await
    }

    async fn all_scan_results(&self, owner: Option<&str>) -> Result<Vec<ScanResults>> {
        let path = match owner {
            Some(owner) => format!("/api/v1/results/company/{}", path_segment(owner)),
            None => "/api/v1/results".to_string(),
        };
        let request = RequestDescriptor::get(path).cache_ttl(CacheTtl::SCAN_RESULT_LIST);
        let list: ScanResultList = self.results.send_json(request).await?;
        Ok(list.results)
    }

    async fn cancel_scan(&self, scan_id: &str) -> bool {
        let path = format!("/api/v1/scans/{}/cancel", path_segment(scan_id));
        let request = RequestDescriptor::post(path).retries(0);
        match self.scanner.request(request).await {
            Ok(_) => true,
            Err(e) => {
                error!("Failed to cancel scan {}: {}", scan_id, e);
                false
            }
        }
    }

    async fn scanner_health(&self) -> bool {
        check_health(&self.scanner, "Scanner API").await
    }

    async fn results_health(&self) -> bool {
        check_health(&self.results, "Results API").await
    }
}
