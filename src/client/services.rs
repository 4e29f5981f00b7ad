//! Resource services for the platform API
//!
//! Thin typed wrappers over [`ApiClient`]. Reads go through the response
//! cache; every mutation drops the cached entries of its resource.

use serde_json::{Value, json};

use super::api_client::ApiClient;
use super::models::{
    Alert, Asset, AssetFilter, AssetScan, CreateIncidentRequest, Incident, ListFilter,
    PageParams, PaginatedResponse, ThreatIntelQuery, UpdateIncidentRequest, Vulnerability,
    VulnerabilityFilter,
};
use super::request::{RequestDescriptor, path_segment};
use crate::error::Result;

fn with_page(request: RequestDescriptor, page: &PageParams) -> RequestDescriptor {
    request
        .query_opt("page", page.page)
        .query_opt("limit", page.limit)
}

fn with_list_filter(request: RequestDescriptor, filter: &ListFilter) -> RequestDescriptor {
    with_page(request, &filter.page)
        .query_opt("severity", filter.severity.as_deref())
        .query_opt("status", filter.status.as_deref())
        .query_opt("assignee", filter.assignee.as_deref())
}

/// Incident management
pub struct IncidentService<'a> {
    client: &'a ApiClient,
}

impl<'a> IncidentService<'a> {
    const TAG: &'static str = "incidents";

    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &ListFilter) -> Result<PaginatedResponse<Incident>> {
        let request = with_list_filter(RequestDescriptor::get("/incidents"), filter);
        self.client.send_json(request).await
    }

    pub async fn get(&self, id: &str) -> Result<Incident> {
        self.client.get_json(&format!("/incidents/{}", path_segment(id))).await
    }

    pub async fn create(&self, incident: &CreateIncidentRequest) -> Result<Incident> {
        let request = RequestDescriptor::post("/incidents").json(incident)?;
        self.mutate(request).await
    }

    pub async fn update(&self, id: &str, update: &UpdateIncidentRequest) -> Result<Incident> {
        let request =
            RequestDescriptor::put(format!("/incidents/{}", path_segment(id))).json(update)?;
        self.mutate(request).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("/incidents/{}", path_segment(id))).await?;
        self.client.invalidate_tag(Self::TAG);
        Ok(())
    }

    pub async fn assign(&self, id: &str, assignee: &str) -> Result<Incident> {
        let path = format!("/incidents/{}/assign", path_segment(id));
        let request = RequestDescriptor::patch(path)
            .body(json!({ "assignee": assignee }));
        self.mutate(request).await
    }

    pub async fn close(&self, id: &str, resolution: &str) -> Result<Incident> {
        let path = format!("/incidents/{}/close", path_segment(id));
        let request = RequestDescriptor::patch(path)
            .body(json!({ "resolution": resolution }));
        self.mutate(request).await
    }

    async fn mutate(&self, request: RequestDescriptor) -> Result<Incident> {
        let incident = self.client.send_json(request).await?;
        self.client.invalidate_tag(Self::TAG);
        Ok(incident)
    }
}

/// Detection alerts and threat intelligence (read-only)
pub struct AlertService<'a> {
    client: &'a ApiClient,
}

impl<'a> AlertService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &ListFilter) -> Result<PaginatedResponse<Alert>> {
        let request = with_list_filter(RequestDescriptor::get("/alerts"), filter);
        self.client.send_json(request).await
    }

    pub async fn get(&self, id: &str) -> Result<Alert> {
        self.client.get_json(&format!("/alerts/{}", path_segment(id))).await
    }

    /// Indicator lookups; list parameters are sent comma-separated
    pub async fn threat_intelligence(&self, query: &ThreatIntelQuery) -> Result<Vec<Value>> {
        let join = |values: &[String]| (!values.is_empty()).then(|| values.join(","));
        let request = RequestDescriptor::get("/threat-intelligence")
            .query_opt("indicators", join(&query.indicators))
            .query_opt("sources", join(&query.sources))
            .query_opt("confidence", query.confidence);
        self.client.send_json(request).await
    }
}

/// Asset inventory
pub struct AssetService<'a> {
    client: &'a ApiClient,
}

impl<'a> AssetService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &AssetFilter) -> Result<PaginatedResponse<Asset>> {
        let request = with_page(RequestDescriptor::get("/assets"), &filter.page)
            .query_opt("type", filter.asset_type.as_deref())
            .query_opt("owner", filter.owner.as_deref())
            .query_opt("riskScore", filter.risk_score);
        self.client.send_json(request).await
    }

    pub async fn get(&self, id: &str) -> Result<Asset> {
        self.client.get_json(&format!("/assets/{}", path_segment(id))).await
    }

    /// Trigger an on-demand scan of one asset
    pub async fn scan(&self, id: &str) -> Result<AssetScan> {
        let path = format!("/assets/{}/scan", path_segment(id));
        let scan = self.client.send_json(RequestDescriptor::post(path)).await?;
        self.client.invalidate_tag("assets");
        Ok(scan)
    }
}

/// Vulnerability tracking
pub struct VulnerabilityService<'a> {
    client: &'a ApiClient,
}

impl<'a> VulnerabilityService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        filter: &VulnerabilityFilter,
    ) -> Result<PaginatedResponse<Vulnerability>> {
        let request = with_page(RequestDescriptor::get("/vulnerabilities"), &filter.page)
            .query_opt("severity", filter.severity.as_deref())
            .query_opt("status", filter.status.as_deref())
            .query_opt("assetId", filter.asset_id.as_deref());
        self.client.send_json(request).await
    }

    pub async fn get(&self, id: &str) -> Result<Vulnerability> {
        self.client
            .get_json(&format!("/vulnerabilities/{}", path_segment(id)))
            .await
    }

    /// Mark a vulnerability as patched
    pub async fn patch(&self, id: &str) -> Result<Vulnerability> {
        let path = format!("/vulnerabilities/{}/patch", path_segment(id));
        let vuln = self.client.send_json(RequestDescriptor::patch(path)).await?;
        self.client.invalidate_tag("vulnerabilities");
        Ok(vuln)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::client::Method;
    use crate::client::mock::MockExecutor;
    use crate::client::models::{IncidentStatus, Severity};
    use std::sync::Arc;

    fn incident_json(status: &str) -> Value {
        json!({
            "id": "INC-1",
            "title": "Credential stuffing",
            "severity": "high",
            "status": status
        })
    }

    fn page_of(items: Vec<Value>) -> Value {
        json!({"data": items, "total": 1, "page": 1, "limit": 20, "total_pages": 1})
    }

    fn client(mock: &Arc<MockExecutor>) -> ApiClient {
        ApiClient::new(ClientConfig::new("http://api.test/api"), mock.clone())
    }

    #[tokio::test]
    async fn test_list_incidents_sends_filters() {
        let mock = Arc::new(MockExecutor::new().with_response(page_of(vec![incident_json("open")])));
        let client = client(&mock);

        let filter = ListFilter {
            page: PageParams::new(2, 20),
            severity: Some("high".to_string()),
            ..Default::default()
        };
        let page = IncidentService::new(&client).list(&filter).await.unwrap();

        assert_eq!(page.data[0].status, IncidentStatus::Open);
        assert_eq!(
            mock.captured()[0].request.url,
            "http://api.test/api/incidents?page=2&limit=20&severity=high"
        );
    }

    #[tokio::test]
    async fn test_assign_invalidates_cached_incidents() {
        let mock = Arc::new(
            MockExecutor::new()
                .with_response(page_of(vec![incident_json("open")]))
                .with_response(incident_json("investigating"))
                .with_response(page_of(vec![incident_json("investigating")])),
        );
        let client = client(&mock);
        let service = IncidentService::new(&client);

        service.list(&ListFilter::default()).await.unwrap();
        let assigned = service.assign("INC-1", "alice").await.unwrap();
        let page = service.list(&ListFilter::default()).await.unwrap();

        assert_eq!(assigned.status, IncidentStatus::Investigating);
        assert_eq!(page.data[0].status, IncidentStatus::Investigating);
        assert_eq!(mock.calls(), 3);

        let assign = &mock.captured()[1].request;
        assert_eq!(assign.method, Method::Patch);
        assert_eq!(assign.body, Some(json!({"assignee": "alice"})));
    }

    #[tokio::test]
    async fn test_create_incident_body() {
        let mock = Arc::new(MockExecutor::new().with_response(incident_json("open")));
        let client = client(&mock);

        let request = CreateIncidentRequest {
            title: "Credential stuffing".to_string(),
            description: "Burst of failed logins".to_string(),
            severity: Severity::High,
            assigned_to: None,
            tags: vec![],
        };
        IncidentService::new(&client).create(&request).await.unwrap();

        let body = mock.captured()[0].request.body.clone().unwrap();
        assert_eq!(body["severity"], "high");
        assert!(body.get("assigned_to").is_none());
    }

    #[tokio::test]
    async fn test_delete_incident_invalidates_detail_reads() {
        let mock = Arc::new(MockExecutor::new().always_respond(incident_json("open")));
        let client = client(&mock);
        let service = IncidentService::new(&client);

        service.get("INC-1").await.unwrap();
        service.delete("INC-1").await.unwrap();
        service.get("INC-1").await.unwrap();

        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_scan_asset() {
        let mock = Arc::new(MockExecutor::new().with_response(json!({"scanId": "AS-9"})));
        let client = client(&mock);

        let scan = AssetService::new(&client).scan("a-1").await.unwrap();

        assert_eq!(scan.scan_id, "AS-9");
        assert_eq!(
            mock.captured()[0].request.url,
            "http://api.test/api/assets/a-1/scan"
        );
    }

    #[tokio::test]
    async fn test_threat_intelligence_joins_lists() {
        let mock = Arc::new(MockExecutor::new().with_response(json!([{"indicator": "1.2.3.4"}])));
        let client = client(&mock);

        let query = ThreatIntelQuery {
            indicators: vec!["1.2.3.4".into(), "evil.example".into()],
            sources: vec![],
            confidence: Some(80),
        };
        let intel = AlertService::new(&client)
            .threat_intelligence(&query)
            .await
            .unwrap();

        assert_eq!(intel.len(), 1);
        assert_eq!(
            mock.captured()[0].request.url,
            "http://api.test/api/threat-intelligence?indicators=1.2.3.4%2Cevil.example&confidence=80"
        );
    }

    #[tokio::test]
    async fn test_patch_vulnerability() {
        let mock = Arc::new(MockExecutor::new().with_response(json!({
            "id": "V-1",
            "cve_id": "CVE-2024-0001",
            "title": "RCE in parser",
            "severity": "critical",
            "status": "remediated"
        })));
        let client = client(&mock);

        let vuln = VulnerabilityService::new(&client).patch("V-1").await.unwrap();

        assert_eq!(vuln.severity, Severity::Critical);
        assert_eq!(mock.captured()[0].request.method, Method::Patch);
    }
}
