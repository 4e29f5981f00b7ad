//! Cache key generation

use crate::client::Method;

/// Build the canonical cache key for a request.
///
/// The key is `METHOD:path` followed by the query parameters sorted by name,
/// so the same logical read always maps to the same entry regardless of the
/// order the caller supplied its parameters in.
pub fn cache_key(method: Method, path: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|(a, _), (b, _)| a.cmp(b));

    let query = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        format!("{}:{}", method, path)
    } else {
        format!("{}:{}?{}", method, path, query)
    }
}

/// Resource tag for a request path: its first segment after any
/// `/api/vN` prefix.
///
/// `/assets/42/scan` and `/assets?page=2` both belong to `assets`;
/// `/api/v1/results/S1` belongs to `results`.
pub fn resource_tag(path: &str) -> Option<String> {
    path.split(['?', '#'])
        .next()
        .unwrap_or_default()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .find(|segment| *segment != "api" && !is_version_segment(segment))
        .map(str::to_string)
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_cache_key_deterministic() {
        let key1 = cache_key(
            Method::Get,
            "/assets",
            &params(&[("limit", "10"), ("page", "1")]),
        );
        let key2 = cache_key(
            Method::Get,
            "/assets",
            &params(&[("page", "1"), ("limit", "10")]),
        );

        assert_eq!(key1, key2);
        assert_eq!(key1, "GET:/assets?limit=10&page=1");
    }

    #[test]
    fn test_cache_key_without_params() {
        assert_eq!(cache_key(Method::Get, "/incidents", &[]), "GET:/incidents");
    }

    #[test]
    fn test_cache_key_different_paths() {
        let key1 = cache_key(Method::Get, "/assets", &[]);
        let key2 = cache_key(Method::Get, "/alerts", &[]);
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_resource_tag() {
        assert_eq!(resource_tag("/assets"), Some("assets".to_string()));
        assert_eq!(resource_tag("/assets/42/scan"), Some("assets".to_string()));
        assert_eq!(resource_tag("incidents/7"), Some("incidents".to_string()));
        assert_eq!(
            resource_tag("/api/v1/results/S1"),
            Some("results".to_string())
        );
        assert_eq!(resource_tag("/"), None);
    }
}
