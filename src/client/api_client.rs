//! Resilient API client
//!
//! Combines request interceptors, the response cache, single-attempt
//! execution, the retry policy, and response interceptors into one
//! `request` call.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::executor::{HttpExecutor, RequestExecutor};
use super::interceptor::{
    InterceptorChain, LoggingInterceptor, RequestInterceptor, ResponseInterceptor,
    UnauthorizedInterceptor,
};
use super::rate_limit::RateLimitInterceptor;
use super::request::{ApiResponse, CachePolicy, PreparedRequest, RequestDescriptor};
use super::retry::{RetryDecision, RetryPolicy};
use crate::cache::{CacheStats, CacheTtl, ResponseCache, cache_key, resource_tag};
use crate::error::{ApiError, ConfigError, Result};

/// Default per-attempt deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is resolved against
    pub base_url: String,
    /// Per-attempt deadline unless a request overrides it
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// TTL for cached GET responses unless a request overrides it
    pub cache_ttl: Duration,
    /// Disable the response cache entirely (`--no-cache`)
    pub cache_enabled: bool,
    /// Sent as `X-API-Key`
    pub api_key: Option<String>,
    /// Sent as `Authorization: Bearer <token>`
    pub auth_token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            cache_ttl: CacheTtl::DEFAULT,
            cache_enabled: true,
            api_key: None,
            auth_token: None,
        }
    }
}

/// API client with caching, retries, and interceptors
pub struct ApiClient {
    config: ClientConfig,
    executor: Arc<dyn RequestExecutor>,
    cache: ResponseCache<ApiResponse<Value>>,
    interceptors: InterceptorChain,
}

impl ApiClient {
    /// Create a client over a specific executor
    pub fn new(config: ClientConfig, executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            config,
            executor,
            cache: ResponseCache::new(),
            interceptors: InterceptorChain::new(),
        }
    }

    /// Create a client that talks HTTP
    pub fn http(config: ClientConfig) -> Self {
        Self::new(config, Arc::new(HttpExecutor::new()))
    }

    /// Install the default interceptors: request/response logging, reactive
    /// rate limiting, and `on_unauthorized` for any 401.
    pub fn with_default_interceptors(
        mut self,
        on_unauthorized: impl Fn(&ApiError) + Send + Sync + 'static,
    ) -> Self {
        let rate_limit = Arc::new(RateLimitInterceptor::new());

        self.add_request_interceptor(Arc::new(LoggingInterceptor));
        self.add_request_interceptor(rate_limit.clone());
        self.add_response_interceptor(Arc::new(LoggingInterceptor));
        self.add_response_interceptor(rate_limit);
        self.add_response_interceptor(Arc::new(UnauthorizedInterceptor::new(on_unauthorized)));
        self
    }

    pub fn add_request_interceptor(&mut self, interceptor: Arc<dyn RequestInterceptor>) {
        self.interceptors.add_request(interceptor);
    }

    pub fn add_response_interceptor(&mut self, interceptor: Arc<dyn ResponseInterceptor>) {
        self.interceptors.add_response(interceptor);
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Perform one logical call.
    ///
    /// Always resolves to either a response or the terminal error of the
    /// last attempt; interceptors see the error first but cannot hide it.
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<ApiResponse<Value>> {
        let request = self.interceptors.apply_request(descriptor).await?;

        let key = self.cache_key_for(&request);
        if let Some(ref key) = key
            && let Some(cached) = self.cache.get(key)
        {
            debug!("Cache hit: {}", key);
            return Ok(cached);
        }

        let prepared = self.prepare(&request)?;
        let policy = match request.retries {
            Some(retries) => self.config.retry.with_max_retries(retries),
            None => self.config.retry,
        };

        let mut attempt = 0;
        loop {
            match self.executor.execute(&prepared).await {
                Ok(response) => {
                    if let Some(ref key) = key {
                        self.store(key, &request, response.clone());
                    }
                    return self.interceptors.apply_response(&request, response).await;
                }
                Err(err) => match policy.decide(&err, attempt) {
                    RetryDecision::Retry(delay) => {
                        warn!(
                            "Attempt {}/{} for {} {} failed: {}. Retrying in {:?}",
                            attempt + 1,
                            policy.max_retries + 1,
                            request.method,
                            request.path,
                            err,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    RetryDecision::Stop => {
                        return Err(self.interceptors.apply_error(&request, err).await);
                    }
                },
            }
        }
    }

    /// Perform a call and decode the payload
    pub async fn send_json<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        Ok(self.request(descriptor).await?.decode::<T>()?.data)
    }

    /// GET `path` and decode the payload
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(RequestDescriptor::get(path)).await
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse<Value>> {
        self.request(RequestDescriptor::get(path)).await
    }

    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse<Value>> {
        let descriptor = query
            .iter()
            .fold(RequestDescriptor::get(path), |d, (k, v)| d.query(*k, v));
        self.request(descriptor).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiResponse<Value>> {
        self.request(with_body(RequestDescriptor::post(path), body))
            .await
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiResponse<Value>> {
        self.request(with_body(RequestDescriptor::put(path), body))
            .await
    }

    pub async fn patch(&self, path: &str, body: Option<Value>) -> Result<ApiResponse<Value>> {
        self.request(with_body(RequestDescriptor::patch(path), body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse<Value>> {
        self.request(RequestDescriptor::delete(path)).await
    }

    /// Drop every cached response (`None`) or those whose key contains `pattern`
    pub fn invalidate_cache(&self, pattern: Option<&str>) -> usize {
        let removed = self.cache.invalidate(pattern);
        debug!("Invalidated {} cache entries ({:?})", removed, pattern);
        removed
    }

    /// Drop every cached response tagged with `tag`
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let removed = self.cache.invalidate_tag(tag);
        debug!("Invalidated {} cache entries tagged {}", removed, tag);
        removed
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn cache_key_for(&self, request: &RequestDescriptor) -> Option<String> {
        let cacheable = self.config.cache_enabled
            && request.method.is_cacheable()
            && request.cache != CachePolicy::Bypass;
        cacheable.then(|| cache_key(request.method, &request.path, &request.query))
    }

    fn store(&self, key: &str, request: &RequestDescriptor, response: ApiResponse<Value>) {
        let ttl = match request.cache {
            CachePolicy::Ttl(ttl) => ttl,
            _ => self.config.cache_ttl,
        };
        let tags = resource_tag(&request.path)
            .into_iter()
            .chain(request.tags.iter().cloned());
        self.cache.set_tagged(key, response, ttl, tags);
    }

    /// Resolve a descriptor into an absolute URL, final headers, and deadline
    fn prepare(&self, request: &RequestDescriptor) -> Result<PreparedRequest> {
        let base = self.config.base_url.trim_end_matches('/');
        let path = request.path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, path)).map_err(|e| {
            ConfigError::Invalid(format!("Invalid request URL {}/{}: {}", base, path, e))
        })?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &request.query {
                pairs.append_pair(k, v);
            }
        }

        Ok(PreparedRequest {
            method: request.method,
            url: url.to_string(),
            headers: self.build_headers(&request.headers),
            body: request.body.clone(),
            timeout: request.timeout.unwrap_or(self.config.timeout),
        })
    }

    fn build_headers(&self, extra: &[(String, String)]) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(ref key) = self.config.api_key {
            headers.push(("X-API-Key".to_string(), key.clone()));
        }
        if let Some(ref token) = self.config.auth_token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        // Per-call headers win over defaults
        for (name, value) in extra {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        headers
    }
}

fn with_body(descriptor: RequestDescriptor, body: Option<Value>) -> RequestDescriptor {
    match body {
        Some(body) => descriptor.body(body),
        None => descriptor,
    }
}
