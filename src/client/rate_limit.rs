//! Reactive per-endpoint rate limiting
//!
//! Limiting only activates for an endpoint category after the API has
//! answered 429 for it. From then on every request in that category waits
//! for a permit before it is dispatched.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;

use super::interceptor::{RequestInterceptor, ResponseInterceptor};
use super::request::{Method, RequestDescriptor};
use crate::error::{ApiError, Result};

/// Categories of API endpoints with their own limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointCategory {
    /// Scan lifecycle calls (`/scans...`), polled frequently
    Scan,
    /// Scan result reads (`/results...`)
    Results,
    /// Mutations of platform resources (POST/PUT/PATCH/DELETE)
    Write,
    /// All other reads
    Default,
}

impl EndpointCategory {
    pub const ALL: [EndpointCategory; 4] = [
        EndpointCategory::Scan,
        EndpointCategory::Results,
        EndpointCategory::Write,
        EndpointCategory::Default,
    ];

    /// Categorize a request by path and method.
    pub fn from_request(path: &str, method: Method) -> Self {
        let path = path.strip_prefix("/api/v1").unwrap_or(path);

        if path.starts_with("/scans") {
            return EndpointCategory::Scan;
        }
        if path.starts_with("/results") {
            return EndpointCategory::Results;
        }
        if method != Method::Get {
            return EndpointCategory::Write;
        }
        EndpointCategory::Default
    }

    /// Requests per second once limiting is active
    pub fn rate_limit(&self) -> u32 {
        match self {
            EndpointCategory::Scan => 2,
            EndpointCategory::Results => 10,
            EndpointCategory::Write => 5,
            EndpointCategory::Default => 10,
        }
    }
}

/// Rate limiter state for a single endpoint category.
pub struct EndpointRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    active: AtomicBool,
    category: EndpointCategory,
}

impl EndpointRateLimiter {
    pub fn new(category: EndpointCategory) -> Self {
        let quota =
            Quota::per_second(NonZeroU32::new(category.rate_limit()).unwrap_or(NonZeroU32::MIN));

        Self {
            limiter: RateLimiter::direct(quota),
            active: AtomicBool::new(false),
            category,
        }
    }

    pub fn activate(&self) {
        let was_active = self.active.swap(true, Ordering::SeqCst);
        if !was_active {
            debug!("Rate limiting activated for {:?}", self.category);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub async fn wait_if_active(&self) {
        if self.is_active() {
            debug!("Waiting for rate limiter {:?}", self.category);
            self.limiter.until_ready().await;
        }
    }
}

/// Interceptor owning one limiter per endpoint category
pub struct RateLimitInterceptor {
    limiters: HashMap<EndpointCategory, EndpointRateLimiter>,
}

impl Default for RateLimitInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitInterceptor {
    pub fn new() -> Self {
        let limiters = EndpointCategory::ALL
            .into_iter()
            .map(|category| (category, EndpointRateLimiter::new(category)))
            .collect();
        Self { limiters }
    }

    pub fn is_active(&self, category: EndpointCategory) -> bool {
        self.limiters
            .get(&category)
            .map(EndpointRateLimiter::is_active)
            .unwrap_or(false)
    }
}

#[async_trait]
impl RequestInterceptor for RateLimitInterceptor {
    async fn on_request(&self, request: RequestDescriptor) -> Result<RequestDescriptor> {
        let category = EndpointCategory::from_request(&request.path, request.method);
        if let Some(limiter) = self.limiters.get(&category) {
            limiter.wait_if_active().await;
        }
        Ok(request)
    }
}

#[async_trait]
impl ResponseInterceptor for RateLimitInterceptor {
    async fn on_error(&self, request: &RequestDescriptor, err: &ApiError) -> Result<()> {
        if err.status() == Some(429) {
            let category = EndpointCategory::from_request(&request.path, request.method);
            if let Some(limiter) = self.limiters.get(&category) {
                limiter.activate();
            }
        }
        Ok(())
    }
}
