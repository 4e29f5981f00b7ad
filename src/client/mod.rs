//! Cybrty API client
//!
//! Request flow for one logical call:
//! request interceptors → cache lookup (GET) → executor attempts with
//! retry/backoff → cache store (GET) → response interceptors.

pub mod api_client;
pub mod executor;
pub mod interceptor;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod rate_limit;
pub mod request;
pub mod retry;
pub mod services;

pub use api_client::{ApiClient, ClientConfig};
pub use executor::{HttpExecutor, RequestExecutor};
pub use interceptor::{
    InterceptorChain, LoggingInterceptor, RequestInterceptor, ResponseInterceptor,
    UnauthorizedInterceptor,
};
pub use request::{
    ApiResponse, CachePolicy, Method, PreparedRequest, RequestDescriptor, path_segment,
};
pub use retry::{RetryDecision, RetryPolicy};
pub use services::{AlertService, AssetService, IncidentService, VulnerabilityService};
