//! Cybrty - resilient client and CLI for the Cybrty security platform
//!
//! [`client::ApiClient`] layers caching, retries, and interceptors over
//! HTTP; [`scan::ScanOrchestrator`] runs penetration tests end to end.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod scan;
