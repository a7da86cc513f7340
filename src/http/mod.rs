//! HTTP probing for the corscan scanner

pub mod client;
pub mod cookies;

use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

pub use client::ProbeClient;

/// Status and headers of a probe response; the body is never read
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Issues one request per (target, origin) pair
#[async_trait]
pub trait Prober: Send + Sync {
    /// Sends a single GET to `target` carrying `origin` as the Origin header.
    ///
    /// Any network failure (DNS, connect, TLS, timeout) is returned as an error
    /// and affects only this probe.
    async fn probe(&self, target: &str, origin: &str) -> Result<ProbeResponse>;
}
