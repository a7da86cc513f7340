//! reqwest-backed probe client

use crate::error::{CorscanError, Result};
use crate::http::cookies::cookie_header;
use crate::http::{ProbeResponse, Prober};
use crate::models::{CookieRule, CustomHeader, ScanConfig};
use crate::random::RandomSource;
use async_trait::async_trait;
use reqwest::header::{COOKIE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, Proxy};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Browser User-Agents rotated when no fixed value is configured
pub const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

/// Normalizes a proxy setting; bare `host:port` is treated as plain HTTP
pub fn proxy_url(proxy: &str) -> String {
    if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{proxy}")
    }
}

/// HTTP client that sends one GET per probe.
///
/// Certificate validation is disabled so self-signed and staging targets can
/// be scanned. No retries: a failed probe is simply reported.
#[derive(Clone)]
pub struct ProbeClient {
    client: Client,
    user_agent: Option<String>,
    referer: Option<String>,
    custom_header: Option<CustomHeader>,
    cookies: Vec<CookieRule>,
    random: Arc<dyn RandomSource>,
    request_count: Arc<AtomicU64>,
}

impl ProbeClient {
    /// Creates a client from scan configuration
    pub fn from_config(config: &ScanConfig, random: Arc<dyn RandomSource>) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);

        if let Some(ref proxy) = config.proxy {
            let proxy = Proxy::all(proxy_url(proxy))
                .map_err(|e| CorscanError::ConfigError(format!("Invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            user_agent: config.user_agent.clone(),
            referer: config.referer.clone(),
            custom_header: config.custom_header.clone(),
            cookies: config.cookies.clone(),
            random,
            request_count: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Returns the total number of requests made
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    fn pick_user_agent(&self) -> String {
        match self.user_agent {
            Some(ref ua) => ua.clone(),
            None => {
                let index = self.random.next_index(BROWSER_USER_AGENTS.len());
                BROWSER_USER_AGENTS[index % BROWSER_USER_AGENTS.len()].to_string()
            }
        }
    }

    fn build_request(&self, target: &str, origin: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .get(target)
            .header(USER_AGENT, self.pick_user_agent())
            .header(ORIGIN, origin);

        if let Some(ref referer) = self.referer {
            req = req.header(REFERER, referer.as_str());
        }
        if let Some(ref custom) = self.custom_header {
            req = req.header(custom.name.as_str(), custom.value.as_str());
        }
        if let Some(cookies) = cookie_header(&self.cookies, target) {
            req = req.header(COOKIE, cookies);
        }
        req
    }
}

#[async_trait]
impl Prober for ProbeClient {
    async fn probe(&self, target: &str, origin: &str) -> Result<ProbeResponse> {
        self.request_count.fetch_add(1, Ordering::Relaxed);

        let response = self.build_request(target, origin).send().await?;
        debug!("Response: {} for {target} (Origin: {origin})", response.status());

        Ok(ProbeResponse {
            status: response.status(),
            headers: response.headers().clone(),
        })
    }
}
