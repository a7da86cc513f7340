//! Extraction of CORS response headers

use crate::models::CorsHeaderSet;
use reqwest::header::HeaderMap;

pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
pub const ALLOW_CREDENTIALS: &str = "access-control-allow-credentials";
pub const ALLOW_METHODS: &str = "access-control-allow-methods";
pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
pub const MAX_AGE: &str = "access-control-max-age";
pub const EXPOSE_HEADERS: &str = "access-control-expose-headers";

/// Reads the first value of `name`, empty values count as absent
fn extract(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?;
    let value = String::from_utf8_lossy(value.as_bytes());
    if value.is_empty() {
        return None;
    }
    Some(value.replace(',', ";"))
}

impl CorsHeaderSet {
    /// Builds the set from a response's headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            allow_origin: extract(headers, ALLOW_ORIGIN),
            allow_credentials: extract(headers, ALLOW_CREDENTIALS),
            allow_methods: extract(headers, ALLOW_METHODS),
            allow_headers: extract(headers, ALLOW_HEADERS),
            max_age: extract(headers, MAX_AGE),
            expose_headers: extract(headers, EXPOSE_HEADERS),
        }
    }

    /// True when at least one CORS header was returned
    pub fn has_any(&self) -> bool {
        self.entries().iter().any(|(_, value)| value.is_some())
    }

    /// Display name and value of each header, in report column order
    pub fn entries(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("Access-Control-Allow-Origin", self.allow_origin.as_deref()),
            ("Access-Control-Allow-Credentials", self.allow_credentials.as_deref()),
            ("Access-Control-Allow-Methods", self.allow_methods.as_deref()),
            ("Access-Control-Allow-Headers", self.allow_headers.as_deref()),
            ("Access-Control-Max-Age", self.max_age.as_deref()),
            ("Access-Control-Expose-Headers", self.expose_headers.as_deref()),
        ]
    }
}
