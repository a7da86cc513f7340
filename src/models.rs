//! Core data models for the corscan scanner

use crate::scanner::origin::OriginStrategy;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level used to rank CORS risk flags
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    /// Parses a case-insensitive severity name (`critical`, `high`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }
}

/// Cookies attached to every probe whose target host contains `domain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRule {
    /// Substring matched against the target host
    pub domain: String,
    /// Semicolon-separated `name=value` pairs
    pub cookies: String,
}

/// A single extra request header sent with every probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomHeader {
    pub name: String,
    pub value: String,
}

/// Configuration for a scan session.
///
/// Built once before dispatch and shared read-only by every worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Number of concurrent workers
    pub threads: usize,
    /// Per-request timeout in seconds (connect + response)
    pub timeout_secs: u64,
    /// HTTP/HTTPS proxy, either `host:port` or a full URL
    pub proxy: Option<String>,
    /// Fixed User-Agent; a browser string is picked per request when unset
    pub user_agent: Option<String>,
    /// Referer header value
    pub referer: Option<String>,
    /// Extra header sent with every probe
    pub custom_header: Option<CustomHeader>,
    /// Cookie rules matched against each target host
    #[serde(default)]
    pub cookies: Vec<CookieRule>,
    /// Whether to follow HTTP redirects
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,
}

fn default_follow_redirects() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threads: 10,
            timeout_secs: 10,
            proxy: None,
            user_agent: None,
            referer: None,
            custom_header: None,
            cookies: Vec::new(),
            follow_redirects: true,
        }
    }
}

/// The six CORS response headers inspected on every probe.
///
/// A field is `Some` only when the header was present and non-empty. Commas
/// inside values are stored as semicolons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorsHeaderSet {
    /// Access-Control-Allow-Origin
    pub allow_origin: Option<String>,
    /// Access-Control-Allow-Credentials
    pub allow_credentials: Option<String>,
    /// Access-Control-Allow-Methods
    pub allow_methods: Option<String>,
    /// Access-Control-Allow-Headers
    pub allow_headers: Option<String>,
    /// Access-Control-Max-Age
    pub max_age: Option<String>,
    /// Access-Control-Expose-Headers
    pub expose_headers: Option<String>,
}

/// A probe that elicited at least one CORS header
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanResult {
    /// Target URL as supplied
    pub url: String,
    /// Origin header value sent with the probe
    pub origin: String,
    /// Strategy that produced the origin
    pub strategy: OriginStrategy,
    /// CORS headers returned by the server
    pub headers: CorsHeaderSet,
}

impl ScanResult {
    pub fn new(
        url: impl Into<String>,
        origin: impl Into<String>,
        strategy: OriginStrategy,
        headers: CorsHeaderSet,
    ) -> Self {
        Self {
            url: url.into(),
            origin: origin.into(),
            strategy,
            headers,
        }
    }
}

/// Counters reported by the dispatcher once a scan reaches `Done`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Targets whose strategies all ran before any cancellation
    pub targets_completed: u64,
    /// Requests issued
    pub probes_sent: u64,
    /// Requests that ended in a network error
    pub probes_failed: u64,
    /// Strategies skipped because the target did not parse
    pub probes_skipped: u64,
    /// Results appended to the sink
    pub results_recorded: u64,
    /// Whether the scan stopped early on cancellation
    pub cancelled: bool,
}

/// Full record of a scan, suitable for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Unique scan identifier
    pub scan_id: String,
    /// Scan start time (local timezone)
    pub started_at: DateTime<Local>,
    /// Scan end time (local timezone)
    pub finished_at: Option<DateTime<Local>>,
    /// Number of targets supplied
    pub targets: usize,
    /// Every probe that returned CORS headers
    pub results: Vec<ScanResult>,
    /// Dispatcher counters
    pub outcome: ScanOutcome,
}

impl ScanReport {
    /// Creates an empty report stamped with the current time
    pub fn new(targets: usize) -> Self {
        Self {
            scan_id: uuid::Uuid::new_v4().to_string(),
            started_at: Local::now(),
            finished_at: None,
            targets,
            results: Vec::new(),
            outcome: ScanOutcome::default(),
        }
    }

    /// Marks the scan as finished
    pub fn finish(&mut self, results: Vec<ScanResult>, outcome: ScanOutcome) {
        self.results = results;
        self.outcome = outcome;
        self.finished_at = Some(Local::now());
    }
}
