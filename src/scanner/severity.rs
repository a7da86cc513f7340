//! Risk flags derived from a recorded CORS response
//!
//! Analysis is presentation logic: it runs while reporting, never while
//! scanning, and has no side effects.

use crate::models::{ScanResult, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative CORS risk indicators. Several may apply to one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskFlag {
    WildcardOrigin,
    NullOriginAccepted,
    OriginReflected,
    CriticalWildcardWithCredentials,
}

impl RiskFlag {
    pub fn name(&self) -> &'static str {
        match self {
            RiskFlag::WildcardOrigin => "wildcard-origin",
            RiskFlag::NullOriginAccepted => "null-origin-accepted",
            RiskFlag::OriginReflected => "origin-reflected",
            RiskFlag::CriticalWildcardWithCredentials => "critical-wildcard-with-credentials",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RiskFlag::WildcardOrigin => Severity::Medium,
            RiskFlag::NullOriginAccepted => Severity::High,
            RiskFlag::OriginReflected => Severity::Info,
            RiskFlag::CriticalWildcardWithCredentials => Severity::Critical,
        }
    }

    /// One-line explanation shown next to a result
    pub fn message(&self) -> &'static str {
        match self {
            RiskFlag::WildcardOrigin => "Wildcard origin allows any domain",
            RiskFlag::NullOriginAccepted => "Null origin accepted, exploitable from sandboxed frames",
            RiskFlag::OriginReflected => "Origin reflection detected",
            RiskFlag::CriticalWildcardWithCredentials => {
                "Wildcard origin with credentials, major security flaw"
            }
        }
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How `origin-reflected` is decided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReflectionRule {
    /// Allow-Origin is set, not `*`, and differs from the origin that was sent
    #[default]
    Mismatch,
    /// Allow-Origin is set, not `*`, and equals the origin that was sent
    Echo,
}

/// Flags a result using the default [`ReflectionRule::Mismatch`] rule
pub fn analyze(result: &ScanResult) -> Vec<RiskFlag> {
    analyze_with(result, ReflectionRule::default())
}

/// Flags a result. The reflection check compares against the exact origin
/// string sent with the probe, without normalization.
pub fn analyze_with(result: &ScanResult, rule: ReflectionRule) -> Vec<RiskFlag> {
    let mut flags = Vec::new();
    let acao = result.headers.allow_origin.as_deref().unwrap_or("");
    let acac = result.headers.allow_credentials.as_deref().unwrap_or("");

    if acao == "*" {
        flags.push(RiskFlag::WildcardOrigin);
    }
    if acao == "null" {
        flags.push(RiskFlag::NullOriginAccepted);
    }

    let specific = !acao.is_empty() && acao != "*";
    let reflected = match rule {
        ReflectionRule::Mismatch => specific && acao != result.origin,
        ReflectionRule::Echo => specific && acao == result.origin,
    };
    if reflected {
        flags.push(RiskFlag::OriginReflected);
    }

    if acao == "*" && acac == "true" {
        flags.push(RiskFlag::CriticalWildcardWithCredentials);
    }

    flags
}

/// Most severe level among `flags`
pub fn highest_severity(flags: &[RiskFlag]) -> Option<Severity> {
    flags.iter().map(RiskFlag::severity).min()
}
