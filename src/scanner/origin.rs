//! Origin mutation strategies
//!
//! Each strategy turns a target URL into one candidate `Origin` header value
//! designed to trip a particular class of origin-validation bug. Mutation is
//! pure apart from the injected [`RandomSource`].

use crate::error::{CorscanError, Result};
use crate::random::{random_label, RandomSource, LABEL_LEN};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use url::Url;

/// The fixed set of origin mutations applied to every target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginStrategy {
    ExistingPolicy,
    NullOrigin,
    ReflectedOrigin,
    SchemeOrigin,
    MangledFrontOrigin,
    MangledRearOrigin,
}

impl OriginStrategy {
    /// Every strategy, in execution order
    pub const ALL: [OriginStrategy; 6] = [
        OriginStrategy::ExistingPolicy,
        OriginStrategy::NullOrigin,
        OriginStrategy::ReflectedOrigin,
        OriginStrategy::SchemeOrigin,
        OriginStrategy::MangledFrontOrigin,
        OriginStrategy::MangledRearOrigin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OriginStrategy::ExistingPolicy => "existing-policy",
            OriginStrategy::NullOrigin => "null-origin",
            OriginStrategy::ReflectedOrigin => "reflected-origin",
            OriginStrategy::SchemeOrigin => "scheme-origin",
            OriginStrategy::MangledFrontOrigin => "mangled-front-origin",
            OriginStrategy::MangledRearOrigin => "mangled-rear-origin",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OriginStrategy::ExistingPolicy => "Sends the target's own host as a baseline",
            OriginStrategy::NullOrigin => "Sends the literal 'null' origin used by sandboxed documents",
            OriginStrategy::ReflectedOrigin => "Sends an unrelated random domain to detect blind reflection",
            OriginStrategy::SchemeOrigin => "Sends the target host with the opposite scheme (http <-> https)",
            OriginStrategy::MangledFrontOrigin => "Prefixes random text onto the host to catch suffix matching",
            OriginStrategy::MangledRearOrigin => "Injects a random label before the TLD to catch prefix matching",
        }
    }

    /// Whether the strategy needs a parsed host to build its origin
    pub fn requires_host(&self) -> bool {
        !matches!(
            self,
            OriginStrategy::NullOrigin | OriginStrategy::ReflectedOrigin
        )
    }

    /// Builds the origin for this strategy.
    ///
    /// Returns `None` when the strategy needs a host and none is available.
    pub fn origin(&self, target: Option<&TargetHost>, random: &dyn RandomSource) -> Option<String> {
        match self {
            OriginStrategy::NullOrigin => Some("null".to_string()),
            OriginStrategy::ReflectedOrigin => {
                Some(format!("{}.com", random_label(random, LABEL_LEN)))
            }
            OriginStrategy::ExistingPolicy => target.map(|t| t.authority.clone()),
            OriginStrategy::SchemeOrigin => target.map(|t| {
                let flipped = if t.scheme == "https" { "http" } else { "https" };
                format!("{flipped}://{}", t.authority)
            }),
            OriginStrategy::MangledFrontOrigin => target.map(|t| {
                format!("{}{}", random_label(random, LABEL_LEN), t.authority)
            }),
            OriginStrategy::MangledRearOrigin => target.map(|t| {
                let label = random_label(random, LABEL_LEN);
                let parts: Vec<&str> = t.host.split('.').collect();
                match (parts.first(), parts.last()) {
                    (Some(first), Some(last)) if parts.len() > 1 => {
                        format!("{first}.{label}.{last}")
                    }
                    _ => format!("{}.{label}.com", t.host),
                }
            }),
        }
    }
}

impl fmt::Display for OriginStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scheme, host and authority of a parsed target URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetHost {
    pub scheme: String,
    /// Normalized host, without port
    pub host: String,
    /// `host[:port]` exactly as written in the target, default ports included
    pub authority: String,
}

impl TargetHost {
    /// Parses a target URL; fails when it has no host component
    pub fn parse(target: &str) -> Result<Self> {
        let url = Url::parse(target)?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CorscanError::InvalidTarget(target.to_string()))?;

        let authority = match written_authority(target) {
            Some(written) => written.to_string(),
            None => match url.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            },
        };

        Ok(Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            authority,
        })
    }
}

/// Slice between `://` and the start of the path, without any userinfo
fn written_authority(target: &str) -> Option<&str> {
    let (_, rest) = target.trim().split_once("://")?;
    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#' | '\\'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    let authority = authority.rsplit_once('@').map_or(authority, |(_, a)| a);
    (!authority.is_empty()).then_some(authority)
}

/// One origin to send for a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginCandidate {
    pub strategy: OriginStrategy,
    pub origin: String,
}

/// Produces the origin candidates for a target, in strategy order.
///
/// A target that fails to parse still yields the host-independent strategies.
pub fn mutate(target: &str, random: &dyn RandomSource) -> Vec<OriginCandidate> {
    let host = match TargetHost::parse(target) {
        Ok(host) => Some(host),
        Err(e) => {
            debug!("Skipping host-based origins for '{target}': {e}");
            None
        }
    };

    OriginStrategy::ALL
        .iter()
        .filter_map(|strategy| {
            let origin = strategy.origin(host.as_ref(), random)?;
            Some(OriginCandidate {
                strategy: *strategy,
                origin,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::testing::SequenceRandom;
    use crate::random::ThreadRandom;

    fn host(target: &str) -> TargetHost {
        TargetHost::parse(target).expect("valid target")
    }

    fn is_label(s: &str) -> bool {
        s.len() == LABEL_LEN && s.chars().all(|c| c.is_ascii_lowercase())
    }

    #[test]
    fn test_existing_policy_uses_host_and_port() {
        let t = host("https://example.com:8443/path?q=1");
        let origin = OriginStrategy::ExistingPolicy.origin(Some(&t), &ThreadRandom);
        assert_eq!(origin.as_deref(), Some("example.com:8443"));

        let t = host("https://example.com/");
        let origin = OriginStrategy::ExistingPolicy.origin(Some(&t), &ThreadRandom);
        assert_eq!(origin.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_authority_keeps_default_ports_as_written() {
        let t = host("https://example.com:443/");
        assert_eq!(
            OriginStrategy::ExistingPolicy.origin(Some(&t), &ThreadRandom).as_deref(),
            Some("example.com:443")
        );
        assert_eq!(
            OriginStrategy::SchemeOrigin.origin(Some(&t), &ThreadRandom).as_deref(),
            Some("http://example.com:443")
        );

        let t = host("http://Example.COM:80/index.html");
        assert_eq!(t.host, "example.com");
        assert_eq!(
            OriginStrategy::ExistingPolicy.origin(Some(&t), &ThreadRandom).as_deref(),
            Some("Example.COM:80")
        );

        let random = SequenceRandom::new(vec![0]);
        assert_eq!(
            OriginStrategy::MangledFrontOrigin.origin(Some(&t), &random).as_deref(),
            Some("aaaaaaaaaaaaExample.COM:80")
        );
    }

    #[test]
    fn test_authority_drops_userinfo_and_query() {
        let t = host("https://user:pw@api.example.com:8443?debug=1");
        assert_eq!(t.authority, "api.example.com:8443");
    }

    #[test]
    fn test_null_origin_is_literal() {
        let origin = OriginStrategy::NullOrigin.origin(None, &ThreadRandom);
        assert_eq!(origin.as_deref(), Some("null"));
    }

    #[test]
    fn test_reflected_origin_is_random_dot_com() {
        let origin = OriginStrategy::ReflectedOrigin
            .origin(None, &ThreadRandom)
            .expect("reflected origin");
        let label = origin.strip_suffix(".com").expect(".com suffix");
        assert!(is_label(label), "unexpected label: {label}");
    }

    #[test]
    fn test_scheme_origin_flips_scheme() {
        let t = host("https://example.com");
        assert_eq!(
            OriginStrategy::SchemeOrigin.origin(Some(&t), &ThreadRandom).as_deref(),
            Some("http://example.com")
        );

        let t = host("http://example.com:8080");
        assert_eq!(
            OriginStrategy::SchemeOrigin.origin(Some(&t), &ThreadRandom).as_deref(),
            Some("https://example.com:8080")
        );
    }

    #[test]
    fn test_mangled_front_prefixes_host() {
        let t = host("https://example.com");
        let origin = OriginStrategy::MangledFrontOrigin
            .origin(Some(&t), &ThreadRandom)
            .expect("origin");
        let prefix = origin.strip_suffix("example.com").expect("host suffix");
        assert!(is_label(prefix));
    }

    #[test]
    fn test_mangled_rear_injects_middle_label() {
        let t = host("https://api.example.com/v1");
        let origin = OriginStrategy::MangledRearOrigin
            .origin(Some(&t), &ThreadRandom)
            .expect("origin");
        let parts: Vec<&str> = origin.split('.').collect();
        assert_eq!(parts.len(), 3, "unexpected origin: {origin}");
        assert_eq!(parts[0], "api");
        assert!(is_label(parts[1]));
        assert_eq!(parts[2], "com");
        assert!(!origin.contains("example"));
    }

    #[test]
    fn test_mangled_rear_single_label_host() {
        let t = host("http://localhost:3000");
        let random = SequenceRandom::new(vec![0]);
        let origin = OriginStrategy::MangledRearOrigin.origin(Some(&t), &random);
        assert_eq!(origin.as_deref(), Some("localhost.aaaaaaaaaaaa.com"));
    }

    #[test]
    fn test_mutate_runs_all_strategies_once() {
        let candidates = mutate("https://example.com", &ThreadRandom);
        let strategies: Vec<OriginStrategy> = candidates.iter().map(|c| c.strategy).collect();
        assert_eq!(strategies, OriginStrategy::ALL.to_vec());
    }

    #[test]
    fn test_mutate_unparsable_target_keeps_host_free_strategies() {
        let candidates = mutate("not a url", &ThreadRandom);
        let strategies: Vec<OriginStrategy> = candidates.iter().map(|c| c.strategy).collect();
        assert_eq!(
            strategies,
            vec![OriginStrategy::NullOrigin, OriginStrategy::ReflectedOrigin]
        );
    }

    #[test]
    fn test_requires_host() {
        let host_free: Vec<_> = OriginStrategy::ALL
            .iter()
            .filter(|s| !s.requires_host())
            .collect();
        assert_eq!(
            host_free,
            vec![&OriginStrategy::NullOrigin, &OriginStrategy::ReflectedOrigin]
        );
    }
}
