//! Cookie rules attached to probes by target host

use crate::models::CookieRule;
use url::Url;

impl CookieRule {
    pub fn new(domain: impl Into<String>, cookies: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            cookies: cookies.into(),
        }
    }

    /// True when the rule's domain is a substring of `host`
    pub fn matches_host(&self, host: &str) -> bool {
        !self.domain.is_empty() && host.contains(self.domain.as_str())
    }

    /// The rule's cookies as `(name, value)` pairs
    pub fn pairs(&self) -> Vec<(String, String)> {
        parse_cookie_pairs(&self.cookies)
    }

    /// The rule's pairs rendered as a `Cookie` header value
    pub fn header_value(&self) -> String {
        self.pairs()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Splits `a=1; b=2` into pairs. Only the first `=` separates name from value;
/// entries without `=` are dropped.
pub fn parse_cookie_pairs(cookies: &str) -> Vec<(String, String)> {
    cookies
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Builds the Cookie header for `target` from every matching rule
pub fn cookie_header(rules: &[CookieRule], target: &str) -> Option<String> {
    if rules.is_empty() {
        return None;
    }
    let url = Url::parse(target).ok()?;
    let host = url.host_str()?;

    let pairs: Vec<String> = rules
        .iter()
        .filter(|rule| rule.matches_host(host))
        .flat_map(|rule| rule.pairs())
        .map(|(name, value)| format!("{name}={value}"))
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
