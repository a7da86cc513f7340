//! Configuration management for the corscan scanner

use crate::error::{CorscanError, Result};
use crate::http::client::proxy_url;
use crate::models::{CookieRule, CustomHeader, ScanConfig};
use reqwest::header::{HeaderName, HeaderValue};
use serde::Deserialize;
use std::path::Path;

/// Separator used by the CLI for `name~~~value` and `domain~~~cookies`
pub const FIELD_DELIMITER: &str = "~~~";

/// File-based configuration structure matching default.toml
#[derive(Debug, Deserialize)]
struct FileConfig {
    scan: Option<ScanSection>,
    request: Option<RequestSection>,
    #[serde(default)]
    cookies: Vec<CookieRule>,
    output: Option<OutputSettings>,
}

#[derive(Debug, Deserialize)]
struct ScanSection {
    threads: Option<usize>,
    timeout_secs: Option<u64>,
    follow_redirects: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RequestSection {
    user_agent: Option<String>,
    referer: Option<String>,
    proxy: Option<String>,
    custom_header: Option<CustomHeader>,
}

/// Where reports go, as read from the `[output]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSettings {
    pub csv_name: Option<String>,
    pub json_path: Option<String>,
}

/// Settings loaded from a configuration file
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub scan: ScanConfig,
    pub output: OutputSettings,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
    let content = std::fs::read_to_string(path)?;
    let file_config: FileConfig = toml::from_str(&content)?;

    let mut config = ScanConfig::default();

    if let Some(scan) = file_config.scan {
        if let Some(threads) = scan.threads {
            config.threads = threads;
        }
        if let Some(timeout) = scan.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(follow) = scan.follow_redirects {
            config.follow_redirects = follow;
        }
    }

    if let Some(request) = file_config.request {
        config.user_agent = request.user_agent;
        config.referer = request.referer;
        config.proxy = request.proxy;
        config.custom_header = request.custom_header;
    }

    config.cookies = file_config.cookies;

    Ok(LoadedConfig {
        scan: config,
        output: file_config.output.unwrap_or_default(),
    })
}

/// Parses `name~~~value` into a custom header
pub fn parse_custom_header(raw: &str) -> Result<CustomHeader> {
    let (name, value) = split_pair(raw)
        .ok_or_else(|| CorscanError::ConfigError(format!("Invalid custom header '{raw}', expected name~~~value")))?;
    Ok(CustomHeader {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Parses `domain~~~name=value; name2=value2` into a cookie rule
pub fn parse_cookie_rule(raw: &str) -> Result<CookieRule> {
    let (domain, cookies) = split_pair(raw)
        .ok_or_else(|| CorscanError::ConfigError(format!("Invalid cookie rule '{raw}', expected domain~~~cookies")))?;
    Ok(CookieRule::new(domain, cookies))
}

fn split_pair(raw: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = raw.split(FIELD_DELIMITER).collect();
    match parts.as_slice() {
        [left, right] if !left.trim().is_empty() => Some((left.trim(), right.trim())),
        _ => None,
    }
}

/// Merges CLI arguments into an existing ScanConfig
#[allow(clippy::too_many_arguments)]
pub fn merge_cli_args(
    config: &mut ScanConfig,
    threads: Option<usize>,
    timeout: Option<u64>,
    proxy: Option<String>,
    user_agent: Option<String>,
    referer: Option<String>,
    custom_header: Option<String>,
    cookies: Vec<String>,
) -> Result<()> {
    if let Some(t) = threads {
        config.threads = t;
    }
    if let Some(t) = timeout {
        config.timeout_secs = t;
    }
    if let Some(p) = proxy {
        config.proxy = Some(p);
    }
    if let Some(ua) = user_agent {
        config.user_agent = Some(ua);
    }
    if let Some(r) = referer {
        config.referer = Some(r);
    }
    if let Some(h) = custom_header {
        config.custom_header = Some(parse_custom_header(&h)?);
    }
    for rule in cookies {
        config.cookies.push(parse_cookie_rule(&rule)?);
    }
    Ok(())
}

/// Rejects settings that would make every probe fail
pub fn validate(config: &ScanConfig) -> Result<()> {
    if config.threads == 0 {
        return Err(CorscanError::ConfigError(
            "Thread count must be at least 1".to_string(),
        ));
    }
    if config.timeout_secs == 0 {
        return Err(CorscanError::ConfigError(
            "Timeout must be at least 1 second".to_string(),
        ));
    }
    if let Some(ref header) = config.custom_header {
        HeaderName::from_bytes(header.name.as_bytes()).map_err(|_| {
            CorscanError::ConfigError(format!("Invalid custom header name '{}'", header.name))
        })?;
        HeaderValue::from_str(&header.value).map_err(|_| {
            CorscanError::ConfigError(format!("Invalid custom header value for '{}'", header.name))
        })?;
    }
    for (label, value) in [
        ("User-Agent", config.user_agent.as_deref()),
        ("Referer", config.referer.as_deref()),
    ] {
        if let Some(value) = value {
            HeaderValue::from_str(value).map_err(|_| {
                CorscanError::ConfigError(format!("Invalid {label} header value '{}'", value.escape_debug()))
            })?;
        }
    }
    for rule in &config.cookies {
        HeaderValue::from_str(&rule.header_value()).map_err(|_| {
            CorscanError::ConfigError(format!("Invalid cookie value for domain '{}'", rule.domain))
        })?;
    }
    if let Some(ref proxy) = config.proxy {
        reqwest::Proxy::all(proxy_url(proxy))
            .map_err(|e| CorscanError::ConfigError(format!("Invalid proxy URL: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_custom_header() {
        let header = parse_custom_header("X-Api-Key~~~secret=1").expect("header");
        assert_eq!(header.name, "X-Api-Key");
        assert_eq!(header.value, "secret=1");
        assert!(parse_custom_header("X-Api-Key: secret").is_err());
        assert!(parse_custom_header("a~~~b~~~c").is_err());
    }

    #[test]
    fn test_parse_cookie_rule() {
        let rule = parse_cookie_rule("example.com~~~session=abc; theme=dark").expect("rule");
        assert_eq!(rule.domain, "example.com");
        assert_eq!(rule.cookies, "session=abc; theme=dark");
        assert!(parse_cookie_rule("~~~a=1").is_err());
    }

    #[test]
    fn test_merge_cli_args_overrides() {
        let mut config = ScanConfig::default();
        merge_cli_args(
            &mut config,
            Some(4),
            Some(3),
            Some("127.0.0.1:8080".to_string()),
            Some("ua".to_string()),
            Some("https://ref.example".to_string()),
            Some("X-A~~~1".to_string()),
            vec!["example.com~~~a=1".to_string()],
        )
        .expect("merge");

        assert_eq!(config.threads, 4);
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.proxy.as_deref(), Some("127.0.0.1:8080"));
        assert_eq!(config.user_agent.as_deref(), Some("ua"));
        assert_eq!(config.referer.as_deref(), Some("https://ref.example"));
        assert_eq!(config.custom_header.as_ref().map(|h| h.name.as_str()), Some("X-A"));
        assert_eq!(config.cookies.len(), 1);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ScanConfig {
            threads: 0,
            ..ScanConfig::default()
        };
        assert!(validate(&config).is_err());

        let config = ScanConfig {
            custom_header: Some(CustomHeader {
                name: "Bad Header".to_string(),
                value: "x".to_string(),
            }),
            ..ScanConfig::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_unsendable_header_values() {
        let config = ScanConfig {
            user_agent: Some("bad\nagent".to_string()),
            ..ScanConfig::default()
        };
        assert!(matches!(validate(&config), Err(CorscanError::ConfigError(_))));

        let config = ScanConfig {
            referer: Some("x\ny".to_string()),
            ..ScanConfig::default()
        };
        assert!(matches!(validate(&config), Err(CorscanError::ConfigError(_))));

        let config = ScanConfig {
            cookies: vec![CookieRule::new("example.com", "session=abc\r\nX-Injected: 1")],
            ..ScanConfig::default()
        };
        assert!(matches!(validate(&config), Err(CorscanError::ConfigError(_))));

        let config = ScanConfig {
            user_agent: Some("Mozilla/5.0".to_string()),
            referer: Some("https://portal.example.com/".to_string()),
            cookies: vec![CookieRule::new("example.com", "session=abc; token=a=b")],
            ..ScanConfig::default()
        };
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
[scan]
threads = 25
timeout_secs = 4

[request]
referer = "https://portal.example.com"
proxy = "127.0.0.1:8080"
custom_header = {{ name = "X-Test", value = "1" }}

[[cookies]]
domain = "example.com"
cookies = "session=abc"

[output]
csv_name = "out.csv"
"#
        )
        .expect("write");

        let loaded = load_config(file.path()).expect("config");
        assert_eq!(loaded.scan.threads, 25);
        assert_eq!(loaded.scan.timeout_secs, 4);
        assert!(loaded.scan.follow_redirects);
        assert_eq!(loaded.scan.referer.as_deref(), Some("https://portal.example.com"));
        assert_eq!(loaded.scan.custom_header.as_ref().map(|h| h.value.as_str()), Some("1"));
        assert_eq!(loaded.scan.cookies, vec![CookieRule::new("example.com", "session=abc")]);
        assert_eq!(loaded.output.csv_name.as_deref(), Some("out.csv"));
    }
}
