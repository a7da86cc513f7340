//! Target list ingestion: a single URL or a line-delimited file

use crate::error::{CorscanError, Result};
use std::path::Path;
use tracing::info;

/// Resolves the scan targets from exactly one source
pub fn load(url: Option<&str>, url_file: Option<&Path>) -> Result<Vec<String>> {
    match (url, url_file) {
        (None, None) => Err(CorscanError::NoTargets),
        (Some(_), Some(_)) => Err(CorscanError::ConflictingTargetSources),
        (Some(url), None) => single(url),
        (None, Some(path)) => from_file(path),
    }
}

fn single(url: &str) -> Result<Vec<String>> {
    let url = url.trim();
    if url.is_empty() {
        return Err(CorscanError::NoTargets);
    }
    if !url.starts_with("http") {
        return Err(CorscanError::InvalidTarget(url.to_string()));
    }
    Ok(vec![url.to_string()])
}

/// Reads one target per line; blank lines are skipped, duplicates kept
pub fn from_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let targets = parse_lines(&content);
    if targets.is_empty() {
        return Err(CorscanError::NoTargets);
    }
    info!("Loaded {} targets from {}", targets.len(), path.display());
    Ok(targets)
}

pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
