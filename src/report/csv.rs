//! CSV report export
//!
//! Rows are appended so repeated scans can share one file; the header row is
//! written only when the file is created.

use crate::error::Result;
use crate::models::ScanResult;
use chrono::Local;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::info;

pub const CSV_HEADER: [&str; 8] = ["URL", "Origin", "ACAO", "ACAC", "ACAM", "ACAH", "ACMA", "ACEH"];

/// Timestamped file name used when none is configured
pub fn default_file_name() -> String {
    format!("CORS_Results-{}.csv", Local::now().format("%d%b%Y%H%M%S"))
}

fn row(result: &ScanResult) -> [&str; 8] {
    let h = &result.headers;
    [
        result.url.as_str(),
        result.origin.as_str(),
        h.allow_origin.as_deref().unwrap_or(""),
        h.allow_credentials.as_deref().unwrap_or(""),
        h.allow_methods.as_deref().unwrap_or(""),
        h.allow_headers.as_deref().unwrap_or(""),
        h.max_age.as_deref().unwrap_or(""),
        h.expose_headers.as_deref().unwrap_or(""),
    ]
}

/// Appends `results` to the CSV file at `output_path`.
///
/// Returns the number of rows written. Nothing is created when there are no
/// results.
pub fn append(results: &[ScanResult], output_path: &Path) -> Result<usize> {
    if results.is_empty() {
        return Ok(0);
    }

    let exists = output_path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_path)?;
    let mut writer = csv::Writer::from_writer(file);

    if !exists {
        writer.write_record(CSV_HEADER)?;
    }
    for result in results {
        writer.write_record(row(result))?;
    }
    writer.flush()?;

    if exists {
        info!("Appended {} rows to {}", results.len(), output_path.display());
    } else {
        info!("CSV report saved to {}", output_path.display());
    }
    Ok(results.len())
}
