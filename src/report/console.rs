//! Human-readable terminal output

use crate::models::{ScanResult, Severity};
use crate::scanner::severity::{analyze_with, highest_severity, ReflectionRule, RiskFlag};
use colored::{ColoredString, Colorize};
use tabled::builder::Builder;
use tabled::settings::Style;

fn paint(flag: RiskFlag) -> ColoredString {
    let text = format!("{}: {}", flag.severity(), flag.message());
    match flag.severity() {
        Severity::Critical => text.red().bold(),
        Severity::High => text.bright_red(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.blue(),
        Severity::Info => text.white(),
    }
}

/// Prints every result with its headers and risk flags
pub fn print_results(results: &[ScanResult], rule: ReflectionRule) {
    if results.is_empty() {
        println!("\n  {}", "No CORS headers found in any responses.".yellow());
        return;
    }

    println!("\n  {}", "=".repeat(70));
    println!(
        "  {}",
        format!("CORS SCAN RESULTS - Found {} CORS configurations", results.len()).bold()
    );
    println!("  {}", "=".repeat(70));

    for (i, result) in results.iter().enumerate() {
        println!("\n  [{}] {} {}", i + 1, "URL:".bold(), result.url.green());
        println!(
            "      {} {} ({})",
            "Origin:".bold(),
            result.origin.cyan(),
            result.strategy
        );

        for (name, value) in result.headers.entries() {
            if let Some(value) = value {
                println!("      {} {name}: {value}", "+".green());
            }
        }

        for flag in analyze_with(result, rule) {
            println!("      {} {}", "!".red().bold(), paint(flag));
        }
    }
}

/// Counts flagged results per severity, keyed by each result's worst flag
pub fn count_by_severity(results: &[ScanResult], rule: ReflectionRule) -> Vec<(Severity, usize)> {
    Severity::ALL
        .iter()
        .map(|severity| {
            let count = results
                .iter()
                .filter(|r| {
                    let flags = analyze_with(r, rule);
                    highest_severity(&flags) == Some(*severity)
                })
                .count();
            (*severity, count)
        })
        .collect()
}

/// Prints the severity summary table
pub fn print_summary(results: &[ScanResult], rule: ReflectionRule) {
    println!("\n{}", "  Scan Summary".bold());
    println!("  {}", "─".repeat(35));

    let mut builder = Builder::default();
    builder.push_record(["Severity", "Count"]);
    for (severity, count) in count_by_severity(results, rule) {
        builder.push_record([severity.to_string(), count.to_string()]);
    }
    builder.push_record(["Results".to_string(), results.len().to_string()]);

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CorsHeaderSet;
    use crate::scanner::origin::OriginStrategy;

    fn result(origin: &str, acao: &str, acac: Option<&str>) -> ScanResult {
        ScanResult::new(
            "https://example.com",
            origin,
            OriginStrategy::NullOrigin,
            CorsHeaderSet {
                allow_origin: Some(acao.to_string()),
                allow_credentials: acac.map(str::to_string),
                ..CorsHeaderSet::default()
            },
        )
    }

    #[test]
    fn test_count_by_worst_flag() {
        let results = vec![
            result("null", "*", Some("true")),
            result("null", "null", None),
            result("null", "*", None),
            result("x.com", "x.com", None),
        ];
        let counts = count_by_severity(&results, ReflectionRule::Mismatch);
        assert_eq!(
            counts,
            vec![
                (Severity::Critical, 1),
                (Severity::High, 1),
                (Severity::Medium, 1),
                (Severity::Low, 0),
                (Severity::Info, 0),
            ]
        );
    }
}
