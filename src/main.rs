//! corscan - CORS misconfiguration scanner CLI

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use corscan::config::{self, LoadedConfig};
use corscan::models::{ScanReport, Severity};
use corscan::report;
use corscan::scanner::progress::target_bar;
use corscan::scanner::{MemorySink, OriginStrategy, ReflectionRule, ScanEngine};
use corscan::targets;

/// corscan - multi-threaded CORS misconfiguration scanner
#[derive(Parser)]
#[command(name = "corscan", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[allow(clippy::large_enum_variant)]
enum Commands {
    /// Probe one URL or a list of URLs for CORS misconfigurations
    Scan {
        /// Single target URL (proto://address[:port])
        #[arg(short, long)]
        url: Option<String>,

        /// File containing one target URL per line
        #[arg(long)]
        url_file: Option<PathBuf>,

        /// Number of concurrent workers
        #[arg(short, long)]
        threads: Option<usize>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Proxy to route requests through (127.0.0.1:8080)
        #[arg(long)]
        proxy: Option<String>,

        /// Custom header and value, delimited with ~~~ (X-Api-Key~~~secret)
        #[arg(long)]
        custom_header: Option<String>,

        /// Domain and cookies delimited with ~~~ (example.com~~~a=1; b=2)
        #[arg(short, long)]
        cookies: Vec<String>,

        /// Fixed User-Agent (default: rotate browser strings)
        #[arg(long)]
        useragent: Option<String>,

        /// Referer header value
        #[arg(short, long)]
        referer: Option<String>,

        /// CSV file to write or append results to
        #[arg(long)]
        csv_name: Option<String>,

        /// Also export a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Exit with code 1 if a result is flagged at or above this severity (critical, high, medium, low, info)
        #[arg(long)]
        fail_on: Option<String>,

        /// Flag reflection when Allow-Origin equals the sent origin instead of differing from it
        #[arg(long)]
        echo_reflection: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the origin strategies applied to every target
    Strategies,
}

fn print_banner() {
    let banner = r#"
    ╔═══════════════════════════════════════╗
    ║  CORSCAN v0.1.0                       ║
    ║  CORS Misconfiguration Scanner        ║
    ╚═══════════════════════════════════════╝
    "#;
    println!("{}", banner.cyan());
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "corscan=debug" } else { "corscan=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            url,
            url_file,
            threads,
            timeout,
            proxy,
            custom_header,
            cookies,
            useragent,
            referer,
            csv_name,
            json,
            config: config_path,
            fail_on,
            echo_reflection,
            verbose,
        } => {
            init_tracing(verbose);
            print_banner();

            let LoadedConfig {
                scan: mut scan_config,
                output,
            } = if let Some(ref path) = config_path {
                config::load_config(path)?
            } else {
                let default_path = Path::new("config/default.toml");
                if default_path.exists() {
                    config::load_config(default_path)?
                } else {
                    LoadedConfig::default()
                }
            };

            config::merge_cli_args(
                &mut scan_config,
                threads,
                timeout,
                proxy,
                useragent,
                referer,
                custom_header,
                cookies,
            )?;
            config::validate(&scan_config)?;

            let fail_severity = match fail_on {
                Some(ref name) => Some(Severity::from_name(name).ok_or_else(|| {
                    format!("Invalid --fail-on value '{name}'. Use: critical, high, medium, low, info")
                })?),
                None => None,
            };

            let targets = targets::load(url.as_deref(), url_file.as_deref())?;
            let rule = if echo_reflection {
                ReflectionRule::Echo
            } else {
                ReflectionRule::Mismatch
            };

            println!("  {} {}", "Targets:".bold(), targets.len().to_string().green());
            println!(
                "  {} {}",
                "Threads:".bold(),
                scan_config.threads.to_string().cyan()
            );
            println!(
                "  {} {}s",
                "Timeout:".bold(),
                scan_config.timeout_secs.to_string().cyan()
            );
            if let Some(ref p) = scan_config.proxy {
                println!("  {} {}", "Proxy:".bold(), p.cyan());
            }
            println!();

            let mut scan_report = ScanReport::new(targets.len());
            let mut engine = ScanEngine::from_config(&scan_config)?;
            let progress = if verbose {
                None
            } else {
                let pb = target_bar(targets.len() as u64);
                engine = engine.with_progress(Arc::new(pb.clone()));
                Some(pb)
            };

            let cancel = engine.cancellation_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, finishing in-flight probes");
                    cancel.cancel();
                }
            });

            let sink = Arc::new(MemorySink::new());
            let outcome = engine.run(targets, sink.clone()).await?;
            if let Some(pb) = progress {
                pb.finish_and_clear();
            }
            if outcome.cancelled {
                println!("\n  {}", "Scan cancelled, showing partial results.".yellow());
            }
            scan_report.finish(sink.take(), outcome);

            report::console::print_results(&scan_report.results, rule);
            report::console::print_summary(&scan_report.results, rule);

            let csv_path = csv_name
                .or(output.csv_name)
                .unwrap_or_else(report::csv::default_file_name);
            match report::csv::append(&scan_report.results, Path::new(&csv_path)) {
                Ok(0) => {}
                Ok(rows) => {
                    println!("\n  {} {} ({rows} rows)", "CSV saved to:".bold(), csv_path.green())
                }
                Err(e) => error!("Could not write CSV report {csv_path}: {e}"),
            }

            if let Some(json_path) = json.or(output.json_path.map(PathBuf::from)) {
                match report::json::export(&scan_report, &json_path) {
                    Ok(()) => println!(
                        "  {} {}",
                        "JSON saved to:".bold(),
                        json_path.display().to_string().green()
                    ),
                    Err(e) => error!("Could not write JSON report {}: {e}", json_path.display()),
                }
            }

            if let Some(threshold) = fail_severity {
                let flagged = report::console::count_by_severity(&scan_report.results, rule)
                    .into_iter()
                    .any(|(severity, count)| severity <= threshold && count > 0);
                if flagged {
                    println!(
                        "\n  {} Results at or above {} severity detected.",
                        "FAIL:".red().bold(),
                        threshold.to_string().red()
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Strategies => {
            print_banner();
            println!("  {}\n", "Origin Strategies:".bold());
            for strategy in OriginStrategy::ALL {
                println!(
                    "    {} {}",
                    format!("{:22}", strategy.name()).cyan().bold(),
                    strategy.description()
                );
            }
            println!();
        }
    }

    Ok(())
}
