//! multistats - combine the stats of several sub-builds into one report
//!
//! Reads the stats document of every sub-build, merges their diagnostics
//! and prints a single combined report.
//!
//! Exit codes:
//!   0 - Success (nothing at or above --fail-on, or no --fail-on set)
//!   1 - Runtime error (unreadable stats, bad config, etc.)
//!   2 - A child reported diagnostics at or above the --fail-on level

mod cli;
mod config;

use anyhow::{Context, Result};
use cli::{Args, FailOn, OutputFormat};
use config::{Config, CONFIG_FILE};
use multistats::report::generate_markdown_report;
use multistats::{load_snapshots, ReportAggregator, StatsSnapshot};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    debug!("multistats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Aggregation failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .multistats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout carries only the report. A non-empty
/// `RUST_LOG` replaces the level chosen by the flags.
fn init_logging(args: &Args) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let filter = args.log_filter(&directives);

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Aggregate the inputs and write the report. Returns exit code (0 or 2).
fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let children: Vec<StatsSnapshot> =
        load_snapshots(&args.inputs).context("Failed to load child stats")?;
    let aggregator = ReportAggregator::new(children);
    info!(
        "Aggregating {} children (hash {})",
        aggregator.children().len(),
        aggregator.hash()
    );

    let options = config.stats.resolve();
    let output = match config.general.format {
        OutputFormat::Text => aggregator.render(options)?,
        OutputFormat::Json => aggregator.to_json(options)?,
        OutputFormat::Markdown => generate_markdown_report(&aggregator.aggregate(options, false)?),
    };

    if config.general.output.is_empty() {
        println!("{}", output);
    } else {
        std::fs::write(&config.general.output, &output)
            .with_context(|| format!("Failed to write report to {}", config.general.output))?;
        info!("Report saved to: {}", config.general.output);
    }

    // Check --fail-on threshold
    if let Some(level) = args.fail_on {
        let exceeded = match level {
            FailOn::Errors => aggregator.has_errors(),
            FailOn::Warnings => aggregator.has_errors() || aggregator.has_warnings(),
        };

        if exceeded {
            warn!("Children reported {:?} or worse. Failing (exit code 2).", level);
            return Ok(2);
        }
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
