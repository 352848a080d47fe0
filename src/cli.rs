//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// multistats - combine the stats of several sub-builds into one report
///
/// Reads the stats document each sub-build wrote, merges errors and warnings
/// (annotated with the child they came from) and prints one combined report.
///
/// Examples:
///   multistats dist/stats/
///   multistats client.json server.json --format json -o combined.json
///   multistats dist/stats/ --preset errors-warnings --colors
///   multistats dist/stats/ --fail-on errors
///   multistats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Stats files, or directories of stats files, in child order
    #[arg(value_name = "INPUT", required_unless_present = "init_config")]
    pub inputs: Vec<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, json, markdown)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Stats preset to start from
    ///
    /// Values: none, minimal, errors-only, errors-warnings, detailed, verbose.
    #[arg(short, long, value_name = "NAME", env = "MULTISTATS_PRESET")]
    pub preset: Option<String>,

    /// Color the text report
    #[arg(long)]
    pub colors: bool,

    /// Never print the top-level version
    #[arg(long)]
    pub hide_version: bool,

    /// Never print the combined hash
    #[arg(long)]
    pub hide_hash: bool,

    /// Leave the per-child reports out of the combined report
    #[arg(long)]
    pub no_children: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .multistats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 when any child reports at or above this level
    ///
    /// Values: errors, warnings
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<FailOn>,

    /// Generate a default .multistats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain or colored text (default)
    #[default]
    Text,
    /// JSON format
    Json,
    /// Markdown summary
    Markdown,
}

/// Diagnostic level for --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum FailOn {
    Warnings,
    Errors,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.inputs.is_empty() {
            return Err("At least one stats file or directory is required".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        for input in &self.inputs {
            if !input.exists() {
                return Err(format!("Input does not exist: {}", input.display()));
            }
        }

        if let Some(ref preset) = self.preset {
            if preset.trim().is_empty() {
                return Err("Preset name must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Build the log filter from `RUST_LOG`-style directives; an empty string
    /// falls back to [`Args::log_level`].
    pub fn log_filter(&self, directives: &str) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.log_level()).into())
            .parse_lossy(directives)
    }
}
