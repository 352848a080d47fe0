//! Error type for loading, aggregating and encoding stats.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the library.
#[derive(Error, Debug)]
pub enum StatsError {
    /// A stats file could not be read.
    #[error("Failed to read stats file {path}: {source}")]
    ReadStats {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stats document is malformed or misses a required field.
    #[error("Failed to parse stats file {path}: {source}")]
    ParseStats {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A stats directory could not be walked.
    #[error("Failed to walk stats directory {path}: {source}")]
    Discover {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A directory input contained no stats documents.
    #[error("No stats files found in {0}")]
    NoStatsFound(PathBuf),

    /// A child result could not produce its report.
    #[error("Child '{name}' failed to produce a report: {message}")]
    ChildReport { name: String, message: String },

    /// The combined report could not be encoded.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, StatsError>;
