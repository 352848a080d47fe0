//! Discovery and loading of stats documents.
//!
//! Inputs are stats files or directories holding them. Directories are walked
//! in file-name order so the child order, and with it the combined hash, does
//! not depend on the file system.

use crate::error::{Result, StatsError};
use crate::stats::StatsSnapshot;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

const STATS_EXTENSION: &str = "json";

/// Expand the inputs into stats file paths, keeping input order.
pub fn discover_stats_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }

        let before = files.len();
        let walker = WalkDir::new(input)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = entry.map_err(|source| StatsError::Discover {
                path: input.clone(),
                source,
            })?;

            if entry.file_type().is_file() && is_stats_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        if files.len() == before {
            return Err(StatsError::NoStatsFound(input.clone()));
        }
        debug!(
            "Found {} stats files in {}",
            files.len() - before,
            input.display()
        );
    }

    Ok(files)
}

/// Read and parse one stats document.
pub fn load_snapshot(path: &Path) -> Result<StatsSnapshot> {
    let content = fs::read_to_string(path).map_err(|source| StatsError::ReadStats {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| StatsError::ParseStats {
        path: path.to_path_buf(),
        source,
    })
}

/// Discover and load every stats document named by the inputs.
pub fn load_snapshots(inputs: &[PathBuf]) -> Result<Vec<StatsSnapshot>> {
    let files = discover_stats_files(inputs)?;
    let snapshots = files
        .iter()
        .map(|path| load_snapshot(path))
        .collect::<Result<Vec<_>>>()?;

    info!("Loaded {} child stats", snapshots.len());
    Ok(snapshots)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_stats_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(STATS_EXTENSION)
}
