//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.multistats.toml` files.

use crate::cli::{Args, OutputFormat};
use anyhow::{Context, Result};
use multistats::options::{preset_to_options, ChildrenOption, OptionSet, Toggle};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".multistats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report options.
    #[serde(default)]
    pub stats: StatsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output file path; empty writes to stdout.
    #[serde(default)]
    pub output: String,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Report options, optionally starting from a preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Preset expanded before the explicit options are applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Explicit options; any key is accepted.
    #[serde(flatten)]
    pub options: OptionSet,
}

impl StatsConfig {
    /// The effective option set: the preset, overridden by explicit keys.
    pub fn resolve(&self) -> OptionSet {
        let mut options = self
            .preset
            .as_deref()
            .map(preset_to_options)
            .unwrap_or_default();
        options.merge(self.options.clone());
        options
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref preset) = args.preset {
            self.stats.preset = Some(preset.clone());
        }

        // Flags always override
        if args.colors {
            self.stats.options.colors = Some(true);
        }
        if args.hide_version {
            self.stats.options.version = Toggle::Off;
        }
        if args.hide_hash {
            self.stats.options.hash = Toggle::Off;
        }
        if args.no_children {
            self.stats.options.children = Some(ChildrenOption::Flag(false));
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
