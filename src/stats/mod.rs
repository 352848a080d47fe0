//! Child build results.
//!
//! [`BuildResult`] is the capability the aggregator needs from each
//! sub-build. [`StatsSnapshot`] implements it on top of a stats document a
//! sub-build wrote to disk.

pub mod loader;

pub use loader::{discover_stats_files, load_snapshot, load_snapshots};

use crate::error::Result;
use crate::models::{Diagnostic, Report};
use crate::options::OptionSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The result of one sub-build.
pub trait BuildResult {
    /// Identity hash of the build output.
    fn hash(&self) -> &str;

    /// Display name of the build, if it has one.
    fn name(&self) -> Option<&str>;

    /// Whether the build recorded any errors.
    fn has_errors(&self) -> bool;

    /// Whether the build recorded any warnings.
    fn has_warnings(&self) -> bool;

    /// Produce a report honoring `options`.
    ///
    /// `for_display` is set when the report will be rendered as text rather
    /// than serialized.
    fn to_report(&self, options: &OptionSet, for_display: bool) -> Result<Report>;
}

impl<T: BuildResult + ?Sized> BuildResult for Box<T> {
    fn hash(&self) -> &str {
        (**self).hash()
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }

    fn has_errors(&self) -> bool {
        (**self).has_errors()
    }

    fn has_warnings(&self) -> bool {
        (**self).has_warnings()
    }

    fn to_report(&self, options: &OptionSet, for_display: bool) -> Result<Report> {
        (**self).to_report(options, for_display)
    }
}

/// A sub-build result recorded as a stats document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    /// Everything else the sub-build recorded.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatsSnapshot {
    /// Creates an empty snapshot with the given hash.
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            ..Self::default()
        }
    }

    /// Builder: set the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set the tool version.
    pub fn versioned(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Builder: record an error.
    pub fn error(mut self, diagnostic: impl Into<Diagnostic>) -> Self {
        self.errors.push(diagnostic.into());
        self
    }

    /// Builder: record a warning.
    pub fn warning(mut self, diagnostic: impl Into<Diagnostic>) -> Self {
        self.warnings.push(diagnostic.into());
        self
    }
}

/// Explicit option value, else the `all` option, else `default`.
fn option_or_all(options: &OptionSet, key: &str, default: bool) -> bool {
    options
        .flag(key)
        .or_else(|| options.flag("all"))
        .unwrap_or(default)
}

impl BuildResult for StatsSnapshot {
    fn hash(&self) -> &str {
        &self.hash
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    fn to_report(&self, options: &OptionSet, for_display: bool) -> Result<Report> {
        let show_version = options
            .version
            .resolve(|| options.flag("all").unwrap_or(true));
        let show_hash = options
            .hash
            .resolve(|| options.flag("all").unwrap_or(true));
        let show_errors = option_or_all(options, "errors", true);
        let show_warnings = option_or_all(options, "warnings", true);
        let show_details = options.flag("errorDetails").unwrap_or(!for_display);
        let show_extra = options.flag("all") != Some(false);

        let format_all = |diagnostics: &[Diagnostic]| -> Vec<String> {
            diagnostics
                .iter()
                .map(|d| d.format(show_details))
                .collect()
        };

        Ok(Report {
            name: None,
            errors: if show_errors {
                format_all(&self.errors)
            } else {
                Vec::new()
            },
            warnings: if show_warnings {
                format_all(&self.warnings)
            } else {
                Vec::new()
            },
            version: self.version.clone().filter(|_| show_version),
            hash: Some(self.hash.clone()).filter(|_| show_hash),
            extra: if show_extra {
                self.extra.clone()
            } else {
                Map::new()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::preset_to_options;
    use serde_json::json;

    fn create_test_snapshot() -> StatsSnapshot {
        let mut snapshot = StatsSnapshot::new("abc123")
            .named("client")
            .versioned("4.44.2")
            .error(Diagnostic::Detailed {
                message: "Module not found".to_string(),
                details: Some("resolve './missing' in /src".to_string()),
            })
            .warning("Large bundle");
        snapshot.extra.insert("time".to_string(), json!(420));
        snapshot
    }

    #[test]
    fn test_status_checks() {
        let snapshot = create_test_snapshot();
        assert!(snapshot.has_errors());
        assert!(snapshot.has_warnings());

        let clean = StatsSnapshot::new("x");
        assert!(!clean.has_errors());
        assert!(!clean.has_warnings());
        assert_eq!(clean.name(), None);
    }

    #[test]
    fn test_default_report() {
        let report = create_test_snapshot()
            .to_report(&OptionSet::default(), false)
            .unwrap();

        assert_eq!(report.name, None);
        assert_eq!(
            report.errors,
            vec!["Module not found\nresolve './missing' in /src"]
        );
        assert_eq!(report.warnings, vec!["Large bundle"]);
        assert_eq!(report.version.as_deref(), Some("4.44.2"));
        assert_eq!(report.hash.as_deref(), Some("abc123"));
        assert_eq!(report.extra.get("time"), Some(&json!(420)));
    }

    #[test]
    fn test_display_report_hides_details_by_default() {
        let snapshot = create_test_snapshot();

        let report = snapshot.to_report(&OptionSet::default(), true).unwrap();
        assert_eq!(report.errors, vec!["Module not found"]);

        let detailed = OptionSet::new().with("errorDetails", true);
        let report = snapshot.to_report(&detailed, true).unwrap();
        assert_eq!(
            report.errors,
            vec!["Module not found\nresolve './missing' in /src"]
        );
    }

    #[test]
    fn test_all_false_hides_everything_not_enabled() {
        let snapshot = create_test_snapshot();

        let report = snapshot.to_report(&preset_to_options("none"), false).unwrap();
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.version, None);
        assert_eq!(report.hash, None);
        assert!(report.extra.is_empty());

        let report = snapshot
            .to_report(&preset_to_options("errors-only"), false)
            .unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(report.warnings.is_empty());
        assert_eq!(report.hash, None);
    }

    #[test]
    fn test_explicit_toggles() {
        let options = OptionSet::new().with("version", false).with("hash", true);
        let report = create_test_snapshot().to_report(&options, false).unwrap();
        assert_eq!(report.version, None);
        assert_eq!(report.hash.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_parse_snapshot() {
        let snapshot: StatsSnapshot = serde_json::from_value(json!({
            "name": "server",
            "hash": "def456",
            "errors": [],
            "warnings": ["deprecated API", { "message": "slow", "details": "3s" }],
            "assets": []
        }))
        .unwrap();

        assert_eq!(snapshot.name(), Some("server"));
        assert_eq!(snapshot.warnings.len(), 2);
        assert!(snapshot.extra.contains_key("assets"));

        let missing_errors = serde_json::from_value::<StatsSnapshot>(json!({
            "hash": "x",
            "warnings": []
        }));
        assert!(missing_errors.is_err());
    }
}
