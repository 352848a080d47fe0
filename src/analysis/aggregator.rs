//! Aggregation of child build results into one combined report.
//!
//! The aggregator owns the ordered child results. Every operation is a pure
//! function of the children and the options passed in; child order is
//! preserved in the combined hash, the annotated diagnostics and the
//! `children` list.

use crate::error::Result;
use crate::models::{annotate, CombinedReport, Report, UNKNOWN_NAME};
use crate::options::{child_options, OptionSet, OptionsInput};
use crate::report::{generate_json_report, render_report};
use crate::stats::BuildResult;
use tracing::{debug, trace};

/// Version reported when none is injected.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Combines the results of several sub-builds.
pub struct ReportAggregator<R: BuildResult = Box<dyn BuildResult>> {
    children: Vec<R>,
    hash: String,
    version: String,
}

impl<R: BuildResult> ReportAggregator<R> {
    /// Create an aggregator over `children`, in the given order.
    pub fn new(children: Vec<R>) -> Self {
        let hash = children.iter().map(|child| child.hash()).collect();
        Self {
            children,
            hash,
            version: TOOL_VERSION.to_string(),
        }
    }

    /// Replace the version string reported at the top level.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Concatenation of the child hashes, in child order.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// The version string reported at the top level.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The child results, in order.
    pub fn children(&self) -> &[R] {
        &self.children
    }

    /// Returns true if any child recorded errors.
    pub fn has_errors(&self) -> bool {
        self.children
            .iter()
            .map(|child| {
                let has_errors = child.has_errors();
                debug!(
                    "Checked {} for errors: {}",
                    child_name(child),
                    has_errors
                );
                has_errors
            })
            .fold(false, |any, has_errors| any || has_errors)
    }

    /// Returns true if any child recorded warnings.
    pub fn has_warnings(&self) -> bool {
        self.children
            .iter()
            .map(|child| child.has_warnings())
            .fold(false, |any, has_warnings| any || has_warnings)
    }

    /// Options the child at `index` renders with.
    pub fn derive_child_options(&self, options: &OptionSet, index: usize) -> OptionSet {
        child_options(options, index)
    }

    /// Merge the child reports into one combined report.
    ///
    /// Fails if any child fails to produce its report.
    pub fn aggregate(
        &self,
        options: impl Into<OptionsInput>,
        for_display: bool,
    ) -> Result<CombinedReport> {
        let options = options.into().normalize();
        debug!("Aggregating {} child reports", self.children.len());

        let mut reports = self
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let child_options = self.derive_child_options(&options, index);
                let mut report = child.to_report(&child_options, for_display)?;
                report.name = Some(child_name(child).to_string());
                debug!(
                    "Child {} reported {} errors, {} warnings",
                    report.display_name(),
                    report.errors.len(),
                    report.warnings.len()
                );
                Ok(report)
            })
            .collect::<Result<Vec<Report>>>()?;

        let show_version = options
            .version
            .resolve(|| reports.iter().all(|r| is_present(&r.version)));
        let show_hash = options
            .hash
            .resolve(|| reports.iter().all(|r| is_present(&r.hash)));

        if show_version {
            for report in &mut reports {
                report.version = None;
            }
        }

        let errors = annotate_all(&reports, |r| &r.errors);
        let warnings = annotate_all(&reports, |r| &r.warnings);

        Ok(CombinedReport {
            errors,
            warnings,
            version: show_version.then(|| self.version.clone()),
            hash: show_hash.then(|| self.hash.clone()),
            children: (!options.hides_children()).then_some(reports),
        })
    }

    /// Render the combined report as display text.
    pub fn render(&self, options: impl Into<OptionsInput>) -> Result<String> {
        let options = options.into().normalize();
        let use_colors = options.colors.unwrap_or(false);
        let report = self.aggregate(options, true)?;
        Ok(render_report(&report, use_colors))
    }

    /// Serialize the combined report as pretty-printed JSON.
    pub fn to_json(&self, options: impl Into<OptionsInput>) -> Result<String> {
        let report = self.aggregate(options, false)?;
        generate_json_report(&report)
    }
}

/// The child's name; a missing or empty name reads as `"unknown"`.
fn child_name<R: BuildResult>(child: &R) -> &str {
    child
        .name()
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_NAME)
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Flatten one diagnostic list of every report, prefixing each message.
fn annotate_all(reports: &[Report], select: impl Fn(&Report) -> &Vec<String>) -> Vec<String> {
    reports
        .iter()
        .flat_map(|report| {
            let name = report.display_name();
            select(report).iter().map(move |message| {
                trace!("Annotating message from {}: {}", name, message);
                annotate(name, message)
            })
        })
        .collect()
}
