//! multistats - combine the stats of several sub-builds into one report.
//!
//! Each sub-build of a multi-target build produces its own stats: a hash,
//! an optional name, errors and warnings. [`ReportAggregator`] merges them
//! into a single [`CombinedReport`] whose diagnostics carry the name of the
//! child they came from, and renders it as text, Markdown or JSON.
//!
//! ```no_run
//! use multistats::{load_snapshots, ReportAggregator};
//! use std::path::PathBuf;
//!
//! # fn main() -> multistats::Result<()> {
//! let children = load_snapshots(&[PathBuf::from("stats/")])?;
//! let aggregator = ReportAggregator::new(children);
//! println!("{}", aggregator.render("errors-warnings")?);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod error;
pub mod models;
pub mod options;
pub mod report;
pub mod stats;

pub use analysis::{ReportAggregator, TOOL_VERSION};
pub use error::{Result, StatsError};
pub use models::{CombinedReport, Diagnostic, Report};
pub use options::{OptionSet, OptionsInput, Toggle};
pub use stats::{load_snapshots, BuildResult, StatsSnapshot};
