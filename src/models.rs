//! Data models for child and combined reports.
//!
//! This module contains the structures exchanged between the child results,
//! the aggregator and the renderers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Name used for a child that does not report one.
pub const UNKNOWN_NAME: &str = "unknown";

/// A single diagnostic as recorded by a sub-build.
///
/// Stats documents store either a bare message or an object with optional
/// details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diagnostic {
    Message(String),
    Detailed {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl Diagnostic {
    /// The primary message line.
    pub fn message(&self) -> &str {
        match self {
            Diagnostic::Message(message) => message,
            Diagnostic::Detailed { message, .. } => message,
        }
    }

    /// Extra details, if recorded.
    pub fn details(&self) -> Option<&str> {
        match self {
            Diagnostic::Message(_) => None,
            Diagnostic::Detailed { details, .. } => details.as_deref(),
        }
    }

    /// Format the diagnostic, appending details on a new line when asked.
    pub fn format(&self, with_details: bool) -> String {
        match self.details() {
            Some(details) if with_details => format!("{}\n{}", self.message(), details),
            _ => self.message().to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<&str> for Diagnostic {
    fn from(message: &str) -> Self {
        Diagnostic::Message(message.to_string())
    }
}

impl From<String> for Diagnostic {
    fn from(message: String) -> Self {
        Diagnostic::Message(message)
    }
}

/// Report produced by one child result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Display name, attached by the aggregator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Version of the tool that produced the child build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Identity hash of the child build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Child-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Report {
    /// Creates a report with the given diagnostics and nothing else.
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            errors,
            warnings,
            ..Self::default()
        }
    }

    /// The display name, falling back to `"unknown"`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }
}

/// Report combining every child report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedReport {
    /// Child errors, each prefixed with `(<child name>) `.
    pub errors: Vec<String>,
    /// Child warnings, prefixed the same way.
    pub warnings: Vec<String>,
    /// Shared tool version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Concatenated child hashes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Child reports in input order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Report>>,
}

/// Prefix a message with the name of the child it came from.
pub fn annotate(name: &str, message: &str) -> String {
    format!("({}) {}", name, message)
}
