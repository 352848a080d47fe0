//! Text, Markdown and JSON output for combined reports.
//!
//! Output is a pure function of the report; nothing here reads the clock or
//! the environment, so identical reports render identically.

use crate::error::Result;
use crate::models::{CombinedReport, Report};
use colored::Colorize;

const INDENT: &str = "    ";

/// Forces `colored` on while alive, regardless of TTY or `CLICOLOR`.
struct ForceColors;

impl ForceColors {
    fn enable() -> Self {
        colored::control::set_override(true);
        ForceColors
    }
}

impl Drop for ForceColors {
    fn drop(&mut self) {
        colored::control::unset_override();
    }
}

/// Render a combined report as terminal text.
///
/// With `use_colors` the output carries ANSI styling even when stdout is not
/// a terminal.
pub fn render_report(report: &CombinedReport, use_colors: bool) -> String {
    let _colors = use_colors.then(ForceColors::enable);
    let mut lines = Vec::new();

    push_header(
        &mut lines,
        report.hash.as_deref(),
        report.version.as_deref(),
        use_colors,
    );

    for child in report.children.iter().flatten() {
        let title = format!("Child {}:", child.display_name());
        lines.push(if use_colors {
            title.bold().to_string()
        } else {
            title
        });

        for line in render_child(child, use_colors).lines() {
            if line.is_empty() {
                lines.push(String::new());
            } else {
                lines.push(format!("{}{}", INDENT, line));
            }
        }
    }

    push_diagnostics(&mut lines, &report.warnings, "WARNING", use_colors);
    push_diagnostics(&mut lines, &report.errors, "ERROR", use_colors);

    lines.join("\n")
}

/// Render one child report without its name.
fn render_child(child: &Report, use_colors: bool) -> String {
    let mut lines = Vec::new();

    push_header(
        &mut lines,
        child.hash.as_deref(),
        child.version.as_deref(),
        use_colors,
    );
    push_diagnostics(&mut lines, &child.warnings, "WARNING", use_colors);
    push_diagnostics(&mut lines, &child.errors, "ERROR", use_colors);

    lines.join("\n")
}

fn push_header(
    lines: &mut Vec<String>,
    hash: Option<&str>,
    version: Option<&str>,
    use_colors: bool,
) {
    let label = |text: &str| {
        if use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    };

    if let Some(hash) = hash {
        lines.push(format!("{} {}", label("Hash:"), hash));
    }
    if let Some(version) = version {
        lines.push(format!("{} {}", label("Version:"), version));
    }
}

fn push_diagnostics(lines: &mut Vec<String>, messages: &[String], kind: &str, use_colors: bool) {
    for message in messages {
        let tag = format!("{} in", kind);
        let tag = match (use_colors, kind) {
            (false, _) => tag,
            (true, "ERROR") => tag.red().bold().to_string(),
            (true, _) => tag.yellow().bold().to_string(),
        };

        lines.push(String::new());
        lines.push(format!("{} {}", tag, message));
    }
}

/// Generate a Markdown summary of a combined report.
pub fn generate_markdown_report(report: &CombinedReport) -> String {
    let mut output = String::new();

    output.push_str("# Build Stats\n\n");

    // Metadata
    if let Some(ref hash) = report.hash {
        output.push_str(&format!("- **Hash:** `{}`\n", hash));
    }
    if let Some(ref version) = report.version {
        output.push_str(&format!("- **Version:** {}\n", version));
    }
    output.push_str(&format!("- **Errors:** {}\n", report.errors.len()));
    output.push_str(&format!("- **Warnings:** {}\n\n", report.warnings.len()));

    if let Some(ref children) = report.children {
        output.push_str(&generate_children_section(children));
    }

    output.push_str(&generate_messages_section("Errors", &report.errors));
    output.push_str(&generate_messages_section("Warnings", &report.warnings));

    output
}

/// Generate the per-child table.
fn generate_children_section(children: &[Report]) -> String {
    let mut section = String::new();

    section.push_str("## Children\n\n");
    if children.is_empty() {
        section.push_str("No child builds.\n\n");
        return section;
    }

    section.push_str("| Name | Hash | Errors | Warnings |\n");
    section.push_str("|:---|:---|:---:|:---:|\n");
    for child in children {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            child.display_name(),
            child
                .hash
                .as_deref()
                .map(|h| format!("`{}`", h))
                .unwrap_or_else(|| "-".to_string()),
            child.errors.len(),
            child.warnings.len()
        ));
    }
    section.push('\n');

    section
}

fn generate_messages_section(title: &str, messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let mut section = format!("## {}\n\n", title);
    for message in messages {
        section.push_str("```\n");
        section.push_str(message);
        section.push_str("\n```\n\n");
    }

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &CombinedReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_report() -> CombinedReport {
        CombinedReport {
            errors: vec!["(client) Module not found".to_string()],
            warnings: vec!["(server) Large bundle".to_string()],
            version: Some("1.0.0".to_string()),
            hash: Some("aaabbb".to_string()),
            children: Some(vec![
                Report {
                    name: Some("client".to_string()),
                    hash: Some("aaa".to_string()),
                    ..Report::new(vec!["Module not found".to_string()], Vec::new())
                },
                Report {
                    name: Some("server".to_string()),
                    hash: Some("bbb".to_string()),
                    ..Report::new(Vec::new(), vec!["Large bundle".to_string()])
                },
            ]),
        }
    }

    #[test]
    fn test_render_report_plain() {
        let text = render_report(&create_test_report(), false);

        let expected = [
            "Hash: aaabbb",
            "Version: 1.0.0",
            "Child client:",
            "    Hash: aaa",
            "",
            "    ERROR in Module not found",
            "Child server:",
            "    Hash: bbb",
            "",
            "    WARNING in Large bundle",
            "",
            "WARNING in (server) Large bundle",
            "",
            "ERROR in (client) Module not found",
        ]
        .join("\n");

        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_report_indents_multiline_messages() {
        let report = CombinedReport {
            children: Some(vec![Report {
                name: Some("web".to_string()),
                ..Report::new(vec!["first\nsecond".to_string()], Vec::new())
            }]),
            ..CombinedReport::default()
        };

        let text = render_report(&report, false);
        assert!(text.contains("    ERROR in first\n    second"));
    }

    #[test]
    fn test_render_report_without_optional_fields() {
        let report = CombinedReport {
            errors: vec!["(unknown) boom".to_string()],
            ..CombinedReport::default()
        };

        assert_eq!(render_report(&report, false), "\nERROR in (unknown) boom");
        assert_eq!(render_report(&CombinedReport::default(), false), "");
    }

    #[test]
    fn test_render_report_colored() {
        let text = render_report(&create_test_report(), true);
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("aaabbb"));
        assert!(text.contains("(client) Module not found"));
        assert!(text.contains("client:"));

        let plain = render_report(&create_test_report(), false);
        assert!(!plain.contains("\u{1b}["));
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# Build Stats"));
        assert!(markdown.contains("- **Hash:** `aaabbb`"));
        assert!(markdown.contains("| client | `aaa` | 1 | 0 |"));
        assert!(markdown.contains("## Errors"));
        assert!(markdown.contains("(server) Large bundle"));
    }

    #[test]
    fn test_generate_markdown_without_children() {
        let report = CombinedReport {
            children: None,
            ..create_test_report()
        };
        let markdown = generate_markdown_report(&report);
        assert!(!markdown.contains("## Children"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();

        assert!(json.contains("\"errors\""));
        assert!(json.contains("\"children\""));
        assert!(json.contains("\"aaabbb\""));
    }
}
