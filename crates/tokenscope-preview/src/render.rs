//! Terminal, HTML, and JSON renderings of a diff preview

use crate::components::ComponentChangeKind;
use crate::diff::LineChange;
use crate::error::PreviewError;
use crate::summary::RiskLevel;
use crate::{DiffPreview, PreviewConfig};
use colored::{ColoredString, Colorize};
use std::path::{Path, PathBuf};
use tokenscope_registry::{paint, write_output};

/// Output format for a diff preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewFormat {
    #[default]
    Terminal,
    Html,
    Json,
}

impl PreviewFormat {
    /// File extension used by `save_preview`
    pub fn extension(&self) -> &'static str {
        match self {
            PreviewFormat::Terminal => "txt",
            PreviewFormat::Html => "html",
            PreviewFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for PreviewFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" | "text" | "txt" => Ok(PreviewFormat::Terminal),
            "html" => Ok(PreviewFormat::Html),
            "json" => Ok(PreviewFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Expected: terminal, html, or json",
                s
            )),
        }
    }
}

/// Render a preview in the requested format
pub fn render(preview: &DiffPreview, format: PreviewFormat, config: &PreviewConfig) -> String {
    match format {
        PreviewFormat::Terminal => render_terminal(preview, config),
        PreviewFormat::Html => render_html(preview),
        PreviewFormat::Json => render_json(preview),
    }
}

/// Render and write `<base>.<extension>`, returning the written path
///
/// The extension is appended, so a dotted base such as `out.v2` keeps its
/// suffix. Files never carry ANSI colour.
pub fn save_preview(
    preview: &DiffPreview,
    format: PreviewFormat,
    base: impl AsRef<Path>,
) -> Result<PathBuf, PreviewError> {
    let mut file_name = base.as_ref().as_os_str().to_os_string();
    file_name.push(".");
    file_name.push(format.extension());
    let path = PathBuf::from(file_name);
    let contents = render(preview, format, &PreviewConfig::plain());
    write_output(&path, &contents)?;
    Ok(path)
}

pub fn render_terminal(preview: &DiffPreview, config: &PreviewConfig) -> String {
    let color = config.color;
    let summary = &preview.summary;
    let mut output = String::new();

    output.push_str(&paint("=== Mutation Preview ===", color, |s| s.bold()));
    output.push_str("\n\n");

    // Summary
    output.push_str(&paint("Summary:", color, |s| s.bold()));
    output.push('\n');
    output.push_str(&format!("  Patches: {}\n", summary.total_patches));
    let risk_style: fn(&str) -> ColoredString = match summary.risk_level {
        RiskLevel::High => |s| s.red().bold(),
        RiskLevel::Medium => |s| s.yellow().bold(),
        RiskLevel::Low => |s| s.green(),
    };
    output.push_str(&format!(
        "  Risk: {}\n",
        paint(&summary.risk_level.as_str().to_uppercase(), color, risk_style)
    ));
    if !summary.change_types.is_empty() {
        let tally: Vec<String> = summary
            .change_types
            .iter()
            .map(|(op, count)| format!("{}={}", op, count))
            .collect();
        output.push_str(&format!("  Changes: {}\n", tally.join(", ")));
    }
    if !summary.affected_components.is_empty() {
        output.push_str(&format!(
            "  Affected components: {}\n",
            summary.affected_components.join(", ")
        ));
    }
    output.push('\n');

    // Component changes
    if !preview.component_changes.is_empty() {
        output.push_str(&paint("Component changes:", color, |s| s.bold()));
        output.push('\n');
        for change in &preview.component_changes {
            let line = match change.kind {
                ComponentChangeKind::ComponentAdded => {
                    paint(&format!("  + {} (added)", change.component), color, |s| s.green())
                }
                ComponentChangeKind::ComponentRemoved => {
                    paint(&format!("  - {} (removed)", change.component), color, |s| s.red())
                }
                ComponentChangeKind::ComponentModified => {
                    let fields: Vec<&str> = change.changes.iter().map(|c| c.kind.as_str()).collect();
                    paint(
                        &format!("  ~ {}: {}", change.component, fields.join(", ")),
                        color,
                        |s| s.yellow(),
                    )
                }
            };
            output.push_str(&line);
            output.push('\n');
        }
        output.push('\n');
    }

    // Diff body
    let stats = &preview.diff.stats;
    output.push_str(&paint("Diff:", color, |s| s.bold()));
    output.push_str(&format!(
        " +{} -{} ({} unchanged)\n",
        stats.added, stats.removed, stats.unchanged
    ));

    let changed: Vec<(LineChange, &str)> = preview.diff.changed_lines().collect();
    if changed.is_empty() {
        output.push_str("  (no changes)\n");
    }
    for (kind, line) in changed.iter().take(config.max_terminal_lines) {
        let rendered = match kind {
            LineChange::Added => paint(&format!("+ {}", line), color, |s| s.green()),
            LineChange::Removed => paint(&format!("- {}", line), color, |s| s.red()),
            LineChange::Unchanged => format!("  {}", line),
        };
        output.push_str(&rendered);
        output.push('\n');
    }
    if changed.len() > config.max_terminal_lines {
        output.push_str(&paint(
            &format!("... +{} more lines", changed.len() - config.max_terminal_lines),
            color,
            |s| s.dimmed(),
        ));
        output.push('\n');
    }

    output
}

const HTML_STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
pre{background:#f6f8fa;padding:1em;overflow-x:auto}\
.line{white-space:pre}\
.added{background:#e6ffed;color:#22863a}\
.removed{background:#ffeef0;color:#b31d28}\
.unchanged{color:#6a737d}\
.risk-high{color:#b31d28;font-weight:bold}\
.risk-medium{color:#b08800;font-weight:bold}\
.risk-low{color:#22863a}";

pub fn render_html(preview: &DiffPreview) -> String {
    let summary = &preview.summary;
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    output.push_str("<title>Mutation Preview</title>\n");
    output.push_str(&format!("<style>{}</style>\n", HTML_STYLE));
    output.push_str("</head>\n<body>\n<h1>Mutation Preview</h1>\n");

    output.push_str("<section class=\"summary\">\n<h2>Summary</h2>\n<ul>\n");
    output.push_str(&format!("<li>Patches: {}</li>\n", summary.total_patches));
    output.push_str(&format!(
        "<li class=\"risk risk-{0}\">Risk: {0}</li>\n",
        summary.risk_level
    ));
    for (op, count) in &summary.change_types {
        output.push_str(&format!("<li>{}: {}</li>\n", escape_html(op), count));
    }
    if !summary.affected_components.is_empty() {
        let names: Vec<String> = summary.affected_components.iter().map(|n| escape_html(n)).collect();
        output.push_str(&format!("<li>Affected components: {}</li>\n", names.join(", ")));
    }
    output.push_str("</ul>\n</section>\n");

    if !preview.component_changes.is_empty() {
        output.push_str("<section class=\"components\">\n<h2>Component changes</h2>\n<ul>\n");
        for change in &preview.component_changes {
            let (class, detail) = match change.kind {
                ComponentChangeKind::ComponentAdded => ("added", "added".to_string()),
                ComponentChangeKind::ComponentRemoved => ("removed", "removed".to_string()),
                ComponentChangeKind::ComponentModified => (
                    "modified",
                    change
                        .changes
                        .iter()
                        .map(|c| c.kind.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
            };
            output.push_str(&format!(
                "<li class=\"{}\">{}: {}</li>\n",
                class,
                escape_html(&change.component),
                detail
            ));
        }
        output.push_str("</ul>\n</section>\n");
    }

    output.push_str("<section class=\"diff\">\n<h2>Diff</h2>\n<pre>\n");
    for run in &preview.diff.lines {
        let (class, marker) = match run.kind {
            LineChange::Added => ("added", '+'),
            LineChange::Removed => ("removed", '-'),
            LineChange::Unchanged => ("unchanged", ' '),
        };
        for line in &run.lines {
            output.push_str(&format!(
                "<div class=\"line {}\">{} {}</div>\n",
                class,
                marker,
                escape_html(line)
            ));
        }
    }
    output.push_str("</pre>\n</section>\n</body>\n</html>\n");

    output
}

pub fn render_json(preview: &DiffPreview) -> String {
    serde_json::to_string_pretty(preview).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
