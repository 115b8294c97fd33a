//! Render query results in the supported output formats

use crate::engine::QueryResult;
use colored::Colorize;
use serde_json::Value;
use tokenscope_registry::{flatten_tree, paint};
use tokenscope_selector::{OutputFormat, QueryType};

/// Rendering switches shared by every format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Indent JSON output
    pub pretty: bool,
    /// Emit ANSI colour in the default format
    pub color: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            color: true,
        }
    }
}

impl FormatOptions {
    /// Pretty, without colour (files and pipes)
    pub fn plain() -> Self {
        Self {
            pretty: true,
            color: false,
        }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

/// Format a query result
pub fn format_result(result: &QueryResult, format: OutputFormat, options: &FormatOptions) -> String {
    match format {
        OutputFormat::Json => format_json(result, options),
        OutputFormat::Table => format_table(result),
        OutputFormat::List => format_list(result),
        OutputFormat::Count => format_count(result),
        OutputFormat::Default => format_default(result, options),
    }
}

fn format_json(result: &QueryResult, options: &FormatOptions) -> String {
    let rendered = if options.pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

fn format_count(result: &QueryResult) -> String {
    format!("{} {} found", result.count, result.query_type)
}

fn format_list(result: &QueryResult) -> String {
    rows(result)
        .into_iter()
        .map(|row| match result.query_type {
            QueryType::Variants => format!("{}.{}", row[0], row[1]),
            _ => row[0].clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_table(result: &QueryResult) -> String {
    let headers = headers(result.query_type);
    let rows = rows(result);

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut output = String::new();
    output.push_str(&border('┌', '┬', '┐', &widths));
    output.push_str(&table_row(&header_cells, &widths));
    output.push_str(&border('├', '┼', '┤', &widths));
    for row in &rows {
        output.push_str(&table_row(row, &widths));
    }
    output.push_str(&border('└', '┴', '┘', &widths));
    output
}

fn border(left: char, middle: char, right: char, widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(middle.to_string().as_str()), right)
}

fn table_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!(" {}{} ", cell, " ".repeat(width - cell.chars().count())))
        .collect();
    format!("│{}│\n", padded.join("│"))
}

fn format_default(result: &QueryResult, options: &FormatOptions) -> String {
    let color = options.color;
    let mut output = String::new();
    output.push_str(&paint(
        &format!("Query Results ({})", result.query_type),
        color,
        |s| s.cyan().bold(),
    ));
    output.push('\n');
    output.push_str(&format!("Found {} {}\n\n", result.count, result.query_type));

    let rows = rows(result);
    if rows.is_empty() {
        output.push_str(&paint("  (no results)", color, |s| s.dimmed()));
        output.push('\n');
        return output;
    }

    for row in rows {
        let line = match result.query_type {
            QueryType::Tokens | QueryType::Themes => {
                let mut line = format!("  {}: {}", paint(&row[0], color, |s| s.green()), row[1]);
                if !row[2].is_empty() {
                    line.push_str(&paint(&format!(" ({})", row[2]), color, |s| s.dimmed()));
                }
                line
            }
            QueryType::Components => {
                let mut line = format!("  {}", paint(&row[0], color, |s| s.green().bold()));
                if !row[3].is_empty() {
                    line.push_str(&format!(" - {}", row[3]));
                }
                line.push_str(&paint(
                    &format!(" [{} props, {} variants]", row[1], row[2]),
                    color,
                    |s| s.dimmed(),
                ));
                line
            }
            QueryType::Variants => format!("  {}: {}", paint(&row[0], color, |s| s.green()), row[1]),
        };
        output.push_str(&line);
        output.push('\n');
    }

    output
}

fn headers(query_type: QueryType) -> &'static [&'static str] {
    match query_type {
        QueryType::Tokens | QueryType::Themes => &["Path", "Value", "Type"],
        QueryType::Components => &["Name", "Props", "Variants", "Description"],
        QueryType::Variants => &["Component", "Variant"],
    }
}

/// One row of display cells per token, component, or variant
fn rows(result: &QueryResult) -> Vec<Vec<String>> {
    match (result.query_type, &result.data) {
        (QueryType::Tokens | QueryType::Themes, Value::Object(tree)) => flatten_tree(tree, "")
            .into_iter()
            .map(|(path, leaf)| {
                let value = leaf.get("value").map(display_value).unwrap_or_default();
                let token_type = leaf
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                vec![path, value, token_type]
            })
            .collect(),
        (QueryType::Components, Value::Array(items)) => items
            .iter()
            .map(|component| {
                vec![
                    component.get("name").map(display_value).unwrap_or_default(),
                    array_len(component, "props").to_string(),
                    array_len(component, "variants").to_string(),
                    component
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                ]
            })
            .collect(),
        (QueryType::Variants, Value::Array(items)) => items
            .iter()
            .map(|record| {
                vec![
                    record.get("component").map(display_value).unwrap_or_default(),
                    record.get("variant").map(display_value).unwrap_or_default(),
                ]
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Entries in a list, or axes in an object-shaped `variants`
fn array_len(record: &Value, key: &str) -> usize {
    match record.get(key) {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(entries)) => entries.len(),
        _ => 0,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
