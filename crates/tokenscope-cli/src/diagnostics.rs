//! Selector diagnostics rendered with ariadne

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use tokenscope_selector::Diagnostic;

/// Print each diagnostic against the selector on stderr
pub fn report_diagnostics(selector: &str, diagnostics: &[Diagnostic], color: bool) {
    for diagnostic in diagnostics {
        let span = diagnostic.span();
        let start = char_offset(selector, span.start);
        let end = char_offset(selector, span.end);

        let label = match diagnostic {
            Diagnostic::UnknownType { .. } => "queried as tokens",
            Diagnostic::MalformedCondition { .. } | Diagnostic::MissingValue { .. } => {
                "condition dropped"
            }
            Diagnostic::EmptyWhereClause { .. } => "no conditions here",
        };

        let rendered = Report::build(ReportKind::Warning, (), start)
            .with_code(diagnostic.code())
            .with_message(diagnostic.to_string())
            .with_label(
                Label::new(start..end)
                    .with_message(label)
                    .with_color(Color::Yellow),
            )
            .with_config(Config::default().with_color(color))
            .finish()
            .eprint(Source::from(selector.to_string()));

        if let Err(e) = rendered {
            tracing::warn!(error = %e, "failed to render diagnostic");
        }
    }
}

/// ariadne addresses characters, the parser reports bytes
fn char_offset(source: &str, byte: usize) -> usize {
    source
        .char_indices()
        .take_while(|(idx, _)| *idx < byte)
        .count()
}
