use serde::Serialize;
use thiserror::Error;
use tokenscope_lexer::Span;

/// Something the parser tolerated instead of rejecting
///
/// Parsing never fails; each diagnostic records where the selector was
/// degraded to a default.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// W-SEL-001
    #[error("unknown query type '{name}', defaulting to tokens")]
    UnknownType { name: String, span: Span },

    /// W-SEL-002
    #[error("condition '{text}' does not match `property operator value` and was dropped")]
    MalformedCondition { text: String, span: Span },

    /// W-SEL-003
    #[error("condition '{text}' has no value and was dropped")]
    MissingValue { text: String, span: Span },

    /// W-SEL-004
    #[error("empty where clause, no filters applied")]
    EmptyWhereClause { span: Span },
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        match self {
            Diagnostic::UnknownType { .. } => "W-SEL-001",
            Diagnostic::MalformedCondition { .. } => "W-SEL-002",
            Diagnostic::MissingValue { .. } => "W-SEL-003",
            Diagnostic::EmptyWhereClause { .. } => "W-SEL-004",
        }
    }

    /// Byte range into the selector this diagnostic refers to
    pub fn span(&self) -> Span {
        match self {
            Diagnostic::UnknownType { span, .. } => *span,
            Diagnostic::MalformedCondition { span, .. } => *span,
            Diagnostic::MissingValue { span, .. } => *span,
            Diagnostic::EmptyWhereClause { span } => *span,
        }
    }

    /// Whether a filter was lost
    pub fn drops_condition(&self) -> bool {
        matches!(
            self,
            Diagnostic::MalformedCondition { .. } | Diagnostic::MissingValue { .. }
        )
    }
}
