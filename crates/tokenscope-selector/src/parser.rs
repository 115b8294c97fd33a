use crate::error::Diagnostic;
use crate::query::{Condition, Operator, Query, QueryType};
use tokenscope_lexer::{tokenize, Span, TokenKind};

const WHERE: &str = " where ";
const AND: &str = " and ";

/// Permissive selector parser
///
/// Every input yields a `Query`. Anything the grammar cannot place is
/// dropped and recorded as a `Diagnostic` with a span into the original
/// (untrimmed) selector.
pub struct Parser<'a> {
    source: &'a str,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            diagnostics: Vec::new(),
        }
    }

    pub fn parse_selector(mut self) -> (Query, Vec<Diagnostic>) {
        let leading = self.source.len() - self.source.trim_start().len();
        let text = self.source.trim();

        let lowered = text.to_ascii_lowercase();
        let query = match lowered.find(WHERE) {
            Some(idx) => {
                let clause_start = idx + WHERE.len();
                self.parse_where_form(&text[..idx], leading, &text[clause_start..], leading + clause_start)
            }
            None if lowered.ends_with(WHERE.trim_end()) => {
                // `components where` with nothing after it
                let base_len = text.len() - WHERE.trim_end().len();
                self.diagnostics.push(Diagnostic::EmptyWhereClause {
                    span: Span::new(leading + base_len, leading + text.len()),
                });
                self.parse_dotted_form(&text[..base_len], leading)
            }
            None => self.parse_dotted_form(text, leading),
        };

        (query, self.diagnostics)
    }

    /// `type[.path] where cond and cond ...`
    fn parse_where_form(
        &mut self,
        base: &str,
        base_offset: usize,
        clause: &str,
        clause_offset: usize,
    ) -> Query {
        let base = base.trim_end();
        let mut query = match QueryType::ALL
            .into_iter()
            .find(|t| base.starts_with(t.as_str()))
        {
            Some(query_type) => {
                let mut query = Query::new(query_type);
                query.path = base[query_type.as_str().len()..]
                    .strip_prefix('.')
                    .filter(|path| !path.is_empty())
                    .map(str::to_string);
                query
            }
            None => {
                self.diagnostics.push(Diagnostic::UnknownType {
                    name: base.to_string(),
                    span: Span::new(base_offset, base_offset + base.len()),
                });
                Query::new(QueryType::Tokens)
            }
        };

        if clause.trim().is_empty() {
            self.diagnostics.push(Diagnostic::EmptyWhereClause {
                span: Span::new(clause_offset, clause_offset + clause.len()),
            });
            return query;
        }

        for (part, offset) in split_with_offsets(clause, AND) {
            if let Some(condition) = self.parse_condition(part, clause_offset + offset) {
                query.filters.push(condition);
            }
        }

        query
    }

    /// `type[.path]`
    ///
    /// An unrecognised first segment is taken as the start of a token path.
    fn parse_dotted_form(&mut self, text: &str, offset: usize) -> Query {
        if text.is_empty() {
            return Query::new(QueryType::Tokens);
        }

        let (head, rest) = match text.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (text, None),
        };

        match QueryType::from_name(head) {
            Some(query_type) => {
                let mut query = Query::new(query_type);
                query.path = rest.filter(|path| !path.is_empty()).map(str::to_string);
                query
            }
            None => {
                self.diagnostics.push(Diagnostic::UnknownType {
                    name: head.to_string(),
                    span: Span::new(offset, offset + head.len()),
                });
                Query::new(QueryType::Tokens).with_path(text)
            }
        }
    }

    /// `property operator value`, where the value may be quoted
    fn parse_condition(&mut self, part: &str, offset: usize) -> Option<Condition> {
        let leading = part.len() - part.trim_start().len();
        let text = part.trim();
        let start = offset + leading;
        let span = Span::new(start, start + text.len());

        let tokens = tokenize(text);
        let (property, operator) = match (tokens.first(), tokens.get(1)) {
            (Some(property), Some(operator))
                if property.kind == TokenKind::Word && operator.kind.is_operator() =>
            {
                (property, operator)
            }
            _ => {
                tracing::debug!(condition = text, "dropping malformed condition");
                self.diagnostics.push(Diagnostic::MalformedCondition {
                    text: text.to_string(),
                    span,
                });
                return None;
            }
        };

        let raw_value = text[operator.span.end..].trim();
        if raw_value.is_empty() {
            tracing::debug!(condition = text, "dropping condition without value");
            self.diagnostics.push(Diagnostic::MissingValue {
                text: text.to_string(),
                span,
            });
            return None;
        }

        Some(Condition::new(
            property.text(text),
            operator_for(operator.kind)?,
            strip_quotes(raw_value),
        ))
    }
}

fn operator_for(kind: TokenKind) -> Option<Operator> {
    match kind {
        TokenKind::Eq => Some(Operator::Eq),
        TokenKind::NotEq => Some(Operator::NotEq),
        TokenKind::Contains => Some(Operator::Contains),
        TokenKind::StartsWith => Some(Operator::StartsWith),
        TokenKind::EndsWith => Some(Operator::EndsWith),
        TokenKind::Gt => Some(Operator::Gt),
        TokenKind::Lt => Some(Operator::Lt),
        _ => None,
    }
}

/// Remove one leading and one trailing quote character
fn strip_quotes(raw: &str) -> &str {
    let raw = raw.strip_prefix(['\'', '"']).unwrap_or(raw);
    raw.strip_suffix(['\'', '"']).unwrap_or(raw)
}

fn split_with_offsets<'s>(text: &'s str, separator: &str) -> Vec<(&'s str, usize)> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        parts.push((&text[start..idx], start));
        start = idx + separator.len();
    }
    parts.push((&text[start..], start));
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'Button'"), "Button");
        assert_eq!(strip_quotes("\"Button\""), "Button");
        assert_eq!(strip_quotes("Button"), "Button");
        assert_eq!(strip_quotes("'it''s'"), "it''s");
    }

    #[test]
    fn test_split_with_offsets() {
        let parts = split_with_offsets("a = 1 and b = 2", AND);
        assert_eq!(parts, vec![("a = 1", 0), ("b = 2", 10)]);
    }
}
