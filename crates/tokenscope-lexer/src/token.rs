use logos::Logos;
use serde::{Deserialize, Serialize};

/// Byte range into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the span right by `offset` bytes
    pub fn shifted(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Tokens of a `property operator value` condition
///
/// Operator characters can never appear inside a `Word`, so the property
/// always ends where the first operator begins.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    #[token("!=")]
    NotEq,
    #[token("*=")]
    Contains,
    #[token("^=")]
    StartsWith,
    #[token("$=")]
    EndsWith,
    #[token("=")]
    Eq,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,

    #[regex(r#""([^"\\]|\\.)*""#)]
    DoubleQuoted,
    #[regex(r"'([^'\\]|\\.)*'")]
    SingleQuoted,

    /// Property names, unquoted values
    #[regex(r#"[^ \t\r\n\f!=*^$<>'"]+"#)]
    Word,

    Error,
    Eof,
}

impl TokenKind {
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::NotEq
                | TokenKind::Contains
                | TokenKind::StartsWith
                | TokenKind::EndsWith
                | TokenKind::Eq
                | TokenKind::Gt
                | TokenKind::Lt
        )
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, TokenKind::DoubleQuoted | TokenKind::SingleQuoted)
    }
}
