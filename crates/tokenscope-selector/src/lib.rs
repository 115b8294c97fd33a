//! tokenscope Selector - Permissive selector parser
//!
//! Parses hand-typed registry selectors into a structured `Query`:
//!
//! ```text
//! selector := type ['.' path] [ 'where' condition (' and ' condition)* ]
//! ```
//!
//! Key parsing rules:
//! - No OR, no grouping: conditions are AND-ed
//! - A malformed condition is dropped, never an error
//! - Dropped input is reported through `Diagnostic`s

mod error;
mod parser;
mod query;

pub use error::*;
pub use parser::*;
pub use query::*;

pub use tokenscope_lexer::Span;

/// Parse a selector into a query plus whatever was tolerated along the way
pub fn parse_selector(source: &str) -> (Query, Vec<Diagnostic>) {
    Parser::new(source).parse_selector()
}

/// Parse a selector, discarding diagnostics
pub fn parse(source: &str) -> Query {
    parse_selector(source).0
}
