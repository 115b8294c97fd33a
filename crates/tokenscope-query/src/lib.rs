//! tokenscope Query - Execute selectors against a registry document
//!
//! Dispatches a parsed `Query` by type:
//! - `tokens`: path-filter the token tree, then keep leaves where every condition holds
//! - `components`: filter raw component objects, then glob on `name`/`displayName`
//! - `themes`: path-filter the `{config, cssVariables}` tree
//! - `variants`: one `{component, variant}` record per declared variant
//!
//! Results render through `format_result` as json, table, list, count, or the
//! default colourised listing.

mod engine;
mod format;
mod operators;

pub use engine::{QueryConfig, QueryEngine, QueryResult, ResultMetadata};
pub use format::{format_result, FormatOptions};
pub use operators::{evaluate, evaluate_all, NumericCoercion};

/// Parse and execute a selector with the default configuration
pub fn run_selector(
    registry: &tokenscope_registry::RegistryDocument,
    selector: &str,
    source: &str,
) -> QueryResult {
    let query = tokenscope_selector::parse(selector);
    QueryEngine::new().execute(registry, &query, source)
}
