//! tokenscope - Query and mutation preview for component & design-token registries
//!
//! This crate re-exports the workspace crates:
//! - `registry`: document model, token-tree traversal, dot-path globs
//! - `selector`: permissive selector parser
//! - `query`: query execution and output formatting
//! - `preview`: patch application, diffs, and rendered previews

pub use tokenscope_preview as preview;
pub use tokenscope_query as query;
pub use tokenscope_registry as registry;
pub use tokenscope_selector as selector;
