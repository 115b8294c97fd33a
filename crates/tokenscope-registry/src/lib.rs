//! tokenscope-registry: Registry Document model and traversal primitives
//!
//! The registry document is produced upstream by the component extractor and
//! consumed read-only by the query engine and the mutation preview engine.
//! This crate provides:
//! - `RegistryDocument`: components, design tokens, theme context, metadata
//! - `PatchOperation`: one RFC 6902 edit against a registry document
//! - `tree`: namespace-tree flatten/unflatten, path filtering, property lookup
//! - `glob`: dot-path glob to regex translation
//! - `RegistryCache`: explicit memo of loaded documents
//! - `paint`: colour toggle shared by the text renderers
//!
//! # Token trees
//!
//! ```text
//! tokens
//! ├── color                 namespace
//! │   └── primary           leaf  { value: "#112233", type: "color" }
//! └── spacing               namespace
//!     └── small             leaf  { value: "8px" }
//! ```
//!
//! A node is a leaf when it is an object holding a `value` key, even if it
//! also holds child keys. Those children are never visited.

mod cache;
mod document;
mod error;
pub mod glob;
mod style;
pub mod tree;

pub use cache::RegistryCache;
pub use document::{
    load_json, load_patches, write_output, ComponentDescriptor, PatchOp, PatchOperation,
    PropDescriptor, RegistryDocument, ThemeContext,
};
pub use error::RegistryError;
pub use style::paint;
pub use glob::{path_to_regex, path_to_regex_with, GlobMode};
pub use tree::{
    classify, filter_tree_by_path, flatten_tree, resolve_property, unflatten_tree, FlatTokens,
    NodeKind,
};
