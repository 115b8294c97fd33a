use thiserror::Error;
use tokenscope_registry::RegistryError;

/// Errors raised while applying patches or saving a preview
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The patch list does not have the RFC 6902 shape
    #[error("invalid patch: {message}")]
    InvalidPatch { message: String },

    /// A patch operation could not be applied to the document
    #[error("patch failed: {message}")]
    PatchFailed { message: String },

    /// The patched document no longer has the registry shape
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
