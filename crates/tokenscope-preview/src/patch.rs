//! RFC 6902 patch application on copies of a registry document

use crate::error::PreviewError;
use crate::{build_preview, DiffPreview, PreviewConfig};
use serde_json::Value;
use tokenscope_registry::{PatchOperation, RegistryDocument};

/// Apply patches to a copy of `original`
///
/// Operations apply in order; the first failure aborts and `original` is
/// left untouched either way.
pub fn apply_patches(original: &Value, patches: &[PatchOperation]) -> Result<Value, PreviewError> {
    let patch_ops: json_patch::Patch =
        serde_json::from_value(serde_json::to_value(patches)?).map_err(|e| {
            PreviewError::InvalidPatch {
                message: format!("invalid JSON Patch format: {e}"),
            }
        })?;

    let mut patched = original.clone();
    json_patch::patch(&mut patched, &patch_ops.0).map_err(|e| PreviewError::PatchFailed {
        message: e.to_string(),
    })?;

    tracing::debug!(patches = patches.len(), "applied patches to document copy");
    Ok(patched)
}

/// Apply patches to a copy of a registry document
pub fn apply_to_document(
    original: &RegistryDocument,
    patches: &[PatchOperation],
) -> Result<RegistryDocument, PreviewError> {
    let patched = apply_patches(&original.to_value(), patches)?;
    Ok(serde_json::from_value(patched)?)
}

/// Apply patches to a copy and preview the result against the original
pub fn preview_patches(
    original: &RegistryDocument,
    patches: &[PatchOperation],
    config: &PreviewConfig,
) -> Result<(RegistryDocument, DiffPreview), PreviewError> {
    let before = original.to_value();
    let after = apply_patches(&before, patches)?;
    let preview = build_preview(&before, &after, patches, config);
    let mutated = serde_json::from_value(after)?;
    Ok((mutated, preview))
}
