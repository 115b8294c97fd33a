//! tokenscope Preview - Diff and mutation preview for registry documents
//!
//! Given an original document, a mutated document, and the patch list that
//! produced it, a `DiffPreview` reports:
//! - a `ChangeSummary` (patch tally, affected components, risk level)
//! - a line diff over stable serializations plus a structural diff
//! - component-level changes keyed by component name
//!
//! Inputs are never modified. `apply_patches` works on a copy, so the two
//! snapshots stay independent.

mod components;
mod diff;
mod error;
mod patch;
mod render;
mod summary;

pub use components::{diff_components, ComponentChange, ComponentChangeKind, FieldChange, FieldChangeKind};
pub use diff::{
    canonicalize, diff_documents, diff_lines, diff_structure, stable_json, DiffRun, DiffStats,
    DocumentDiff, LineChange, StructuralChange, StructuralKind,
};
pub use error::PreviewError;
pub use patch::{apply_patches, apply_to_document, preview_patches};
pub use render::{render, render_html, render_json, render_terminal, save_preview, PreviewFormat};
pub use summary::{affected_components, assess_risk, ChangeSummary, RiskLevel};

use serde::Serialize;
use serde_json::Value;
use tokenscope_registry::{PatchOperation, RegistryDocument};

/// Configuration for preview rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewConfig {
    /// ANSI colour in the terminal rendering
    pub color: bool,
    /// Changed lines shown before the `... +N more lines` footer
    pub max_terminal_lines: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            color: true,
            max_terminal_lines: 20,
        }
    }
}

impl PreviewConfig {
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }
}

/// Pre-rendered outputs, filled in by `build_preview`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedFormats {
    pub terminal: String,
    pub html: String,
    pub json: String,
}

impl RenderedFormats {
    pub fn get(&self, format: PreviewFormat) -> &str {
        match format {
            PreviewFormat::Terminal => &self.terminal,
            PreviewFormat::Html => &self.html,
            PreviewFormat::Json => &self.json,
        }
    }
}

/// Report over two registry snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffPreview {
    pub summary: ChangeSummary,
    pub diff: DocumentDiff,
    pub component_changes: Vec<ComponentChange>,
    pub patches: Vec<PatchOperation>,
    #[serde(skip)]
    pub formats: RenderedFormats,
}

/// Build a preview of `mutated` against `original`
pub fn build_preview(
    original: &Value,
    mutated: &Value,
    patches: &[PatchOperation],
    config: &PreviewConfig,
) -> DiffPreview {
    let mut preview = DiffPreview {
        summary: ChangeSummary::new(original, mutated, patches),
        diff: diff_documents(original, mutated),
        component_changes: diff_components(original, mutated),
        patches: patches.to_vec(),
        formats: RenderedFormats::default(),
    };

    tracing::debug!(
        patches = patches.len(),
        risk = %preview.summary.risk_level,
        added = preview.diff.stats.added,
        removed = preview.diff.stats.removed,
        "built diff preview"
    );

    preview.formats = RenderedFormats {
        terminal: render_terminal(&preview, config),
        html: render_html(&preview),
        json: render_json(&preview),
    };
    preview
}

/// `build_preview` over two loaded registry documents
pub fn preview_documents(
    original: &RegistryDocument,
    mutated: &RegistryDocument,
    patches: &[PatchOperation],
    config: &PreviewConfig,
) -> DiffPreview {
    build_preview(&original.to_value(), &mutated.to_value(), patches, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_preview_inputs_untouched() {
        let original = json!({"components": [{"name": "Button", "props": []}]});
        let mutated = json!({"components": []});
        let snapshot = (original.clone(), mutated.clone());
        let patches = vec![PatchOperation::remove("/components/0")];

        let preview = build_preview(&original, &mutated, &patches, &PreviewConfig::plain());
        assert_eq!((original, mutated), snapshot);
        assert_eq!(preview.summary.risk_level, RiskLevel::High);
        assert_eq!(preview.summary.affected_components, vec!["Button"]);
        assert_eq!(preview.component_changes[0].kind, ComponentChangeKind::ComponentRemoved);
    }

    #[test]
    fn test_formats_prerendered() {
        let preview = build_preview(&json!({}), &json!({}), &[], &PreviewConfig::plain());
        assert!(preview.formats.get(PreviewFormat::Terminal).contains("(no changes)"));
        assert!(preview.formats.get(PreviewFormat::Html).starts_with("<!DOCTYPE html>"));
        assert_eq!(preview.formats.get(PreviewFormat::Json), render_json(&preview));
        assert_eq!(preview.summary.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_preview_documents() {
        let original = RegistryDocument::from_json_str(r#"{"components": [{"name": "Card"}]}"#).unwrap();
        let mutated = RegistryDocument::from_json_str(
            r#"{"components": [{"name": "Card", "variants": ["elevated"]}]}"#,
        )
        .unwrap();
        let patches = vec![PatchOperation::add("/components/0/variants/-", json!("elevated"))];
        let preview = preview_documents(&original, &mutated, &patches, &PreviewConfig::plain());
        assert_eq!(preview.component_changes[0].changes[0].kind, FieldChangeKind::VariantsChanged);
    }
}
