//! Query, patch, and re-query one registry through the re-exported crates

use serde_json::json;
use tokenscope::preview::{preview_patches, PreviewConfig, RiskLevel};
use tokenscope::query::{format_result, FormatOptions, QueryEngine};
use tokenscope::registry::{PatchOperation, RegistryDocument};
use tokenscope::selector::{parse, OutputFormat};

fn registry() -> RegistryDocument {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/registry.json");
    RegistryDocument::load(path).expect("fixture registry loads")
}

#[test]
fn test_query_after_patching() {
    let original = registry();
    let engine = QueryEngine::new();
    let selector = parse("components where name ^= 'Icon'");

    let before = engine.execute(&original, &selector, "original");
    assert_eq!(before.count, 2);

    let patches = vec![PatchOperation::add(
        "/components/-",
        json!({"name": "IconLink", "props": [{"name": "href", "type": "string", "required": true}]}),
    )];
    let (mutated, preview) = preview_patches(&original, &patches, &PreviewConfig::plain()).unwrap();
    assert_eq!(preview.summary.affected_components, vec!["IconLink"]);
    assert_eq!(preview.summary.risk_level, RiskLevel::Low);

    let after = engine.execute(&mutated, &selector, "mutated");
    assert_eq!(after.count, 3);
    assert_eq!(
        format_result(&after, OutputFormat::List, &FormatOptions::plain()),
        "IconButton\nIconBadge\nIconLink"
    );

    // The original snapshot is untouched
    assert_eq!(engine.execute(&original, &selector, "original").count, 2);
}

#[test]
fn test_removing_a_component_is_high_risk() {
    let original = registry();
    let patches = vec![PatchOperation::remove("/components/2")];
    let (mutated, preview) = preview_patches(&original, &patches, &PreviewConfig::plain()).unwrap();

    assert_eq!(mutated.components.len(), original.components.len() - 1);
    assert_eq!(preview.summary.risk_level, RiskLevel::High);
    assert_eq!(preview.summary.affected_components, vec!["IconBadge"]);
}
