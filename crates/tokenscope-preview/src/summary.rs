//! Patch tally, affected components, and risk assessment

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tokenscope_registry::PatchOperation;

const MEDIUM_RISK_PATCHES: usize = 10;
const MEDIUM_RISK_COMPONENTS: usize = 5;

/// How disruptive a patch list is, ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub total_patches: usize,

    /// Patch count per `op`
    pub change_types: BTreeMap<String, usize>,

    /// Component names touched by any patch, in first-touched order
    pub affected_components: Vec<String>,

    pub risk_level: RiskLevel,
}

impl ChangeSummary {
    pub fn new(original: &Value, mutated: &Value, patches: &[PatchOperation]) -> Self {
        let mut change_types = BTreeMap::new();
        for patch in patches {
            *change_types.entry(patch.op.as_str().to_string()).or_insert(0) += 1;
        }

        let affected_components = affected_components(original, mutated, patches);
        let risk_level = assess_risk(patches, affected_components.len());

        Self {
            total_patches: patches.len(),
            change_types,
            affected_components,
            risk_level,
        }
    }
}

/// `high` on any remove/move, `medium` on a large patch list or many
/// components, `low` otherwise
pub fn assess_risk(patches: &[PatchOperation], affected_components: usize) -> RiskLevel {
    if patches.iter().any(|patch| patch.op.is_destructive()) {
        RiskLevel::High
    } else if patches.len() > MEDIUM_RISK_PATCHES || affected_components > MEDIUM_RISK_COMPONENTS {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Names of components addressed by `path` or `from` pointers of the form
/// `/components/<index>/...`
pub fn affected_components(original: &Value, mutated: &Value, patches: &[PatchOperation]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    let pointers = patches
        .iter()
        .flat_map(|patch| std::iter::once(patch.path.as_str()).chain(patch.from.as_deref()));

    for pointer in pointers {
        match component_for_pointer(pointer, original, mutated) {
            Some(name) if !names.contains(&name) => names.push(name),
            Some(_) => {}
            None if pointer.starts_with("/components/") => {
                tracing::debug!(pointer, "patch pointer does not resolve to a named component");
            }
            None => {}
        }
    }

    names
}

fn component_for_pointer(pointer: &str, original: &Value, mutated: &Value) -> Option<String> {
    let index = pointer.strip_prefix("/components/")?.split('/').next()?;

    // `-` appends, so the new component is the last one after mutation
    if index == "-" {
        return mutated
            .get("components")
            .and_then(Value::as_array)
            .and_then(|components| components.last())
            .and_then(component_name);
    }

    let index: usize = index.parse().ok()?;
    component_at(original, index).or_else(|| component_at(mutated, index))
}

fn component_at(document: &Value, index: usize) -> Option<String> {
    document
        .get("components")
        .and_then(|components| components.get(index))
        .and_then(component_name)
}

fn component_name(component: &Value) -> Option<String> {
    component.get("name").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn documents() -> (Value, Value) {
        let original = json!({"components": [{"name": "Button"}, {"name": "Card"}]});
        let mutated = json!({"components": [{"name": "Button"}, {"name": "Card"}, {"name": "Input"}]});
        (original, mutated)
    }

    #[test]
    fn test_change_types_tally() {
        let (original, mutated) = documents();
        let patches = vec![
            PatchOperation::add("/components/0/props/-", json!({"name": "size"})),
            PatchOperation::add("/components/1/variants/-", json!("outlined")),
            PatchOperation::replace("/components/1/description", json!("Surface")),
        ];
        let summary = ChangeSummary::new(&original, &mutated, &patches);
        assert_eq!(summary.total_patches, 3);
        assert_eq!(summary.change_types["add"], 2);
        assert_eq!(summary.change_types["replace"], 1);
        assert_eq!(summary.affected_components, vec!["Button", "Card"]);
        assert_eq!(summary.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_append_resolves_to_last_mutated_component() {
        let (original, mutated) = documents();
        let patches = vec![PatchOperation::add("/components/-", json!({"name": "Input"}))];
        assert_eq!(affected_components(&original, &mutated, &patches), vec!["Input"]);
    }

    #[test]
    fn test_index_only_in_mutated() {
        let (original, mutated) = documents();
        let patches = vec![PatchOperation::add("/components/2", json!({"name": "Input"}))];
        assert_eq!(affected_components(&original, &mutated, &patches), vec!["Input"]);
    }

    #[test]
    fn test_from_pointer_counts() {
        let (original, mutated) = documents();
        let patches = vec![PatchOperation::copy_from("/components/1/props", "/metadata/props")];
        assert_eq!(affected_components(&original, &mutated, &patches), vec!["Card"]);
    }

    #[test]
    fn test_non_component_paths_ignored() {
        let (original, mutated) = documents();
        let patches = vec![
            PatchOperation::replace("/tokens/color/primary/value", json!("#000")),
            PatchOperation::replace("/components/99/name", json!("Ghost")),
        ];
        assert!(affected_components(&original, &mutated, &patches).is_empty());
    }

    #[test]
    fn test_risk_levels() {
        let add = PatchOperation::add("/tokens/a", json!(1));
        assert_eq!(assess_risk(&[add.clone()], 1), RiskLevel::Low);
        assert_eq!(assess_risk(&vec![add.clone(); 11], 0), RiskLevel::Medium);
        assert_eq!(assess_risk(&[add.clone()], 6), RiskLevel::Medium);
        assert_eq!(assess_risk(&[add, PatchOperation::remove("/tokens/b")], 0), RiskLevel::High);
        assert_eq!(
            assess_risk(&[PatchOperation::move_from("/tokens/a", "/tokens/b")], 0),
            RiskLevel::High
        );
    }

    #[test]
    fn test_risk_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert_eq!(serde_json::to_value(RiskLevel::High).unwrap(), json!("high"));
    }
}
