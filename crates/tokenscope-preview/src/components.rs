//! Component-level change report

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentChangeKind {
    ComponentAdded,
    ComponentRemoved,
    ComponentModified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldChangeKind {
    PropsChanged,
    VariantsChanged,
    ExamplesChanged,
}

impl FieldChangeKind {
    pub const ALL: [FieldChangeKind; 3] = [
        FieldChangeKind::PropsChanged,
        FieldChangeKind::VariantsChanged,
        FieldChangeKind::ExamplesChanged,
    ];

    /// The component key this change compares
    pub fn field(&self) -> &'static str {
        match self {
            FieldChangeKind::PropsChanged => "props",
            FieldChangeKind::VariantsChanged => "variants",
            FieldChangeKind::ExamplesChanged => "examples",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldChangeKind::PropsChanged => "props_changed",
            FieldChangeKind::VariantsChanged => "variants_changed",
            FieldChangeKind::ExamplesChanged => "examples_changed",
        }
    }
}

/// One changed list on a component present in both snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    #[serde(rename = "type")]
    pub kind: FieldChangeKind,
    pub before: Value,
    pub after: Value,
    /// Entries only in `after`; props are matched by `name`
    pub added: Vec<Value>,
    pub removed: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentChange {
    #[serde(rename = "type")]
    pub kind: ComponentChangeKind,
    pub component: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
}

/// Compare the component lists of two snapshots by `name`
///
/// Components in `original` come first in their original order (removed or
/// modified), followed by components only in `mutated`, in mutated order.
pub fn diff_components(original: &Value, mutated: &Value) -> Vec<ComponentChange> {
    let before = named_components(original);
    let after = named_components(mutated);
    let after_index: HashMap<&str, &Value> = after.iter().copied().collect();
    let before_index: HashMap<&str, &Value> = before.iter().copied().collect();

    let mut changes = Vec::new();

    for (name, old) in &before {
        match after_index.get(name) {
            None => changes.push(ComponentChange {
                kind: ComponentChangeKind::ComponentRemoved,
                component: name.to_string(),
                changes: Vec::new(),
            }),
            Some(new) => {
                let fields = compare_fields(old, new);
                if !fields.is_empty() {
                    changes.push(ComponentChange {
                        kind: ComponentChangeKind::ComponentModified,
                        component: name.to_string(),
                        changes: fields,
                    });
                }
            }
        }
    }

    for (name, _) in &after {
        if !before_index.contains_key(name) {
            changes.push(ComponentChange {
                kind: ComponentChangeKind::ComponentAdded,
                component: name.to_string(),
                changes: Vec::new(),
            });
        }
    }

    changes
}

fn named_components(document: &Value) -> Vec<(&str, &Value)> {
    let Some(components) = document.get("components").and_then(Value::as_array) else {
        return Vec::new();
    };
    components
        .iter()
        .filter_map(|component| {
            let name = component.get("name").and_then(Value::as_str);
            if name.is_none() {
                tracing::debug!("skipping component without a name");
            }
            name.map(|name| (name, component))
        })
        .collect()
}

fn compare_fields(old: &Value, new: &Value) -> Vec<FieldChange> {
    FieldChangeKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let before = old.get(kind.field()).cloned().unwrap_or(Value::Null);
            let after = new.get(kind.field()).cloned().unwrap_or(Value::Null);
            if before == after {
                return None;
            }
            let added = entries_missing_from(&after, &before);
            let removed = entries_missing_from(&before, &after);
            Some(FieldChange {
                kind,
                before,
                after,
                added,
                removed,
            })
        })
        .collect()
}

/// Entries of `list` with no counterpart in `other`
fn entries_missing_from(list: &Value, other: &Value) -> Vec<Value> {
    let other_keys: Vec<&Value> = as_slice(other).iter().map(entry_key).collect();
    as_slice(list)
        .iter()
        .filter(|entry| !other_keys.contains(&entry_key(entry)))
        .cloned()
        .collect()
}

fn as_slice(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Named entries are matched by name, anything else by value
fn entry_key(entry: &Value) -> &Value {
    entry.get("name").unwrap_or(entry)
}
