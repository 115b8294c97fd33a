//! Namespace-tree traversal
//!
//! Token trees are stored as raw JSON so that query results keep whatever
//! extra keys the extractor emitted. `classify` gives the structural view.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Leaf tokens keyed by full dot-path
pub type FlatTokens = BTreeMap<String, Value>;

/// Structural classification of one token-tree node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind<'a> {
    /// Object with a `value` key; any other keys are leaf attributes
    Leaf(&'a Map<String, Value>),
    /// Object without a `value` key
    Namespace(&'a Map<String, Value>),
    /// Anything that is not an object (including arrays and null)
    Scalar(&'a Value),
}

pub fn classify(node: &Value) -> NodeKind<'_> {
    match node {
        Value::Object(map) if map.contains_key("value") => NodeKind::Leaf(map),
        Value::Object(map) => NodeKind::Namespace(map),
        other => NodeKind::Scalar(other),
    }
}

/// Flatten a namespace tree into leaf tokens keyed by dot-path
///
/// Scalars found in namespace position are wrapped as `{value: scalar}`.
/// Empty namespaces produce no entries.
pub fn flatten_tree(node: &Map<String, Value>, prefix: &str) -> FlatTokens {
    let mut flat = FlatTokens::new();
    flatten_into(node, prefix, &mut flat);
    flat
}

fn flatten_into(node: &Map<String, Value>, prefix: &str, flat: &mut FlatTokens) {
    for (key, child) in node {
        let path = join_path(prefix, key);
        match classify(child) {
            NodeKind::Leaf(_) => {
                flat.insert(path, child.clone());
            }
            NodeKind::Scalar(scalar) => {
                let mut leaf = Map::new();
                leaf.insert("value".into(), scalar.clone());
                flat.insert(path, Value::Object(leaf));
            }
            NodeKind::Namespace(children) => flatten_into(children, &path, flat),
        }
    }
}

/// Rebuild a namespace tree from flattened leaves
pub fn unflatten_tree(flat: &FlatTokens) -> Map<String, Value> {
    let mut root = Map::new();

    for (path, leaf) in flat {
        let mut segments: Vec<&str> = path.split('.').collect();
        let last = match segments.pop() {
            Some(last) => last,
            None => continue,
        };

        let mut cursor = &mut root;
        for segment in segments {
            let slot = cursor
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            cursor = ensure_object(slot);
        }
        cursor.insert(last.to_string(), leaf.clone());
    }

    root
}

fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just replaced by an object"),
    }
}

/// Keep every node whose dot-path matches, with its whole subtree
///
/// Non-matching objects are searched recursively and kept only when
/// something below them matched.
pub fn filter_tree_by_path(
    tree: &Map<String, Value>,
    pattern: &Regex,
    prefix: &str,
) -> Map<String, Value> {
    let mut kept = Map::new();

    for (key, child) in tree {
        let path = join_path(prefix, key);
        if pattern.is_match(&path) {
            kept.insert(key.clone(), child.clone());
        } else if let Value::Object(children) = child {
            let nested = filter_tree_by_path(children, pattern, &path);
            if !nested.is_empty() {
                kept.insert(key.clone(), Value::Object(nested));
            }
        }
    }

    kept
}

/// Dot-path property lookup; `None` as soon as a segment is missing
///
/// Numeric segments index into arrays.
pub fn resolve_property<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glob::path_to_regex;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn sample_tokens() -> Map<String, Value> {
        as_map(json!({
            "color": {
                "primary": {"value": "#112233", "type": "color"},
                "brand": {
                    "500": {"value": "#445566", "type": "color"}
                }
            },
            "spacing": {"small": {"value": "8px"}}
        }))
    }

    #[test]
    fn test_classify_value_wins() {
        let node = json!({"value": "#fff", "dark": {"value": "#000"}});
        assert!(matches!(classify(&node), NodeKind::Leaf(_)));
        assert!(matches!(classify(&json!({"dark": {}})), NodeKind::Namespace(_)));
        assert!(matches!(classify(&json!("8px")), NodeKind::Scalar(_)));
        assert!(matches!(classify(&json!([1, 2])), NodeKind::Scalar(_)));
    }

    #[test]
    fn test_flatten_paths() {
        let flat = flatten_tree(&sample_tokens(), "");
        let paths: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["color.brand.500", "color.primary", "spacing.small"]);
        assert_eq!(flat["color.primary"]["type"], json!("color"));
    }

    #[test]
    fn test_flatten_with_prefix() {
        let flat = flatten_tree(&sample_tokens(), "tokens");
        assert!(flat.contains_key("tokens.spacing.small"));
    }

    #[test]
    fn test_flatten_wraps_scalars() {
        let tree = as_map(json!({"spacing": {"small": "8px", "none": 0}}));
        let flat = flatten_tree(&tree, "");
        assert_eq!(flat["spacing.small"], json!({"value": "8px"}));
        assert_eq!(flat["spacing.none"], json!({"value": 0}));
    }

    #[test]
    fn test_flatten_leaf_children_ignored() {
        let tree = as_map(json!({"bg": {"value": "#fff", "dark": {"value": "#000"}}}));
        let flat = flatten_tree(&tree, "");
        assert_eq!(flat.len(), 1);
        assert!(flat.contains_key("bg"));
    }

    #[test]
    fn test_unflatten_inverts_flatten() {
        let tokens = sample_tokens();
        let rebuilt = unflatten_tree(&flatten_tree(&tokens, ""));
        assert_eq!(rebuilt, tokens);
    }

    #[test]
    fn test_filter_by_single_segment_glob() {
        let filtered = filter_tree_by_path(&sample_tokens(), &path_to_regex("color.*"), "");
        assert_eq!(
            Value::Object(filtered),
            json!({
                "color": {
                    "primary": {"value": "#112233", "type": "color"},
                    "brand": {"500": {"value": "#445566", "type": "color"}}
                }
            })
        );
    }

    #[test]
    fn test_filter_keeps_only_matching_branches() {
        let filtered = filter_tree_by_path(&sample_tokens(), &path_to_regex("*.small"), "");
        assert_eq!(
            Value::Object(filtered),
            json!({"spacing": {"small": {"value": "8px"}}})
        );
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        let filtered = filter_tree_by_path(&sample_tokens(), &path_to_regex("radius.*"), "");
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_resolve_property() {
        let record = json!({"name": "Button", "props": [{"name": "label"}], "meta": {"since": "1.0"}});
        assert_eq!(resolve_property(&record, "name"), Some(&json!("Button")));
        assert_eq!(resolve_property(&record, "meta.since"), Some(&json!("1.0")));
        assert_eq!(resolve_property(&record, "props.0.name"), Some(&json!("label")));
        assert_eq!(resolve_property(&record, "meta.missing.deeper"), None);
        assert_eq!(resolve_property(&record, "name.length"), None);
    }
}
