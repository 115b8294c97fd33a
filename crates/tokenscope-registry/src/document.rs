//! Registry Document data model and load boundary

use crate::error::RegistryError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// The component & design-token registry produced by extraction
///
/// Absent (or `null`) top-level keys degrade to empty values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<ComponentDescriptor>,

    /// Namespace tree of design tokens
    #[serde(default, deserialize_with = "null_as_default")]
    pub tokens: Map<String, Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub theme_context: ThemeContext,

    /// Opaque provenance, never interpreted
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,

    /// Top-level keys outside the core shape (`version`, `$schema`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One extracted component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub props: Vec<PropDescriptor>,

    /// A list of variant names, or an object keyed by variant axis
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub variants: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub examples: Option<Value>,

    /// Keys the extractor emits beyond the core shape (`displayName`, `description`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropDescriptor {
    #[serde(default)]
    pub name: String,

    /// A type name, or a structured type such as `{"kind": "union", ...}`
    #[serde(
        rename = "type",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub prop_type: Option<Value>,

    /// `Some(Value::Null)` is an explicit `null` default, `None` an absent key
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Theme configuration captured alongside the tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: Map<String, Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub css_variables: Map<String, Value>,
}

impl ThemeContext {
    pub fn is_empty(&self) -> bool {
        self.config.is_empty() && self.css_variables.is_empty()
    }

    /// The `{config, cssVariables}` tree that theme queries walk
    pub fn as_tree(&self) -> Map<String, Value> {
        let mut tree = Map::new();
        tree.insert("config".into(), Value::Object(self.config.clone()));
        tree.insert("cssVariables".into(), Value::Object(self.css_variables.clone()));
        tree
    }
}

impl ComponentDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.extra.get("displayName").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.extra.get("description").and_then(Value::as_str)
    }

    /// Declared variants: list entries, or the axis names of an object
    pub fn variant_values(&self) -> Vec<Value> {
        match &self.variants {
            Some(Value::Array(list)) => list.clone(),
            Some(Value::Object(axes)) => axes.keys().cloned().map(Value::String).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.clone()],
        }
    }

    /// The raw JSON object filters are evaluated against
    pub fn to_value(&self) -> Value {
        // String-keyed maps and plain structs cannot fail to serialize.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl PropDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.prop_type.as_ref().and_then(Value::as_str)
    }

    pub fn is_required(&self) -> bool {
        self.extra.get("required").and_then(Value::as_bool).unwrap_or(false)
    }
}

impl RegistryDocument {
    /// Load a registry document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let document = Self::from_json_str(&source).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            components = document.components.len(),
            token_roots = document.tokens.len(),
            "loaded registry document"
        );
        Ok(document)
    }

    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// The document as a JSON value, the shape patch pointers address
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn component(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Kind of a single RFC 6902 patch operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl PatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Replace => "replace",
            PatchOp::Move => "move",
            PatchOp::Copy => "copy",
            PatchOp::Test => "test",
        }
    }

    /// Operations that take data away from its original location
    pub fn is_destructive(&self) -> bool {
        matches!(self, PatchOp::Remove | PatchOp::Move)
    }
}

impl std::fmt::Display for PatchOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structural edit addressed by a JSON pointer into a registry document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,

    /// Source pointer for `move` and `copy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self::with_value(PatchOp::Add, path, value)
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self::with_value(PatchOp::Replace, path, value)
    }

    pub fn test(path: impl Into<String>, value: Value) -> Self {
        Self::with_value(PatchOp::Test, path, value)
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            from: None,
            value: None,
        }
    }

    pub fn move_from(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Move,
            path: path.into(),
            from: Some(from.into()),
            value: None,
        }
    }

    pub fn copy_from(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Copy,
            path: path.into(),
            from: Some(from.into()),
            value: None,
        }
    }

    fn with_value(op: PatchOp, path: impl Into<String>, value: Value) -> Self {
        Self {
            op,
            path: path.into(),
            from: None,
            value: Some(value),
        }
    }
}

/// Load a JSON array of patch operations
pub fn load_patches(path: impl AsRef<Path>) -> Result<Vec<PatchOperation>, RegistryError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| RegistryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load any JSON file as an untyped value, keeping its exact shape
pub fn load_json(path: impl AsRef<Path>) -> Result<Value, RegistryError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| RegistryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write one rendered output file
pub fn write_output(path: impl AsRef<Path>, contents: &str) -> Result<(), RegistryError> {
    let path = path.as_ref();
    fs::write(path, contents).map_err(|source| RegistryError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}

/// Keep a present key as `Some`, including an explicit `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_missing_keys_default_to_empty() {
        let doc = RegistryDocument::from_json_str("{}").unwrap();
        assert!(doc.components.is_empty());
        assert!(doc.tokens.is_empty());
        assert!(doc.theme_context.is_empty());
        assert!(doc.metadata.is_null());
    }

    #[test]
    fn test_null_keys_default_to_empty() {
        let doc = RegistryDocument::from_json_str(
            r#"{"components": null, "tokens": null, "themeContext": null}"#,
        )
        .unwrap();
        assert!(doc.components.is_empty());
        assert!(doc.tokens.is_empty());
    }

    #[test]
    fn test_component_extra_keys_preserved() {
        let doc = RegistryDocument::from_json_str(
            r#"{"components": [{"name": "Button", "displayName": "Primary Button", "props": [{"name": "label", "type": "string", "required": true}]}]}"#,
        )
        .unwrap();
        let button = doc.component("Button").unwrap();
        assert_eq!(button.display_name(), Some("Primary Button"));
        assert_eq!(button.props[0].type_name(), Some("string"));
        assert!(button.props[0].is_required());
        assert_eq!(button.to_value()["displayName"], json!("Primary Button"));
    }

    #[test]
    fn test_open_shapes_load_and_round_trip() {
        let source = json!({
            "version": "1.0",
            "components": [{
                "name": "Button",
                "variants": {"size": ["sm", "lg"], "tone": ["neutral"]},
                "examples": null,
                "props": [
                    {"name": "kind", "type": {"kind": "union", "of": ["a", "b"]}},
                    {"name": "icon", "type": "string", "default": null, "required": "sometimes"}
                ]
            }]
        });
        let doc: RegistryDocument = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(doc.extra["version"], json!("1.0"));

        let button = doc.component("Button").unwrap();
        assert_eq!(button.variant_values(), vec![json!("size"), json!("tone")]);
        assert_eq!(button.props[0].type_name(), None);
        assert_eq!(button.props[1].default, Some(Value::Null));
        assert!(!button.props[1].is_required());

        let value = doc.to_value();
        assert_eq!(value["version"], source["version"]);
        assert_eq!(value["components"], source["components"]);
    }

    #[test]
    fn test_variant_values_from_list() {
        let doc = RegistryDocument::from_json_str(
            r#"{"components": [{"name": "Card", "variants": ["flat", "raised"]}, {"name": "Bare"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.components[0].variant_values(), vec![json!("flat"), json!("raised")]);
        assert!(doc.components[1].variant_values().is_empty());
        assert!(!doc.components[1].to_value().as_object().unwrap().contains_key("variants"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = RegistryDocument::load("/nonexistent/registry.json").unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/registry.json"));
    }

    #[test]
    fn test_load_unparsable_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = RegistryDocument::load(file.path()).unwrap_err();
        assert!(matches!(err, RegistryError::Parse { .. }));
        assert_eq!(err.path(), file.path());
    }

    #[test]
    fn test_load_json_keeps_nulls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"components": null, "tokens": {{"a": {{"value": null}}}}}}"#).unwrap();
        let value = load_json(file.path()).unwrap();
        assert_eq!(value, json!({"components": null, "tokens": {"a": {"value": null}}}));
    }

    #[test]
    fn test_patch_operation_wire_shape() {
        let op = PatchOperation::add("/components/0/props/-", json!({"name": "size"}));
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(
            value,
            json!({"op": "add", "path": "/components/0/props/-", "value": {"name": "size"}})
        );

        let parsed: PatchOperation =
            serde_json::from_value(json!({"op": "move", "from": "/a", "path": "/b"})).unwrap();
        assert_eq!(parsed, PatchOperation::move_from("/a", "/b"));
        assert!(parsed.op.is_destructive());
    }
}
