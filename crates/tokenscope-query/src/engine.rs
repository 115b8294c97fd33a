//! Query Engine - Execute parsed selectors against a registry document
//!
//! Execution is read-only and deterministic: the same query against the same
//! document always yields the same `data` and `count`.

use crate::operators::{evaluate_all, NumericCoercion};
use serde::Serialize;
use serde_json::{Map, Value};
use tokenscope_registry::{
    filter_tree_by_path, flatten_tree, path_to_regex_with, unflatten_tree, FlatTokens, GlobMode,
    RegistryDocument, ThemeContext,
};
use tokenscope_selector::{Query, QueryType};

/// Configuration for query execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    pub glob_mode: GlobMode,
    pub numeric_coercion: NumericCoercion,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl QueryConfig {
    /// Default configuration: `**` crosses segments, unit-aware `>`/`<`
    pub fn default_config() -> Self {
        Self {
            glob_mode: GlobMode::CrossSegment,
            numeric_coercion: NumericCoercion::UnitAware,
        }
    }

    /// Literal selector semantics: `**` behaves like `*` and unit-suffixed
    /// values never compare numerically
    pub fn strict_parity() -> Self {
        Self {
            glob_mode: GlobMode::SingleSegment,
            numeric_coercion: NumericCoercion::Strict,
        }
    }
}

/// Result of one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    #[serde(rename = "type")]
    pub query_type: QueryType,

    /// Flattened leaves for token/theme results, items otherwise
    pub count: usize,

    pub data: Value,

    pub metadata: ResultMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    pub query: Query,

    /// Where the registry came from
    pub source: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_context: Option<ThemeContext>,
}

/// Query engine that executes queries against a registry document
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    config: QueryConfig,
}

impl QueryEngine {
    /// Create a new query engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Execute a query
    pub fn execute(&self, registry: &RegistryDocument, query: &Query, source: &str) -> QueryResult {
        tracing::debug!(
            query_type = %query.query_type,
            path = query.path.as_deref().unwrap_or(""),
            filters = query.filters.len(),
            "executing query"
        );

        let (count, data, theme_context) = match query.query_type {
            QueryType::Tokens => {
                let (count, tree) = self.query_tokens(&registry.tokens, query);
                let theme = (!registry.theme_context.is_empty())
                    .then(|| registry.theme_context.clone());
                (count, Value::Object(tree), theme)
            }
            QueryType::Components => {
                let items = self.query_components(registry, query);
                (items.len(), Value::Array(items), None)
            }
            QueryType::Themes => {
                let (count, tree) = self.query_themes(&registry.theme_context, query);
                (count, Value::Object(tree), None)
            }
            QueryType::Variants => {
                let items = self.query_variants(registry, query);
                (items.len(), Value::Array(items), None)
            }
        };

        QueryResult {
            query_type: query.query_type,
            count,
            data,
            metadata: ResultMetadata {
                query: query.clone(),
                source: source.to_string(),
                theme_context,
            },
        }
    }

    fn query_tokens(&self, tokens: &Map<String, Value>, query: &Query) -> (usize, Map<String, Value>) {
        let mut tree = self.filter_by_path(tokens, query);

        if !query.filters.is_empty() {
            let survivors: FlatTokens = flatten_tree(&tree, "")
                .into_iter()
                .filter(|(path, leaf)| {
                    evaluate_all(&token_record(path, leaf), &query.filters, self.config.numeric_coercion)
                })
                .collect();
            tree = unflatten_tree(&survivors);
        }

        (flatten_tree(&tree, "").len(), tree)
    }

    fn query_components(&self, registry: &RegistryDocument, query: &Query) -> Vec<Value> {
        let name_pattern = query
            .path
            .as_deref()
            .map(|path| path_to_regex_with(path, self.config.glob_mode));

        registry
            .components
            .iter()
            .map(|component| component.to_value())
            .filter(|component| evaluate_all(component, &query.filters, self.config.numeric_coercion))
            .filter(|component| match &name_pattern {
                Some(pattern) => ["name", "displayName"].iter().any(|key| {
                    component
                        .get(*key)
                        .and_then(Value::as_str)
                        .is_some_and(|name| pattern.is_match(name))
                }),
                None => true,
            })
            .collect()
    }

    fn query_themes(&self, theme: &ThemeContext, query: &Query) -> (usize, Map<String, Value>) {
        if !query.filters.is_empty() {
            tracing::debug!(
                filters = query.filters.len(),
                "filters are not supported for theme queries; ignoring"
            );
        }
        let tree = self.filter_by_path(&theme.as_tree(), query);
        (flatten_tree(&tree, "").len(), tree)
    }

    /// One `{component, variant}` record per declared variant
    fn query_variants(&self, registry: &RegistryDocument, query: &Query) -> Vec<Value> {
        let name_pattern = query
            .path
            .as_deref()
            .map(|path| path_to_regex_with(path, self.config.glob_mode));

        registry
            .components
            .iter()
            .filter(|component| {
                name_pattern
                    .as_ref()
                    .map_or(true, |pattern| pattern.is_match(&component.name))
            })
            .flat_map(|component| {
                component.variant_values().into_iter().map(move |variant| {
                    let mut record = Map::new();
                    record.insert("component".into(), Value::String(component.name.clone()));
                    record.insert("variant".into(), variant);
                    Value::Object(record)
                })
            })
            .filter(|record| evaluate_all(record, &query.filters, self.config.numeric_coercion))
            .collect()
    }

    fn filter_by_path(&self, tree: &Map<String, Value>, query: &Query) -> Map<String, Value> {
        match query.path.as_deref() {
            Some(path) => {
                let pattern = path_to_regex_with(path, self.config.glob_mode);
                filter_tree_by_path(tree, &pattern, "")
            }
            None => tree.clone(),
        }
    }
}

/// `{path, value: leaf.value ?? leaf, ...leaf}`
fn token_record(path: &str, leaf: &Value) -> Value {
    let mut record = Map::new();
    record.insert("path".into(), Value::String(path.to_string()));
    record.insert(
        "value".into(),
        leaf.get("value").cloned().unwrap_or_else(|| leaf.clone()),
    );
    if let Value::Object(fields) = leaf {
        for (key, value) in fields {
            record.insert(key.clone(), value.clone());
        }
    }
    Value::Object(record)
}
