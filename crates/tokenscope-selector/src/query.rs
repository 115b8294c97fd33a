//! Structured query types

use serde::{Deserialize, Serialize};

/// What part of the registry a query walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    #[default]
    Tokens,
    Components,
    Themes,
    Variants,
}

impl QueryType {
    /// Detection order used on the base of a `where` selector
    pub const ALL: [QueryType; 4] = [
        QueryType::Tokens,
        QueryType::Components,
        QueryType::Themes,
        QueryType::Variants,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Tokens => "tokens",
            QueryType::Components => "components",
            QueryType::Themes => "themes",
            QueryType::Variants => "variants",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "*=")]
    Contains,
    #[serde(rename = "^=")]
    StartsWith,
    #[serde(rename = "$=")]
    EndsWith,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Contains => "*=",
            Operator::StartsWith => "^=",
            Operator::EndsWith => "$=",
            Operator::Gt => ">",
            Operator::Lt => "<",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `property operator value` filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Dot-path into the record being filtered
    pub property: String,
    pub operator: Operator,
    /// Literal with surrounding quotes removed
    pub value: String,
}

impl Condition {
    pub fn new(property: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            operator,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} '{}'", self.property, self.operator, self.value)
    }
}

/// Output format for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Default,
    Json,
    Table,
    List,
    Count,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "pretty" => Ok(OutputFormat::Default),
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "list" => Ok(OutputFormat::List),
            "count" => Ok(OutputFormat::Count),
            _ => Err(format!(
                "Unknown format: {}. Expected: default, json, table, list, or count",
                s
            )),
        }
    }
}

/// A parsed selector
///
/// Filters are AND-ed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "type")]
    pub query_type: QueryType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default)]
    pub filters: Vec<Condition>,

    #[serde(default)]
    pub output: OutputFormat,
}

impl Query {
    pub fn new(query_type: QueryType) -> Self {
        Self {
            query_type,
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_filter(mut self, condition: Condition) -> Self {
        self.filters.push(condition);
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }
}
