//! Wire-level criteria input.
//!
//! Operators and directions stay plain strings here so that unknown values
//! surface as `UnknownOperator`/`UnknownDirection` from the converter rather
//! than as generic deserialization failures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level criteria input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterInput>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<OrderInput>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<ProjectionInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CriteriaOptionsInput>,
}

impl CriteriaInput {
    /// True when at least one filter entry is present
    pub fn has_filters(&self) -> bool {
        self.filters.as_ref().is_some_and(|f| !f.is_empty())
    }
}

/// A single filter entry; `nested_filters` is required for `and`/`or`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    pub operator: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(
        default,
        alias = "nestedFilters",
        skip_serializing_if = "Option::is_none"
    )]
    pub nested_filters: Option<Vec<FilterInput>>,
}

impl FilterInput {
    pub fn leaf(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            field: Some(field.into()),
            operator: operator.into(),
            value: Some(value),
            nested_filters: None,
        }
    }

    pub fn nested(operator: impl Into<String>, nested_filters: Vec<FilterInput>) -> Self {
        Self {
            field: None,
            operator: operator.into(),
            value: None,
            nested_filters: Some(nested_filters),
        }
    }
}

/// Sort entry; direction defaults to ascending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInput {
    pub field: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

/// Returned-field restriction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub fields: Vec<String>,
}

/// Execution hints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaOptionsInput {
    #[serde(default)]
    pub explain: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, alias = "batchSize", skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,

    #[serde(default, alias = "maxTimeMs", skip_serializing_if = "Option::is_none")]
    pub max_time_ms: Option<i64>,
}
