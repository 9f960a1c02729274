//! # Filter Predicates
//!
//! A filter is either a leaf (`field operator value`) or a composite
//! (`AND`/`OR` over child filters). The two shapes are separate enum
//! variants, so a composite can never carry a field or a value and a leaf
//! can never carry children.

use serde::Serialize;
use serde_json::Value;

use super::errors::{CriteriaError, CriteriaResult};
use super::lookup::Lookup;
use super::operator::FilterOperator;

/// Terminal predicate on a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldFilter {
    field: String,
    operator: FilterOperator,
    #[serde(skip)]
    lookup: Lookup,
    value: Value,
}

impl FieldFilter {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    /// Lookup performed before negation; `ne`/`nin` carry `Eq`/`In`
    pub fn lookup(&self) -> Lookup {
        self.lookup
    }

    /// True when the leaf selects the complement of its lookup
    pub fn is_negated(&self) -> bool {
        self.operator.is_negated()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// AND/OR over one or more child filters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeFilter {
    operator: FilterOperator,
    children: Vec<Filter>,
}

impl CompositeFilter {
    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    pub fn children(&self) -> &[Filter] {
        &self.children
    }
}

/// A filter expression
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    Leaf(FieldFilter),
    Composite(CompositeFilter),
}

impl Filter {
    /// Create a leaf filter.
    ///
    /// Fails with `InvalidFilterShape` when the operator is AND/OR or the
    /// field name is empty.
    pub fn leaf(
        field: impl Into<String>,
        operator: FilterOperator,
        value: Value,
    ) -> CriteriaResult<Self> {
        let field = field.into();
        let lookup = Lookup::for_leaf(operator).ok_or_else(|| {
            CriteriaError::shape(format!(
                "operator '{}' cannot be used on a field filter",
                operator
            ))
        })?;
        if field.trim().is_empty() {
            return Err(CriteriaError::shape(format!(
                "operator '{}' requires a field",
                operator
            )));
        }
        Ok(Filter::Leaf(FieldFilter {
            field,
            operator,
            lookup,
            value,
        }))
    }

    /// Create a composite filter.
    ///
    /// Fails with `InvalidFilterShape` when the operator is not AND/OR or
    /// there are no children.
    pub fn composite(operator: FilterOperator, children: Vec<Filter>) -> CriteriaResult<Self> {
        if !operator.is_composite() {
            return Err(CriteriaError::shape(format!(
                "operator '{}' cannot combine child filters",
                operator
            )));
        }
        if children.is_empty() {
            return Err(CriteriaError::shape(format!(
                "operator '{}' requires at least one child filter",
                operator
            )));
        }
        Ok(Filter::Composite(CompositeFilter { operator, children }))
    }

    /// AND over the given children
    pub fn and(children: Vec<Filter>) -> CriteriaResult<Self> {
        Self::composite(FilterOperator::And, children)
    }

    /// OR over the given children
    pub fn or(children: Vec<Filter>) -> CriteriaResult<Self> {
        Self::composite(FilterOperator::Or, children)
    }

    // Shortcuts below take a fixed leaf operator and are infallible; the
    // field name must be non-empty, which debug builds assert.
    fn field_filter(
        field: impl Into<String>,
        operator: FilterOperator,
        lookup: Lookup,
        value: Value,
    ) -> Self {
        let field = field.into();
        debug_assert!(
            !field.trim().is_empty(),
            "operator '{}' requires a field",
            operator
        );
        Filter::Leaf(FieldFilter {
            field,
            operator,
            lookup,
            value,
        })
    }

    /// Equality leaf. Like the other shortcuts it trusts `field`: a blank
    /// name panics in debug builds, so untrusted names go through
    /// [`Filter::leaf`].
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field_filter(field, FilterOperator::Eq, Lookup::Eq, value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field_filter(field, FilterOperator::Ne, Lookup::Eq, value.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field_filter(field, FilterOperator::Gt, Lookup::Gt, value.into())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field_filter(field, FilterOperator::Gte, Lookup::Gte, value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field_filter(field, FilterOperator::Lt, Lookup::Lt, value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field_filter(field, FilterOperator::Lte, Lookup::Lte, value.into())
    }

    pub fn in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::field_filter(field, FilterOperator::In, Lookup::In, Value::Array(values))
    }

    pub fn not_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::field_filter(field, FilterOperator::Nin, Lookup::In, Value::Array(values))
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::field_filter(field, FilterOperator::Contains, Lookup::Contains, Value::String(needle.into()))
    }

    pub fn icontains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::field_filter(field, FilterOperator::IContains, Lookup::IContains, Value::String(needle.into()))
    }

    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::field_filter(field, FilterOperator::StartsWith, Lookup::StartsWith, Value::String(prefix.into()))
    }

    pub fn ends_with(field: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self::field_filter(field, FilterOperator::EndsWith, Lookup::EndsWith, Value::String(suffix.into()))
    }

    pub fn is_null(field: impl Into<String>, is_null: bool) -> Self {
        Self::field_filter(field, FilterOperator::IsNull, Lookup::IsNull, Value::Bool(is_null))
    }

    pub fn regex(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::field_filter(field, FilterOperator::Regex, Lookup::Regex, Value::String(pattern.into()))
    }

    /// Operator of either shape
    pub fn operator(&self) -> FilterOperator {
        match self {
            Filter::Leaf(leaf) => leaf.operator,
            Filter::Composite(composite) => composite.operator,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Filter::Composite(_))
    }

    /// Field name, for leaves
    pub fn field(&self) -> Option<&str> {
        match self {
            Filter::Leaf(leaf) => Some(&leaf.field),
            Filter::Composite(_) => None,
        }
    }

    /// Comparison value, for leaves
    pub fn value(&self) -> Option<&Value> {
        match self {
            Filter::Leaf(leaf) => Some(&leaf.value),
            Filter::Composite(_) => None,
        }
    }

    /// Child filters; empty for leaves
    pub fn children(&self) -> &[Filter] {
        match self {
            Filter::Leaf(_) => &[],
            Filter::Composite(composite) => &composite.children,
        }
    }

    /// Nesting depth (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Filter::depth).max().unwrap_or(0)
    }

    /// Fold a sequence into one filter with implicit AND.
    ///
    /// Empty -> `None`, one filter -> that filter, otherwise `AND[..]`.
    pub fn all(mut filters: Vec<Filter>) -> Option<Filter> {
        match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(Filter::Composite(CompositeFilter {
                operator: FilterOperator::And,
                children: filters,
            })),
        }
    }
}
