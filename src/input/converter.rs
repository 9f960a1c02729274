//! # Criteria Input Converter
//!
//! Structural transform from the wire-level `CriteriaInput` into a
//! `Criteria`. Conversion is all-or-nothing: the first malformed entry
//! aborts and no partial criteria is returned.

use serde_json::Value;

use crate::criteria::{
    Criteria, CriteriaError, CriteriaOptions, CriteriaResult, Filter, FilterOperator, Order,
    Projection, SortDirection,
};

use super::types::{CriteriaInput, CriteriaOptionsInput, FilterInput, OrderInput};

/// Deepest filter nesting accepted from external input
pub const MAX_FILTER_DEPTH: usize = 32;

/// Converts wire-level criteria input into `Criteria`
pub struct CriteriaInputConverter;

impl CriteriaInputConverter {
    /// Convert a full input document
    pub fn convert(input: &CriteriaInput) -> CriteriaResult<Criteria> {
        let filters = match &input.filters {
            Some(entries) => entries
                .iter()
                .map(|entry| Self::convert_filter_at(entry, 1))
                .collect::<CriteriaResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let orders = match &input.orders {
            Some(entries) => entries
                .iter()
                .map(Self::convert_order)
                .collect::<CriteriaResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let mut builder = Criteria::builder().set_filters(filters).set_orders(orders);

        if let Some(limit) = input.limit {
            builder = builder.set_limit(non_negative("limit", limit)?);
        }
        if let Some(offset) = input.offset {
            builder = builder.set_offset(non_negative("offset", offset)?);
        }

        // An empty field list means "no restriction"
        if let Some(projection) = &input.projection {
            if !projection.fields.is_empty() {
                builder = builder.set_projection(Projection::new(projection.fields.iter().cloned())?);
            }
        }

        if let Some(options) = &input.options {
            builder = builder.set_options(Self::convert_options(options)?);
        }

        let criteria = builder.build();
        tracing::debug!(
            filters = criteria.filters().len(),
            orders = criteria.orders().len(),
            limit = ?criteria.limit(),
            offset = ?criteria.offset(),
            "converted criteria input"
        );
        Ok(criteria)
    }

    /// Parse and convert a JSON document
    pub fn from_json(json: &str) -> CriteriaResult<Criteria> {
        let input: CriteriaInput = serde_json::from_str(json)
            .map_err(|e| CriteriaError::input(format!("malformed criteria JSON: {}", e)))?;
        Self::convert(&input)
    }

    /// Convert an already-parsed JSON value
    pub fn from_value(value: Value) -> CriteriaResult<Criteria> {
        let input: CriteriaInput = serde_json::from_value(value)
            .map_err(|e| CriteriaError::input(format!("malformed criteria input: {}", e)))?;
        Self::convert(&input)
    }

    /// Convert a single filter entry (and its nested entries)
    pub fn convert_filter(entry: &FilterInput) -> CriteriaResult<Filter> {
        Self::convert_filter_at(entry, 1)
    }

    fn convert_filter_at(entry: &FilterInput, depth: usize) -> CriteriaResult<Filter> {
        if depth > MAX_FILTER_DEPTH {
            return Err(CriteriaError::input(format!(
                "filter nesting exceeds maximum depth of {}",
                MAX_FILTER_DEPTH
            )));
        }

        let operator: FilterOperator = entry.operator.parse()?;

        if operator.is_composite() {
            // field/value are discarded for composites
            let nested = entry.nested_filters.as_deref().unwrap_or_default();
            if nested.is_empty() {
                return Err(CriteriaError::shape(format!(
                    "operator '{}' requires non-empty nested_filters",
                    operator
                )));
            }

            let children = nested
                .iter()
                .map(|child| Self::convert_filter_at(child, depth + 1))
                .collect::<CriteriaResult<Vec<_>>>()?;

            tracing::trace!(operator = %operator, children = children.len(), depth, "composite filter");
            return Filter::composite(operator, children);
        }

        if entry.nested_filters.is_some() {
            return Err(CriteriaError::shape(format!(
                "operator '{}' cannot carry nested_filters",
                operator
            )));
        }

        let field = entry.field.as_deref().unwrap_or_default();
        let value = entry.value.clone().unwrap_or(Value::Null);

        tracing::trace!(field, operator = %operator, depth, "field filter");
        Filter::leaf(field, operator, value)
    }

    /// Convert a sort entry; direction defaults to ascending
    pub fn convert_order(entry: &OrderInput) -> CriteriaResult<Order> {
        let field = entry.field.trim();
        if field.is_empty() {
            return Err(CriteriaError::input("order field cannot be empty"));
        }

        let direction = match &entry.direction {
            Some(direction) => direction.parse::<SortDirection>()?,
            None => SortDirection::Asc,
        };

        Ok(Order::new(field, direction))
    }

    fn convert_options(input: &CriteriaOptionsInput) -> CriteriaResult<CriteriaOptions> {
        let mut options = CriteriaOptions::default().with_explain(input.explain);

        if let Some(comment) = &input.comment {
            options = options.with_comment(comment.clone());
        }

        if let Some(batch_size) = input.batch_size {
            if batch_size <= 0 {
                return Err(CriteriaError::input(format!(
                    "batch_size must be positive, got {}",
                    batch_size
                )));
            }
            let batch_size = u32::try_from(batch_size).map_err(|_| {
                CriteriaError::input(format!("batch_size {} is too large", batch_size))
            })?;
            options = options.with_batch_size(batch_size);
        }

        if let Some(max_time_ms) = input.max_time_ms {
            options = options.with_max_time_ms(non_negative("max_time_ms", max_time_ms)?);
        }

        Ok(options)
    }
}

fn non_negative(name: &str, value: i64) -> CriteriaResult<u64> {
    u64::try_from(value)
        .map_err(|_| CriteriaError::input(format!("{} must be non-negative, got {}", name, value)))
}
