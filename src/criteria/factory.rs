//! Shortcut constructors for recurring filter shapes.
//!
//! Every shortcut is expressed with the plain `Filter`/`Order` primitives;
//! nothing here needs backend support beyond what a hand-written criteria
//! would.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::filter::Filter;
use super::operator::FilterOperator;
use super::order::Order;
use super::pagination::Pagination;

/// Default field for status shortcuts
pub const DEFAULT_STATUS_FIELD: &str = "status";

/// Builds ready-made filters, orders and windows
pub struct CriteriaFactory;

impl CriteriaFactory {
    /// Case-insensitive search for `term` across `fields`.
    ///
    /// Returns `None` when the trimmed term or the field list is empty; the
    /// caller omits the filter rather than adding a no-op.
    pub fn text_search<S: AsRef<str>>(term: &str, fields: &[S]) -> Option<Filter> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        let children: Vec<Filter> = fields
            .iter()
            .map(|field| field.as_ref())
            .filter(|field| !field.trim().is_empty())
            .map(|field| Filter::icontains(field, term))
            .collect();

        Filter::or(children).ok()
    }

    /// `status = value`
    pub fn status_equals(value: impl Into<Value>) -> Filter {
        Self::status_equals_on(DEFAULT_STATUS_FIELD, value)
    }

    /// `field = value` for a status held under another field name
    pub fn status_equals_on(field: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::eq(field, value)
    }

    /// `field = true|false`
    pub fn boolean_field(field: impl Into<String>, value: bool) -> Filter {
        Filter::eq(field, Value::Bool(value))
    }

    /// `field IN values`
    pub fn field_in(field: impl Into<String>, values: Vec<Value>) -> Filter {
        Filter::in_list(field, values)
    }

    /// Inclusive numeric range. Absent (or NaN) bounds are omitted, so the
    /// result holds zero, one or two filters for implicit AND.
    pub fn number_range(field: &str, min: Option<f64>, max: Option<f64>) -> Vec<Filter> {
        let bound = |value: Option<f64>| value.filter(|v| !v.is_nan()).map(number_value);
        Self::range(field, bound(min), bound(max))
    }

    /// Inclusive timestamp range, bounds rendered as RFC 3339 UTC strings
    pub fn date_range(
        field: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Vec<Filter> {
        let bound = |value: Option<DateTime<Utc>>| {
            value.map(|ts| Value::String(ts.to_rfc3339_opts(SecondsFormat::Secs, true)))
        };
        Self::range(field, bound(start), bound(end))
    }

    fn range(field: &str, lower: Option<Value>, upper: Option<Value>) -> Vec<Filter> {
        [(FilterOperator::Gte, lower), (FilterOperator::Lte, upper)]
            .into_iter()
            .filter_map(|(op, value)| value.map(|v| (op, v)))
            .filter_map(|(op, value)| Filter::leaf(field, op, value).ok())
            .collect()
    }

    /// Limit/offset window
    pub fn paginate(limit: u64, offset: u64) -> Pagination {
        Pagination::new(limit, offset)
    }

    /// Parse signed field names: a leading `-` means descending.
    /// Blank entries are skipped.
    pub fn order_by<S: AsRef<str>>(fields: &[S]) -> Vec<Order> {
        fields
            .iter()
            .filter_map(|field| Order::parse_signed(field.as_ref()))
            .collect()
    }
}

/// Whole floats become integer JSON numbers so `18.0` and `18` compare alike
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
