//! Bind values and JSON-to-column conversion

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::translator::{BackendRejected, Lookup};

use super::table::{Column, ColumnType};

/// Positional bind value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

/// Convert a JSON value for `column`, or reject the type
pub(crate) fn convert_value(
    field: &str,
    column: &Column,
    lookup: Lookup,
    value: &Value,
) -> Result<SqlValue, BackendRejected> {
    let mismatch = || {
        BackendRejected::type_mismatch(
            field,
            lookup,
            format!("{} cannot be used with a {} column", describe(value), column.column_type.as_str()),
        )
    };

    match (column.column_type, value) {
        (ColumnType::Text, Value::String(s)) => Ok(SqlValue::String(s.clone())),
        (ColumnType::Integer, Value::Number(n)) => n.as_i64().map(SqlValue::Integer).ok_or_else(mismatch),
        (ColumnType::Float, Value::Number(n)) => n.as_f64().map(SqlValue::Float).ok_or_else(mismatch),
        (ColumnType::Bool, Value::Bool(b)) => Ok(SqlValue::Bool(*b)),
        (ColumnType::Timestamp, Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|ts| SqlValue::Timestamp(ts.with_timezone(&Utc)))
            .map_err(|e| {
                BackendRejected::type_mismatch(field, lookup, format!("invalid RFC 3339 timestamp: {}", e))
            }),
        _ => Err(mismatch()),
    }
}

/// Escape LIKE wildcards so the needle matches literally
pub(crate) fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
