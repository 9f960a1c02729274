//! Multi-key document sorting
//!
//! Sort is stable: records equal on every key keep their collection order.

use std::cmp::Ordering;

use serde_json::Value;

use crate::criteria::{Order, SortDirection};

use super::predicate::resolve;

/// Sorts documents by a sequence of sort keys
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts documents; the first key has highest precedence
    pub fn sort(documents: &mut [Value], orders: &[Order]) {
        if orders.is_empty() {
            return;
        }

        documents.sort_by(|a, b| {
            orders
                .iter()
                .map(|order| {
                    let ordering =
                        Self::compare_values(resolve(a, &order.field), resolve(b, &order.field));
                    match order.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Compares two JSON values for sorting.
    ///
    /// Missing sorts before everything, then by type:
    /// null < bool < number < string < array < object.
    pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let a_rank = type_rank(a_val);
                let b_rank = type_rank(b_val);
                if a_rank != b_rank {
                    return a_rank.cmp(&b_rank);
                }

                match (a_val, b_val) {
                    (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                    (Value::Number(x), Value::Number(y)) => {
                        if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                            return xi.cmp(&yi);
                        }
                        let xf = x.as_f64().unwrap_or(0.0);
                        let yf = y.as_f64().unwrap_or(0.0);
                        xf.partial_cmp(&yf).unwrap_or(Ordering::Equal)
                    }
                    (Value::String(x), Value::String(y)) => x.cmp(y),
                    (Value::Array(x), Value::Array(y)) => x
                        .iter()
                        .zip(y.iter())
                        .map(|(xv, yv)| Self::compare_values(Some(xv), Some(yv)))
                        .find(|ordering| *ordering != Ordering::Equal)
                        .unwrap_or_else(|| x.len().cmp(&y.len())),
                    // null == null; objects are not ordered among themselves
                    _ => Ordering::Equal,
                }
            }
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(documents: &[Value]) -> Vec<&str> {
        documents.iter().filter_map(|d| d["id"].as_str()).collect()
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let mut docs = vec![
            json!({"id": "c", "age": 30}),
            json!({"id": "a", "age": 20}),
            json!({"id": "b", "age": 25}),
        ];

        ResultSorter::sort(&mut docs, &[Order::asc("age")]);
        assert_eq!(ids(&docs), vec!["a", "b", "c"]);

        ResultSorter::sort(&mut docs, &[Order::desc("age")]);
        assert_eq!(ids(&docs), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_precedence() {
        let mut docs = vec![
            json!({"id": "1", "a": 1, "b": "y"}),
            json!({"id": "2", "a": 2, "b": "z"}),
            json!({"id": "3", "a": 2, "b": "x"}),
            json!({"id": "4", "a": 1, "b": "x"}),
        ];

        ResultSorter::sort(&mut docs, &[Order::desc("a"), Order::asc("b")]);
        assert_eq!(ids(&docs), vec!["3", "2", "4", "1"]);
    }

    #[test]
    fn test_sort_stable() {
        let mut docs = vec![
            json!({"id": "a", "age": 25}),
            json!({"id": "b", "age": 25}),
            json!({"id": "c", "age": 25}),
        ];
        ResultSorter::sort(&mut docs, &[Order::desc("age")]);
        assert_eq!(ids(&docs), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_and_mixed_types() {
        let mut docs = vec![
            json!({"id": "str", "v": "x"}),
            json!({"id": "num", "v": 3}),
            json!({"id": "missing"}),
            json!({"id": "null", "v": null}),
            json!({"id": "bool", "v": true}),
        ];
        ResultSorter::sort(&mut docs, &[Order::asc("v")]);
        assert_eq!(ids(&docs), vec!["missing", "null", "bool", "num", "str"]);
    }

    #[test]
    fn test_nested_sort_key() {
        let mut docs = vec![
            json!({"id": "b", "profile": {"rank": 2}}),
            json!({"id": "a", "profile": {"rank": 1}}),
        ];
        ResultSorter::sort(&mut docs, &[Order::asc("profile.rank")]);
        assert_eq!(ids(&docs), vec!["a", "b"]);
    }
}
