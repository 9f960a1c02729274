//! Predicate evaluation over JSON documents
//!
//! A missing or null field never satisfies a positive test (except an
//! explicit null check), so its complement always does.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use crate::translator::{BackendRejected, Lookup};

/// Native predicate of the document backend
#[derive(Debug, Clone)]
pub enum DocumentPredicate {
    Field(FieldPredicate),
    And(Vec<DocumentPredicate>),
    Or(Vec<DocumentPredicate>),
    Not(Box<DocumentPredicate>),
}

impl DocumentPredicate {
    /// Checks if a document satisfies the predicate
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            DocumentPredicate::Field(field) => field.matches(document),
            DocumentPredicate::And(children) => children.iter().all(|p| p.matches(document)),
            DocumentPredicate::Or(children) => children.iter().any(|p| p.matches(document)),
            DocumentPredicate::Not(inner) => !inner.matches(document),
        }
    }
}

/// Test applied to a single (possibly nested) field
#[derive(Debug, Clone)]
pub struct FieldPredicate {
    path: String,
    test: FieldTest,
}

#[derive(Debug, Clone)]
enum FieldTest {
    Eq(Value),
    Compare(Lookup, Value),
    In(Vec<Value>),
    Contains(String),
    IContains(String),
    StartsWith(String),
    EndsWith(String),
    IsNull(bool),
    Regex(Regex),
}

impl FieldPredicate {
    /// Validate `value` against `lookup` and build the test
    pub fn new(path: &str, lookup: Lookup, value: &Value) -> Result<Self, BackendRejected> {
        let test = match lookup {
            Lookup::Eq => FieldTest::Eq(value.clone()),
            Lookup::Gt | Lookup::Gte | Lookup::Lt | Lookup::Lte => match value {
                Value::Number(_) | Value::String(_) => FieldTest::Compare(lookup, value.clone()),
                _ => {
                    return Err(BackendRejected::type_mismatch(
                        path,
                        lookup,
                        "expected a number or string",
                    ))
                }
            },
            Lookup::In => match value {
                Value::Array(items) => FieldTest::In(items.clone()),
                _ => return Err(BackendRejected::type_mismatch(path, lookup, "expected a list")),
            },
            Lookup::Contains => FieldTest::Contains(text(path, lookup, value)?.to_string()),
            Lookup::IContains => FieldTest::IContains(text(path, lookup, value)?.to_lowercase()),
            Lookup::StartsWith => FieldTest::StartsWith(text(path, lookup, value)?.to_string()),
            Lookup::EndsWith => FieldTest::EndsWith(text(path, lookup, value)?.to_string()),
            Lookup::IsNull => match value {
                Value::Bool(flag) => FieldTest::IsNull(*flag),
                _ => return Err(BackendRejected::type_mismatch(path, lookup, "expected a boolean")),
            },
            Lookup::Regex => {
                let pattern = text(path, lookup, value)?;
                let regex = Regex::new(pattern).map_err(|e| BackendRejected::InvalidPattern {
                    field: path.to_string(),
                    reason: e.to_string(),
                })?;
                FieldTest::Regex(regex)
            }
        };

        Ok(Self {
            path: path.to_string(),
            test,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn matches(&self, document: &Value) -> bool {
        let actual = resolve(document, &self.path).filter(|v| !v.is_null());

        let actual = match (&self.test, actual) {
            (FieldTest::IsNull(expect_null), actual) => return actual.is_none() == *expect_null,
            // `eq null` behaves as a null check
            (FieldTest::Eq(Value::Null), actual) => return actual.is_none(),
            (_, None) => return false,
            (_, Some(actual)) => actual,
        };

        match &self.test {
            FieldTest::Eq(expected) => values_equal(actual, expected),
            FieldTest::Compare(lookup, bound) => match compare(actual, bound) {
                Some(ordering) => match lookup {
                    Lookup::Gt => ordering == Ordering::Greater,
                    Lookup::Gte => ordering != Ordering::Less,
                    Lookup::Lt => ordering == Ordering::Less,
                    _ => ordering != Ordering::Greater,
                },
                None => false,
            },
            FieldTest::In(items) => items.iter().any(|item| values_equal(actual, item)),
            FieldTest::Contains(needle) => actual.as_str().is_some_and(|s| s.contains(needle.as_str())),
            FieldTest::IContains(needle) => actual
                .as_str()
                .is_some_and(|s| s.to_lowercase().contains(needle.as_str())),
            FieldTest::StartsWith(prefix) => {
                actual.as_str().is_some_and(|s| s.starts_with(prefix.as_str()))
            }
            FieldTest::EndsWith(suffix) => {
                actual.as_str().is_some_and(|s| s.ends_with(suffix.as_str()))
            }
            FieldTest::Regex(regex) => match actual {
                Value::String(s) => regex.is_match(s),
                Value::Number(n) => regex.is_match(&n.to_string()),
                Value::Bool(b) => regex.is_match(&b.to_string()),
                _ => false,
            },
            FieldTest::IsNull(_) => false,
        }
    }
}

fn text<'v>(path: &str, lookup: Lookup, value: &'v Value) -> Result<&'v str, BackendRejected> {
    value
        .as_str()
        .ok_or_else(|| BackendRejected::type_mismatch(path, lookup, "expected a string"))
}

/// Resolve a dotted path (`profile.city`) inside nested objects
pub fn resolve<'d>(document: &'d Value, path: &str) -> Option<&'d Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.as_object()?.get(segment))
}

/// Structural equality, except numbers compare by value (`1 == 1.0`)
pub fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(ai), Some(bi)) => ai == bi,
            _ => a.as_f64() == b.as_f64(),
        },
        _ => actual == expected,
    }
}

/// Ordering between two numbers or two strings; other pairs are incomparable
fn compare(actual: &Value, bound: &Value) -> Option<Ordering> {
    match (actual, bound) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                return Some(ai.cmp(&bi));
            }
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(path: &str, lookup: Lookup, value: Value) -> DocumentPredicate {
        DocumentPredicate::Field(FieldPredicate::new(path, lookup, &value).unwrap())
    }

    #[test]
    fn test_eq_numeric_and_structural() {
        let doc = json!({"age": 30, "tags": ["a", "b"], "score": 1.5});
        assert!(field("age", Lookup::Eq, json!(30.0)).matches(&doc));
        assert!(field("tags", Lookup::Eq, json!(["a", "b"])).matches(&doc));
        assert!(!field("score", Lookup::Eq, json!(1)).matches(&doc));
    }

    #[test]
    fn test_comparisons() {
        let doc = json!({"age": 30, "name": "bob"});
        assert!(field("age", Lookup::Gt, json!(18)).matches(&doc));
        assert!(field("age", Lookup::Gte, json!(30)).matches(&doc));
        assert!(!field("age", Lookup::Lt, json!(30)).matches(&doc));
        assert!(field("age", Lookup::Lte, json!(30.5)).matches(&doc));
        assert!(field("name", Lookup::Lt, json!("carol")).matches(&doc));
        // number vs string never compares
        assert!(!field("name", Lookup::Gt, json!(1)).matches(&doc));
    }

    #[test]
    fn test_comparison_type_mismatch() {
        let err = FieldPredicate::new("age", Lookup::Gt, &json!(true)).unwrap_err();
        assert!(matches!(err, BackendRejected::TypeMismatch { .. }));
        assert!(FieldPredicate::new("age", Lookup::In, &json!(1)).is_err());
        assert!(FieldPredicate::new("name", Lookup::Contains, &json!(1)).is_err());
        assert!(FieldPredicate::new("name", Lookup::IsNull, &json!("yes")).is_err());
    }

    #[test]
    fn test_text_lookups() {
        let doc = json!({"name": "Johnny"});
        assert!(field("name", Lookup::Contains, json!("ohn")).matches(&doc));
        assert!(!field("name", Lookup::Contains, json!("JOHN")).matches(&doc));
        assert!(field("name", Lookup::IContains, json!("JOHN")).matches(&doc));
        assert!(field("name", Lookup::StartsWith, json!("Jo")).matches(&doc));
        assert!(field("name", Lookup::EndsWith, json!("nny")).matches(&doc));
    }

    #[test]
    fn test_regex() {
        let doc = json!({"email": "a@example.com", "code": 1234});
        assert!(field("email", Lookup::Regex, json!(r"@example\.com$")).matches(&doc));
        assert!(field("code", Lookup::Regex, json!(r"^\d{4}$")).matches(&doc));

        let err = FieldPredicate::new("email", Lookup::Regex, &json!("(")).unwrap_err();
        assert!(matches!(err, BackendRejected::InvalidPattern { .. }));
    }

    #[test]
    fn test_missing_and_null_fields() {
        let missing = json!({});
        let null = json!({"deleted_at": null});
        let set = json!({"deleted_at": "2024-01-01"});

        let is_null = field("deleted_at", Lookup::IsNull, json!(true));
        assert!(is_null.matches(&missing));
        assert!(is_null.matches(&null));
        assert!(!is_null.matches(&set));

        let eq = field("deleted_at", Lookup::Eq, json!("2024-01-01"));
        assert!(!eq.matches(&missing));
        assert!(DocumentPredicate::Not(Box::new(eq)).matches(&missing));

        assert!(field("deleted_at", Lookup::Eq, Value::Null).matches(&null));
    }

    #[test]
    fn test_nested_paths_and_combinators() {
        let doc = json!({"profile": {"city": "Oslo"}, "active": true});
        let city = field("profile.city", Lookup::Eq, json!("Oslo"));
        let inactive = field("active", Lookup::Eq, json!(false));

        assert!(DocumentPredicate::Or(vec![city.clone(), inactive.clone()]).matches(&doc));
        assert!(!DocumentPredicate::And(vec![city, inactive]).matches(&doc));
        assert_eq!(resolve(&doc, "profile.zip"), None);
    }
}
