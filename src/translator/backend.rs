//! Backing-store collaborator contract
//!
//! A backend supplies native predicates for the direct lookups, boolean
//! combinators, a complement wrapper, and the query-shaping steps the
//! translator drives (sort, projection, window, count). Query handles are
//! opaque to the translator; it never executes them.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::criteria::{CriteriaOptions, Lookup, Order};

/// Rejections raised by the bundled backends
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendRejected {
    #[error("Unknown field: '{0}'")]
    UnknownField(String),

    #[error("Type mismatch for '{field}' ({operator}): {reason}")]
    TypeMismatch {
        field: String,
        operator: String,
        reason: String,
    },

    #[error("Invalid pattern for '{field}': {reason}")]
    InvalidPattern { field: String, reason: String },
}

impl BackendRejected {
    pub fn code(&self) -> &'static str {
        "CRITERIA_BACKEND_REJECTED"
    }

    pub fn type_mismatch(field: &str, lookup: Lookup, reason: impl Into<String>) -> Self {
        BackendRejected::TypeMismatch {
            field: field.to_string(),
            operator: lookup.as_str().to_string(),
            reason: reason.into(),
        }
    }
}

/// Backing store the translator lowers criteria into
pub trait QueryBackend {
    /// Native predicate
    type Predicate;
    /// Fetch query handle
    type Query;
    /// Count query handle
    type CountQuery;
    /// Backend rejection; returned by the translator unmodified
    type Error: fmt::Display;

    /// Native lookup `field <lookup> value`
    fn lookup(&self, field: &str, lookup: Lookup, value: &Value)
        -> Result<Self::Predicate, Self::Error>;

    /// Conjunction of one or more predicates
    fn and(&self, predicates: Vec<Self::Predicate>) -> Self::Predicate;

    /// Disjunction of one or more predicates
    fn or(&self, predicates: Vec<Self::Predicate>) -> Self::Predicate;

    /// Logical complement
    fn not(&self, predicate: Self::Predicate) -> Self::Predicate;

    /// Restrict the query to records satisfying `predicate`
    fn filter(&self, query: Self::Query, predicate: Self::Predicate)
        -> Result<Self::Query, Self::Error>;

    /// Sort keys, first key has highest precedence
    fn order_by(&self, query: Self::Query, orders: &[Order]) -> Result<Self::Query, Self::Error>;

    /// Return only the named fields
    fn project(&self, query: Self::Query, fields: &[String]) -> Result<Self::Query, Self::Error>;

    /// Skip the first `offset` records
    fn skip(&self, query: Self::Query, offset: u64) -> Self::Query;

    /// Return at most `limit` records
    fn take(&self, query: Self::Query, limit: u64) -> Self::Query;

    /// Count over a filtered, unwindowed, unprojected query
    fn count(&self, query: Self::Query) -> Result<Self::CountQuery, Self::Error>;

    /// Attach execution hints. Backends without hint support ignore them.
    fn annotate(&self, query: Self::Query, _options: &CriteriaOptions) -> Self::Query {
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_code_and_message() {
        let err = BackendRejected::type_mismatch("age", Lookup::Gt, "expected number or string");
        assert_eq!(err.code(), "CRITERIA_BACKEND_REJECTED");
        assert_eq!(
            err.to_string(),
            "Type mismatch for 'age' (gt): expected number or string"
        );
        assert_eq!(
            BackendRejected::UnknownField("nope".into()).to_string(),
            "Unknown field: 'nope'"
        );
    }
}
