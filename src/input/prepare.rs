//! Find and find-one preparation
//!
//! Turns optional caller input into the criteria a find operation runs
//! with: configured defaults when nothing is supplied, a cap on requested
//! limits, and a hard refusal to run a single-record lookup unfiltered.

use crate::config::EngineConfig;
use crate::criteria::{Criteria, CriteriaError, CriteriaResult, Order};

use super::converter::CriteriaInputConverter;
use super::types::CriteriaInput;

/// Prepares criteria for find operations
#[derive(Debug, Clone)]
pub struct FindPreparer {
    default_orders: Vec<Order>,
    default_limit: u64,
    max_limit: Option<u64>,
}

impl FindPreparer {
    pub fn new(default_orders: Vec<Order>, default_limit: u64, max_limit: Option<u64>) -> Self {
        Self {
            default_orders,
            default_limit,
            max_limit,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.default_orders(), config.default_limit, config.max_limit)
    }

    /// Criteria used when the caller supplies none: default ordering,
    /// first page of `default_limit` records
    pub fn default_criteria(&self) -> Criteria {
        Criteria::builder()
            .set_orders(self.default_orders.clone())
            .set_limit(self.default_limit)
            .set_offset(0)
            .build()
    }

    /// Criteria for a multi-record find
    pub fn prepare_find(&self, input: Option<&CriteriaInput>) -> CriteriaResult<Criteria> {
        let criteria = match input {
            Some(input) => CriteriaInputConverter::convert(input)?,
            None => {
                tracing::debug!(
                    limit = self.default_limit,
                    orders = self.default_orders.len(),
                    "no criteria supplied, using defaults"
                );
                self.default_criteria()
            }
        };

        self.check_limit(&criteria)?;
        Ok(criteria)
    }

    /// Criteria for a single-record find.
    ///
    /// Fails with `CriteriaRequired` when no filter is supplied; the result
    /// keeps only filters and options.
    pub fn prepare_find_one(&self, input: Option<&CriteriaInput>) -> CriteriaResult<Criteria> {
        let input = match input {
            Some(input) if input.has_filters() => input,
            _ => return Err(CriteriaError::CriteriaRequired),
        };

        let criteria = CriteriaInputConverter::convert(input)?;
        Ok(criteria.for_find_one())
    }

    /// Reject limits above the configured maximum
    pub fn check_limit(&self, criteria: &Criteria) -> CriteriaResult<()> {
        match (criteria.limit(), self.max_limit) {
            (Some(limit), Some(max)) if limit > max => {
                Err(CriteriaError::LimitExceeded { limit, max })
            }
            _ => Ok(()),
        }
    }
}

impl Default for FindPreparer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Filter;
    use crate::input::FilterInput;
    use serde_json::json;

    fn input(value: serde_json::Value) -> CriteriaInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_find_defaults_when_absent() {
        let criteria = FindPreparer::default().prepare_find(None).unwrap();
        assert_eq!(criteria.orders(), &[Order::desc("created_at")]);
        assert_eq!(criteria.limit(), Some(10));
        assert_eq!(criteria.offset(), Some(0));
        assert!(!criteria.has_filters());
    }

    #[test]
    fn test_find_uses_supplied_input_as_is() {
        let supplied = input(json!({"filters": [{"field": "a", "operator": "eq", "value": 1}]}));
        let criteria = FindPreparer::default().prepare_find(Some(&supplied)).unwrap();
        assert_eq!(criteria.filters(), &[Filter::eq("a", 1)]);
        assert!(!criteria.has_orders());
        assert_eq!(criteria.limit(), None);
    }

    #[test]
    fn test_find_rejects_limit_above_max() {
        let preparer = FindPreparer::new(vec![], 10, Some(100));
        let err = preparer.prepare_find(Some(&input(json!({"limit": 101})))).unwrap_err();
        assert_eq!(err, CriteriaError::LimitExceeded { limit: 101, max: 100 });

        assert!(preparer.prepare_find(Some(&input(json!({"limit": 100})))).is_ok());
        let unbounded = FindPreparer::new(vec![], 10, None);
        assert!(unbounded.prepare_find(Some(&input(json!({"limit": 1_000_000})))).is_ok());
    }

    #[test]
    fn test_find_one_requires_filters() {
        let preparer = FindPreparer::default();
        assert_eq!(preparer.prepare_find_one(None).unwrap_err(), CriteriaError::CriteriaRequired);

        let no_filters = input(json!({"limit": 1, "orders": [{"field": "a"}]}));
        assert_eq!(
            preparer.prepare_find_one(Some(&no_filters)).unwrap_err().code(),
            "CRITERIA_REQUIRED"
        );

        let empty_filters = CriteriaInput {
            filters: Some(Vec::new()),
            ..Default::default()
        };
        assert!(preparer.prepare_find_one(Some(&empty_filters)).is_err());
    }

    #[test]
    fn test_find_one_keeps_only_filters_and_options() {
        let supplied = CriteriaInput {
            filters: Some(vec![FilterInput::leaf("email", "eq", json!("a@b.c"))]),
            limit: Some(50),
            offset: Some(10),
            ..Default::default()
        };

        let criteria = FindPreparer::default().prepare_find_one(Some(&supplied)).unwrap();
        assert_eq!(criteria.filters(), &[Filter::eq("email", "a@b.c")]);
        assert!(!criteria.has_pagination());
        assert!(!criteria.has_orders());
    }
}
