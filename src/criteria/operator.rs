//! # Filter Operators
//!
//! The closed set of predicate operators understood by the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::CriteriaError;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    /// Equals
    Eq,
    /// Not equals
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Value in list
    In,
    /// Value not in list
    Nin,
    /// Case-sensitive substring
    Contains,
    /// Case-insensitive substring
    IContains,
    /// Prefix match
    StartsWith,
    /// Suffix match
    EndsWith,
    /// Field absent or null (value is a boolean)
    IsNull,
    /// Pattern match against the field's string form
    Regex,
    /// Logical AND over child filters
    And,
    /// Logical OR over child filters
    Or,
}

impl FilterOperator {
    /// Every operator, in declaration order
    pub const ALL: [FilterOperator; 16] = [
        FilterOperator::Eq,
        FilterOperator::Ne,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::In,
        FilterOperator::Nin,
        FilterOperator::Contains,
        FilterOperator::IContains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::IsNull,
        FilterOperator::Regex,
        FilterOperator::And,
        FilterOperator::Or,
    ];

    /// Get the operator string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::In => "in",
            FilterOperator::Nin => "nin",
            FilterOperator::Contains => "contains",
            FilterOperator::IContains => "icontains",
            FilterOperator::StartsWith => "startswith",
            FilterOperator::EndsWith => "endswith",
            FilterOperator::IsNull => "isnull",
            FilterOperator::Regex => "regex",
            FilterOperator::And => "and",
            FilterOperator::Or => "or",
        }
    }

    /// Returns true for AND/OR
    pub fn is_composite(&self) -> bool {
        matches!(self, FilterOperator::And | FilterOperator::Or)
    }

    /// Returns true for operators expressed as the complement of another
    pub fn is_negated(&self) -> bool {
        matches!(self, FilterOperator::Ne | FilterOperator::Nin)
    }

    /// Inclusion form of a negated operator (`ne` -> `eq`, `nin` -> `in`)
    pub fn inclusion_form(&self) -> Option<FilterOperator> {
        match self {
            FilterOperator::Ne => Some(FilterOperator::Eq),
            FilterOperator::Nin => Some(FilterOperator::In),
            _ => None,
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = CriteriaError;

    /// Exhaustive lookup; matching ignores ASCII case so enum-style
    /// names (`EQ`, `ICONTAINS`) are accepted alongside the wire form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "eq" => FilterOperator::Eq,
            "ne" => FilterOperator::Ne,
            "gt" => FilterOperator::Gt,
            "gte" => FilterOperator::Gte,
            "lt" => FilterOperator::Lt,
            "lte" => FilterOperator::Lte,
            "in" => FilterOperator::In,
            "nin" => FilterOperator::Nin,
            "contains" => FilterOperator::Contains,
            "icontains" => FilterOperator::IContains,
            "startswith" => FilterOperator::StartsWith,
            "endswith" => FilterOperator::EndsWith,
            "isnull" => FilterOperator::IsNull,
            "regex" => FilterOperator::Regex,
            "and" => FilterOperator::And,
            "or" => FilterOperator::Or,
            _ => return Err(CriteriaError::UnknownOperator(s.to_string())),
        };
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_operators() {
        for op in FilterOperator::ALL {
            assert_eq!(op.as_str().parse::<FilterOperator>().unwrap(), op);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ICONTAINS".parse::<FilterOperator>().unwrap(), FilterOperator::IContains);
        assert_eq!(" Eq ".parse::<FilterOperator>().unwrap(), FilterOperator::Eq);
    }

    #[test]
    fn test_unknown_operator() {
        let err = "like".parse::<FilterOperator>().unwrap_err();
        assert_eq!(err, CriteriaError::UnknownOperator("like".into()));
        assert!("".parse::<FilterOperator>().is_err());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for op in FilterOperator::ALL {
            let encoded = serde_json::to_value(op).unwrap();
            assert_eq!(encoded, serde_json::Value::String(op.as_str().to_string()));
        }
    }

    #[test]
    fn test_inclusion_form() {
        assert_eq!(FilterOperator::Ne.inclusion_form(), Some(FilterOperator::Eq));
        assert_eq!(FilterOperator::Nin.inclusion_form(), Some(FilterOperator::In));
        assert_eq!(FilterOperator::Gt.inclusion_form(), None);
        assert!(FilterOperator::Or.is_composite());
        assert!(!FilterOperator::Regex.is_composite());
    }
}
