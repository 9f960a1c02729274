//! # Criteria Errors
//!
//! Construction-time and conversion-time failures of the criteria model.
//! Backend failures are not represented here; they travel through the
//! translator as the backend's own error type.

use thiserror::Error;

/// Result type for criteria construction and conversion
pub type CriteriaResult<T> = Result<T, CriteriaError>;

/// Criteria errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    /// Leaf/composite shape contract violated
    #[error("Invalid filter shape: {0}")]
    InvalidFilterShape(String),

    /// Operator string outside the recognized set
    #[error("Unknown filter operator: '{0}'")]
    UnknownOperator(String),

    /// Sort direction string outside the recognized set
    #[error("Unknown sort direction: '{0}'")]
    UnknownDirection(String),

    /// Structurally malformed input
    #[error("Invalid criteria input: {0}")]
    InvalidInput(String),

    /// A single-record lookup was requested without any filter
    #[error("Criteria is required for find-one operations; specify filters to select a specific record")]
    CriteriaRequired,

    /// Requested limit is above the configured maximum
    #[error("Limit {limit} exceeds maximum {max}")]
    LimitExceeded { limit: u64, max: u64 },
}

impl CriteriaError {
    /// Stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            CriteriaError::InvalidFilterShape(_) => "CRITERIA_INVALID_FILTER_SHAPE",
            CriteriaError::UnknownOperator(_) => "CRITERIA_UNKNOWN_OPERATOR",
            CriteriaError::UnknownDirection(_) => "CRITERIA_UNKNOWN_DIRECTION",
            CriteriaError::InvalidInput(_) => "CRITERIA_INVALID_INPUT",
            CriteriaError::CriteriaRequired => "CRITERIA_REQUIRED",
            CriteriaError::LimitExceeded { .. } => "CRITERIA_LIMIT_EXCEEDED",
        }
    }

    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        CriteriaError::InvalidFilterShape(reason.into())
    }

    pub(crate) fn input(reason: impl Into<String>) -> Self {
        CriteriaError::InvalidInput(reason.into())
    }
}
