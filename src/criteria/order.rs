//! Sort keys and directions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::CriteriaError;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(CriteriaError::UnknownDirection(s.to_string())),
        }
    }
}

/// A single sort key. A sequence of orders breaks ties left to right.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Order {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Parse a signed field name: `-created_at` is descending, `name` or
    /// `+name` ascending. Returns `None` when no field name remains.
    pub fn parse_signed(signed: &str) -> Option<Self> {
        let signed = signed.trim();
        let (field, direction) = if let Some(rest) = signed.strip_prefix('-') {
            (rest, SortDirection::Desc)
        } else if let Some(rest) = signed.strip_prefix('+') {
            (rest, SortDirection::Asc)
        } else {
            (signed, SortDirection::Asc)
        };

        let field = field.trim();
        if field.is_empty() {
            return None;
        }
        Some(Self::new(field, direction))
    }

    /// Inverse of `parse_signed`
    pub fn to_signed(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.field.clone(),
            SortDirection::Desc => format!("-{}", self.field),
        }
    }
}
