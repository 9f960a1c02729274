//! Field lookups
//!
//! The comparison a leaf filter performs once negation is factored out.
//! Every leaf carries exactly one lookup; `ne`/`nin` leaves carry the
//! lookup of their inclusion form and are lowered as its complement.

use std::fmt;

use super::operator::FilterOperator;

/// Field-level lookups a backend must support natively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Contains,
    IContains,
    StartsWith,
    EndsWith,
    IsNull,
    Regex,
}

impl Lookup {
    /// Direct lookup for an operator; `None` for negated and composite operators
    pub fn from_operator(operator: FilterOperator) -> Option<Lookup> {
        let lookup = match operator {
            FilterOperator::Eq => Lookup::Eq,
            FilterOperator::Gt => Lookup::Gt,
            FilterOperator::Gte => Lookup::Gte,
            FilterOperator::Lt => Lookup::Lt,
            FilterOperator::Lte => Lookup::Lte,
            FilterOperator::In => Lookup::In,
            FilterOperator::Contains => Lookup::Contains,
            FilterOperator::IContains => Lookup::IContains,
            FilterOperator::StartsWith => Lookup::StartsWith,
            FilterOperator::EndsWith => Lookup::EndsWith,
            FilterOperator::IsNull => Lookup::IsNull,
            FilterOperator::Regex => Lookup::Regex,
            FilterOperator::Ne | FilterOperator::Nin | FilterOperator::And | FilterOperator::Or => {
                return None
            }
        };
        Some(lookup)
    }

    /// Lookup a leaf with `operator` performs: the direct lookup, or the
    /// inclusion form's lookup for `ne`/`nin`. `None` for AND/OR.
    pub fn for_leaf(operator: FilterOperator) -> Option<Lookup> {
        Lookup::from_operator(operator.inclusion_form().unwrap_or(operator))
    }

    pub fn operator(&self) -> FilterOperator {
        match self {
            Lookup::Eq => FilterOperator::Eq,
            Lookup::Gt => FilterOperator::Gt,
            Lookup::Gte => FilterOperator::Gte,
            Lookup::Lt => FilterOperator::Lt,
            Lookup::Lte => FilterOperator::Lte,
            Lookup::In => FilterOperator::In,
            Lookup::Contains => FilterOperator::Contains,
            Lookup::IContains => FilterOperator::IContains,
            Lookup::StartsWith => FilterOperator::StartsWith,
            Lookup::EndsWith => FilterOperator::EndsWith,
            Lookup::IsNull => FilterOperator::IsNull,
            Lookup::Regex => FilterOperator::Regex,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.operator().as_str()
    }

    /// Ordering comparisons
    pub fn is_range(&self) -> bool {
        matches!(self, Lookup::Gt | Lookup::Gte | Lookup::Lt | Lookup::Lte)
    }

    /// String pattern lookups
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Lookup::Contains | Lookup::IContains | Lookup::StartsWith | Lookup::EndsWith
        )
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
