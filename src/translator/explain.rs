//! Explain output for a criteria
//!
//! Renders the lowered shape of a criteria deterministically, without a
//! backend: the predicate tree as the translator would build it (negated
//! operators shown as complements), then sort keys, window, projection and
//! execution hints.

use std::fmt;

use crate::criteria::{Criteria, Filter, FilterOperator};

/// Explain plan output
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainPlan {
    /// Indented predicate tree lines
    pub predicates: Vec<String>,
    /// Sort keys, highest precedence first
    pub sort: Vec<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    /// Projected fields, if restricted
    pub projection: Option<Vec<String>>,
    /// Rendered execution hints
    pub options: Vec<String>,
}

impl ExplainPlan {
    pub fn from_criteria(criteria: &Criteria) -> Self {
        let mut predicates = Vec::new();
        if let Some(root) = criteria.filter() {
            Self::render(root, 0, &mut predicates);
        }

        let sort = criteria
            .orders()
            .iter()
            .map(|order| format!("{} {}", order.field, order.direction.as_str().to_uppercase()))
            .collect();

        let options = criteria.options();
        let mut hints = Vec::new();
        if options.explain {
            hints.push("explain".to_string());
        }
        if let Some(comment) = &options.comment {
            hints.push(format!("comment: {}", comment));
        }
        if let Some(ms) = options.max_time_ms {
            hints.push(format!("max_time_ms: {}", ms));
        }
        if let Some(size) = options.batch_size {
            hints.push(format!("batch_size: {}", size));
        }

        Self {
            predicates,
            sort,
            offset: criteria.offset(),
            limit: criteria.limit(),
            projection: criteria.projection().map(|p| p.fields().to_vec()),
            options: hints,
        }
    }

    fn render(filter: &Filter, depth: usize, out: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        match filter {
            Filter::Leaf(leaf) => {
                let line = match leaf.operator().inclusion_form() {
                    Some(inclusion) => {
                        format!("NOT ({} {} {})", leaf.field(), inclusion, leaf.value())
                    }
                    None => format!("{} {} {}", leaf.field(), leaf.operator(), leaf.value()),
                };
                out.push(format!("{}{}", indent, line));
            }
            Filter::Composite(composite) => {
                let label = match composite.operator() {
                    FilterOperator::Or => "OR",
                    _ => "AND",
                };
                out.push(format!("{}{}", indent, label));
                for child in composite.children() {
                    Self::render(child, depth + 1, out);
                }
            }
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.predicates.is_empty() {
            writeln!(f, "Filter: (match all)")?;
        } else {
            writeln!(f, "Filter:")?;
            for line in &self.predicates {
                writeln!(f, "  {}", line)?;
            }
        }

        if !self.sort.is_empty() {
            writeln!(f, "Sort: {}", self.sort.join(", "))?;
        }
        if let Some(offset) = self.offset {
            writeln!(f, "Offset: {}", offset)?;
        }
        if let Some(limit) = self.limit {
            writeln!(f, "Limit: {}", limit)?;
        }
        if let Some(fields) = &self.projection {
            writeln!(f, "Projection: {}", fields.join(", "))?;
        }
        if !self.options.is_empty() {
            writeln!(f, "Options: {}", self.options.join(", "))?;
        }

        Ok(())
    }
}
