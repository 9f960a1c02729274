//! Field projection

use serde::Serialize;

use super::errors::{CriteriaError, CriteriaResult};

/// Non-empty set of field names to return, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    /// Create a projection. Blank names are rejected, duplicates dropped.
    pub fn new<I, S>(fields: I) -> CriteriaResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into().trim().to_string();
            if field.is_empty() {
                return Err(CriteriaError::input("projection field names cannot be empty"));
            }
            if !unique.contains(&field) {
                unique.push(field);
            }
        }

        if unique.is_empty() {
            return Err(CriteriaError::input("projection must name at least one field"));
        }

        Ok(Self { fields: unique })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_order() {
        let projection = Projection::new(["name", "email", "name"]).unwrap();
        assert_eq!(projection.fields(), &["name".to_string(), "email".to_string()]);
        assert!(projection.contains("email"));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(Projection::new(Vec::<String>::new()).is_err());
        assert!(Projection::new(["name", " "]).is_err());
    }
}
