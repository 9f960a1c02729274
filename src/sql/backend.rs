//! SQL backend over an allowlisted table

use serde_json::Value;

use crate::criteria::{CriteriaOptions, Order};
use crate::translator::{BackendRejected, Lookup, QueryBackend};

use super::query::{SelectColumn, SortColumn, SqlCountQuery, SqlPredicate, SqlQuery};
use super::table::{Column, ColumnType, SqlTable};
use super::value::{convert_value, escape_like, SqlValue};

/// Renders criteria as PostgreSQL against one table
#[derive(Debug, Clone)]
pub struct SqlBackend {
    table: SqlTable,
}

impl SqlBackend {
    pub fn new(table: SqlTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SqlTable {
        &self.table
    }

    /// Query handle selecting the whole table
    pub fn select(&self) -> SqlQuery {
        SqlQuery::new(self.table.name())
    }

    fn column(&self, field: &str) -> Result<&Column, BackendRejected> {
        self.table
            .lookup(field)
            .ok_or_else(|| BackendRejected::UnknownField(field.to_string()))
    }

    fn compare(
        &self,
        field: &str,
        column: &Column,
        lookup: Lookup,
        op: &'static str,
        value: &Value,
    ) -> Result<SqlPredicate, BackendRejected> {
        Ok(SqlPredicate::Compare {
            column: column.name.clone(),
            op,
            value: convert_value(field, column, lookup, value)?,
        })
    }

    fn pattern(
        &self,
        field: &str,
        column: &Column,
        lookup: Lookup,
        value: &Value,
    ) -> Result<String, BackendRejected> {
        match (column.column_type, value) {
            (ColumnType::Text, Value::String(s)) => Ok(s.clone()),
            (ColumnType::Text, _) => Err(BackendRejected::type_mismatch(field, lookup, "expected a string")),
            (other, _) => Err(BackendRejected::type_mismatch(
                field,
                lookup,
                format!("text lookups need a text column, not {}", other.as_str()),
            )),
        }
    }
}

impl QueryBackend for SqlBackend {
    type Predicate = SqlPredicate;
    type Query = SqlQuery;
    type CountQuery = SqlCountQuery;
    type Error = BackendRejected;

    fn lookup(&self, field: &str, lookup: Lookup, value: &Value) -> Result<SqlPredicate, BackendRejected> {
        let column = self.column(field)?;

        match lookup {
            Lookup::Eq if value.is_null() => Ok(SqlPredicate::IsNull {
                column: column.name.clone(),
                is_null: true,
            }),
            Lookup::Eq => self.compare(field, column, lookup, "=", value),
            Lookup::Gt | Lookup::Gte | Lookup::Lt | Lookup::Lte => {
                if !column.column_type.is_ordinal() {
                    return Err(BackendRejected::type_mismatch(
                        field,
                        lookup,
                        format!("{} columns have no ordering", column.column_type.as_str()),
                    ));
                }
                let op = match lookup {
                    Lookup::Gt => ">",
                    Lookup::Gte => ">=",
                    Lookup::Lt => "<",
                    _ => "<=",
                };
                self.compare(field, column, lookup, op, value)
            }
            Lookup::In => {
                let items = value
                    .as_array()
                    .ok_or_else(|| BackendRejected::type_mismatch(field, lookup, "expected a list"))?;
                let values = items
                    .iter()
                    .map(|item| convert_value(field, column, lookup, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SqlPredicate::In {
                    column: column.name.clone(),
                    values,
                })
            }
            Lookup::Contains | Lookup::IContains | Lookup::StartsWith | Lookup::EndsWith => {
                let needle = escape_like(&self.pattern(field, column, lookup, value)?);
                let (op, pattern) = match lookup {
                    Lookup::Contains => ("LIKE", format!("%{}%", needle)),
                    Lookup::IContains => ("ILIKE", format!("%{}%", needle)),
                    Lookup::StartsWith => ("LIKE", format!("{}%", needle)),
                    _ => ("LIKE", format!("%{}", needle)),
                };
                Ok(SqlPredicate::Compare {
                    column: column.name.clone(),
                    op,
                    value: SqlValue::String(pattern),
                })
            }
            Lookup::IsNull => match value {
                Value::Bool(is_null) => Ok(SqlPredicate::IsNull {
                    column: column.name.clone(),
                    is_null: *is_null,
                }),
                _ => Err(BackendRejected::type_mismatch(field, lookup, "expected a boolean")),
            },
            Lookup::Regex => {
                let pattern = self.pattern(field, column, lookup, value)?;
                regex::Regex::new(&pattern).map_err(|e| BackendRejected::InvalidPattern {
                    field: field.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(SqlPredicate::Compare {
                    column: column.name.clone(),
                    op: "~",
                    value: SqlValue::String(pattern),
                })
            }
        }
    }

    fn and(&self, predicates: Vec<SqlPredicate>) -> SqlPredicate {
        SqlPredicate::And(predicates)
    }

    fn or(&self, predicates: Vec<SqlPredicate>) -> SqlPredicate {
        SqlPredicate::Or(predicates)
    }

    /// Complement that keeps NULL rows: `NOT (col = $1)` is unknown on a
    /// NULL column, so value tests are widened with `col IS NULL OR`.
    fn not(&self, predicate: SqlPredicate) -> SqlPredicate {
        match &predicate {
            SqlPredicate::Compare { column, .. } | SqlPredicate::In { column, .. } => {
                let null_check = SqlPredicate::IsNull {
                    column: column.clone(),
                    is_null: true,
                };
                SqlPredicate::Or(vec![null_check, SqlPredicate::Not(Box::new(predicate))])
            }
            _ => SqlPredicate::Not(Box::new(predicate)),
        }
    }

    fn filter(&self, mut query: SqlQuery, predicate: SqlPredicate) -> Result<SqlQuery, BackendRejected> {
        query.predicate = Some(match query.predicate.take() {
            Some(existing) => SqlPredicate::And(vec![existing, predicate]),
            None => predicate,
        });
        Ok(query)
    }

    fn order_by(&self, mut query: SqlQuery, orders: &[Order]) -> Result<SqlQuery, BackendRejected> {
        query.orders = orders
            .iter()
            .map(|order| {
                Ok(SortColumn {
                    column: self.column(&order.field)?.name.clone(),
                    direction: order.direction,
                })
            })
            .collect::<Result<Vec<_>, BackendRejected>>()?;
        Ok(query)
    }

    fn project(&self, mut query: SqlQuery, fields: &[String]) -> Result<SqlQuery, BackendRejected> {
        query.columns = Some(
            fields
                .iter()
                .map(|field| {
                    Ok(SelectColumn {
                        column: self.column(field)?.name.clone(),
                        field: field.clone(),
                    })
                })
                .collect::<Result<Vec<_>, BackendRejected>>()?,
        );
        Ok(query)
    }

    fn skip(&self, mut query: SqlQuery, offset: u64) -> SqlQuery {
        query.offset = Some(offset);
        query
    }

    fn take(&self, mut query: SqlQuery, limit: u64) -> SqlQuery {
        query.limit = Some(limit);
        query
    }

    fn count(&self, query: SqlQuery) -> Result<SqlCountQuery, BackendRejected> {
        Ok(SqlCountQuery {
            table: query.table,
            predicate: query.predicate,
            options: query.options,
        })
    }

    fn annotate(&self, mut query: SqlQuery, options: &CriteriaOptions) -> SqlQuery {
        query.options = options.clone();
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> SqlBackend {
        SqlBackend::new(
            SqlTable::new("users")
                .column("name", ColumnType::Text)
                .column("age", ColumnType::Integer)
                .column_as("active", "is_active", ColumnType::Bool)
                .column("created_at", ColumnType::Timestamp),
        )
    }

    fn render(predicate: SqlPredicate) -> (String, Vec<SqlValue>) {
        let backend = backend();
        let query = backend.filter(backend.select(), predicate).unwrap();
        query.to_sql()
    }

    #[test]
    fn test_like_lookups_escape_wildcards() {
        let backend = backend();
        let (sql, binds) = render(backend.lookup("name", Lookup::IContains, &json!("50%")).unwrap());
        assert_eq!(sql, "SELECT * FROM users WHERE name ILIKE $1");
        assert_eq!(binds, vec![SqlValue::String("%50\\%%".into())]);

        let (_, binds) = render(backend.lookup("name", Lookup::StartsWith, &json!("a_b")).unwrap());
        assert_eq!(binds, vec![SqlValue::String("a\\_b%".into())]);
    }

    #[test]
    fn test_eq_null_is_null_check() {
        let backend = backend();
        let (sql, binds) = render(backend.lookup("created_at", Lookup::Eq, &Value::Null).unwrap());
        assert_eq!(sql, "SELECT * FROM users WHERE created_at IS NULL");
        assert!(binds.is_empty());
    }

    #[test]
    fn test_complement_keeps_null_rows() {
        let backend = backend();
        let ne = backend.not(backend.lookup("name", Lookup::Eq, &json!("bob")).unwrap());
        let (sql, binds) = render(ne);
        assert_eq!(sql, "SELECT * FROM users WHERE (name IS NULL OR NOT (name = $1))");
        assert_eq!(binds, vec![SqlValue::String("bob".into())]);

        let nin = backend.not(backend.lookup("active", Lookup::In, &json!([true])).unwrap());
        assert_eq!(
            render(nin).0,
            "SELECT * FROM users WHERE (is_active IS NULL OR NOT (is_active IN ($1)))"
        );

        // Already null-aware
        let not_null = backend.not(backend.lookup("age", Lookup::Eq, &Value::Null).unwrap());
        assert_eq!(render(not_null).0, "SELECT * FROM users WHERE NOT (age IS NULL)");
    }

    #[test]
    fn test_mapped_column_names() {
        let backend = backend();
        let (sql, _) = render(backend.lookup("active", Lookup::Eq, &json!(true)).unwrap());
        assert_eq!(sql, "SELECT * FROM users WHERE is_active = $1");
    }

    #[test]
    fn test_rejections() {
        let backend = backend();
        assert_eq!(
            backend.lookup("password", Lookup::Eq, &json!("x")).unwrap_err(),
            BackendRejected::UnknownField("password".into())
        );
        assert!(matches!(
            backend.lookup("age", Lookup::Contains, &json!("1")).unwrap_err(),
            BackendRejected::TypeMismatch { .. }
        ));
        assert!(backend.lookup("active", Lookup::Gt, &json!(true)).is_err());
        assert!(backend.lookup("age", Lookup::In, &json!(3)).is_err());
        assert!(matches!(
            backend.lookup("name", Lookup::Regex, &json!("[")).unwrap_err(),
            BackendRejected::InvalidPattern { .. }
        ));
        assert!(backend
            .order_by(backend.select(), &[Order::asc("password")])
            .is_err());
    }
}
