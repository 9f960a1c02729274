//! SQL predicates and query rendering
//!
//! Predicates are built bottom-up without knowing their final position, so
//! placeholders are numbered only when the whole statement is rendered.

use crate::criteria::{CriteriaOptions, SortDirection};

use super::value::SqlValue;

/// Native predicate of the SQL backend
#[derive(Debug, Clone, PartialEq)]
pub enum SqlPredicate {
    /// `column <op> $n`
    Compare {
        column: String,
        op: &'static str,
        value: SqlValue,
    },
    /// `column IN ($n, ...)`; an empty list renders as `FALSE`
    In { column: String, values: Vec<SqlValue> },
    /// `column IS [NOT] NULL`
    IsNull { column: String, is_null: bool },
    And(Vec<SqlPredicate>),
    Or(Vec<SqlPredicate>),
    Not(Box<SqlPredicate>),
}

/// Accumulates SQL text and bind values
#[derive(Debug, Default)]
struct SqlWriter {
    sql: String,
    binds: Vec<SqlValue>,
}

impl SqlWriter {
    fn bind(&mut self, value: &SqlValue) -> String {
        self.binds.push(value.clone());
        format!("${}", self.binds.len())
    }

    fn predicate(&mut self, predicate: &SqlPredicate) {
        match predicate {
            SqlPredicate::Compare { column, op, value } => {
                let placeholder = self.bind(value);
                self.sql.push_str(&format!("{} {} {}", column, op, placeholder));
            }
            SqlPredicate::In { column, values } => {
                if values.is_empty() {
                    self.sql.push_str("FALSE");
                    return;
                }
                let placeholders: Vec<String> = values.iter().map(|v| self.bind(v)).collect();
                self.sql
                    .push_str(&format!("{} IN ({})", column, placeholders.join(", ")));
            }
            SqlPredicate::IsNull { column, is_null } => {
                let test = if *is_null { "IS NULL" } else { "IS NOT NULL" };
                self.sql.push_str(&format!("{} {}", column, test));
            }
            SqlPredicate::And(children) => self.group(children, " AND "),
            SqlPredicate::Or(children) => self.group(children, " OR "),
            SqlPredicate::Not(inner) => {
                self.sql.push_str("NOT (");
                self.predicate(inner);
                self.sql.push(')');
            }
        }
    }

    fn group(&mut self, children: &[SqlPredicate], separator: &str) {
        self.sql.push('(');
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(separator);
            }
            self.predicate(child);
        }
        self.sql.push(')');
    }

    /// Leading comment and EXPLAIN prefix
    fn preamble(&mut self, options: &CriteriaOptions) {
        if let Some(comment) = &options.comment {
            self.sql
                .push_str(&format!("/* {} */ ", comment.replace("*/", "* /")));
        }
        if options.explain {
            self.sql.push_str("EXPLAIN ");
        }
    }

    fn where_clause(&mut self, predicate: Option<&SqlPredicate>) {
        if let Some(predicate) = predicate {
            self.sql.push_str(" WHERE ");
            self.predicate(predicate);
        }
    }

    fn finish(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.binds)
    }
}

/// Double-quoted identifier with embedded quotes doubled
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Selected column, aliased back to its field name when they differ
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    pub column: String,
    pub field: String,
}

/// Sort key on a resolved column
#[derive(Debug, Clone, PartialEq)]
pub struct SortColumn {
    pub column: String,
    pub direction: SortDirection,
}

/// SELECT statement under construction
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub(crate) table: String,
    pub(crate) predicate: Option<SqlPredicate>,
    pub(crate) orders: Vec<SortColumn>,
    pub(crate) columns: Option<Vec<SelectColumn>>,
    pub(crate) offset: Option<u64>,
    pub(crate) limit: Option<u64>,
    pub(crate) options: CriteriaOptions,
}

impl SqlQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicate: None,
            orders: Vec::new(),
            columns: None,
            offset: None,
            limit: None,
            options: CriteriaOptions::default(),
        }
    }

    pub fn predicate(&self) -> Option<&SqlPredicate> {
        self.predicate.as_ref()
    }

    /// Advisory statement timeout for the executing connection
    pub fn statement_timeout_ms(&self) -> Option<u64> {
        self.options.max_time_ms
    }

    /// Render the statement and its bind values
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut writer = SqlWriter::default();
        writer.preamble(&self.options);

        let columns = match &self.columns {
            None => "*".to_string(),
            Some(columns) => columns
                .iter()
                .map(|c| {
                    if c.column == c.field {
                        c.column.clone()
                    } else {
                        format!("{} AS {}", c.column, quote_identifier(&c.field))
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
        };
        writer
            .sql
            .push_str(&format!("SELECT {} FROM {}", columns, self.table));

        writer.where_clause(self.predicate.as_ref());

        if !self.orders.is_empty() {
            let keys: Vec<String> = self
                .orders
                .iter()
                .map(|o| format!("{} {}", o.column, o.direction.as_str().to_uppercase()))
                .collect();
            writer.sql.push_str(&format!(" ORDER BY {}", keys.join(", ")));
        }

        if let Some(limit) = self.limit {
            writer.sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            writer.sql.push_str(&format!(" OFFSET {}", offset));
        }

        writer.finish()
    }
}

/// COUNT statement
#[derive(Debug, Clone, PartialEq)]
pub struct SqlCountQuery {
    pub(crate) table: String,
    pub(crate) predicate: Option<SqlPredicate>,
    pub(crate) options: CriteriaOptions,
}

impl SqlCountQuery {
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut writer = SqlWriter::default();
        writer.preamble(&self.options);
        writer
            .sql
            .push_str(&format!("SELECT COUNT(*) FROM {}", self.table));
        writer.where_clause(self.predicate.as_ref());
        writer.finish()
    }
}
