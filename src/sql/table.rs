//! Table allowlist: which fields exist and how they map onto columns

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::TableConfig;

/// Column value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    Bool,
    Timestamp,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Bool => "bool",
            ColumnType::Timestamp => "timestamp",
        }
    }

    /// Types with a meaningful ordering
    pub fn is_ordinal(&self) -> bool {
        !matches!(self, ColumnType::Bool)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// Queryable table with its field allowlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTable {
    name: String,
    columns: BTreeMap<String, Column>,
}

impl SqlTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: BTreeMap::new(),
        }
    }

    /// Expose `field` as a column of the same name
    pub fn column(self, field: impl Into<String>, column_type: ColumnType) -> Self {
        let field = field.into();
        let name = field.clone();
        self.column_as(field, name, column_type)
    }

    /// Expose `field` backed by a differently named column
    pub fn column_as(
        mut self,
        field: impl Into<String>,
        column: impl Into<String>,
        column_type: ColumnType,
    ) -> Self {
        self.columns.insert(
            field.into(),
            Column {
                name: column.into(),
                column_type,
            },
        );
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column backing `field`, if the field is exposed
    pub fn lookup(&self, field: &str) -> Option<&Column> {
        self.columns.get(field)
    }
}

impl From<&TableConfig> for SqlTable {
    fn from(config: &TableConfig) -> Self {
        config
            .columns
            .iter()
            .fold(SqlTable::new(config.name.clone()), |table, (field, column)| {
                let name = column.column.clone().unwrap_or_else(|| field.clone());
                table.column_as(field.clone(), name, column.column_type)
            })
    }
}
