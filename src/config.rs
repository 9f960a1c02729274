//! Engine configuration
//!
//! A JSON document with defaults for every field:
//!
//! ```json
//! {
//!   "default_limit": 10,
//!   "default_order": ["-created_at"],
//!   "max_limit": 1000,
//!   "search_fields": ["name", "email"],
//!   "known_fields": ["name", "email", "status", "created_at"],
//!   "table": {
//!     "name": "users",
//!     "columns": {
//!       "name": {"type": "text"},
//!       "created_at": {"type": "timestamp", "column": "created"}
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::criteria::Order;
use crate::sql::ColumnType;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => "CRITERIA_CONFIG_IO",
            ConfigError::Parse(_) => "CRITERIA_CONFIG_PARSE",
            ConfigError::Invalid(_) => "CRITERIA_CONFIG_INVALID",
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Limit applied by `find` when no criteria is supplied
    #[serde(default = "default_limit")]
    pub default_limit: u64,

    /// Signed sort keys applied by `find` when no criteria is supplied
    #[serde(default = "default_order")]
    pub default_order: Vec<String>,

    /// Upper bound for requested limits; `null` disables the check
    #[serde(default = "default_max_limit")]
    pub max_limit: Option<u64>,

    /// Fields searched by free-text search
    #[serde(default)]
    pub search_fields: Vec<String>,

    /// Field allowlist for the in-memory backend
    #[serde(default)]
    pub known_fields: Option<Vec<String>>,

    /// Table mapping for the SQL backend
    #[serde(default)]
    pub table: Option<TableConfig>,
}

fn default_limit() -> u64 {
    10
}

fn default_order() -> Vec<String> {
    vec!["-created_at".to_string()]
}

fn default_max_limit() -> Option<u64> {
    Some(1000)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            default_order: default_order(),
            max_limit: default_max_limit(),
            search_fields: Vec::new(),
            known_fields: None,
            table: None,
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_limit == 0 {
            return Err(ConfigError::Invalid("default_limit must be > 0".into()));
        }

        if let Some(max) = self.max_limit {
            if self.default_limit > max {
                return Err(ConfigError::Invalid(format!(
                    "default_limit {} exceeds max_limit {}",
                    self.default_limit, max
                )));
            }
        }

        for entry in &self.default_order {
            if Order::parse_signed(entry).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "default_order entry '{}' names no field",
                    entry
                )));
            }
        }

        if self.search_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::Invalid("search_fields cannot contain empty names".into()));
        }

        if let Some(table) = &self.table {
            table.validate()?;
        }

        Ok(())
    }

    /// Parsed default sort keys
    pub fn default_orders(&self) -> Vec<Order> {
        self.default_order
            .iter()
            .filter_map(|entry| Order::parse_signed(entry))
            .collect()
    }
}

/// SQL table mapping: exposed field name -> column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub columns: BTreeMap<String, ColumnConfig>,
}

impl TableConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !is_identifier(&self.name) {
            return Err(ConfigError::Invalid(format!("invalid table name '{}'", self.name)));
        }
        if self.columns.is_empty() {
            return Err(ConfigError::Invalid(format!("table '{}' has no columns", self.name)));
        }
        for (field, column) in &self.columns {
            // Dotted paths name nested document fields
            if !field.split('.').all(is_identifier) {
                return Err(ConfigError::Invalid(format!("invalid field name '{}'", field)));
            }
            let name = column.column.as_deref().unwrap_or(field);
            if !is_identifier(name) {
                return Err(ConfigError::Invalid(format!(
                    "invalid column name '{}' for field '{}'",
                    name, field
                )));
            }
        }
        Ok(())
    }
}

/// One exposed column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Column name when it differs from the field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// Plain SQL identifier: ASCII letter or underscore, then alphanumerics/underscores
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.max_limit, Some(1000));
        assert_eq!(config.default_orders(), vec![Order::desc("created_at")]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "default_limit": 25,
                "search_fields": ["name"],
                "table": {{"name": "users", "columns": {{
                    "name": {{"type": "text"}},
                    "created_at": {{"type": "timestamp", "column": "created"}}
                }}}}
            }}"#
        )
        .unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.default_limit, 25);
        let table = config.table.unwrap();
        assert_eq!(table.columns["created_at"].column.as_deref(), Some("created"));
        assert_eq!(table.columns["name"].column_type, ColumnType::Text);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/criteria.json")).unwrap_err();
        assert_eq!(err.code(), "CRITERIA_CONFIG_IO");
    }

    #[test]
    fn test_invalid_values() {
        let err = EngineConfig::from_json(r#"{"default_limit": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_json(r#"{"default_limit": 50, "max_limit": 20}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_json(r#"{"default_order": ["-"]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_json(
            r#"{"table": {"name": "users; drop", "columns": {"a": {"type": "text"}}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_json("{").unwrap_err();
        assert_eq!(err.code(), "CRITERIA_CONFIG_PARSE");
    }

    #[test]
    fn test_field_names_validated() {
        let config = EngineConfig::from_json(
            r#"{"table": {"name": "users", "columns": {
                "profile.city": {"column": "city", "type": "text"}
            }}}"#,
        )
        .unwrap();
        assert!(config.table.unwrap().columns.contains_key("profile.city"));

        for field in ["x FROM pg_shadow --", "profile..city", "a\"b", ""] {
            let json = serde_json::json!({
                "table": {"name": "users", "columns": {field: {"column": "name", "type": "text"}}}
            });
            let err = EngineConfig::from_json(&json.to_string()).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "accepted field {:?}", field);
        }
    }

    #[test]
    fn test_unbounded_max_limit() {
        let config = EngineConfig::from_json(r#"{"max_limit": null, "default_limit": 5000}"#).unwrap();
        assert_eq!(config.max_limit, None);
    }
}
