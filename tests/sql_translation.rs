//! SQL Translation Tests
//!
//! Criteria rendered against a configured table:
//! - Field names map to columns and come back under their field names
//! - Values are bound by column type, never interpolated
//! - Lookups the column type cannot support are rejected
//! - Options render as a leading comment and EXPLAIN prefix

use criteria_engine::config::EngineConfig;
use criteria_engine::criteria::{Criteria, Filter, Order, Projection};
use criteria_engine::input::CriteriaInputConverter;
use criteria_engine::sql::{SqlBackend, SqlTable, SqlValue};
use criteria_engine::translator::{BackendRejected, QueryTranslator};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

const CONFIG: &str = r#"{
    "table": {
        "name": "accounts",
        "columns": {
            "id": {"type": "integer"},
            "name": {"type": "text"},
            "balance": {"type": "float"},
            "active": {"column": "is_active", "type": "bool"},
            "created_at": {"column": "inserted_at", "type": "timestamp"}
        }
    }
}"#;

fn backend() -> SqlBackend {
    let config = EngineConfig::from_json(CONFIG).unwrap();
    let table = config.table.as_ref().unwrap();
    SqlBackend::new(SqlTable::from(table))
}

fn fetch_sql(criteria: &Criteria) -> Result<(String, Vec<SqlValue>), BackendRejected> {
    let backend = backend();
    QueryTranslator::new(&backend)
        .translate_for_fetch(criteria, backend.select())
        .map(|query| query.to_sql())
}

fn filtered(filter: Filter) -> Criteria {
    Criteria::builder().add_filter(filter).build()
}

// =============================================================================
// Column Mapping
// =============================================================================

/// Mapped columns are used in every clause and aliased in the select list.
#[test]
fn test_mapped_columns_in_every_clause() {
    let criteria = Criteria::builder()
        .add_filter(Filter::eq("active", true))
        .add_order(Order::desc("created_at"))
        .set_projection(Projection::new(["id", "created_at"]).unwrap())
        .build();

    let (sql, binds) = fetch_sql(&criteria).unwrap();
    assert_eq!(
        sql,
        r#"SELECT id, inserted_at AS "created_at" FROM accounts WHERE is_active = $1 ORDER BY inserted_at DESC"#
    );
    assert_eq!(binds, vec![SqlValue::Bool(true)]);
}

/// Unmapped fields never reach the SQL text.
#[test]
fn test_unknown_fields_rejected_in_every_clause() {
    let unknown = BackendRejected::UnknownField("password".into());

    assert_eq!(fetch_sql(&filtered(Filter::eq("password", "x"))).unwrap_err(), unknown);
    assert_eq!(
        fetch_sql(&Criteria::builder().add_order(Order::asc("password")).build()).unwrap_err(),
        unknown
    );
    assert_eq!(
        fetch_sql(
            &Criteria::builder()
                .set_projection(Projection::new(["id", "password"]).unwrap())
                .build()
        )
        .unwrap_err(),
        unknown
    );
}

// =============================================================================
// Bind Values
// =============================================================================

#[test]
fn test_binds_follow_column_types() {
    let criteria = Criteria::builder()
        .add_filter(Filter::gte("balance", 10))
        .add_filter(Filter::lt("created_at", "2024-06-01T12:00:00Z"))
        .add_filter(Filter::in_list("id", vec![json!(3), json!(4)]))
        .build();

    let (sql, binds) = fetch_sql(&criteria).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM accounts WHERE (balance >= $1 AND inserted_at < $2 AND id IN ($3, $4))"
    );
    assert_eq!(binds[0], SqlValue::Float(10.0));
    assert!(matches!(binds[1], SqlValue::Timestamp(_)));
    assert_eq!(
        serde_json::to_value(&binds).unwrap(),
        json!([10.0, "2024-06-01T12:00:00Z", 3, 4])
    );
}

/// Quotes in values stay in bind values.
#[test]
fn test_values_are_never_interpolated() {
    let (sql, binds) = fetch_sql(&filtered(Filter::eq("name", "x' OR '1'='1"))).unwrap();
    assert_eq!(sql, "SELECT * FROM accounts WHERE name = $1");
    assert_eq!(binds, vec![SqlValue::String("x' OR '1'='1".into())]);
}

#[test]
fn test_text_lookups_and_null_checks() {
    let criteria = Criteria::builder()
        .add_filter(Filter::starts_with("name", "a_"))
        .add_filter(Filter::is_null("created_at", false))
        .add_filter(Filter::regex("name", "^[A-Z]"))
        .build();

    let (sql, binds) = fetch_sql(&criteria).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM accounts WHERE (name LIKE $1 AND inserted_at IS NOT NULL AND name ~ $2)"
    );
    assert_eq!(
        binds,
        vec![SqlValue::String("a\\_%".into()), SqlValue::String("^[A-Z]".into())]
    );
}

/// An empty IN list matches nothing.
#[test]
fn test_empty_in_renders_false() {
    let (sql, binds) = fetch_sql(&filtered(Filter::in_list("id", vec![]))).unwrap();
    assert_eq!(sql, "SELECT * FROM accounts WHERE FALSE");
    assert!(binds.is_empty());
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_type_mismatches_rejected() {
    assert!(matches!(
        fetch_sql(&filtered(Filter::eq("id", "seven"))).unwrap_err(),
        BackendRejected::TypeMismatch { .. }
    ));
    assert!(matches!(
        fetch_sql(&filtered(Filter::gt("active", true))).unwrap_err(),
        BackendRejected::TypeMismatch { .. }
    ));
    assert!(matches!(
        fetch_sql(&filtered(Filter::icontains("id", "1"))).unwrap_err(),
        BackendRejected::TypeMismatch { .. }
    ));
    assert!(matches!(
        fetch_sql(&filtered(Filter::lt("created_at", "yesterday"))).unwrap_err(),
        BackendRejected::TypeMismatch { .. }
    ));
}

#[test]
fn test_invalid_regex_rejected() {
    let err = fetch_sql(&filtered(Filter::regex("name", "(unclosed"))).unwrap_err();
    assert!(matches!(err, BackendRejected::InvalidPattern { .. }));
    assert_eq!(err.code(), "CRITERIA_BACKEND_REJECTED");
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn test_options_render_on_fetch_and_count() {
    let criteria = CriteriaInputConverter::from_value(json!({
        "filters": [{"field": "id", "operator": "gt", "value": 0}],
        "limit": 5,
        "options": {"comment": "nightly report", "explain": true, "max_time_ms": 250}
    }))
    .unwrap();

    let backend = backend();
    let translator = QueryTranslator::new(&backend);

    let fetch = translator.translate_for_fetch(&criteria, backend.select()).unwrap();
    assert_eq!(
        fetch.to_sql().0,
        "/* nightly report */ EXPLAIN SELECT * FROM accounts WHERE id > $1 LIMIT 5"
    );
    assert_eq!(fetch.statement_timeout_ms(), Some(250));

    let (count_sql, _) = translator
        .translate_for_count(&criteria, backend.select())
        .unwrap()
        .to_sql();
    assert_eq!(
        count_sql,
        "/* nightly report */ EXPLAIN SELECT COUNT(*) FROM accounts WHERE id > $1"
    );
}
