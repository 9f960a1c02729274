//! CLI command implementations
//!
//! Each command turns the optional stdin criteria into a `Criteria`,
//! translates it for the relevant backend and returns the response data.
//! Reading stdin and writing stdout happen only in `run_command`.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::config::EngineConfig;
use crate::criteria::{Criteria, CriteriaFactory, PageInfo, Paginated};
use crate::input::{CriteriaInput, CriteriaInputConverter, FindPreparer};
use crate::memory::DocumentBackend;
use crate::sql::{SqlBackend, SqlTable};
use crate::translator::{ExplainPlan, QueryTranslator};

use super::args::{CollectionArgs, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_response};

/// Dispatch a parsed command, reading criteria from stdin
pub fn run_command(command: Command) -> CliResult<()> {
    let input = read_input()?;

    let data = match command {
        Command::Fetch { target, search } => fetch(&target, search.as_deref(), input.as_ref())?,
        Command::Count { target, search } => count(&target, search.as_deref(), input.as_ref())?,
        Command::FindOne { target } => find_one(&target, input.as_ref())?,
        Command::Sql { config, search } => sql(&config, search.as_deref(), input.as_ref())?,
        Command::Explain { config, search } => {
            explain(config.as_deref(), search.as_deref(), input.as_ref())?
        }
    };

    write_response(data)
}

/// Page of matching documents with page metadata
pub fn fetch(
    target: &CollectionArgs,
    search: Option<&str>,
    input: Option<&CriteriaInput>,
) -> CliResult<Value> {
    let config = load_config(target.config.as_deref())?;
    let documents = load_collection(&target.collection)?;

    let criteria = FindPreparer::from_config(&config).prepare_find(input)?;
    let criteria = with_search(criteria, &config, search);

    let backend = document_backend(&config);
    let translator = QueryTranslator::new(&backend);
    let records = translator
        .translate_for_fetch(&criteria, backend.collection())?
        .execute(&documents);
    let total = translator
        .translate_for_count(&criteria, backend.collection())?
        .execute(&documents);

    let page_info = match criteria.pagination() {
        Some(window) => window.page_info(total),
        None => PageInfo::new(1, total, total),
    };

    Ok(serde_json::to_value(Paginated::new(records, page_info))?)
}

/// Number of matching documents
pub fn count(
    target: &CollectionArgs,
    search: Option<&str>,
    input: Option<&CriteriaInput>,
) -> CliResult<Value> {
    let config = load_config(target.config.as_deref())?;
    let documents = load_collection(&target.collection)?;

    let criteria = match input {
        Some(input) => CriteriaInputConverter::convert(input)?,
        None => Criteria::match_all(),
    };
    let criteria = with_search(criteria, &config, search);

    let backend = document_backend(&config);
    let total = QueryTranslator::new(&backend)
        .translate_for_count(&criteria, backend.collection())?
        .execute(&documents);

    Ok(json!({ "count": total }))
}

/// The first matching document, or null
pub fn find_one(target: &CollectionArgs, input: Option<&CriteriaInput>) -> CliResult<Value> {
    let config = load_config(target.config.as_deref())?;
    let documents = load_collection(&target.collection)?;

    let criteria = FindPreparer::from_config(&config).prepare_find_one(input)?;

    let backend = document_backend(&config);
    let record = QueryTranslator::new(&backend)
        .translate_for_fetch(&criteria, backend.collection())?
        .first(&documents);

    Ok(record.unwrap_or(Value::Null))
}

/// Fetch and count SQL with their bind values
pub fn sql(config_path: &Path, search: Option<&str>, input: Option<&CriteriaInput>) -> CliResult<Value> {
    let config = EngineConfig::load(config_path)?;
    let table = config
        .table
        .as_ref()
        .ok_or_else(|| CliError::config_error("config has no 'table' section"))?;

    let criteria = FindPreparer::from_config(&config).prepare_find(input)?;
    let criteria = with_search(criteria, &config, search);

    let backend = SqlBackend::new(SqlTable::from(table));
    let translator = QueryTranslator::new(&backend);
    let (fetch_sql, fetch_binds) = translator
        .translate_for_fetch(&criteria, backend.select())?
        .to_sql();
    let (count_sql, count_binds) = translator
        .translate_for_count(&criteria, backend.select())?
        .to_sql();

    Ok(json!({
        "fetch": { "sql": fetch_sql, "binds": fetch_binds },
        "count": { "sql": count_sql, "binds": count_binds },
    }))
}

/// Explain text for the prepared criteria
pub fn explain(
    config_path: Option<&Path>,
    search: Option<&str>,
    input: Option<&CriteriaInput>,
) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let criteria = FindPreparer::from_config(&config).prepare_find(input)?;
    let criteria = with_search(criteria, &config, search);

    Ok(json!({ "explain": ExplainPlan::from_criteria(&criteria).to_string() }))
}

fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Read a JSON array of documents
fn load_collection(path: &Path) -> CliResult<Vec<Value>> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::io_error(format!("Failed to read collection {:?}: {}", path, e))
    })?;

    match serde_json::from_str::<Value>(&content)? {
        Value::Array(documents) => Ok(documents),
        _ => Err(CliError::invalid_collection(format!(
            "{:?} must contain a JSON array of documents",
            path
        ))),
    }
}

fn document_backend(config: &EngineConfig) -> DocumentBackend {
    match &config.known_fields {
        Some(fields) => DocumentBackend::with_known_fields(fields.iter().cloned()),
        None => DocumentBackend::new(),
    }
}

/// Add a free-text search over the configured fields
fn with_search(criteria: Criteria, config: &EngineConfig, search: Option<&str>) -> Criteria {
    let Some(term) = search else {
        return criteria;
    };

    match CriteriaFactory::text_search(term, &config.search_fields) {
        Some(filter) => criteria.to_builder().add_filter(filter).build(),
        None => {
            if config.search_fields.is_empty() && !term.trim().is_empty() {
                tracing::warn!(term, "search requested but no search_fields are configured");
            }
            criteria
        }
    }
}
