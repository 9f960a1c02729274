//! JSON I/O handling for CLI
//!
//! - Input: optional criteria JSON document via stdin
//! - Output: single JSON object via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::Value;

use crate::criteria::CriteriaError;
use crate::input::CriteriaInput;

use super::errors::CliResult;

/// Read the criteria document from stdin; blank input means none
pub fn read_input() -> CliResult<Option<CriteriaInput>> {
    let mut content = String::new();
    io::stdin().lock().read_to_string(&mut content)?;
    parse_input(&content)
}

/// Parse a criteria document; blank text means none
pub fn parse_input(content: &str) -> CliResult<Option<CriteriaInput>> {
    if content.trim().is_empty() {
        return Ok(None);
    }

    let input: CriteriaInput = serde_json::from_str(content)
        .map_err(|e| CriteriaError::input(format!("malformed criteria JSON: {}", e)))?;
    Ok(Some(input))
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_value(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_value(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

fn write_value(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_none() {
        assert!(parse_input("").unwrap().is_none());
        assert!(parse_input("  \n").unwrap().is_none());
    }

    #[test]
    fn test_parse_input() {
        let input = parse_input(r#"{"limit": 5}"#).unwrap().unwrap();
        assert_eq!(input.limit, Some(5));

        let err = parse_input("{oops").unwrap_err();
        assert_eq!(err.code_str(), "CRITERIA_INVALID_INPUT");
    }
}
