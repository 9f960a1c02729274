//! CLI-specific error types
//!
//! Every CLI error is fatal for the invocation: it is reported once as a
//! JSON error response and the process exits non-zero.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::criteria::CriteriaError;
use crate::translator::BackendRejected;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout, collection file)
    IoError,
    /// Collection file is not an array of documents
    InvalidCollection,
    /// Criteria construction or conversion failed; carries the criteria code
    Criteria(&'static str),
    /// Backend rejected the translated criteria
    BackendRejected,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CRITERIA_CLI_CONFIG_ERROR",
            Self::IoError => "CRITERIA_CLI_IO_ERROR",
            Self::InvalidCollection => "CRITERIA_CLI_INVALID_COLLECTION",
            Self::Criteria(code) => *code,
            Self::BackendRejected => "CRITERIA_BACKEND_REJECTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Collection file has the wrong shape
    pub fn invalid_collection(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidCollection, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<CriteriaError> for CliError {
    fn from(e: CriteriaError) -> Self {
        Self::new(CliErrorCode::Criteria(e.code()), e.to_string())
    }
}

impl From<BackendRejected> for CliError {
    fn from(e: BackendRejected) -> Self {
        Self::new(CliErrorCode::BackendRejected, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
