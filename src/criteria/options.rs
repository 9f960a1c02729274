//! Execution hints carried alongside a criteria.
//!
//! None of these are interpreted by the engine itself; backends decide how
//! (and whether) to honor them.

use serde::Serialize;

/// Additional options for a criteria
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CriteriaOptions {
    /// Request execution-plan diagnostics from the backend
    pub explain: bool,
    /// Opaque debug tag passed through to the backend
    pub comment: Option<String>,
    /// Advisory execution time budget
    pub max_time_ms: Option<u64>,
    /// Advisory fetch batch size
    pub batch_size: Option<u32>,
}

impl CriteriaOptions {
    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_max_time_ms(mut self, max_time_ms: u64) -> Self {
        self.max_time_ms = Some(max_time_ms);
        self
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// True when every field is at its default
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
