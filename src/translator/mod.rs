//! Query translation
//!
//! Lowers a `Criteria` into whatever native query form a backing store
//! exposes through `QueryBackend`. The translator never executes queries
//! and never second-guesses the backend: unknown fields and type mismatches
//! are the backend's call, and its errors pass through untouched.

mod backend;
mod explain;
mod translator;

pub use crate::criteria::Lookup;
pub use backend::{BackendRejected, QueryBackend};
pub use explain::ExplainPlan;
pub use translator::QueryTranslator;
