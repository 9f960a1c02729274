//! criteria-engine - backend-agnostic criteria queries
//!
//! A `Criteria` describes what to filter, how to order, which window to
//! return and which fields to project. It is built in code (`CriteriaBuilder`,
//! `CriteriaFactory`) or converted from wire-level JSON (`CriteriaInput`),
//! then lowered by a `QueryTranslator` into a backend's native query.
//!
//! Two backends ship with the crate: an in-memory JSON document backend
//! and a PostgreSQL SQL renderer.

pub mod cli;
pub mod config;
pub mod criteria;
pub mod input;
pub mod memory;
pub mod sql;
pub mod translator;

pub use config::{ConfigError, EngineConfig};
pub use criteria::{
    Criteria, CriteriaBuilder, CriteriaError, CriteriaFactory, CriteriaOptions, CriteriaResult,
    Filter, FilterOperator, Order, Projection, SortDirection,
};
pub use input::{CriteriaInput, CriteriaInputConverter, FindPreparer};
pub use translator::{BackendRejected, ExplainPlan, Lookup, QueryBackend, QueryTranslator};
