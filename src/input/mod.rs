//! Criteria input
//!
//! Wire-level input types, their conversion into `Criteria`, and the
//! find/find-one preparation that applies configured defaults.

mod converter;
mod prepare;
mod types;

pub use converter::{CriteriaInputConverter, MAX_FILTER_DEPTH};
pub use prepare::FindPreparer;
pub use types::{CriteriaInput, CriteriaOptionsInput, FilterInput, OrderInput, ProjectionInput};
