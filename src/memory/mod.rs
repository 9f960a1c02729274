//! In-memory document backend
//!
//! Executes translated criteria against a slice of JSON documents. Used by
//! the CLI over JSON collection files and as a reference backend in tests.

mod backend;
mod predicate;
mod sorter;

pub use backend::{DocumentBackend, DocumentCountQuery, DocumentQuery};
pub use predicate::{DocumentPredicate, FieldPredicate};
pub use sorter::ResultSorter;
