//! SQL backend
//!
//! Lowers criteria into PostgreSQL `SELECT`/`COUNT` statements with
//! numbered placeholders. Only allowlisted fields reach the SQL text, and
//! every comparison value travels as a bind value.

mod backend;
mod query;
mod table;
mod value;

pub use backend::SqlBackend;
pub use query::{SelectColumn, SortColumn, SqlCountQuery, SqlPredicate, SqlQuery};
pub use table::{Column, ColumnType, SqlTable};
pub use value::SqlValue;
