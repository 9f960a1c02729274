//! Criteria model
//!
//! Backend-agnostic description of a query: filters (leaf and composite
//! predicates), sort keys, a limit/offset window, an optional projection
//! and execution hints. Everything here is an immutable value; nothing
//! performs I/O.

mod criteria;
mod errors;
mod factory;
mod filter;
mod lookup;
mod operator;
mod options;
mod order;
mod pagination;
mod projection;

pub use criteria::{Criteria, CriteriaBuilder};
pub use errors::{CriteriaError, CriteriaResult};
pub use factory::{CriteriaFactory, DEFAULT_STATUS_FIELD};
pub use filter::{CompositeFilter, FieldFilter, Filter};
pub use lookup::Lookup;
pub use operator::FilterOperator;
pub use options::CriteriaOptions;
pub use order::{Order, SortDirection};
pub use pagination::{PageInfo, PageRequest, Paginated, Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use projection::Projection;
