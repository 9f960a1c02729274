//! Criteria aggregate and builder
//!
//! A criteria keeps its filters as a single optional root: the builder folds
//! the top-level filter sequence into one implicit AND at build time, so
//! `[F1, F2]` and an explicit `AND[F1, F2]` produce the same value.

use serde::Serialize;

use super::filter::Filter;
use super::operator::FilterOperator;
use super::options::CriteriaOptions;
use super::order::Order;
use super::pagination::Pagination;
use super::projection::Projection;

/// Immutable description of what to filter, order, window and project
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Criteria {
    filter: Option<Filter>,
    orders: Vec<Order>,
    limit: Option<u64>,
    offset: Option<u64>,
    projection: Option<Projection>,
    options: CriteriaOptions,
}

impl Criteria {
    /// Start building a criteria
    pub fn builder() -> CriteriaBuilder {
        CriteriaBuilder::new()
    }

    /// Criteria matching every record in backend order
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Combined root predicate, if any
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Top-level conjuncts of the root predicate
    pub fn filters(&self) -> &[Filter] {
        match &self.filter {
            None => &[],
            Some(root @ Filter::Leaf(_)) => std::slice::from_ref(root),
            Some(root) if root.operator() == FilterOperator::And => root.children(),
            Some(root) => std::slice::from_ref(root),
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn options(&self) -> &CriteriaOptions {
        &self.options
    }

    pub fn has_filters(&self) -> bool {
        self.filter.is_some()
    }

    pub fn has_orders(&self) -> bool {
        !self.orders.is_empty()
    }

    pub fn has_projection(&self) -> bool {
        self.projection.is_some()
    }

    pub fn has_pagination(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }

    /// Window as a `Pagination`, when a limit is set
    pub fn pagination(&self) -> Option<Pagination> {
        self.limit
            .map(|limit| Pagination::new(limit, self.offset.unwrap_or(0)))
    }

    /// Builder seeded with this criteria's state
    pub fn to_builder(&self) -> CriteriaBuilder {
        CriteriaBuilder {
            filters: self.filters().to_vec(),
            orders: self.orders.clone(),
            limit: self.limit,
            offset: self.offset,
            projection: self.projection.clone(),
            options: self.options.clone(),
        }
    }

    /// Fresh criteria for counting: filters, orders and options only.
    /// The window and projection never influence a count.
    pub fn for_count(&self) -> Criteria {
        Criteria {
            filter: self.filter.clone(),
            orders: self.orders.clone(),
            options: self.options.clone(),
            ..Default::default()
        }
    }

    /// Fresh criteria for a single-record lookup: filters and options only
    pub fn for_find_one(&self) -> Criteria {
        Criteria {
            filter: self.filter.clone(),
            options: self.options.clone(),
            ..Default::default()
        }
    }
}

/// Fluent accumulator producing a `Criteria` snapshot
#[derive(Debug, Clone, Default)]
pub struct CriteriaBuilder {
    filters: Vec<Filter>,
    orders: Vec<Order>,
    limit: Option<u64>,
    offset: Option<u64>,
    projection: Option<Projection>,
    options: CriteriaOptions,
}

impl CriteriaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the top-level filters
    pub fn set_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    /// Append one top-level filter
    pub fn add_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append several top-level filters
    pub fn add_filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn set_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders = orders;
        self
    }

    pub fn add_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn set_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn set_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set limit and offset together
    pub fn set_pagination(self, pagination: Pagination) -> Self {
        self.set_limit(pagination.limit).set_offset(pagination.offset)
    }

    pub fn set_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn set_explain(mut self, explain: bool) -> Self {
        self.options.explain = explain;
        self
    }

    pub fn set_comment(mut self, comment: impl Into<String>) -> Self {
        self.options.comment = Some(comment.into());
        self
    }

    pub fn set_max_time_ms(mut self, max_time_ms: u64) -> Self {
        self.options.max_time_ms = Some(max_time_ms);
        self
    }

    pub fn set_batch_size(mut self, batch_size: u32) -> Self {
        self.options.batch_size = Some(batch_size);
        self
    }

    pub fn set_options(mut self, options: CriteriaOptions) -> Self {
        self.options = options;
        self
    }

    /// Snapshot the accumulated state
    pub fn build(&self) -> Criteria {
        Criteria {
            filter: Filter::all(self.filters.clone()),
            orders: self.orders.clone(),
            limit: self.limit,
            offset: self.offset,
            projection: self.projection.clone(),
            options: self.options.clone(),
        }
    }
}
