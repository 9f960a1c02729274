//! In-memory document backend
//!
//! Query handles are lazy plans; nothing touches documents until
//! `execute` is called with a collection.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::criteria::{CriteriaOptions, Order};
use crate::translator::{BackendRejected, Lookup, QueryBackend};

use super::predicate::{resolve, DocumentPredicate, FieldPredicate};
use super::sorter::ResultSorter;

/// Backend over JSON documents held in memory
#[derive(Debug, Clone, Default)]
pub struct DocumentBackend {
    known_fields: Option<HashSet<String>>,
}

impl DocumentBackend {
    /// Backend accepting any field name
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend rejecting fields outside `fields`.
    ///
    /// Dotted paths are accepted when their first segment is known.
    pub fn with_known_fields(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            known_fields: Some(fields.into_iter().map(Into::into).collect()),
        }
    }

    /// Query handle over a whole collection
    pub fn collection(&self) -> DocumentQuery {
        DocumentQuery::default()
    }

    fn check_field(&self, field: &str) -> Result<(), BackendRejected> {
        match &self.known_fields {
            None => Ok(()),
            Some(known) => {
                let root = field.split('.').next().unwrap_or(field);
                if known.contains(field) || known.contains(root) {
                    Ok(())
                } else {
                    Err(BackendRejected::UnknownField(field.to_string()))
                }
            }
        }
    }
}

/// Lazy fetch plan
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    predicate: Option<DocumentPredicate>,
    orders: Vec<Order>,
    projection: Option<Vec<String>>,
    skip: u64,
    take: Option<u64>,
    options: CriteriaOptions,
}

impl DocumentQuery {
    /// Run the plan: filter, sort, skip, take, project
    pub fn execute(&self, documents: &[Value]) -> Vec<Value> {
        let mut matched: Vec<Value> = documents
            .iter()
            .filter(|doc| self.matches(doc))
            .cloned()
            .collect();

        ResultSorter::sort(&mut matched, &self.orders);

        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let take = self
            .take
            .map(|t| usize::try_from(t).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        matched
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|doc| self.project_document(doc))
            .collect()
    }

    /// First record of the plan, if any
    pub fn first(&self, documents: &[Value]) -> Option<Value> {
        let mut single = self.clone();
        single.take = Some(single.take.map_or(1, |t| t.min(1)));
        single.execute(documents).into_iter().next()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn projection(&self) -> Option<&[String]> {
        self.projection.as_deref()
    }

    pub fn skip_count(&self) -> u64 {
        self.skip
    }

    pub fn take_count(&self) -> Option<u64> {
        self.take
    }

    pub fn options(&self) -> &CriteriaOptions {
        &self.options
    }

    fn matches(&self, document: &Value) -> bool {
        self.predicate
            .as_ref()
            .map_or(true, |predicate| predicate.matches(document))
    }

    fn project_document(&self, document: Value) -> Value {
        match &self.projection {
            None => document,
            Some(fields) => {
                let projected: Map<String, Value> = fields
                    .iter()
                    .map(|field| {
                        let value = resolve(&document, field).cloned().unwrap_or(Value::Null);
                        (field.clone(), value)
                    })
                    .collect();
                Value::Object(projected)
            }
        }
    }
}

/// Lazy count plan
#[derive(Debug, Clone, Default)]
pub struct DocumentCountQuery {
    predicate: Option<DocumentPredicate>,
}

impl DocumentCountQuery {
    pub fn execute(&self, documents: &[Value]) -> u64 {
        documents
            .iter()
            .filter(|doc| {
                self.predicate
                    .as_ref()
                    .map_or(true, |predicate| predicate.matches(doc))
            })
            .count() as u64
    }
}

impl QueryBackend for DocumentBackend {
    type Predicate = DocumentPredicate;
    type Query = DocumentQuery;
    type CountQuery = DocumentCountQuery;
    type Error = BackendRejected;

    fn lookup(
        &self,
        field: &str,
        lookup: Lookup,
        value: &Value,
    ) -> Result<DocumentPredicate, BackendRejected> {
        self.check_field(field)?;
        Ok(DocumentPredicate::Field(FieldPredicate::new(field, lookup, value)?))
    }

    fn and(&self, predicates: Vec<DocumentPredicate>) -> DocumentPredicate {
        DocumentPredicate::And(predicates)
    }

    fn or(&self, predicates: Vec<DocumentPredicate>) -> DocumentPredicate {
        DocumentPredicate::Or(predicates)
    }

    fn not(&self, predicate: DocumentPredicate) -> DocumentPredicate {
        DocumentPredicate::Not(Box::new(predicate))
    }

    fn filter(
        &self,
        mut query: DocumentQuery,
        predicate: DocumentPredicate,
    ) -> Result<DocumentQuery, BackendRejected> {
        query.predicate = Some(match query.predicate.take() {
            Some(existing) => DocumentPredicate::And(vec![existing, predicate]),
            None => predicate,
        });
        Ok(query)
    }

    fn order_by(
        &self,
        mut query: DocumentQuery,
        orders: &[Order],
    ) -> Result<DocumentQuery, BackendRejected> {
        for order in orders {
            self.check_field(&order.field)?;
        }
        query.orders = orders.to_vec();
        Ok(query)
    }

    fn project(
        &self,
        mut query: DocumentQuery,
        fields: &[String],
    ) -> Result<DocumentQuery, BackendRejected> {
        for field in fields {
            self.check_field(field)?;
        }
        query.projection = Some(fields.to_vec());
        Ok(query)
    }

    fn skip(&self, mut query: DocumentQuery, offset: u64) -> DocumentQuery {
        query.skip = offset;
        query
    }

    fn take(&self, mut query: DocumentQuery, limit: u64) -> DocumentQuery {
        query.take = Some(limit);
        query
    }

    fn count(&self, query: DocumentQuery) -> Result<DocumentCountQuery, BackendRejected> {
        Ok(DocumentCountQuery {
            predicate: query.predicate,
        })
    }

    fn annotate(&self, mut query: DocumentQuery, options: &CriteriaOptions) -> DocumentQuery {
        query.options = options.clone();
        query
    }
}
