//! Query translator
//!
//! Lowers a `Criteria` into a backend-native query handle:
//!
//! 1. Fold and lower the filter tree. Direct operators map one-to-one onto
//!    backend lookups; `ne`/`nin` become the complement of `eq`/`in`;
//!    AND/OR recurse and use the backend combinators.
//! 2. Apply sort keys in precedence order.
//! 3. Apply the projection, if any.
//! 4. Skip `offset`, then take `limit`.
//!
//! Counting lowers the same predicate from a fresh criteria carrying only
//! filters, orders and options, so the window never affects the count.
//! Backend errors are returned exactly as the backend produced them.

use crate::criteria::{Criteria, Filter, FilterOperator};

use super::backend::QueryBackend;

/// Translates criteria for one backend
pub struct QueryTranslator<'a, B: QueryBackend> {
    backend: &'a B,
}

impl<'a, B: QueryBackend> QueryTranslator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Build the fetch query for `criteria` on top of `collection`
    pub fn translate_for_fetch(
        &self,
        criteria: &Criteria,
        collection: B::Query,
    ) -> Result<B::Query, B::Error> {
        tracing::debug!(
            filters = criteria.filters().len(),
            orders = criteria.orders().len(),
            limit = ?criteria.limit(),
            offset = ?criteria.offset(),
            projected = criteria.has_projection(),
            comment = ?criteria.options().comment,
            "translating criteria for fetch"
        );

        let mut query = self.apply_filter(criteria, collection)?;

        if criteria.has_orders() {
            query = self.rejected(self.backend.order_by(query, criteria.orders()))?;
        }

        if let Some(projection) = criteria.projection() {
            query = self.rejected(self.backend.project(query, projection.fields()))?;
        }

        if let Some(offset) = criteria.offset() {
            query = self.backend.skip(query, offset);
        }
        if let Some(limit) = criteria.limit() {
            query = self.backend.take(query, limit);
        }

        Ok(self.backend.annotate(query, criteria.options()))
    }

    /// Build the count query for `criteria` on top of `collection`.
    ///
    /// Only the predicate is applied; limit, offset and projection are
    /// dropped and sort keys are irrelevant to a count.
    pub fn translate_for_count(
        &self,
        criteria: &Criteria,
        collection: B::Query,
    ) -> Result<B::CountQuery, B::Error> {
        let criteria = criteria.for_count();
        tracing::debug!(
            filters = criteria.filters().len(),
            comment = ?criteria.options().comment,
            "translating criteria for count"
        );

        let query = self.apply_filter(&criteria, collection)?;
        let query = self.backend.annotate(query, criteria.options());
        self.rejected(self.backend.count(query))
    }

    /// Lower one filter tree to a native predicate
    pub fn lower(&self, filter: &Filter) -> Result<B::Predicate, B::Error> {
        match filter {
            Filter::Leaf(leaf) => {
                let predicate =
                    self.rejected(self.backend.lookup(leaf.field(), leaf.lookup(), leaf.value()))?;
                if leaf.is_negated() {
                    Ok(self.backend.not(predicate))
                } else {
                    Ok(predicate)
                }
            }
            Filter::Composite(composite) => {
                let children = composite
                    .children()
                    .iter()
                    .map(|child| self.lower(child))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(match composite.operator() {
                    FilterOperator::Or => self.backend.or(children),
                    _ => self.backend.and(children),
                })
            }
        }
    }

    fn apply_filter(&self, criteria: &Criteria, query: B::Query) -> Result<B::Query, B::Error> {
        match criteria.filter() {
            Some(root) => {
                let predicate = self.lower(root)?;
                self.rejected(self.backend.filter(query, predicate))
            }
            None => Ok(query),
        }
    }

    fn rejected<T>(&self, result: Result<T, B::Error>) -> Result<T, B::Error> {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "backend rejected translated criteria");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{Lookup, Order, Projection};
    use serde_json::{json, Value};

    /// Backend rendering everything as strings, for asserting on shape
    struct RecordingBackend;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Recorded {
        steps: Vec<String>,
    }

    impl Recorded {
        fn with(mut self, step: String) -> Self {
            self.steps.push(step);
            self
        }
    }

    impl QueryBackend for RecordingBackend {
        type Predicate = String;
        type Query = Recorded;
        type CountQuery = Recorded;
        type Error = String;

        fn lookup(&self, field: &str, lookup: Lookup, value: &Value) -> Result<String, String> {
            if field == "forbidden" {
                return Err(format!("unknown field {}", field));
            }
            Ok(format!("{}({}, {})", lookup, field, value))
        }

        fn and(&self, predicates: Vec<String>) -> String {
            format!("and[{}]", predicates.join(", "))
        }

        fn or(&self, predicates: Vec<String>) -> String {
            format!("or[{}]", predicates.join(", "))
        }

        fn not(&self, predicate: String) -> String {
            format!("not({})", predicate)
        }

        fn filter(&self, query: Recorded, predicate: String) -> Result<Recorded, String> {
            Ok(query.with(format!("filter {}", predicate)))
        }

        fn order_by(&self, query: Recorded, orders: &[Order]) -> Result<Recorded, String> {
            let keys: Vec<String> = orders.iter().map(Order::to_signed).collect();
            Ok(query.with(format!("order {}", keys.join(","))))
        }

        fn project(&self, query: Recorded, fields: &[String]) -> Result<Recorded, String> {
            Ok(query.with(format!("project {}", fields.join(","))))
        }

        fn skip(&self, query: Recorded, offset: u64) -> Recorded {
            query.with(format!("skip {}", offset))
        }

        fn take(&self, query: Recorded, limit: u64) -> Recorded {
            query.with(format!("take {}", limit))
        }

        fn count(&self, query: Recorded) -> Result<Recorded, String> {
            Ok(query.with("count".to_string()))
        }
    }

    fn fetch(criteria: &Criteria) -> Vec<String> {
        QueryTranslator::new(&RecordingBackend)
            .translate_for_fetch(criteria, Recorded::default())
            .unwrap()
            .steps
    }

    #[test]
    fn test_match_all_is_untouched() {
        assert!(fetch(&Criteria::match_all()).is_empty());
    }

    #[test]
    fn test_negation_lowers_to_complement() {
        let translator = QueryTranslator::new(&RecordingBackend);
        assert_eq!(
            translator.lower(&Filter::ne("status", "X")).unwrap(),
            format!("not({})", translator.lower(&Filter::eq("status", "X")).unwrap())
        );
        assert_eq!(
            translator.lower(&Filter::not_in("role", vec![json!("a")])).unwrap(),
            r#"not(in(role, ["a"]))"#
        );
    }

    #[test]
    fn test_composites_recurse() {
        let filter = Filter::and(vec![
            Filter::eq("status", "active"),
            Filter::or(vec![Filter::icontains("name", "jo"), Filter::ne("email", "x")]).unwrap(),
        ])
        .unwrap();

        assert_eq!(
            QueryTranslator::new(&RecordingBackend).lower(&filter).unwrap(),
            r#"and[eq(status, "active"), or[icontains(name, "jo"), not(eq(email, "x"))]]"#
        );
    }

    #[test]
    fn test_fetch_step_order() {
        let criteria = Criteria::builder()
            .add_filter(Filter::gt("age", 18))
            .add_order(Order::desc("a"))
            .add_order(Order::asc("b"))
            .set_projection(Projection::new(["a", "b"]).unwrap())
            .set_offset(20)
            .set_limit(10)
            .build();

        assert_eq!(
            fetch(&criteria),
            vec!["filter gt(age, 18)", "order -a,b", "project a,b", "skip 20", "take 10"]
        );
    }

    #[test]
    fn test_window_parts_are_independent() {
        let only_limit = Criteria::builder().set_limit(5).build();
        assert_eq!(fetch(&only_limit), vec!["take 5"]);

        let only_offset = Criteria::builder().set_offset(5).build();
        assert_eq!(fetch(&only_offset), vec!["skip 5"]);
    }

    #[test]
    fn test_count_drops_window_projection_and_orders() {
        let criteria = Criteria::builder()
            .add_filter(Filter::eq("status", "active"))
            .add_order(Order::desc("created_at"))
            .set_projection(Projection::new(["id"]).unwrap())
            .set_limit(10)
            .set_offset(20)
            .build();

        let counted = QueryTranslator::new(&RecordingBackend)
            .translate_for_count(&criteria, Recorded::default())
            .unwrap();
        assert_eq!(counted.steps, vec![r#"filter eq(status, "active")"#, "count"]);
    }

    #[test]
    fn test_backend_error_is_returned_verbatim() {
        let criteria = Criteria::builder()
            .add_filter(Filter::eq("forbidden", 1))
            .build();
        let err = QueryTranslator::new(&RecordingBackend)
            .translate_for_fetch(&criteria, Recorded::default())
            .unwrap_err();
        assert_eq!(err, "unknown field forbidden");
    }
}
