//! Query planning: split a query into index-resolvable equality predicates
//! and range predicates that only the matcher can evaluate.

use super::ast::{Comparison, Query};

/// Execution plan for one query
#[derive(Debug)]
pub struct QueryPlan<'a> {
    query: &'a Query,
    /// Equality predicates with the index key each one looks up
    equality: Vec<(&'a Comparison, String)>,
    range: Vec<&'a Comparison>,
}

impl<'a> QueryPlan<'a> {
    pub fn new(query: &'a Query) -> Self {
        let mut equality = Vec::new();
        let mut range = Vec::new();

        for cmp in query {
            if cmp.is_equality() {
                equality.push((cmp, cmp.path_value()));
            } else {
                range.push(cmp);
            }
        }

        Self {
            query,
            equality,
            range,
        }
    }

    pub fn query(&self) -> &'a Query {
        self.query
    }

    pub fn equality_count(&self) -> usize {
        self.equality.len()
    }

    pub fn has_range(&self) -> bool {
        !self.range.is_empty()
    }

    /// Index keys of the equality predicates, in query order
    pub fn path_values(&self) -> impl Iterator<Item = &str> {
        self.equality.iter().map(|(_, pv)| pv.as_str())
    }

    pub fn range_predicates(&self) -> &[&'a Comparison] {
        &self.range
    }

    /// Whether the index can narrow the candidate set at all
    pub fn can_use_index(&self) -> bool {
        !self.equality.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_query;

    #[test]
    fn test_partition() {
        let query = parse_query("a:1 b:>2 c.d:x e:<9").unwrap();
        let plan = QueryPlan::new(&query);

        assert_eq!(plan.equality_count(), 2);
        assert!(plan.has_range());
        assert!(plan.can_use_index());
        assert_eq!(plan.path_values().collect::<Vec<_>>(), vec!["a=1", "c.d=x"]);
        assert_eq!(plan.range_predicates().len(), 2);
        assert_eq!(plan.query().len(), 4);
    }

    #[test]
    fn test_pure_range_cannot_use_index() {
        let query = parse_query("a:>1").unwrap();
        let plan = QueryPlan::new(&query);
        assert!(!plan.can_use_index());
        assert!(plan.has_range());
    }

    #[test]
    fn test_empty_query_plan() {
        let query = parse_query("").unwrap();
        let plan = QueryPlan::new(&query);
        assert_eq!(plan.equality_count(), 0);
        assert!(!plan.has_range());
    }
}
