//! Parsed query representation.

use std::fmt;

use crate::index::path_value_key;
use crate::models::Document;

/// Comparison operator of a single query term
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// `key:value`
    Eq,
    /// `key:>value`
    Gt,
    /// `key:<value`
    Lt,
}

impl ComparisonOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
        }
    }

    pub fn is_range(&self) -> bool {
        !matches!(self, ComparisonOp::Eq)
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `key op value` term
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    /// Path segments, outermost first
    pub key: Vec<String>,
    pub value: String,
    pub op: ComparisonOp,
}

impl Comparison {
    pub fn new(key: Vec<String>, value: impl Into<String>, op: ComparisonOp) -> Self {
        Self {
            key,
            value: value.into(),
            op,
        }
    }

    pub fn is_equality(&self) -> bool {
        self.op == ComparisonOp::Eq
    }

    pub fn is_range(&self) -> bool {
        self.op.is_range()
    }

    /// Index key this comparison looks up, e.g. `a.b=4`
    pub fn path_value(&self) -> String {
        path_value_key(&self.key, &self.value)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.key.join("."), self.op, self.value)
    }
}

/// Implicit AND of comparisons. The empty query matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    comparisons: Vec<Comparison>,
}

impl Query {
    pub fn new(comparisons: Vec<Comparison>) -> Self {
        Self { comparisons }
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn len(&self) -> usize {
        self.comparisons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comparison> {
        self.comparisons.iter()
    }

    /// Evaluate the query against one document
    pub fn matches(&self, doc: &Document) -> bool {
        super::matcher::matches(self, doc)
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = &'a Comparison;
    type IntoIter = std::slice::Iter<'a, Comparison>;

    fn into_iter(self) -> Self::IntoIter {
        self.comparisons.iter()
    }
}
