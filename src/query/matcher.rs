//! Evaluation of a parsed query against a single document.

use serde_json::Value;

use super::ast::{Comparison, ComparisonOp, Query};
use crate::models::{numeric_value, render_value, Document};

/// True when every comparison of `query` holds for `doc`.
pub fn matches(query: &Query, doc: &Document) -> bool {
    query.iter().all(|cmp| matches_comparison(cmp, doc))
}

/// Evaluate one comparison; a path that does not resolve never matches.
pub fn matches_comparison(cmp: &Comparison, doc: &Document) -> bool {
    let Some(value) = resolve_path(doc, &cmp.key) else {
        return false;
    };

    match cmp.op {
        // Compound values are not indexed and never satisfy equality
        ComparisonOp::Eq => match value {
            Value::Array(_) | Value::Object(_) => false,
            _ => render_value(value) == cmp.value,
        },
        ComparisonOp::Gt | ComparisonOp::Lt => {
            let Ok(right) = cmp.value.parse::<f64>() else {
                return false;
            };
            let Some(left) = numeric_value(value) else {
                return false;
            };
            if cmp.op == ComparisonOp::Gt {
                left > right
            } else {
                left < right
            }
        }
    }
}

/// Walk `segments` through nested objects of `doc`.
pub fn resolve_path<'a, S: AsRef<str>>(doc: &'a Document, segments: &[S]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = doc.get(first.as_ref())?;
    for segment in rest {
        current = current.as_object()?.get(segment.as_ref())?;
    }
    Some(current)
}
