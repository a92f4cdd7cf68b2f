//! Document flattening into `path=value` strings.
//!
//! Given `{"a": {"b": 4, "d": 100}, "c": 8, "tags": ["x"]}` the flattener
//! produces `a.b=4`, `a.d=100` and `c=8`. Nested objects contribute only
//! their descendants, arrays contribute nothing.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::models::{render_value, Document};

/// Separator between path segments in index keys
pub const PATH_SEPARATOR: char = '.';

/// Separator between the path and the rendered value in index keys
pub const VALUE_SEPARATOR: char = '=';

/// Flatten a document into its set of path-values.
pub fn flatten(doc: &Document) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    flatten_into(doc, "", &mut out);
    out
}

fn flatten_into(obj: &Document, prefix: &str, out: &mut BTreeSet<String>) {
    for (key, value) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", prefix, PATH_SEPARATOR, key)
        };

        match value {
            Value::Object(nested) => flatten_into(nested, &path, out),
            Value::Array(_) => continue,
            scalar => {
                out.insert(format!("{}{}{}", path, VALUE_SEPARATOR, render_value(scalar)));
            }
        }
    }
}

/// Build the index key for a query path and value.
pub fn path_value_key<S: AsRef<str>>(segments: &[S], value: &str) -> String {
    let mut key = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            key.push(PATH_SEPARATOR);
        }
        key.push_str(segment.as_ref());
    }
    key.push(VALUE_SEPARATOR);
    key.push_str(value);
    key
}
