//! Path-value indexing: document flattening and the inverted index built on it.

pub mod flatten;
pub mod path_index;

pub use flatten::{flatten, path_value_key, PATH_SEPARATOR, VALUE_SEPARATOR};
pub use path_index::{IdSet, PathIndex};
