//! Filter language: a simplified Lucene-style query string.
//!
//! Supports syntax like:
//! - `a:1` (equality)
//! - `a.b:12` (nested path)
//! - `price:>10 price:<20` (range, implicitly AND-ed)
//! - `title:"Which way?"` and `"a key":tenant` (quoted operands)
//!
//! # Example
//!
//! ```rust
//! use docdb::query::parse_query;
//!
//! let query = parse_query("a.b:4 c:>3").unwrap();
//! assert_eq!(query.len(), 2);
//! ```

pub mod ast;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod planner;

pub use ast::{Comparison, ComparisonOp, Query};
pub use lexer::{Lexer, Operand};
pub use matcher::{matches, resolve_path};
pub use parser::{parse_query, QueryParser};
pub use planner::QueryPlan;
