//! Parser for the filter language
//!
//! # Grammar
//!
//! ```text
//! query      := ws* (comparison (ws+ comparison)*)? ws*
//! comparison := operand ':' op? operand
//! op         := '>' | '<'
//! operand    := bareword | quoted
//! bareword   := (letter | digit | '.')+
//! quoted     := '"' any-char-except-quote* '"'
//! ```
//!
//! Bareword keys are split on `.` into path segments; a quoted key is a
//! single segment. Comparisons are implicitly AND-ed.

use super::ast::{Comparison, ComparisonOp, Query};
use super::lexer::{Lexer, Operand};
use crate::error::DocdbError;
use crate::index::PATH_SEPARATOR;
use crate::Result;

/// Parser for filter query strings
pub struct QueryParser {
    lexer: Lexer,
}

impl QueryParser {
    pub fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::new(input),
        }
    }

    /// Parse a complete query string
    pub fn parse_str(input: &str) -> Result<Query> {
        Self::new(input).parse()
    }

    pub fn parse(&mut self) -> Result<Query> {
        let mut comparisons = Vec::new();

        loop {
            self.lexer.skip_whitespace();
            if self.lexer.is_eof() {
                break;
            }
            comparisons.push(self.parse_comparison()?);

            if !self.lexer.is_eof() && !self.lexer.at_whitespace() {
                return Err(DocdbError::QueryParse(format!(
                    "expected whitespace between comparisons at position {}, found `{}`",
                    self.lexer.position(),
                    self.lexer.remaining()
                )));
            }
        }

        Ok(Query::new(comparisons))
    }

    fn parse_comparison(&mut self) -> Result<Comparison> {
        let key = self
            .lexer
            .read_operand()
            .map_err(|e| Self::context("expected valid key", e))?;
        let key = Self::key_segments(key);

        if !self.lexer.eat(':') {
            return Err(DocdbError::QueryParse(format!(
                "expected ':' at position {}, found `{}`",
                self.lexer.position(),
                self.lexer.remaining()
            )));
        }

        let op = if self.lexer.eat('>') {
            ComparisonOp::Gt
        } else if self.lexer.eat('<') {
            ComparisonOp::Lt
        } else {
            ComparisonOp::Eq
        };

        let value = self
            .lexer
            .read_operand()
            .map_err(|e| Self::context("expected valid value", e))?;

        Ok(Comparison::new(key, value.into_text(), op))
    }

    fn key_segments(key: Operand) -> Vec<String> {
        match key {
            Operand::Bareword(word) => word.split(PATH_SEPARATOR).map(str::to_string).collect(),
            Operand::Quoted(text) => vec![text],
        }
    }

    fn context(what: &str, err: DocdbError) -> DocdbError {
        match err {
            DocdbError::QueryParse(msg) => DocdbError::QueryParse(format!("{}: {}", what, msg)),
            other => other,
        }
    }
}

/// Parse a query string
pub fn parse_query(input: &str) -> Result<Query> {
    QueryParser::parse_str(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(key: &[&str], value: &str, op: ComparisonOp) -> Comparison {
        Comparison::new(key.iter().map(|s| s.to_string()).collect(), value, op)
    }

    #[test]
    fn test_empty_query() {
        assert!(parse_query("").unwrap().is_empty());
        assert!(parse_query("   \t ").unwrap().is_empty());
    }

    #[test]
    fn test_equality_and_range() {
        let query = parse_query("a:1 b:>2").unwrap();
        assert_eq!(
            query.comparisons(),
            &[
                cmp(&["a"], "1", ComparisonOp::Eq),
                cmp(&["b"], "2", ComparisonOp::Gt),
            ]
        );
    }

    #[test]
    fn test_less_than() {
        let query = parse_query("b:fifteen a:<3").unwrap();
        assert_eq!(query.comparisons()[1], cmp(&["a"], "3", ComparisonOp::Lt));
    }

    #[test]
    fn test_nested_key() {
        let query = parse_query("a.b:12").unwrap();
        assert_eq!(query.comparisons(), &[cmp(&["a", "b"], "12", ComparisonOp::Eq)]);
    }

    #[test]
    fn test_quoted_key_and_value() {
        let query = parse_query(r#""a key":"a value""#).unwrap();
        assert_eq!(query.comparisons(), &[cmp(&["a key"], "a value", ComparisonOp::Eq)]);

        let query = parse_query(r#"title:"Which way?""#).unwrap();
        assert_eq!(query.comparisons()[0].value, "Which way?");

        let query = parse_query(r#"" flubber ":"blubber ""#).unwrap();
        assert_eq!(
            query.comparisons(),
            &[cmp(&[" flubber "], "blubber ", ComparisonOp::Eq)]
        );
    }

    #[test]
    fn test_quoted_key_is_not_split() {
        let query = parse_query(r#""a.b":1"#).unwrap();
        assert_eq!(query.comparisons()[0].key, vec!["a.b".to_string()]);
    }

    #[test]
    fn test_quoted_range_value() {
        let query = parse_query(r#"temp:>"-3.5""#).unwrap();
        assert_eq!(query.comparisons(), &[cmp(&["temp"], "-3.5", ComparisonOp::Gt)]);
    }

    #[test]
    fn test_empty_quoted_value() {
        let query = parse_query(r#"name:"""#).unwrap();
        assert_eq!(query.comparisons()[0].value, "");
    }

    #[test]
    fn test_surrounding_whitespace() {
        let query = parse_query("  a:1   b:2  ").unwrap();
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn test_missing_colon() {
        let err = parse_query("a1").unwrap_err();
        assert!(matches!(err, DocdbError::QueryParse(_)));
        assert!(err.to_string().contains("expected ':'"));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse_query(r#""unterminated"#).unwrap_err();
        assert!(err.to_string().contains("unterminated"));

        let err = parse_query(r#"a:"open"#).unwrap_err();
        assert!(err.to_string().contains("expected valid value"));
    }

    #[test]
    fn test_invalid_key() {
        let err = parse_query(":1").unwrap_err();
        assert!(err.to_string().contains("expected valid key"));
    }

    #[test]
    fn test_missing_value() {
        assert!(parse_query("a:").is_err());
        assert!(parse_query("a:>").is_err());
        assert!(parse_query("a: 1").is_err());
    }

    #[test]
    fn test_comparisons_need_separator() {
        let err = parse_query(r#"a:"x"b:2"#).unwrap_err();
        assert!(err.to_string().contains("expected whitespace"));
        assert!(parse_query("a:1,b:2").is_err());
    }
}
