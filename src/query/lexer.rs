//! Lexer for the filter language
//!
//! Reads barewords (runs of letters, digits and `.`) and double-quoted strings
//! (verbatim, no escapes), plus the single-character separators the parser
//! asks for. Whitespace is only skipped when the parser says so, since it is
//! significant between comparisons.

use crate::error::DocdbError;
use crate::Result;

/// A key or value operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Unquoted run of letters, digits and dots
    Bareword(String),
    /// Text between a pair of double quotes
    Quoted(String),
}

impl Operand {
    pub fn text(&self) -> &str {
        match self {
            Operand::Bareword(s) | Operand::Quoted(s) => s,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Operand::Bareword(s) | Operand::Quoted(s) => s,
        }
    }
}

/// Cursor over a query string
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Read a bareword or quoted operand at the current position
    pub fn read_operand(&mut self) -> Result<Operand> {
        match self.current_char() {
            None => Err(DocdbError::QueryParse(format!(
                "unexpected end of input at position {}",
                self.position
            ))),
            Some('"') => {
                self.advance();
                self.read_quoted_string()
            }
            Some(ch) if Self::is_bareword_char(ch) => Ok(self.read_bareword()),
            Some(ch) => Err(DocdbError::QueryParse(format!(
                "unexpected character '{}' at position {}",
                ch, self.position
            ))),
        }
    }

    fn read_bareword(&mut self) -> Operand {
        let mut word = String::new();
        while let Some(ch) = self.current_char() {
            if !Self::is_bareword_char(ch) {
                break;
            }
            word.push(ch);
            self.advance();
        }
        Operand::Bareword(word)
    }

    fn read_quoted_string(&mut self) -> Result<Operand> {
        let start = self.position - 1;
        let mut s = String::new();

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == '"' {
                return Ok(Operand::Quoted(s));
            }
            s.push(ch);
        }

        Err(DocdbError::QueryParse(format!(
            "unterminated quoted string starting at position {}",
            start
        )))
    }

    /// Consume `expected` if it is the current character
    pub fn eat(&mut self, expected: char) -> bool {
        if self.current_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    pub fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn at_whitespace(&self) -> bool {
        self.current_char().is_some_and(char::is_whitespace)
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Remaining input, for error messages
    pub fn remaining(&self) -> String {
        self.input[self.position.min(self.input.len())..]
            .iter()
            .collect()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Letters and digits in the `char::is_alphanumeric` sense, which also
    /// admits letter-numbers and other numerics such as `²` and `Ⅻ`.
    fn is_bareword_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '.'
    }
}
