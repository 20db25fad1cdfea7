//! Tokens produced by the line splitter

use std::fmt;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A shell word, quotes and backslashes still in place
    Word,
    /// A pipe, list separator or redirection operator
    Operator,
}

/// A slice of the command line
///
/// `text` is the raw text as typed. `start` and `end` are the half-open byte
/// range the token covers in the line. `text` only differs from
/// `line[start..end]` after [`closequote`](super::splitter::closequote) has
/// appended a missing closing quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(line: &str, start: usize, end: usize, kind: TokenKind) -> Self {
        Self {
            text: line[start..end].to_string(),
            start,
            end,
            kind,
        }
    }

    pub fn word(line: &str, start: usize, end: usize) -> Self {
        Self::new(line, start, end, TokenKind::Word)
    }

    pub fn operator(line: &str, start: usize, end: usize) -> Self {
        Self::new(line, start, end, TokenKind::Operator)
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    pub fn is_operator(&self) -> bool {
        self.kind == TokenKind::Operator
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}
