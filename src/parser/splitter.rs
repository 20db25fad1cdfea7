//! Shell-style line splitter
//!
//! Splits a command line into word and operator tokens. Words keep their
//! quoting; only unquoted whitespace and shell operators separate them, so
//! `foo"bar baz"` is a single word. Operators are matched greedily, and a
//! run of digits directly in front of `>` or `<` is part of the operator
//! when it stands at the start of a word (`2>&1`, `0<file`).
//!
//! The free functions use the default quote characters; a [`Scanner`]
//! built from the session's [`ShellSyntax`](super::ShellSyntax) splits with
//! the configured ones.

use super::scanner::{QuoteTracker, Scanner, Step, char_at};
use super::syntax::{OPERATOR_CHARACTERS, WHITESPACE};
use super::token::Token;

/// The `'\''` idiom seen from its first quote: close, escaped quote, reopen
const SINGLE_QUOTE_IDIOM_TAIL: &str = "\\''";

/// Split `line` into tokens with the default quote characters
///
/// Never fails. An unterminated quoted span extends to the end of the line
/// and becomes part of the last word.
pub fn split(line: &str) -> Vec<Token> {
    Scanner::default().split(line)
}

/// [`Scanner::closequote`] with the default quote characters
pub fn closequote(tokens: Vec<Token>) -> Vec<Token> {
    Scanner::default().closequote(tokens)
}

/// Split tokens at the first operator
///
/// # Returns
/// * `(&[Token], &[Token])` - Tokens before the operator, and the operator
///   with everything after it
pub fn splitpipe(tokens: &[Token]) -> (&[Token], &[Token]) {
    let at = tokens
        .iter()
        .position(Token::is_operator)
        .unwrap_or(tokens.len());
    tokens.split_at(at)
}

impl Scanner<'_> {
    /// Split `line` into tokens
    pub fn split(&self, line: &str) -> Vec<Token> {
        Splitter::new(line, *self).run()
    }

    /// Close an unterminated quote in the last token
    ///
    /// If the last token is a word that ends inside an open quoted span, the
    /// matching quote character is appended to its text. This includes a
    /// span ending in a dangling backslash. Offsets are left alone.
    pub fn closequote(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        if let Some(last) = tokens.last_mut()
            && last.is_word()
        {
            let mut tracker = QuoteTracker::default();
            for c in last.text.chars() {
                tracker.step(c, self.quote_characters());
            }
            if let Some(q) = tracker.quote() {
                last.text.push(q);
            }
        }
        tokens
    }
}

struct Splitter<'a> {
    line: &'a str,
    scanner: Scanner<'a>,
    pos: usize,
    word_start: Option<usize>,
    tracker: QuoteTracker,
    tokens: Vec<Token>,
}

impl<'a> Splitter<'a> {
    fn new(line: &'a str, scanner: Scanner<'a>) -> Self {
        Self {
            line,
            scanner,
            pos: 0,
            word_start: None,
            tracker: QuoteTracker::default(),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = char_at(self.line, self.pos) {
            let next = self.pos + c.len_utf8();

            if self.tracker.quote() == Some('\'')
                && c == '\''
                && self.line[next..].starts_with(SINGLE_QUOTE_IDIOM_TAIL)
            {
                self.pos = next + SINGLE_QUOTE_IDIOM_TAIL.len();
                continue;
            }

            if self.tracker.step(c, self.scanner.quote_characters()) != Step::Unquoted {
                self.word_start.get_or_insert(self.pos);
                self.pos = next;
                continue;
            }

            if WHITESPACE.contains(c) {
                self.finish_word();
                self.pos = next;
            } else if OPERATOR_CHARACTERS.contains(c) {
                let end = operator_end(self.line.as_bytes(), self.pos);
                self.push_operator(end);
            } else if let Some(end) = self.descriptor_operator(c) {
                self.push_operator(end);
            } else {
                self.word_start.get_or_insert(self.pos);
                self.pos = next;
            }
        }
        self.finish_word();
        self.tokens
    }

    fn finish_word(&mut self) {
        if let Some(start) = self.word_start.take() {
            self.tokens.push(Token::word(self.line, start, self.pos));
        }
    }

    fn push_operator(&mut self, end: usize) {
        self.finish_word();
        self.tokens.push(Token::operator(self.line, self.pos, end));
        self.pos = end;
    }

    /// End of a descriptor-prefixed redirection starting at the current digit
    fn descriptor_operator(&self, c: char) -> Option<usize> {
        if !c.is_ascii_digit() || !self.follows_word_break() {
            return None;
        }
        let bytes = self.line.as_bytes();
        let after_digits = skip_digits(bytes, self.pos);
        match bytes.get(after_digits) {
            Some(b'>') => Some(output_tail(bytes, after_digits + 1)),
            Some(b'<') => Some(input_tail(bytes, after_digits + 1)),
            _ => None,
        }
    }

    /// A descriptor must start the line or follow an unescaped word break
    fn follows_word_break(&self) -> bool {
        let Some(prev) = self.line[..self.pos].chars().next_back() else {
            return true;
        };
        let breaks = WHITESPACE.contains(prev)
            || self.scanner.quote_characters().contains(prev)
            || OPERATOR_CHARACTERS.contains(prev);
        breaks && !self.scanner.char_is_quoted(self.line, self.pos - prev.len_utf8())
    }
}

fn skip_digits(bytes: &[u8], mut at: usize) -> usize {
    while bytes.get(at).is_some_and(u8::is_ascii_digit) {
        at += 1;
    }
    at
}

/// End of the operator whose first character is at `at`
fn operator_end(bytes: &[u8], at: usize) -> usize {
    match bytes[at] {
        b'&' if bytes.get(at + 1) == Some(&b'>') => at + 2,
        b'>' => output_tail(bytes, at + 1),
        b'<' => input_tail(bytes, at + 1),
        _ => at + 1,
    }
}

/// `>`, `>>`, `>|`, `>&N`, `>&N-`, `>&-`
fn output_tail(bytes: &[u8], at: usize) -> usize {
    match bytes.get(at) {
        Some(b'&') => duplicate_tail(bytes, at + 1),
        Some(b'>') | Some(b'|') => at + 1,
        _ => at,
    }
}

/// `<`, `<>`, `<<`, `<<-`, `<<<`, `<&N`, `<&N-`, `<&-`
fn input_tail(bytes: &[u8], at: usize) -> usize {
    match bytes.get(at) {
        Some(b'&') => duplicate_tail(bytes, at + 1),
        Some(b'>') => at + 1,
        Some(b'<') => match bytes.get(at + 1) {
            Some(b'<') | Some(b'-') => at + 2,
            _ => at + 1,
        },
        _ => at,
    }
}

fn duplicate_tail(bytes: &[u8], at: usize) -> usize {
    let end = skip_digits(bytes, at);
    if bytes.get(end) == Some(&b'-') {
        end + 1
    } else {
        end
    }
}
