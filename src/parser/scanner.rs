//! Quote-aware character scanner
//!
//! Every query walks the line from the start, tracking whether the current
//! position is inside a single- or double-quoted span or escaped by a
//! backslash. Nothing is cached between calls; lines are short and the
//! walk is linear.
//!
//! All offsets are byte offsets. The characters the scanner reacts to are
//! ASCII, so an offset it reports always lies on a character boundary.
//! Offsets past the end of the line are clamped.

use super::syntax::{QUOTE_CHARACTERS, ShellSyntax};

/// Quoting context at a position in the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteState {
    /// Outside any quoted span
    Unquoted,
    /// Inside a double-quoted span
    InDouble,
    /// Inside a single-quoted span
    InSingle,
    /// The next character is escaped by a backslash
    Escaped,
}

/// What a single character did to the quoting context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Consumed by a preceding backslash
    Escaped,
    /// An active backslash
    Backslash,
    /// Opened a quoted span
    Opened,
    /// Closed the current quoted span
    Closed,
    /// Literal content of a quoted span
    Quoted,
    /// Ordinary unquoted character
    Unquoted,
}

/// Left-to-right quote state machine
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct QuoteTracker {
    quote: Option<char>,
    skip_next: bool,
}

impl QuoteTracker {
    /// Feed one character and report its role.
    ///
    /// A backslash is active everywhere except inside single quotes.
    pub(crate) fn step(&mut self, c: char, quote_characters: &str) -> Step {
        if self.skip_next {
            self.skip_next = false;
            return Step::Escaped;
        }
        if self.quote != Some('\'') && c == '\\' {
            self.skip_next = true;
            return Step::Backslash;
        }
        match self.quote {
            Some(q) if c == q => {
                self.quote = None;
                Step::Closed
            }
            Some(_) => Step::Quoted,
            None if quote_characters.contains(c) => {
                self.quote = Some(c);
                Step::Opened
            }
            None => Step::Unquoted,
        }
    }

    pub(crate) fn quote(&self) -> Option<char> {
        self.quote
    }

    pub(crate) fn state(&self) -> QuoteState {
        if self.skip_next {
            return QuoteState::Escaped;
        }
        match self.quote {
            Some('\'') => QuoteState::InSingle,
            Some(_) => QuoteState::InDouble,
            None => QuoteState::Unquoted,
        }
    }
}

/// Bounds-checked character lookahead.
///
/// Returns `None` past the end of the line or when `index` does not fall on
/// a character boundary, so callers can look ahead without range checks.
pub fn char_at(line: &str, index: usize) -> Option<char> {
    line.get(index..)?.chars().next()
}

/// Clamp `index` into the line and back onto a character boundary
fn clamp(line: &str, index: usize) -> usize {
    let mut end = index.min(line.len());
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Quote scanner bound to a set of quote characters
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    quote_characters: &'a str,
}

impl Default for Scanner<'static> {
    fn default() -> Self {
        Self::new(QUOTE_CHARACTERS)
    }
}

impl<'a> Scanner<'a> {
    pub fn new(quote_characters: &'a str) -> Self {
        Self { quote_characters }
    }

    /// Scanner bound to the quote characters of `syntax`
    pub fn for_syntax(syntax: &'a ShellSyntax) -> Self {
        Self::new(syntax.quote_characters())
    }

    pub fn quote_characters(&self) -> &'a str {
        self.quote_characters
    }

    /// Quoting context reached after scanning `line[..index]`
    pub fn quote_state(&self, line: &str, index: usize) -> QuoteState {
        let end = clamp(line, index);
        let mut tracker = QuoteTracker::default();
        for c in line[..end].chars() {
            tracker.step(c, self.quote_characters);
        }
        tracker.state()
    }

    /// Check whether the character at `index` is quoted
    ///
    /// A character is quoted when it lies inside an open quoted span or
    /// directly follows an active backslash. The closing quote of a span is
    /// not quoted. Indexing one past the end asks whether the line ends
    /// inside open quoting.
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `index` - Byte offset of the character to test
    ///
    /// # Returns
    /// * `bool` - True if the character is quoted or escaped
    pub fn char_is_quoted(&self, line: &str, index: usize) -> bool {
        let end = clamp(line, index);
        let mut tracker = QuoteTracker::default();
        for (i, c) in line[..end].char_indices() {
            if tracker.step(c, self.quote_characters) == Step::Backslash && i + 1 == end {
                return true;
            }
        }
        match tracker.quote() {
            Some(q) => char_at(line, end) != Some(q),
            None => false,
        }
    }

    /// Find the first unquoted character from `chars` before `end`
    ///
    /// Quote characters are tracked but never reported.
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `end` - Exclusive byte offset where scanning stops
    /// * `chars` - Set of characters to look for
    ///
    /// # Returns
    /// * `Option<usize>` - Byte offset of the first match
    pub fn find_unquoted(&self, line: &str, end: usize, chars: &str) -> Option<usize> {
        let end = clamp(line, end);
        let mut tracker = QuoteTracker::default();
        line[..end].char_indices().find_map(|(i, c)| {
            let step = tracker.step(c, self.quote_characters);
            (step == Step::Unquoted && chars.contains(c)).then_some(i)
        })
    }

    /// Find the last unquoted character from `chars` before `end`
    ///
    /// The line is still scanned from the start; walking backwards cannot
    /// know whether a character sits inside a quoted span.
    pub fn find_unquoted_reverse(&self, line: &str, end: usize, chars: &str) -> Option<usize> {
        let end = clamp(line, end);
        let mut tracker = QuoteTracker::default();
        let mut found = None;
        for (i, c) in line[..end].char_indices() {
            if tracker.step(c, self.quote_characters) == Step::Unquoted && chars.contains(c) {
                found = Some(i);
            }
        }
        found
    }
}

/// [`Scanner::quote_state`] with the default quote characters
pub fn quote_state(line: &str, index: usize) -> QuoteState {
    Scanner::default().quote_state(line, index)
}

/// [`Scanner::char_is_quoted`] with the default quote characters
pub fn char_is_quoted(line: &str, index: usize) -> bool {
    Scanner::default().char_is_quoted(line, index)
}

/// [`Scanner::find_unquoted`] with the default quote characters
pub fn find_unquoted(line: &str, end: usize, chars: &str) -> Option<usize> {
    Scanner::default().find_unquoted(line, end, chars)
}

/// [`Scanner::find_unquoted_reverse`] with the default quote characters
pub fn find_unquoted_reverse(line: &str, end: usize, chars: &str) -> Option<usize> {
    Scanner::default().find_unquoted_reverse(line, end, chars)
}
