//! Completion context definitions
//!
//! This module locates the word under the cursor and decides what kind of
//! candidates it takes, from the command at the start of the line and the
//! word's position relative to options, pipes and redirections.

use crate::parser::command::{self, CommandKind, CommandSpec, CompletionSource, OPTION_SOURCES};
use crate::parser::{QuoteState, Scanner, ShellSyntax, Word};

/// Shell escape and help characters that form a command of their own
const COMMAND_CHARS: &[char] = &['!', '.', '?'];

/// The word being completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionWord {
    /// Start of the word text, after an opening quote
    pub begin: usize,
    /// Cursor position
    pub end: usize,
    /// Start of the text the candidates replace; the opening quote if any
    pub span_start: usize,
    /// Quote character open at the cursor
    pub quote_char: Option<char>,
}

impl CompletionWord {
    /// Locate the word ending at `pos`
    ///
    /// Inside an open quote the word starts after the opening quote;
    /// otherwise after the last unquoted word-break character.
    pub fn locate(line: &str, pos: usize, syntax: &ShellSyntax) -> Self {
        let mut end = pos.min(line.len());
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        let scanner = Scanner::for_syntax(syntax);

        let quote_char = match scanner.quote_state(line, end) {
            QuoteState::InDouble => Some('"'),
            QuoteState::InSingle => Some('\''),
            QuoteState::Unquoted | QuoteState::Escaped => None,
        };
        if let Some(q) = quote_char
            && let Some(open) = opening_quote(&scanner, line, end, q)
        {
            return Self {
                begin: open + 1,
                end,
                span_start: open,
                quote_char,
            };
        }

        let mut begin = scanner
            .find_unquoted_reverse(line, end, syntax.word_break_characters())
            .map_or(0, |at| at + 1);
        let leading = line.len() - line.trim_start().len();
        if begin <= leading && end > leading && line[leading..end].starts_with(COMMAND_CHARS) {
            begin = leading + 1;
        }
        Self {
            begin,
            end,
            span_start: begin,
            quote_char: None,
        }
    }

    /// The raw text of the word
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.begin..self.end).unwrap_or_default()
    }
}

/// Offset of the quote `q` left open at `end`
fn opening_quote(scanner: &Scanner<'_>, line: &str, end: usize, q: char) -> Option<usize> {
    line[..end]
        .char_indices()
        .filter(|&(i, c)| c == q && scanner.quote_state(line, i) == QuoteState::Unquoted)
        .map(|(i, _)| i)
        .last()
}

/// Represents the type of completion needed based on the current context
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionContext {
    /// The command word itself
    CommandName,
    /// Options of a command
    Option { command: &'static CommandSpec },
    /// Files and directories
    Filename,
    /// Executables on `$PATH`
    SystemCommand,
    /// Key ids, user ids and names
    KeyId,
    /// Configured keyservers
    Keyserver,
    /// Help topics
    Topic,
    /// No completion available
    None,
}

impl From<CompletionSource> for CompletionContext {
    fn from(source: CompletionSource) -> Self {
        match source {
            CompletionSource::None => Self::None,
            CompletionSource::Filename => Self::Filename,
            CompletionSource::KeyId => Self::KeyId,
            CompletionSource::Keyserver => Self::Keyserver,
            CompletionSource::Command => Self::SystemCommand,
            CompletionSource::Topic => Self::Topic,
        }
    }
}

impl CompletionContext {
    /// Decide what the word at `word` completes to
    ///
    /// `syntax` must be the one `word` was located with.
    pub fn detect(line: &str, word: &CompletionWord, syntax: &ShellSyntax) -> Self {
        let leading = line.len() - line.trim_start().len();
        if word.begin <= leading {
            return Self::CommandName;
        }

        let (name, _) = command::split_command(line);
        let Some(spec) = command::resolve(name) else {
            return Self::None;
        };

        let word = Word::new(line, word.begin, word.end).with_syntax(syntax);
        if word.is_option() {
            return Self::Option { command: spec };
        }

        let options = spec.options();
        for (marker, source) in OPTION_SOURCES {
            if options.contains(marker) && word.follows(marker) {
                return (*source).into();
            }
        }

        if spec.kind == CommandKind::Shell
            && word.is_command_position()
            && !word.is_filename_like()
        {
            return Self::SystemCommand;
        }
        if word.is_pipe_position() {
            return if word.is_filename_like() {
                Self::Filename
            } else {
                Self::SystemCommand
            };
        }
        if word.is_post_redirect_position() {
            return Self::Filename;
        }
        spec.source.into()
    }
}
