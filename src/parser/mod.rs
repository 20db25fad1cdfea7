//! Command line parser for gpgkeys
//!
//! This module turns a line typed at the `gpgkeys>` prompt into something
//! the executor and the completer can work with.
//!
//! # Architecture
//!
//! The parser is split into multiple focused modules:
//! - `syntax`: Character classes (quotes, word breaks, operators)
//! - `scanner`: Quote-aware point queries on a line
//! - `splitter`: Tokenizer producing word and operator tokens
//! - `quoting`: Quoting and dequoting of completion candidates
//! - `word`: Context predicates for the word under the cursor
//! - `args`: GNU-style long option parsing
//! - `command`: The static command table
//!
//! # Examples
//!
//! ```
//! use gpgkeys::parser::{CommandKind, Parser};
//!
//! let parser = Parser::new();
//! let line = parser.parse("ls --secret | less").unwrap().unwrap();
//! assert_eq!(line.spec.kind, CommandKind::List);
//!
//! let args = line.args().unwrap();
//! assert!(args.secret);
//! assert_eq!(args.pipe, vec!["|", "less"]);
//! ```

pub mod args;
pub mod command;
pub mod quoting;
pub mod scanner;
pub mod splitter;
pub mod syntax;
pub mod token;
pub mod word;

#[cfg(test)]
mod tests;

// Re-export public API
pub use args::Args;
pub use command::{CommandKind, CommandSpec, CompletionSource};
pub use quoting::{QuotePolicy, Quoting};
pub use scanner::{QuoteState, Scanner, char_is_quoted, find_unquoted, find_unquoted_reverse};
pub use splitter::{closequote, split, splitpipe};
pub use syntax::ShellSyntax;
pub use token::{Token, TokenKind};
pub use word::Word;

use crate::error::{ParseError, Result};

/// Split a line into tokens, closing a trailing open quote
pub fn split_args(line: &str, syntax: &ShellSyntax) -> Vec<Token> {
    let scanner = Scanner::for_syntax(syntax);
    scanner.closequote(scanner.split(line))
}

/// Parse the arguments of a command
///
/// Everything from the first shell operator on is kept verbatim in
/// [`Args::pipe`].
pub fn parse_args(line: &str, syntax: &ShellSyntax) -> std::result::Result<Args, ParseError> {
    let tokens = split_args(line, syntax);
    let (mine, pipe) = splitpipe(&tokens);
    let mut args = Args::parse(mine.iter().map(Token::as_str))?;
    args.pipe = pipe.iter().map(|t| t.text.clone()).collect();
    Ok(args)
}

/// A resolved command and the unparsed rest of its line
#[derive(Debug, Clone)]
pub struct CommandLine {
    pub spec: &'static CommandSpec,
    /// The command word as typed
    pub name: String,
    /// Everything after the command word
    pub rest: String,
    syntax: ShellSyntax,
}

impl CommandLine {
    /// Parse the rest of the line as command arguments
    pub fn args(&self) -> std::result::Result<Args, ParseError> {
        parse_args(&self.rest, &self.syntax)
    }

    /// Tokens of the rest of the line, for commands taking raw shell words
    pub fn tokens(&self) -> Vec<Token> {
        split_args(&self.rest, &self.syntax)
    }
}

/// Main parser for gpgkeys command lines
pub struct Parser {
    syntax: ShellSyntax,
}

impl Parser {
    /// Create a parser with the default quote characters
    pub fn new() -> Self {
        Self::with_syntax(ShellSyntax::default())
    }

    /// Create a parser reading quotes as configured in `syntax`
    pub fn with_syntax(syntax: ShellSyntax) -> Self {
        Self { syntax }
    }

    /// Parse an input line into a command
    ///
    /// # Arguments
    ///
    /// * `input` - The input line
    ///
    /// # Returns
    ///
    /// * `Result<Option<CommandLine>>` - `None` for an empty line, an
    ///   `UnknownCommand` error when the first word names no command
    pub fn parse(&self, input: &str) -> Result<Option<CommandLine>> {
        if input.trim().is_empty() {
            return Ok(None);
        }

        let (name, rest) = command::split_command(input);
        match command::resolve(name) {
            Some(spec) => Ok(Some(CommandLine {
                spec,
                name: name.to_string(),
                rest: rest.to_string(),
                syntax: self.syntax.clone(),
            })),
            None => {
                let first = split_args(input, &self.syntax)
                    .into_iter()
                    .next()
                    .map(|t| t.text)
                    .unwrap_or_else(|| name.to_string());
                Err(ParseError::UnknownCommand(first).into())
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
