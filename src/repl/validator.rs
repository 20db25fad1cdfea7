//! Validator for reedline - validates line completeness

use reedline::{ValidationResult, Validator};

use crate::parser::{QuoteState, Scanner, ShellSyntax};

/// Requests a continuation line when the buffer ends in an active backslash
///
/// Open quotes do not continue the line; they are closed when the line is
/// split into words.
pub struct GpgkeysValidator {
    quote_characters: String,
}

impl GpgkeysValidator {
    pub fn new(syntax: &ShellSyntax) -> Self {
        Self {
            quote_characters: syntax.quote_characters().to_string(),
        }
    }
}

impl Default for GpgkeysValidator {
    fn default() -> Self {
        Self::new(&ShellSyntax::default())
    }
}

impl Validator for GpgkeysValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        let scanner = Scanner::new(&self.quote_characters);
        match scanner.quote_state(line, line.len()) {
            QuoteState::Escaped => ValidationResult::Incomplete,
            _ => ValidationResult::Complete,
        }
    }
}
