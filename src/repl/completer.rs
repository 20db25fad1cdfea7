//! Completer for reedline - provides completion suggestions

use std::sync::Arc;

use reedline::{Completer, Span, Suggestion};

use super::completion::{CandidateProvider, CompletionEngine};
use crate::parser::Quoting;

/// Completer for the gpgkeys shell
pub struct GpgkeysCompleter {
    /// Completion engine for context-aware suggestions
    completion_engine: CompletionEngine,
}

impl GpgkeysCompleter {
    /// Create a new completer
    ///
    /// # Arguments
    /// * `provider` - Source of filenames, commands, keys and keyservers
    /// * `quoting` - Quoting codec of the session
    pub fn new(provider: Arc<dyn CandidateProvider>, quoting: Quoting) -> Self {
        Self {
            completion_engine: CompletionEngine::new(provider, quoting),
        }
    }
}

impl Completer for GpgkeysCompleter {
    /// Complete the input at the given cursor position
    ///
    /// Replacements are already quoted and a unique match carries its own
    /// trailing space, so reedline must not append whitespace.
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let (start, candidates) = self.completion_engine.complete(line, pos);

        candidates
            .into_iter()
            .map(|pair| Suggestion {
                value: pair.replacement,
                description: pair.description,
                style: None,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: false,
                match_indices: None,
            })
            .collect()
    }
}
