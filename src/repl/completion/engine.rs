//! Completion engine - orchestrates the completion flow
//!
//! This module ties the completion components together: it locates the word
//! under the cursor, dequotes it, determines the completion context, fetches
//! candidates and quotes them for insertion.

use std::sync::Arc;

use tracing::debug;

use super::context::{CompletionContext, CompletionWord};
use super::provider::{Candidate, CandidateProvider};
use crate::parser::Quoting;
use crate::parser::command;
use crate::utils::string::is_hex;

/// Completion pair representing a candidate suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPair {
    /// Display text for the candidate
    pub display: String,
    /// Replacement text to insert
    pub replacement: String,
    /// Optional description for the candidate
    pub description: Option<String>,
}

/// Main completion engine
pub struct CompletionEngine {
    /// Candidate provider for fetching suggestions
    provider: Arc<dyn CandidateProvider>,
    /// Codec used to dequote the word and quote the candidates
    quoting: Quoting,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `provider` - Candidate provider for fetching suggestions
    /// * `quoting` - Quoting codec of the session
    pub fn new(provider: Arc<dyn CandidateProvider>, quoting: Quoting) -> Self {
        Self { provider, quoting }
    }

    pub fn quoting(&self) -> &Quoting {
        &self.quoting
    }

    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `(usize, Vec<CompletionPair>)` - Start of the replaced span and candidate pairs
    pub fn complete(&self, line: &str, pos: usize) -> (usize, Vec<CompletionPair>) {
        let word = CompletionWord::locate(line, pos, self.quoting.syntax());
        let typed = line.get(word.span_start..word.end).unwrap_or_default();
        let prefix = self.quoting.dequote(typed, word.quote_char);
        let context = CompletionContext::detect(line, &word, self.quoting.syntax());

        let candidates = self.fetch_candidates(&context, &prefix, word.quote_char);
        debug!(
            "Completing {prefix:?} as {context:?}: {} candidates",
            candidates.len()
        );

        let single = candidates.len() == 1;
        let pairs = candidates
            .into_iter()
            .map(|c| CompletionPair {
                replacement: self.quoting.quote(&c.value, single, word.quote_char),
                display: c.value,
                description: c.description,
            })
            .collect();

        (word.span_start, pairs)
    }

    /// Fetch candidates based on completion context
    fn fetch_candidates(
        &self,
        context: &CompletionContext,
        prefix: &str,
        quote_char: Option<char>,
    ) -> Vec<Candidate> {
        match context {
            CompletionContext::CommandName | CompletionContext::Topic => command::command_names()
                .into_iter()
                .filter(|name| name.starts_with(prefix))
                .map(Candidate::from)
                .collect(),
            CompletionContext::Option { command } => command
                .options_matching(prefix)
                .into_iter()
                .map(Candidate::from)
                .collect(),
            CompletionContext::Filename => into_candidates(self.provider.filenames(prefix)),
            CompletionContext::SystemCommand => into_candidates(self.provider.commands(prefix)),
            CompletionContext::KeyId => self.keys(prefix, quote_char),
            CompletionContext::Keyserver => into_candidates(self.provider.keyservers(prefix)),
            CompletionContext::None => Vec::new(),
        }
    }

    /// Key ids for hex prefixes, otherwise user ids or names
    fn keys(&self, prefix: &str, quote_char: Option<char>) -> Vec<Candidate> {
        if prefix.is_empty() || is_hex(prefix) {
            let ids = self.provider.key_ids(prefix);
            if !ids.is_empty() {
                return ids;
            }
        }
        if quote_char.is_some() {
            into_candidates(self.provider.user_ids(prefix))
        } else {
            into_candidates(self.provider.names(prefix))
        }
    }
}

fn into_candidates(values: Vec<String>) -> Vec<Candidate> {
    values.into_iter().map(Candidate::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{QuotePolicy, ShellSyntax};

    /// Provider answering from fixed lists
    struct FakeProvider {
        files: Vec<&'static str>,
    }

    fn starting_with(values: &[&str], prefix: &str) -> Vec<String> {
        values
            .iter()
            .filter(|v| v.to_lowercase().starts_with(&prefix.to_lowercase()))
            .map(|v| v.to_string())
            .collect()
    }

    impl CandidateProvider for FakeProvider {
        fn filenames(&self, prefix: &str) -> Vec<String> {
            self.files
                .iter()
                .filter(|f| f.starts_with(prefix))
                .map(|f| f.to_string())
                .collect()
        }

        fn commands(&self, prefix: &str) -> Vec<String> {
            starting_with(&["gpg", "gpg-agent", "grep"], prefix)
        }

        fn key_ids(&self, prefix: &str) -> Vec<Candidate> {
            starting_with(&["89ABCDEF", "76543210"], prefix)
                .into_iter()
                .map(|id| Candidate::described(id, "Alice Liddell <alice@example.org>".into()))
                .collect()
        }

        fn user_ids(&self, prefix: &str) -> Vec<String> {
            starting_with(&["Alice Liddell <alice@example.org>"], prefix)
        }

        fn names(&self, prefix: &str) -> Vec<String> {
            starting_with(&["Alice", "Liddell"], prefix)
        }

        fn keyservers(&self, prefix: &str) -> Vec<String> {
            starting_with(&["hkps://keys.openpgp.org"], prefix)
        }
    }

    fn engine(policy: QuotePolicy) -> CompletionEngine {
        let provider = Arc::new(FakeProvider {
            files: vec!["Al'Hambra.txt", "funny dir/", "funds.txt", "keys/"],
        });
        CompletionEngine::new(provider, Quoting::new(ShellSyntax::default(), policy))
    }

    fn replacements(pairs: &[CompletionPair]) -> Vec<&str> {
        pairs.iter().map(|p| p.replacement.as_str()).collect()
    }

    #[test]
    fn test_single_quoted_sole_match() {
        let (start, pairs) = engine(QuotePolicy::Single).complete("import Al", 9);
        assert_eq!(start, 7);
        assert_eq!(replacements(&pairs), vec![r"'Al'\''Hambra.txt' "]);
        assert_eq!(pairs[0].display, "Al'Hambra.txt");
    }

    #[test]
    fn test_backslash_directory_sole_match() {
        let (start, pairs) = engine(QuotePolicy::Backslash).complete("fdump funny", 11);
        assert_eq!(start, 6);
        assert_eq!(replacements(&pairs), vec![r"funny\ dir/"]);
    }

    #[test]
    fn test_escaped_word_is_dequoted() {
        let line = r"fdump funny\ d";
        let (start, pairs) = engine(QuotePolicy::Backslash).complete(line, line.len());
        assert_eq!(start, 6);
        assert_eq!(replacements(&pairs), vec![r"funny\ dir/"]);
    }

    #[test]
    fn test_open_quote_keeps_quote_char() {
        let line = r#"import "fun"#;
        let (start, pairs) = engine(QuotePolicy::Backslash).complete(line, line.len());
        assert_eq!(start, 7);
        assert_eq!(replacements(&pairs), vec![r#""funny dir/"#, r#""funds.txt"#]);
    }

    #[test]
    fn test_command_names() {
        let (start, pairs) = engine(QuotePolicy::Backslash).complete("li", 2);
        assert_eq!(start, 0);
        assert_eq!(replacements(&pairs), vec!["list", "listsig"]);

        let (_, pairs) = engine(QuotePolicy::Backslash).complete("qu", 2);
        assert_eq!(replacements(&pairs), vec!["quit "]);
    }

    #[test]
    fn test_options() {
        let (start, pairs) = engine(QuotePolicy::Backslash).complete("list --se", 9);
        assert_eq!(start, 5);
        assert_eq!(replacements(&pairs), vec!["--secret "]);

        let (_, pairs) = engine(QuotePolicy::Backslash).complete("export --", 9);
        assert!(pairs.iter().any(|p| p.display == "--output"));
        assert!(!pairs.iter().any(|p| p.display == "--keyserver"));
    }

    #[test]
    fn test_key_ids_with_description() {
        let (_, pairs) = engine(QuotePolicy::Backslash).complete("list 89", 7);
        assert_eq!(replacements(&pairs), vec!["89ABCDEF "]);
        assert_eq!(
            pairs[0].description.as_deref(),
            Some("Alice Liddell <alice@example.org>")
        );
    }

    #[test]
    fn test_names_and_user_ids() {
        let (_, pairs) = engine(QuotePolicy::Backslash).complete("sign ali", 8);
        assert_eq!(replacements(&pairs), vec!["Alice "]);

        let line = r#"sign "ali"#;
        let (start, pairs) = engine(QuotePolicy::Backslash).complete(line, line.len());
        assert_eq!(start, 5);
        assert_eq!(
            replacements(&pairs),
            vec![r#""Alice Liddell <alice@example.org>" "#]
        );
    }

    #[test]
    fn test_option_value_sources() {
        let (_, pairs) = engine(QuotePolicy::Backslash).complete("recv --keyserver hk", 19);
        assert_eq!(replacements(&pairs), vec![r"hkps\://keys.openpgp.org "]);

        let (start, pairs) = engine(QuotePolicy::Backslash).complete("export --output=ke", 18);
        assert_eq!(start, 16);
        assert_eq!(replacements(&pairs), vec!["keys/"]);
    }

    #[test]
    fn test_system_commands_after_pipe() {
        let (start, pairs) = engine(QuotePolicy::Backslash).complete("list | gr", 9);
        assert_eq!(start, 7);
        assert_eq!(replacements(&pairs), vec!["grep "]);
    }

    #[test]
    fn test_configured_quote_characters() {
        let syntax = ShellSyntax::new("\"", " \t\n\"><=;|&(", "\\ \"'");
        let provider = Arc::new(FakeProvider { files: Vec::new() });
        let engine = CompletionEngine::new(provider, Quoting::new(syntax, QuotePolicy::Backslash));
        let (start, pairs) = engine.complete("list it's|gr", 12);
        assert_eq!(start, 10);
        assert_eq!(replacements(&pairs), vec!["grep "]);
    }

    #[test]
    fn test_nothing_to_complete() {
        let (_, pairs) = engine(QuotePolicy::Backslash).complete("genkey x", 8);
        assert!(pairs.is_empty());
    }
}
