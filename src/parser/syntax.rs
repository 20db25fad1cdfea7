//! Character classes of the shell dialect understood by gpgkeys
//!
//! The lexer only needs to know a handful of character sets: which characters
//! open quoted spans, which characters end a word, which characters form
//! shell operators, and which characters have to be protected when a
//! filename is inserted into the line buffer.

/// Characters that open a quoted span
pub const QUOTE_CHARACTERS: &str = "\"'";

/// Unquoted whitespace separates words
pub const WHITESPACE: &str = " \t\n";

/// Characters that start a shell operator token
pub const OPERATOR_CHARACTERS: &str = "|;&><";

/// Characters that end the word being completed
pub const WORD_BREAK_CHARACTERS: &str = " \t\n\"'><=;|&(";

/// Characters that must be escaped or quoted inside an inserted filename
///
/// A backslash comes first so that escaping it never doubles an escape
/// introduced for a later character. The tilde is missing on purpose: a
/// leading `~` must stay active for tilde expansion.
pub const FILENAME_QUOTE_CHARACTERS: &str = "\\ \t\n\"'@><=;|&()#$`?*[!:{";

/// Immutable character-class configuration of a session.
///
/// Built once when the completer is constructed; switching any set means
/// building a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSyntax {
    quote_characters: String,
    word_break_characters: String,
    filename_quote_characters: String,
}

impl ShellSyntax {
    /// Create a syntax from explicit character sets
    ///
    /// # Arguments
    /// * `quote_characters` - Characters opening quoted spans
    /// * `word_break_characters` - Characters ending a completion word
    /// * `filename_quote_characters` - Characters escaped in filenames
    pub fn new(
        quote_characters: impl Into<String>,
        word_break_characters: impl Into<String>,
        filename_quote_characters: impl Into<String>,
    ) -> Self {
        Self {
            quote_characters: quote_characters.into(),
            word_break_characters: word_break_characters.into(),
            filename_quote_characters: filename_quote_characters.into(),
        }
    }

    pub fn quote_characters(&self) -> &str {
        &self.quote_characters
    }

    pub fn word_break_characters(&self) -> &str {
        &self.word_break_characters
    }

    pub fn filename_quote_characters(&self) -> &str {
        &self.filename_quote_characters
    }

    pub fn is_quote(&self, c: char) -> bool {
        self.quote_characters.contains(c)
    }

    pub fn is_word_break(&self, c: char) -> bool {
        self.word_break_characters.contains(c)
    }

    /// True if `c` must be protected inside an inserted filename
    pub fn needs_quoting(&self, c: char) -> bool {
        self.filename_quote_characters.contains(c)
    }

    /// True if a backslash in front of `c` is removed by dequoting
    ///
    /// This is the filename-quote set plus `~`, so `\~` typed by the user
    /// reads back as a literal tilde.
    pub fn is_dequotable(&self, c: char) -> bool {
        c == '~' || self.needs_quoting(c)
    }
}

impl Default for ShellSyntax {
    fn default() -> Self {
        Self::new(
            QUOTE_CHARACTERS,
            WORD_BREAK_CHARACTERS,
            FILENAME_QUOTE_CHARACTERS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sets() {
        let syntax = ShellSyntax::default();
        assert!(syntax.is_quote('"'));
        assert!(syntax.is_quote('\''));
        assert!(!syntax.is_quote('`'));
        assert!(syntax.is_word_break(' '));
        assert!(syntax.is_word_break('|'));
        assert!(!syntax.is_word_break('/'));
    }

    #[test]
    fn test_tilde_is_only_dequotable() {
        let syntax = ShellSyntax::default();
        assert!(!syntax.needs_quoting('~'));
        assert!(syntax.is_dequotable('~'));
        assert!(syntax.is_dequotable('\\'));
        assert!(!syntax.is_dequotable('a'));
    }

    #[test]
    fn test_quote_characters_break_words() {
        for c in QUOTE_CHARACTERS.chars() {
            assert!(WORD_BREAK_CHARACTERS.contains(c));
        }
    }
}
