//! The word under the cursor, seen in the context of its line

use super::scanner::Scanner;
use super::syntax::ShellSyntax;

/// Completion word between `begin` and `end` of `line`
///
/// All predicates are pure and recomputed from the line on every call.
#[derive(Debug, Clone, Copy)]
pub struct Word<'a> {
    line: &'a str,
    begin: usize,
    end: usize,
    scanner: Scanner<'a>,
}

impl<'a> Word<'a> {
    /// Create the word view; offsets are clamped into the line
    pub fn new(line: &'a str, begin: usize, end: usize) -> Self {
        let end = end.min(line.len());
        Self {
            line,
            begin: begin.min(end),
            end,
            scanner: Scanner::default(),
        }
    }

    /// Read quoting with the quote characters of `syntax`
    pub fn with_syntax(mut self, syntax: &'a ShellSyntax) -> Self {
        self.scanner = Scanner::for_syntax(syntax);
        self
    }

    /// The raw text of the word
    pub fn text(&self) -> &'a str {
        self.line.get(self.begin..self.end).unwrap_or_default()
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// The word looks like an option flag
    pub fn is_option(&self) -> bool {
        self.text().starts_with('-')
    }

    /// The word looks like a path: it starts with `~` or contains a `/`
    pub fn is_filename_like(&self) -> bool {
        let text = self.text();
        text.starts_with('~') || text.contains(std::path::MAIN_SEPARATOR)
    }

    /// The word is the value of `marker`, e.g. `--output <word>`
    ///
    /// Only the last occurrence of `marker` before the word counts, and
    /// nothing but whitespace, an opening quote or `=` may sit between them.
    pub fn follows(&self, marker: &str) -> bool {
        let before = &self.line[..self.begin];
        before
            .rfind(marker)
            .is_some_and(|at| self.is_value_separator(&before[at + marker.len()..]))
    }

    /// The word is the command name of a shell escape (`!`, `.` or `shell`)
    pub fn is_command_position(&self) -> bool {
        matches!(self.line[..self.begin].trim(), "!" | "." | "shell")
    }

    /// The word is the first word after a pipe or list separator
    ///
    /// `>|` is an output redirection, not a pipe.
    pub fn is_pipe_position(&self) -> bool {
        let Some(at) = self.scanner.find_unquoted_reverse(self.line, self.begin, "|;") else {
            return false;
        };
        if !self.is_quote_or_blank(&self.line[at + 1..self.begin]) {
            return false;
        }
        !(self.line.as_bytes()[at] == b'|'
            && at > 0
            && self.scanner.find_unquoted_reverse(self.line, self.begin, ">") == Some(at - 1))
    }

    /// The word comes after a pipe or a redirection operator
    pub fn is_post_redirect_position(&self) -> bool {
        self.scanner
            .find_unquoted(self.line, self.begin, "|><")
            .is_some()
    }

    /// Text allowed between an option and its value: an opening quote, `=`
    /// or nothing
    fn is_value_separator(&self, delta: &str) -> bool {
        let delta = delta.trim();
        self.is_quote_or_blank(delta.strip_prefix('=').unwrap_or(delta))
    }

    fn is_quote_or_blank(&self, delta: &str) -> bool {
        let mut chars = delta.trim().chars();
        match (chars.next(), chars.next()) {
            (None, _) => true,
            (Some(c), None) => self.scanner.quote_characters().contains(c),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Word view of everything after the last space, like the completer sees it
    fn last_word(line: &str) -> Word<'_> {
        let begin = line.rfind(' ').map_or(0, |i| i + 1);
        Word::new(line, begin, line.len())
    }

    #[test]
    fn test_text_and_offsets() {
        let word = Word::new("list foo", 5, 8);
        assert_eq!(word.text(), "foo");
        assert_eq!((word.begin(), word.end()), (5, 8));

        let clamped = Word::new("ab", 5, 9);
        assert_eq!(clamped.text(), "");
    }

    #[test]
    fn test_is_option() {
        assert!(last_word("list --sec").is_option());
        assert!(last_word("list -").is_option());
        assert!(!last_word("list foo").is_option());
    }

    #[test]
    fn test_is_filename_like() {
        assert!(last_word("fdump ~/ke").is_filename_like());
        assert!(last_word("fdump ~jane").is_filename_like());
        assert!(last_word("fdump ./keys").is_filename_like());
        assert!(!last_word("fdump keys").is_filename_like());
    }

    #[test]
    fn test_follows() {
        assert!(last_word("export --output ").follows("--output"));
        assert!(last_word("export --output fo").follows("--output"));
        assert!(Word::new("export --output \"fo", 17, 19).follows("--output"));
        assert!(Word::new("export --output=fo", 16, 18).follows("--output"));
        assert!(!last_word("export --output foo ba").follows("--output"));
        assert!(!last_word("export foo").follows("--output"));
    }

    #[test]
    fn test_is_command_position() {
        assert!(Word::new("!ls", 1, 3).is_command_position());
        assert!(Word::new(". l", 2, 3).is_command_position());
        assert!(last_word("shell l").is_command_position());
        assert!(!last_word("shell ls -").is_command_position());
    }

    #[test]
    fn test_is_pipe_position() {
        assert!(last_word("list | le").is_pipe_position());
        assert!(Word::new("list |le", 6, 8).is_pipe_position());
        assert!(last_word("list ; ls").is_pipe_position());
        assert!(Word::new("list | \"le", 8, 10).is_pipe_position());
        assert!(!last_word("list | less -").is_pipe_position());
        assert!(!last_word("list foo").is_pipe_position());
        assert!(!last_word("list \"a | b").is_pipe_position());
    }

    #[test]
    fn test_clobber_redirect_is_not_a_pipe() {
        let word = last_word("export >| fi");
        assert!(!word.is_pipe_position());
        assert!(word.is_post_redirect_position());
    }

    #[test]
    fn test_custom_quote_characters() {
        let syntax = ShellSyntax::new("\"", " \t\n\"><=;|&(", "\\ \"'");
        let line = "list it's|gr";
        let word = Word::new(line, 10, 12).with_syntax(&syntax);
        assert!(word.is_pipe_position());
        assert!(!Word::new(line, 10, 12).is_pipe_position());

        let word = Word::new("export --output='fo", 17, 19).with_syntax(&syntax);
        assert!(!word.follows("--output"));
        let word = Word::new("export --output=\"fo", 17, 19).with_syntax(&syntax);
        assert!(word.follows("--output"));
    }

    #[test]
    fn test_is_post_redirect_position() {
        assert!(last_word("export > fi").is_post_redirect_position());
        assert!(last_word("import < fi").is_post_redirect_position());
        assert!(last_word("list | less fo").is_post_redirect_position());
        assert!(!last_word("list fo").is_post_redirect_position());
        assert!(!last_word("list '>' fo").is_post_redirect_position());
    }
}
