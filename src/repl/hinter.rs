//! History hints
//!
//! With the cursor at the end of the line, the rest of the latest history
//! entry starting with the line is shown in grey. Accepting a single word of
//! the hint follows the shell tokenizer, so a quoted user id or a redirection
//! comes in as one piece.

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History, SearchQuery};

use crate::parser::{Scanner, ShellSyntax};

/// History hinter for the gpgkeys shell
pub struct GpgkeysHinter {
    style: Style,
    quote_characters: String,
    /// History entry the hint is taken from
    entry: String,
    /// Length of the typed prefix of `entry`
    typed: usize,
}

impl GpgkeysHinter {
    pub fn new(syntax: &ShellSyntax) -> Self {
        Self {
            style: Style::new().italic().fg(Color::DarkGray),
            quote_characters: syntax.quote_characters().to_string(),
            entry: String::new(),
            typed: 0,
        }
    }

    fn hint(&self) -> &str {
        self.entry.get(self.typed..).unwrap_or_default()
    }
}

impl Default for GpgkeysHinter {
    fn default() -> Self {
        Self::new(&ShellSyntax::default())
    }
}

impl Hinter for GpgkeysHinter {
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.entry.clear();
        self.typed = 0;

        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        let latest = history
            .search(SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()
            .and_then(|results| results.into_iter().next());
        let Some(item) = latest else {
            return String::new();
        };
        if item.command_line.len() <= line.len() || !item.command_line.starts_with(line) {
            return String::new();
        }

        self.entry = item.command_line;
        self.typed = line.len();
        if use_ansi_coloring {
            self.style.paint(self.hint()).to_string()
        } else {
            self.hint().to_string()
        }
    }

    /// The hint up to the end of the token the cursor is in or before
    fn next_hint_token(&self) -> String {
        let end = Scanner::new(&self.quote_characters)
            .split(&self.entry)
            .into_iter()
            .map(|token| token.end)
            .find(|&end| end > self.typed)
            .unwrap_or(self.entry.len());
        self.entry
            .get(self.typed..end)
            .unwrap_or_default()
            .to_string()
    }

    fn complete_hint(&self) -> String {
        self.hint().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reedline::{FileBackedHistory, HistoryItem};

    fn create_test_history(lines: &[&str]) -> Box<dyn History> {
        let mut history = FileBackedHistory::new(100).expect("Failed to create history");
        for line in lines {
            history
                .save(HistoryItem::from_command_line(*line))
                .expect("Failed to save history item");
        }
        Box::new(history)
    }

    fn hinted(entry: &str, typed: &str) -> GpgkeysHinter {
        let mut hinter = GpgkeysHinter::default();
        let history = create_test_history(&[entry]);
        hinter.handle(typed, typed.len(), history.as_ref(), false, "/tmp");
        hinter
    }

    #[test]
    fn test_empty_line_no_hint() {
        let mut hinter = GpgkeysHinter::default();
        let history = create_test_history(&["list --secret"]);
        let hint = hinter.handle("", 0, history.as_ref(), false, "/tmp");
        assert_eq!(hint, "");
    }

    #[test]
    fn test_cursor_not_at_end_no_hint() {
        let mut hinter = GpgkeysHinter::default();
        let history = create_test_history(&["list --secret"]);
        let hint = hinter.handle("list", 2, history.as_ref(), false, "/tmp");
        assert_eq!(hint, "");
        assert_eq!(hinter.complete_hint(), "");
    }

    #[test]
    fn test_hint_from_history() {
        let mut hinter = GpgkeysHinter::default();
        let history = create_test_history(&["list --secret alice", "import keys.asc"]);
        let hint = hinter.handle("li", 2, history.as_ref(), false, "/tmp");
        assert_eq!(hint, "st --secret alice");
        assert_eq!(hinter.complete_hint(), "st --secret alice");
        assert_eq!(hinter.next_hint_token(), "st");
    }

    #[test]
    fn test_next_token_keeps_quoted_words() {
        let entry = r#"sign --local-user "Jane Doe" alice"#;
        assert_eq!(hinted(entry, "sign ").next_hint_token(), "--local-user");
        assert_eq!(
            hinted(entry, "sign --local-user").next_hint_token(),
            r#" "Jane Doe""#
        );
        assert_eq!(hinted(entry, r#"sign --local-user "Ja"#).next_hint_token(), r#"ne Doe""#);
    }

    #[test]
    fn test_next_token_stops_at_operators() {
        let entry = "list alice|less";
        assert_eq!(hinted(entry, "list alice").next_hint_token(), "|");
        assert_eq!(hinted(entry, "list alice|").next_hint_token(), "less");
    }

    #[test]
    fn test_default() {
        let hinter = GpgkeysHinter::default();
        assert_eq!(hinter.next_hint_token(), "");
        assert_eq!(hinter.complete_hint(), "");
    }
}
