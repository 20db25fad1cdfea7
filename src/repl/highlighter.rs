//! Syntax highlighter for gpgkeys command lines
//!
//! The line is split with the shell tokenizer. The command word is shown in
//! blue when it resolves and in red otherwise, options in cyan, operators in
//! magenta and quoted spans in yellow.

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::parser::command::{resolve, split_command};
use crate::parser::scanner::{QuoteTracker, Step};
use crate::parser::{Scanner, ShellSyntax};

/// Highlighter for the gpgkeys shell
pub struct GpgkeysHighlighter {
    quote_characters: String,
    enabled: bool,
}

impl GpgkeysHighlighter {
    pub fn new(syntax: &ShellSyntax, enabled: bool) -> Self {
        Self {
            quote_characters: syntax.quote_characters().to_string(),
            enabled,
        }
    }

    /// Push `text`, merging it into the previous run if the style matches
    fn push(styled: &mut StyledText, style: Style, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some((last_style, last_text)) = styled.buffer.last_mut()
            && *last_style == style
        {
            last_text.push_str(text);
            return;
        }
        styled.push((style, text.to_string()));
    }

    /// Style a word, with its quoted spans in yellow
    fn push_word(&self, styled: &mut StyledText, word: &str, base: Style) {
        let quoted = Color::Yellow.normal();
        let mut tracker = QuoteTracker::default();
        let mut run_start = 0;
        let mut run_style = base;

        for (i, c) in word.char_indices() {
            let style = match tracker.step(c, &self.quote_characters) {
                Step::Opened | Step::Quoted | Step::Closed => quoted,
                Step::Escaped | Step::Backslash | Step::Unquoted => base,
            };
            if style != run_style {
                Self::push(styled, run_style, &word[run_start..i]);
                run_start = i;
                run_style = style;
            }
        }
        Self::push(styled, run_style, &word[run_start..]);
    }
}

impl Default for GpgkeysHighlighter {
    fn default() -> Self {
        Self::new(&ShellSyntax::default(), true)
    }
}

impl Highlighter for GpgkeysHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        if !self.enabled {
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        let leading = line.len() - line.trim_start().len();
        let (name, _) = split_command(line);
        let name_end = leading + name.len();
        let command_style = if resolve(name).is_some() {
            Color::Blue.bold()
        } else {
            Color::Red.normal()
        };

        let mut last = 0;
        for token in Scanner::new(&self.quote_characters).split(line) {
            Self::push(&mut styled, Style::default(), &line[last..token.start]);
            let text = &line[token.start..token.end];

            if token.is_operator() {
                Self::push(&mut styled, Color::Magenta.normal(), text);
            } else if token.start < name_end {
                let split_at = name_end.min(token.end);
                Self::push(&mut styled, command_style, &line[token.start..split_at]);
                self.push_word(&mut styled, &line[split_at..token.end], Style::default());
            } else if text.starts_with('-') {
                self.push_word(&mut styled, text, Color::Cyan.normal());
            } else {
                self.push_word(&mut styled, text, Style::default());
            }
            last = token.end;
        }
        Self::push(&mut styled, Style::default(), &line[last..]);

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(line: &str) -> Vec<(Style, String)> {
        GpgkeysHighlighter::default().highlight(line, 0).buffer
    }

    fn style_of(line: &str, text: &str) -> Option<Style> {
        segments(line)
            .into_iter()
            .find(|(_, t)| t == text)
            .map(|(style, _)| style)
    }

    #[test]
    fn test_text_is_preserved() {
        for line in [
            "",
            "  list --secret alice | less",
            r#"import "my keys.asc" 2>/dev/null"#,
            r"fdump funny\ dir/x",
            "!ls -l",
            r#"list "unterminated"#,
        ] {
            let text: String = segments(line).into_iter().map(|(_, t)| t).collect();
            assert_eq!(text, line);
        }
    }

    #[test]
    fn test_command_word() {
        assert_eq!(style_of("list alice", "list"), Some(Color::Blue.bold()));
        assert_eq!(style_of("frob alice", "frob"), Some(Color::Red.normal()));
        assert_eq!(style_of("!ls", "!"), Some(Color::Blue.bold()));
        assert_eq!(style_of("!ls", "ls"), Some(Style::default()));
    }

    #[test]
    fn test_options_operators_and_quotes() {
        let line = r#"list --secret "Alice L" | less"#;
        assert_eq!(style_of(line, "--secret"), Some(Color::Cyan.normal()));
        assert_eq!(style_of(line, r#""Alice L""#), Some(Color::Yellow.normal()));
        assert_eq!(style_of(line, "|"), Some(Color::Magenta.normal()));
    }

    #[test]
    fn test_quoted_span_inside_word() {
        assert_eq!(
            segments(r#"fdump foo"bar baz""#),
            vec![
                (Color::Blue.bold(), "fdump".to_string()),
                (Style::default(), " foo".to_string()),
                (Color::Yellow.normal(), r#""bar baz""#.to_string()),
            ]
        );
    }

    #[test]
    fn test_disabled_highlighting() {
        let highlighter = GpgkeysHighlighter::new(&ShellSyntax::default(), false);
        let result = highlighter.highlight("list --secret", 0);
        assert_eq!(result.buffer, vec![(Style::default(), "list --secret".to_string())]);
    }

    #[test]
    fn test_configured_quote_characters() {
        let syntax = ShellSyntax::new("\"", " \t\n\"><=;|&(", "\\ \"'");
        let segments = GpgkeysHighlighter::new(&syntax, true)
            .highlight("list it's|less", 0)
            .buffer;
        assert!(
            segments
                .iter()
                .any(|(style, text)| text == "|" && *style == Color::Magenta.normal())
        );
        assert!(
            segments
                .iter()
                .all(|(style, _)| *style != Color::Yellow.normal())
        );
    }
}
