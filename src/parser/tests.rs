//! Scenario tests for the parser
//!
//! These exercise the scanner, splitter and quoting codec together the way
//! the shell and the completer use them.

#[cfg(test)]
mod tests {
    use crate::error::{GpgkeysError, ParseError};
    use crate::parser::{
        Args, CommandKind, Parser, QuotePolicy, Quoting, ShellSyntax, TokenKind, char_is_quoted,
        closequote, find_unquoted, find_unquoted_reverse, parse_args, split, split_args,
    };

    fn parse(line: &str) -> Result<Args, ParseError> {
        parse_args(line, &ShellSyntax::default())
    }

    fn texts(line: &str) -> Vec<String> {
        split_args(line, &ShellSyntax::default()).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_quoted_word_is_one_token() {
        let tokens = split(r#"foo"bar baz""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].text, r#"foo"bar baz""#);
    }

    #[test]
    fn test_embedded_single_quote_is_quoted() {
        let line = r"'foo'\''bar'";
        let embedded = line.find(r"\'").map(|i| i + 1).unwrap_or_default();
        assert!(char_is_quoted(line, embedded));
    }

    #[test]
    fn test_single_policy_sole_match() {
        let quoting = Quoting::new(ShellSyntax::default(), QuotePolicy::Single);
        assert_eq!(quoting.quote("Al'Hambra.txt", true, None), r"'Al'\''Hambra.txt' ");
    }

    #[test]
    fn test_backslash_policy_directory() {
        let quoting = Quoting::default();
        assert_eq!(quoting.quote("funny dir/", true, None), r"funny\ dir/");
    }

    #[test]
    fn test_find_unquoted_both_directions() {
        let line = "abc > def >";
        assert_eq!(find_unquoted(line, line.len(), ">"), Some(4));
        assert_eq!(find_unquoted_reverse(line, line.len(), ">"), Some(10));
    }

    #[test]
    fn test_open_quote_at_end() {
        let line = r#"fdump "Hello"#;
        assert!(char_is_quoted(line, line.len()));
        let tokens = closequote(split(line));
        assert_eq!(tokens.last().map(|t| t.text.as_str()), Some(r#""Hello""#));
    }

    #[test]
    fn test_balanced_lines_end_unquoted() {
        let lines = [
            "",
            "list",
            r#"export "a b" 'c d' > out"#,
            r"fdump a\ b",
            r"'foo'\''bar'",
            r#""it's""#,
        ];
        for line in lines {
            assert!(!char_is_quoted(line, line.len()), "{line:?}");
        }
    }

    #[test]
    fn test_tokens_reconstruct_line() {
        let lines = [
            "list foo|less",
            "export  --armor alice >>keys.asc 2>&1",
            r#"fdump "a b"c 'd\' e"#,
            "  ! ls -l;echo done &",
            "import <keys.asc",
        ];
        for line in lines {
            let tokens = split(line);
            let mut rebuilt = String::new();
            let mut pos = 0;
            for token in &tokens {
                assert!(line[pos..token.start].chars().all(char::is_whitespace));
                rebuilt.push_str(&line[pos..token.start]);
                rebuilt.push_str(&token.text);
                pos = token.end;
            }
            rebuilt.push_str(&line[pos..]);
            assert_eq!(rebuilt, line);
        }
    }

    #[test]
    fn test_round_trip_every_policy() {
        let values = ["plain", "two words", "semi;colon", "$HOME", "a&b|c", "~/keys"];
        for policy in [QuotePolicy::Backslash, QuotePolicy::Double, QuotePolicy::Single] {
            let quoting = Quoting::new(ShellSyntax::default(), policy);
            for value in values {
                let quoted = quoting.quote(value, true, None);
                let quoted = quoted.trim_end_matches(' ');
                assert_eq!(quoting.dequote(quoted, None), value, "{policy} {value:?}");
            }
        }
    }

    #[test]
    fn test_split_args_table() {
        let cases: &[(&str, &[&str])] = &[
            ("list", &["list"]),
            ("list alice bob", &["list", "alice", "bob"]),
            ("list 'alice", &["list", "'alice'"]),
            ("list \"alice smith", &["list", "\"alice smith\""]),
            ("list|less", &["list", "|", "less"]),
            ("export >> keys.asc", &["export", ">>", "keys.asc"]),
            ("dump 2>/dev/null", &["dump", "2>", "/dev/null"]),
            ("dump foo2>x", &["dump", "foo2", ">", "x"]),
        ];
        for (line, expected) in cases {
            assert_eq!(texts(line), *expected, "{line:?}");
        }
    }

    #[test]
    fn test_parse_args_keeps_pipe() {
        let args = parse("--armor alice > 'my keys.asc'").unwrap();
        assert!(args.armor);
        assert_eq!(args.args, vec!["alice"]);
        assert_eq!(args.pipe, vec![">", "'my keys.asc'"]);
        assert_eq!(
            args.tuple(),
            vec!["--armor", "alice", ">", "'my keys.asc'"]
        );
    }

    #[test]
    fn test_parse_args_ignores_options_after_pipe() {
        let args = parse("alice | grep --color uid").unwrap();
        assert_eq!(args.args, vec!["alice"]);
        assert_eq!(args.pipe, vec!["|", "grep", "--color", "uid"]);
    }

    #[test]
    fn test_parse_args_errors() {
        assert_eq!(
            parse("--frob"),
            Err(ParseError::UnknownOption("--frob".into()))
        );
        assert_eq!(
            parse("--output | cat"),
            Err(ParseError::MissingArgument("--output".into()))
        );
    }

    #[test]
    fn test_parser_resolves_commands() {
        let parser = Parser::new();
        let cases = [
            ("list", CommandKind::List),
            ("ls --secret", CommandKind::List),
            ("ll alice", CommandKind::ListSig),
            ("e alice", CommandKind::Edit),
            ("!ls", CommandKind::Shell),
            (". ls", CommandKind::Shell),
            ("shell", CommandKind::Shell),
            ("?import", CommandKind::Help),
            ("genr alice", CommandKind::GenRevoke),
            ("export|cat", CommandKind::Export),
        ];
        for (line, kind) in cases {
            let parsed = parser.parse(line).unwrap().map(|c| c.spec.kind);
            assert_eq!(parsed, Some(kind), "{line:?}");
        }
    }

    #[test]
    fn test_parser_rest_of_line() {
        let parser = Parser::new();
        let line = parser.parse("!ls -l").unwrap().unwrap();
        assert_eq!(line.name, "!");
        assert_eq!(line.rest, "ls -l");
        let words: Vec<String> = line.tokens().into_iter().map(|t| t.text).collect();
        assert_eq!(words, vec!["ls", "-l"]);
    }

    #[test]
    fn test_parser_empty_and_unknown() {
        let parser = Parser::new();
        assert!(parser.parse("   ").unwrap().is_none());

        match parser.parse("frob --x | y") {
            Err(GpgkeysError::Parse(ParseError::UnknownCommand(name))) => {
                assert_eq!(name, "frob")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(parser.parse("gen").is_err());
    }

    #[test]
    fn test_parser_with_configured_quotes() {
        let syntax = ShellSyntax::new("\"", " \t\n\"><=;|&(", "\\ \"'");
        let parser = Parser::with_syntax(syntax);
        let line = parser.parse("list it's|cat").unwrap().unwrap();
        let args = line.args().unwrap();
        assert_eq!(args.args, vec!["it's"]);
        assert_eq!(args.pipe, vec!["|", "cat"]);

        // The default set reads the apostrophe as an open quote
        let line = Parser::new().parse("list it's|cat").unwrap().unwrap();
        assert!(line.args().unwrap().pipe.is_empty());
    }
}
