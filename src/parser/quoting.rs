//! Quoting and dequoting of completion candidates
//!
//! Completion candidates are raw strings (filenames, user ids). Before they
//! are spliced into the line buffer they must be quoted so the shell reads
//! them back unchanged; text typed by the user must be dequoted before it
//! is matched against candidates.
//!
//! # Policies
//!
//! - [`QuotePolicy::Double`]: wrap in `"…"`, escaping `"` and `\` inside
//! - [`QuotePolicy::Single`]: wrap in `'…'`, writing `'` as `'\''`
//! - [`QuotePolicy::Backslash`]: never wrap, backslash-escape every special
//!   character in place
//!
//! When the user already typed an opening quote, that quote wins over the
//! policy.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::scanner::Scanner;
use super::syntax::{ShellSyntax, WHITESPACE};
use crate::utils::users;

/// How candidates are protected when no quote is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotePolicy {
    /// Prefer double quotes
    Double,
    /// Prefer single quotes
    Single,
    /// Backslash-escape in place
    #[default]
    Backslash,
}

impl QuotePolicy {
    /// Map a quote character as given on the command line
    pub fn from_quote_char(c: char) -> Option<Self> {
        match c {
            '"' => Some(QuotePolicy::Double),
            '\'' => Some(QuotePolicy::Single),
            '\\' => Some(QuotePolicy::Backslash),
            _ => None,
        }
    }

    /// The character wrapped around candidates, if any
    pub fn quote_char(self) -> Option<char> {
        match self {
            QuotePolicy::Double => Some('"'),
            QuotePolicy::Single => Some('\''),
            QuotePolicy::Backslash => None,
        }
    }
}

impl FromStr for QuotePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "double" => Ok(QuotePolicy::Double),
            "single" => Ok(QuotePolicy::Single),
            "backslash" => Ok(QuotePolicy::Backslash),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => QuotePolicy::from_quote_char(c),
                    _ => None,
                }
                .ok_or_else(|| format!("invalid quote character '{s}' (expected \", ' or \\)"))
            }
        }
    }
}

impl fmt::Display for QuotePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotePolicy::Double => write!(f, "double"),
            QuotePolicy::Single => write!(f, "single"),
            QuotePolicy::Backslash => write!(f, "backslash"),
        }
    }
}

/// Quoting codec for one session
#[derive(Debug, Clone)]
pub struct Quoting {
    syntax: ShellSyntax,
    policy: QuotePolicy,
    home: Option<String>,
    passwd: PathBuf,
}

impl Quoting {
    pub fn new(syntax: ShellSyntax, policy: QuotePolicy) -> Self {
        Self {
            syntax,
            policy,
            home: None,
            passwd: PathBuf::from(users::PASSWD),
        }
    }

    /// Home directory used to expand a leading `~/` before wrapping in quotes
    pub fn with_home(mut self, home: impl Into<String>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Password database used to expand a leading `~user/`
    pub fn with_passwd(mut self, passwd: impl Into<PathBuf>) -> Self {
        self.passwd = passwd.into();
        self
    }

    pub fn policy(&self) -> QuotePolicy {
        self.policy
    }

    pub fn syntax(&self) -> &ShellSyntax {
        &self.syntax
    }

    /// Quote a candidate for insertion into the line
    ///
    /// The result starts with the quote character whenever quoting is
    /// applied, including when the user typed it, so the replaced span must
    /// start at that quote. A unique match is closed with the quote character
    /// and a trailing space. A candidate ending in `/` names a directory and
    /// gets neither, so completion can continue inside it.
    ///
    /// # Arguments
    /// * `value` - Raw candidate text
    /// * `single_match` - Whether this is the only candidate
    /// * `quote_char` - Quote character the user opened, if any
    ///
    /// # Returns
    /// * `String` - Text to insert
    pub fn quote(&self, value: &str, single_match: bool, quote_char: Option<char>) -> String {
        if value.is_empty() {
            return String::new();
        }
        let closes = single_match && !value.ends_with('/');

        let Some(qc) = quote_char.or(self.policy.quote_char()) else {
            let mut quoted = self.backslash_quote(value);
            if closes {
                quoted.push(' ');
            }
            return quoted;
        };

        let explicit = quote_char.is_some();
        let (mut body, mut wrap) = self.escape(value, qc, explicit);
        if wrap
            && !explicit
            && let Some(expanded) = self.expand_tilde(value)
        {
            (body, wrap) = self.escape(&expanded, qc, explicit);
        }

        let mut quoted = String::with_capacity(body.len() + 3);
        if wrap {
            quoted.push(qc);
        }
        quoted.push_str(&body);
        if closes {
            if wrap {
                quoted.push(qc);
            }
            quoted.push(' ');
        }
        quoted
    }

    /// Escape `value` for use inside `qc` quotes
    ///
    /// Returns the escaped text and whether it has to be wrapped in quotes.
    fn escape(&self, value: &str, qc: char, explicit: bool) -> (String, bool) {
        if qc == '\'' {
            let wrap = explicit || value.chars().any(|c| self.syntax.needs_quoting(c));
            return (value.replace('\'', r"'\''"), wrap);
        }

        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            if c == '\\' || c == qc {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        let wrap = explicit || !self.is_fully_quoted(&escaped);
        (escaped, wrap)
    }

    /// Resolve a leading `~` or `~user`; quotes would keep it literal
    fn expand_tilde(&self, value: &str) -> Option<String> {
        let rest = value.strip_prefix('~')?;
        let (user, tail) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
        let mut expanded = if user.is_empty() {
            self.home.clone()?
        } else {
            let passwd = users::read_passwd(&self.passwd)?;
            users::home_of(&passwd, user)?.to_string()
        };
        expanded.truncate(expanded.trim_end_matches('/').len());
        expanded.push_str(tail);
        if expanded.is_empty() {
            expanded.push('/');
        }
        Some(expanded)
    }

    /// Strip one level of quoting from typed text
    ///
    /// `quote_char` is the quote open at the start of `value`; a leading
    /// occurrence of it in `value` is taken as that opening quote. Inside
    /// single quotes every character is literal. Elsewhere a backslash in
    /// front of a special character is removed. Quote characters delimiting
    /// spans and unquoted whitespace are dropped.
    pub fn dequote(&self, value: &str, quote_char: Option<char>) -> String {
        let mut out = String::with_capacity(value.len());
        let mut quote = quote_char;
        let mut chars = value.chars().peekable();
        if let Some(q) = quote_char
            && value.starts_with(q)
        {
            chars.next();
        }

        while let Some(c) = chars.next() {
            match quote {
                Some('\'') if c == '\'' => quote = None,
                Some('\'') => out.push(c),
                _ if c == '\\' => match chars.peek() {
                    Some(&next) if self.syntax.is_dequotable(next) => {
                        out.push(next);
                        chars.next();
                    }
                    _ => out.push(c),
                },
                Some(q) if c == q => quote = None,
                Some(_) => out.push(c),
                None if self.syntax.is_quote(c) => quote = Some(c),
                None if WHITESPACE.contains(c) => {}
                None => out.push(c),
            }
        }
        out
    }

    /// Check that every special character is already backslash-escaped
    pub fn is_fully_quoted(&self, value: &str) -> bool {
        let mut chars = value.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some(next) if self.syntax.needs_quoting(next) => continue,
                    _ => return false,
                }
            }
            if self.syntax.needs_quoting(c) {
                return false;
            }
        }
        true
    }

    /// Backslash-escape every special character; a leading `~` stays active
    pub fn backslash_quote(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() * 2);
        for (i, c) in value.char_indices() {
            if self.syntax.needs_quoting(c) && !(i == 0 && c == '~') {
                out.push('\\');
            }
            out.push(c);
        }
        out
    }

    /// Remove backslashes in front of special characters
    pub fn backslash_dequote(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut chars = value.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\'
                && let Some(&next) = chars.peek()
                && self.syntax.is_dequotable(next)
            {
                out.push(next);
                chars.next();
                continue;
            }
            out.push(c);
        }
        out
    }

    /// [`Scanner::char_is_quoted`] with this session's quote characters
    pub fn char_is_quoted(&self, line: &str, index: usize) -> bool {
        Scanner::new(self.syntax.quote_characters()).char_is_quoted(line, index)
    }
}

impl Default for Quoting {
    fn default() -> Self {
        Self::new(ShellSyntax::default(), QuotePolicy::default())
    }
}
