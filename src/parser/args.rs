//! GNU-style long option parsing for command arguments
//!
//! Options may appear anywhere among the arguments, `--` ends option
//! processing, values are given as `--name=value` or `--name value`, and any
//! unique prefix of an option name is accepted. Tokens keep their quotes;
//! the assembled command line goes through the shell exactly once.

use crate::error::ParseError;

/// Long options understood by the shell, and whether they take a value
const LONG_OPTIONS: &[(&str, bool)] = &[
    ("openpgp", false),
    ("local-user", true),
    ("fingerprint", false),
    ("with-colons", false),
    ("clean", false),
    ("minimal", false),
    ("merge-only", false),
    ("armor", false),
    ("output", true),
    ("keyserver", true),
    ("expert", false),
    ("secret", false),
    ("secret-and-public", false),
];

/// Parsed command arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub openpgp: bool,
    pub local_user: Option<String>,
    /// `--fingerprint` may be repeated
    pub fingerprint: usize,
    pub with_colons: bool,
    pub merge_only: bool,
    pub clean: bool,
    pub minimal: bool,
    pub armor: bool,
    pub output: Option<String>,
    pub keyserver: Option<String>,
    pub expert: bool,
    pub secret: bool,
    pub secret_and_public: bool,
    /// Positional arguments
    pub args: Vec<String>,
    /// Everything from the first shell operator on
    pub pipe: Vec<String>,
}

/// Resolve `name` to a long option, exactly or by unique prefix
fn lookup(name: &str) -> Result<(&'static str, bool), ParseError> {
    if let Some(&(full, takes_value)) = LONG_OPTIONS.iter().find(|(n, _)| *n == name) {
        return Ok((full, takes_value));
    }
    let mut candidates = LONG_OPTIONS.iter().filter(|(n, _)| n.starts_with(name));
    match (candidates.next(), candidates.next()) {
        (Some(&(full, takes_value)), None) => Ok((full, takes_value)),
        (Some(_), Some(_)) => Err(ParseError::AmbiguousOption(format!("--{name}"))),
        (None, _) => Err(ParseError::UnknownOption(format!("--{name}"))),
    }
}

impl Args {
    /// Parse the argument tokens preceding the first shell operator
    ///
    /// # Arguments
    /// * `tokens` - Raw word tokens, quotes still in place
    ///
    /// # Returns
    /// * `Result<Args, ParseError>` - Parsed arguments or the first error
    pub fn parse<I, S>(tokens: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Args::default();
        let mut tokens = tokens.into_iter().map(|t| t.as_ref().to_string());

        while let Some(token) = tokens.next() {
            if token == "--" {
                parsed.args.extend(tokens.by_ref());
                break;
            }
            if let Some(body) = token.strip_prefix("--") {
                let (name, inline) = match body.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_string())),
                    None => (body, None),
                };
                let (full, takes_value) = lookup(name)?;
                let value = match (takes_value, inline) {
                    (true, Some(value)) => Some(value),
                    (true, None) => Some(
                        tokens
                            .next()
                            .ok_or_else(|| ParseError::MissingArgument(format!("--{full}")))?,
                    ),
                    (false, Some(_)) => {
                        return Err(ParseError::UnexpectedArgument(format!("--{full}")));
                    }
                    (false, None) => None,
                };
                parsed.set(full, value);
            } else if token.len() > 1 && token.starts_with('-') {
                // No short options exist
                let flag = token.chars().nth(1).unwrap_or('-');
                return Err(ParseError::UnknownOption(format!("-{flag}")));
            } else {
                parsed.args.push(token);
            }
        }

        Ok(parsed)
    }

    fn set(&mut self, name: &str, value: Option<String>) {
        match name {
            "openpgp" => self.openpgp = true,
            "local-user" => self.local_user = value,
            "fingerprint" => self.fingerprint += 1,
            "with-colons" => self.with_colons = true,
            "clean" => self.clean = true,
            "minimal" => self.minimal = true,
            "merge-only" => self.merge_only = true,
            "armor" => self.armor = true,
            "output" => self.output = value,
            "keyserver" => self.keyserver = value,
            "expert" => self.expert = true,
            "secret" => self.secret = true,
            "secret-and-public" => self.secret_and_public = true,
            _ => {}
        }
    }

    /// gpg options corresponding to the parsed flags
    pub fn options(&self) -> Vec<String> {
        let mut options = Vec::new();
        if self.openpgp {
            options.push("--openpgp".to_string());
        }
        if let Some(user) = self.local_user.as_deref().filter(|u| !u.is_empty()) {
            options.push(format!("--local-user {user}"));
        }
        options.extend((0..self.fingerprint).map(|_| "--with-fingerprint".to_string()));
        if self.with_colons {
            options.push("--with-colons".to_string());
        }
        if self.armor {
            options.push("--armor".to_string());
        }
        if let Some(output) = self.output.as_deref().filter(|o| !o.is_empty()) {
            options.push(format!("--output {output}"));
        }
        if let Some(server) = self.keyserver.as_deref().filter(|s| !s.is_empty()) {
            options.push(format!("--keyserver {server}"));
            options.push("--keyserver-options no-honor-keyserver-url".to_string());
        }
        if self.expert {
            options.push("--expert".to_string());
        }
        if self.merge_only {
            options.push("--import-options merge-only".to_string());
            options.push("--keyserver-options merge-only".to_string());
        }
        if self.clean {
            options.push("--import-options import-clean".to_string());
            options.push("--export-options export-clean".to_string());
            options.push("--keyserver-options import-clean".to_string());
            options.push("--keyserver-options export-clean".to_string());
        }
        if self.minimal {
            options.push("--import-options import-minimal".to_string());
            options.push("--export-options export-minimal".to_string());
        }
        options
    }

    /// Options, positional arguments and pipe, in command line order
    pub fn tuple(&self) -> Vec<String> {
        let mut all = self.options();
        all.extend(self.args.iter().cloned());
        all.extend(self.pipe.iter().cloned());
        all
    }

    /// True when the pipe starts with an input redirection
    pub fn reads_stdin_redirect(&self) -> bool {
        self.pipe.first().is_some_and(|op| op == "<")
    }
}
