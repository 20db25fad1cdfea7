use std::{fmt, io};

/// Crate-wide `Result` type using [`GpgkeysError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, GpgkeysError>;

/// Top-level error type for gpgkeys operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum GpgkeysError {
    /// Command line parsing errors.
    Parse(ParseError),

    /// Command execution errors.
    Execution(ExecutionError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Line editor errors.
    Readline(String),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Option parsing errors.
///
/// The messages mirror GNU getopt so users see familiar wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The option is not in the vocabulary.
    UnknownOption(String),

    /// The option needs a value but none was given.
    MissingArgument(String),

    /// The option takes no value but one was given with `=`.
    UnexpectedArgument(String),

    /// The prefix matches more than one option.
    AmbiguousOption(String),

    /// The line names no known command.
    UnknownCommand(String),
}

/// Execution-specific errors.
#[derive(Debug)]
pub enum ExecutionError {
    /// The child process could not be started.
    SpawnFailed { program: String, reason: String },

    /// Changing the working directory failed.
    ChangeDirectory { path: String, reason: String },

    /// A umask value was rejected.
    InvalidUmask(String),

    /// The command was interrupted by the user.
    Interrupted,
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for GpgkeysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpgkeysError::Parse(e) => write!(f, "{e}"),
            GpgkeysError::Execution(e) => write!(f, "{e}"),
            GpgkeysError::Config(e) => write!(f, "Configuration error: {e}"),
            GpgkeysError::Io(e) => write!(f, "I/O error: {e}"),
            GpgkeysError::Readline(msg) => write!(f, "Readline error: {msg}"),
            GpgkeysError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownOption(opt) => write!(f, "option {opt} not recognized"),
            ParseError::MissingArgument(opt) => write!(f, "option {opt} requires argument"),
            ParseError::UnexpectedArgument(opt) => {
                write!(f, "option {opt} must not have an argument")
            }
            ParseError::AmbiguousOption(opt) => write!(f, "option {opt} not a unique prefix"),
            ParseError::UnknownCommand(cmd) => write!(f, "unknown command '{cmd}'"),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::SpawnFailed { program, reason } => {
                write!(f, "cannot run {program}: {reason}")
            }
            ExecutionError::ChangeDirectory { path, reason } => write!(f, "{path}: {reason}"),
            ExecutionError::InvalidUmask(value) => write!(f, "invalid umask '{value}'"),
            ExecutionError::Interrupted => write!(f, "interrupted"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for GpgkeysError {}
impl std::error::Error for ParseError {}
impl std::error::Error for ExecutionError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to GpgkeysError ========================= */

impl From<io::Error> for GpgkeysError {
    fn from(err: io::Error) -> Self {
        GpgkeysError::Io(err)
    }
}

impl From<ParseError> for GpgkeysError {
    fn from(err: ParseError) -> Self {
        GpgkeysError::Parse(err)
    }
}

impl From<ExecutionError> for GpgkeysError {
    fn from(err: ExecutionError) -> Self {
        GpgkeysError::Execution(err)
    }
}

impl From<ConfigError> for GpgkeysError {
    fn from(err: ConfigError) -> Self {
        GpgkeysError::Config(err)
    }
}

impl From<String> for GpgkeysError {
    fn from(msg: String) -> Self {
        GpgkeysError::Generic(msg)
    }
}

impl From<&str> for GpgkeysError {
    fn from(msg: &str) -> Self {
        GpgkeysError::Generic(msg.to_owned())
    }
}

impl From<toml::de::Error> for GpgkeysError {
    fn from(err: toml::de::Error) -> Self {
        GpgkeysError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<reedline::ReedlineError> for GpgkeysError {
    fn from(err: reedline::ReedlineError) -> Self {
        GpgkeysError::Readline(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_messages() {
        assert_eq!(
            ParseError::UnknownOption("--foo".into()).to_string(),
            "option --foo not recognized"
        );
        assert_eq!(
            ParseError::MissingArgument("--output".into()).to_string(),
            "option --output requires argument"
        );
        assert_eq!(
            ParseError::UnexpectedArgument("--armor".into()).to_string(),
            "option --armor must not have an argument"
        );
        assert_eq!(
            ParseError::AmbiguousOption("--s".into()).to_string(),
            "option --s not a unique prefix"
        );
        assert_eq!(
            ParseError::UnknownCommand("frob".into()).to_string(),
            "unknown command 'frob'"
        );
    }

    #[test]
    fn test_conversions() {
        let err: GpgkeysError = ParseError::UnknownOption("--x".into()).into();
        assert!(matches!(err, GpgkeysError::Parse(_)));
        assert_eq!(err.to_string(), "option --x not recognized");

        let err: GpgkeysError = io::Error::other("boom").into();
        assert!(matches!(err, GpgkeysError::Io(_)));

        let err: GpgkeysError = "plain".into();
        assert_eq!(err.to_string(), "plain");
    }
}
