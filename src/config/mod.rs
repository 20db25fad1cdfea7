//! Configuration management for gpgkeys
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration file (TOML format)
//! - Environment variables (`GNUPGHOME`)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Environment variables
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::parser::QuotePolicy;
use crate::parser::syntax::{
    FILENAME_QUOTE_CHARACTERS, QUOTE_CHARACTERS, ShellSyntax, WORD_BREAK_CHARACTERS,
};
use crate::utils::expand_home;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GnuPG invocation
    #[serde(default)]
    pub gnupg: GnupgConfig,

    /// Completion and quoting
    #[serde(default)]
    pub completion: CompletionConfig,

    /// History configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GnuPG-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GnupgConfig {
    /// The gpg executable
    #[serde(default = "default_executable")]
    pub executable: String,

    /// GnuPG home directory holding keyrings and gpg.conf
    #[serde(default = "default_gnupg_home")]
    pub home: PathBuf,

    /// Process umask applied at startup, as an octal string
    #[serde(default = "default_umask")]
    pub umask: String,
}

/// Completion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// How inserted filenames and user ids are quoted
    #[serde(default)]
    pub quote_policy: QuotePolicy,

    /// Characters opening quoted spans
    #[serde(default = "default_quote_characters")]
    pub quote_characters: String,

    /// Characters ending a completion word
    #[serde(default = "default_word_break_characters")]
    pub word_break_characters: String,

    /// Characters protected in inserted filenames
    #[serde(default = "default_filename_quote_characters")]
    pub filename_quote_characters: String,
}

/// Command history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Path to log file (None for stderr)
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_executable() -> String {
    "gpg".to_string()
}

fn default_gnupg_home() -> PathBuf {
    match std::env::var_os("GNUPGHOME") {
        Some(home) if !home.is_empty() => expand_home(&PathBuf::from(home)),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gnupg"),
    }
}

fn default_umask() -> String {
    "077".to_string()
}

fn default_quote_characters() -> String {
    QUOTE_CHARACTERS.to_string()
}

fn default_word_break_characters() -> String {
    WORD_BREAK_CHARACTERS.to_string()
}

fn default_filename_quote_characters() -> String {
    FILENAME_QUOTE_CHARACTERS.to_string()
}

fn default_max_history_size() -> usize {
    200
}

fn default_history_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gpgkeys_history")
}

fn default_persist_history() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for GnupgConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            home: default_gnupg_home(),
            umask: default_umask(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            quote_policy: QuotePolicy::default(),
            quote_characters: default_quote_characters(),
            word_break_characters: default_word_break_characters(),
            filename_quote_characters: default_filename_quote_characters(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: default_persist_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `~/.gpgkeys/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gpgkeys")
            .join("config.toml")
    }

    /// Load configuration from a file
    ///
    /// A missing file is not an error: the defaults are returned instead.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file, or `None` for the default
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.expand_paths();
        Ok(config)
    }

    /// Expand a leading `~` in configured paths
    fn expand_paths(&mut self) {
        self.gnupg.home = expand_home(&self.gnupg.home);
        self.history.file_path = expand_home(&self.history.file_path);
        if let Some(path) = &self.logging.file_path {
            self.logging.file_path = Some(expand_home(path));
        }
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.gnupg.executable.trim().is_empty() {
            return Err(invalid("gnupg.executable", &self.gnupg.executable));
        }
        if self.umask().is_none() {
            return Err(invalid("gnupg.umask", &self.gnupg.umask));
        }

        let completion = &self.completion;
        if completion.quote_characters.is_empty()
            || !completion.quote_characters.chars().all(|c| c == '"' || c == '\'')
        {
            return Err(invalid(
                "completion.quote_characters",
                &completion.quote_characters,
            ));
        }
        if !completion
            .quote_characters
            .chars()
            .all(|c| completion.word_break_characters.contains(c))
        {
            return Err(invalid(
                "completion.word_break_characters",
                &completion.word_break_characters,
            ));
        }
        if self.history.max_size == 0 {
            return Err(invalid("history.max_size", "0"));
        }

        Ok(())
    }

    /// The configured umask, if it is a valid octal mode
    pub fn umask(&self) -> Option<u32> {
        u32::from_str_radix(self.gnupg.umask.trim(), 8)
            .ok()
            .filter(|mask| *mask < 0o1000)
    }

    /// Character classes for the line lexer
    pub fn syntax(&self) -> ShellSyntax {
        ShellSyntax::new(
            self.completion.quote_characters.clone(),
            self.completion.word_break_characters.clone(),
            self.completion.filename_quote_characters.clone(),
        )
    }

    /// Serialize the configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }
}

fn invalid(field: &str, value: &str) -> crate::error::GpgkeysError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
