//! Command-line interface for gpgkeys
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Mode selection (one-shot command vs interactive shell)

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::parser::QuotePolicy;

pub mod completion;

/// Interactive command line shell for GnuPG key management
#[derive(Parser, Debug)]
#[command(
    name = "gpgkeys",
    version,
    about = "A crypto-shell for GnuPG",
    long_about = "gpgkeys is an interactive shell for managing GnuPG keys and keyrings.
With a COMMAND it runs that single command and exits with its return code.",
    after_help = "Type 'gpgkeys' to start the interactive shell, then 'help' for the list of commands."
)]
pub struct CliArgs {
    /// Quote character used when completing arguments (", ' or \)
    #[arg(short = 'q', long = "quote-char", value_name = "CHAR")]
    pub quote_char: Option<QuotePolicy>,

    /// Print the gpg command line before running it
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Verbose mode with debug logging
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Quiet mode (no banner, errors only in the log)
    #[arg(long)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Print a completion script for SHELL (bash, zsh, fish) and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Command to run instead of starting the shell
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    pub command: Vec<String>,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("gpgkeys: {e}");
            eprintln!("gpgkeys: using the default configuration instead");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);
        Ok(config)
    }

    /// Override configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if let Some(policy) = args.quote_char {
            config.completion.quote_policy = policy;
        }

        config.logging.level = if args.very_verbose {
            LogLevel::Debug
        } else if args.verbose {
            LogLevel::Info
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Whether gpg command lines are echoed
    pub fn is_verbose(&self) -> bool {
        self.args.verbose || self.args.very_verbose
    }

    /// The one-shot command line, if arguments were given
    pub fn command_line(&self) -> Option<String> {
        if self.args.command.is_empty() {
            None
        } else {
            Some(self.args.command.join(" "))
        }
    }

    /// Handle the flags that print something and exit
    ///
    /// # Returns
    /// * `Result<bool>` - True if a flag was handled and gpgkeys should exit
    pub fn handle_flags(&self) -> Result<bool> {
        if let Some(shell) = &self.args.completions {
            completion::generate_completion(shell)?;
            return Ok(true);
        }
        if self.args.show_config {
            self.show_config()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        println!("# Configuration file: {}", self.config_path().display());
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    pub fn config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Print the greeting of the interactive shell
    pub fn print_banner(&self) {
        if !self.args.quiet {
            println!("{}", banner());
        }
    }
}

/// Greeting of the interactive shell
pub fn banner() -> String {
    format!("gpgkeys {} (type help for help)\n", env!("CARGO_PKG_VERSION"))
}
