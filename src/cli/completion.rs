//! Shell completion generation for gpgkeys
//!
//! Prints `clap_complete` scripts for bash, zsh and fish. The scripts
//! complete the command line flags; the gpgkeys commands themselves are
//! completed inside the interactive shell.

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result};

const BIN_NAME: &str = "gpgkeys";

/// Generate shell completion script
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn generate_completion(shell_name: &str) -> Result<()> {
    let script = completion_script(parse_shell(shell_name)?);
    io::stdout().write_all(&script)?;
    Ok(())
}

/// Render the completion script for `shell`
fn completion_script(shell: Shell) -> Vec<u8> {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    buffer
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(ConfigError::InvalidValue {
            field: "--completions".to_string(),
            value: format!("{shell_name} (supported shells: bash, zsh, fish)"),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell() {
        assert!(matches!(parse_shell("bash"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("fish"), Ok(Shell::Fish)));
        assert!(parse_shell("powershell").is_err());
    }

    #[test]
    fn test_parse_shell_case_insensitive() {
        assert!(matches!(parse_shell("BASH"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("FiSh"), Ok(Shell::Fish)));
    }

    #[test]
    fn test_completion_script_mentions_flags() {
        let script = String::from_utf8(completion_script(Shell::Bash)).unwrap();
        assert!(script.contains("gpgkeys"));
        assert!(script.contains("--quote-char"));
    }
}
