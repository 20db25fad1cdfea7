//! Child processes that can be interrupted with Ctrl+C
//!
//! Commands run through `/bin/sh -c` with the terminal's stdio. Each run
//! races the child against a [`CancellationToken`]:
//!
//! 1. The child exits on its own: its exit code is returned
//! 2. The token is cancelled: the child is killed and the run fails with
//!    [`ExecutionError::Interrupted`]
//!
//! Pipelines ending in a pager are never killed; the pager handles the
//! interrupt itself and the run waits for it.

use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{ExecutionError, Result};

/// Programs that take over the terminal and handle Ctrl+C themselves
pub const PAGERS: &[&str] = &["less", "more", "most", "view", "man"];

const SHELL: &str = "/bin/sh";

/// True if any word of the command is a pager
pub fn has_pager<S: AsRef<str>>(words: &[S]) -> bool {
    words.iter().any(|w| PAGERS.contains(&w.as_ref()))
}

/// Join words into one shell command line, skipping empty words
pub fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(AsRef::as_ref)
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell(line: &str) -> Command {
    let mut command = Command::new(SHELL);
    command.arg("-c").arg(line).kill_on_drop(true);
    command
}

fn spawn_error(err: std::io::Error) -> ExecutionError {
    ExecutionError::SpawnFailed {
        program: SHELL.to_string(),
        reason: err.to_string(),
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Options for one child process
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Wait for the child even after Ctrl+C
    pub pager: bool,

    /// Discard the child's stderr
    pub quiet_stderr: bool,
}

/// Run a shell command line, killing it when `cancel_token` fires
///
/// # Arguments
/// * `line` - Command line passed to `/bin/sh -c`
/// * `cancel_token` - Token cancelled on Ctrl+C
/// * `options` - Pager and stderr handling
///
/// # Returns
/// * `Result<i32>` - Exit code of the child
pub async fn run_killable(
    line: &str,
    cancel_token: &CancellationToken,
    options: RunOptions,
) -> Result<i32> {
    info!("Running: {line}");
    let mut command = shell(line);
    if options.quiet_stderr {
        command.stderr(Stdio::null());
    }
    let mut child = command.spawn().map_err(spawn_error)?;

    if options.pager {
        let status = child.wait().await?;
        return Ok(exit_code(status));
    }

    tokio::select! {
        status = child.wait() => Ok(exit_code(status?)),
        _ = cancel_token.cancelled() => {
            debug!("Interrupted, killing: {line}");
            if let Err(e) = child.kill().await {
                debug!("Kill failed: {e}");
            }
            Err(ExecutionError::Interrupted.into())
        }
    }
}

/// Run a shell command line and return the first line it prints
///
/// Returns `None` when the command fails or prints nothing but whitespace.
pub async fn get_output(line: &str) -> Result<Option<String>> {
    let output = shell(line)
        .stdin(Stdio::inherit())
        .stderr(Stdio::inherit())
        .output()
        .await
        .map_err(spawn_error)?;

    if !output.status.success() {
        return Ok(None);
    }
    let text = String::from_utf8_lossy(&output.stdout);
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(text.lines().next().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_pager() {
        assert!(has_pager(&["list", "|", "less"]));
        assert!(has_pager(&["man", "gpg"]));
        assert!(!has_pager(&["list", "|", "lesser"]));
        assert!(!has_pager::<&str>(&[]));
    }

    #[test]
    fn test_join_words() {
        assert_eq!(join_words(&["gpg", "", "--list-keys"]), "gpg --list-keys");
        assert_eq!(join_words::<String>(&[]), "");
    }

    #[tokio::test]
    async fn test_exit_code() {
        let token = CancellationToken::new();
        let rc = run_killable("exit 3", &token, RunOptions::default())
            .await
            .unwrap();
        assert_eq!(rc, 3);
    }

    #[tokio::test]
    async fn test_cancelled_child_is_killed() {
        let token = CancellationToken::new();
        token.cancel();
        let result = run_killable("sleep 5", &token, RunOptions::default()).await;
        assert!(matches!(
            result,
            Err(crate::error::GpgkeysError::Execution(
                ExecutionError::Interrupted
            ))
        ));
    }

    #[tokio::test]
    async fn test_get_output_first_line() {
        let out = get_output("printf 'one\\ntwo\\n'").await.unwrap();
        assert_eq!(out.as_deref(), Some("one"));

        assert_eq!(get_output("true").await.unwrap(), None);
        assert_eq!(get_output("echo x; exit 1").await.unwrap(), None);
    }
}
