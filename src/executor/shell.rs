//! Shell escape commands
//!
//! `!` and `.` hand their line to `/bin/sh`, except for a few builtins that
//! have to act on the gpgkeys process itself (`cd`, `umask`) or that get
//! friendlier defaults (`ls`, `ll`, `man`).

use tracing::{debug, warn};

use super::context::ExecutionContext;
use super::killable::{RunOptions, get_output, has_pager, join_words, run_killable};
use super::result::ExecutionResult;
use crate::error::{ExecutionError, Result};

const DEFAULT_SHELL: &str = "/bin/sh";

/// A shell escape line, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Start `$SHELL`
    Interactive,
    /// Change the working directory of gpgkeys; `None` means home
    ChangeDir(Option<String>),
    /// Show or set the file creation mask of gpgkeys
    Umask(Vec<String>),
    /// Show a manual page
    Manual(Vec<String>),
    /// Run a command line
    Run(String),
}

impl ShellCommand {
    /// Classify the words of a shell escape line
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let Some((first, rest)) = words.split_first() else {
            return Self::Interactive;
        };
        let rest: Vec<String> = rest.iter().map(|w| w.as_ref().to_string()).collect();
        match first.as_ref() {
            "ls" => Self::Run(command_line(&["ls", "-F"], &rest)),
            "ll" => Self::Run(command_line(&["ls", "-lF"], &rest)),
            "cd" | "chdir" => Self::ChangeDir(rest.into_iter().next()),
            "umask" => Self::Umask(rest),
            "man" => Self::Manual(rest),
            _ => Self::Run(join_words(words)),
        }
    }
}

fn command_line(program: &[&str], args: &[String]) -> String {
    let mut words: Vec<String> = program.iter().map(|w| w.to_string()).collect();
    words.extend(args.iter().cloned());
    join_words(&words)
}

/// Apply a file creation mask to this process
pub fn apply_umask(mask: u32) {
    #[cfg(unix)]
    {
        use nix::sys::stat::Mode;
        nix::sys::stat::umask(Mode::from_bits_truncate(mask as nix::libc::mode_t));
        debug!("umask set to {mask:03o}");
    }
    #[cfg(not(unix))]
    debug!("umask {mask:03o} ignored on this platform");
}

/// Execute a shell escape command
pub async fn execute(command: ShellCommand, ctx: &ExecutionContext) -> Result<ExecutionResult> {
    let token = ctx.get_cancel_token();
    match command {
        ShellCommand::Interactive => {
            let shell = std::env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string());
            let options = RunOptions {
                pager: true,
                ..Default::default()
            };
            run_killable(&shell, &token, options).await.map(ExecutionResult::code)
        }
        ShellCommand::ChangeDir(dir) => change_dir(dir).await,
        ShellCommand::Umask(args) => set_umask(&args, ctx).await,
        ShellCommand::Manual(args) => manual(&args, ctx).await,
        ShellCommand::Run(line) => {
            let options = RunOptions {
                pager: has_pager(&line.split_whitespace().collect::<Vec<_>>()),
                ..Default::default()
            };
            run_killable(&line, &token, options).await.map(ExecutionResult::code)
        }
    }
}

async fn change_dir(dir: Option<String>) -> Result<ExecutionResult> {
    // The shell resolves quoting, `~user` and `$VARS`
    let target = match dir {
        Some(dir) => get_output(&format!("cd {dir} && pwd")).await?,
        None => dirs::home_dir().map(|h| h.to_string_lossy().into_owned()),
    };
    let Some(target) = target else {
        return Ok(ExecutionResult::failure());
    };

    std::env::set_current_dir(&target).map_err(|e| ExecutionError::ChangeDirectory {
        path: target.clone(),
        reason: e.to_string(),
    })?;
    debug!("Changed directory to {target}");
    Ok(ExecutionResult::success())
}

async fn set_umask(args: &[String], ctx: &ExecutionContext) -> Result<ExecutionResult> {
    let token = ctx.get_cancel_token();
    let line = command_line(&["umask"], args);
    let rc = run_killable(&line, &token, RunOptions::default()).await?;
    let Some(value) = args.first() else {
        return Ok(ExecutionResult::code(rc));
    };
    if rc != 0 {
        return Ok(ExecutionResult::code(rc));
    }

    let mask = u32::from_str_radix(value, 8)
        .map_err(|_| ExecutionError::InvalidUmask(value.clone()))?;
    if mask < 0o1000 {
        apply_umask(mask);
    } else {
        warn!("umask {value} out of range, not applied");
    }
    Ok(ExecutionResult::success())
}

async fn manual(args: &[String], ctx: &ExecutionContext) -> Result<ExecutionResult> {
    if args.is_empty() {
        eprintln!("What manual page do you want?");
        return Ok(ExecutionResult::success());
    }

    let token = ctx.get_cancel_token();
    let line = command_line(&["man"], args);
    let options = RunOptions {
        pager: true,
        quiet_stderr: true,
    };
    let rc = run_killable(&line, &token, options).await?;
    if rc == 1 {
        eprintln!("No manual entry for {}", args.join(" "));
    }
    Ok(ExecutionResult::code(rc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GnupgConfig;

    #[test]
    fn test_classify_builtins() {
        assert_eq!(ShellCommand::from_words::<&str>(&[]), ShellCommand::Interactive);
        assert_eq!(
            ShellCommand::from_words(&["ls", "~/.gnupg"]),
            ShellCommand::Run("ls -F ~/.gnupg".to_string())
        );
        assert_eq!(
            ShellCommand::from_words(&["ll"]),
            ShellCommand::Run("ls -lF".to_string())
        );
        assert_eq!(
            ShellCommand::from_words(&["chdir", "'my dir'", "extra"]),
            ShellCommand::ChangeDir(Some("'my dir'".to_string()))
        );
        assert_eq!(
            ShellCommand::from_words(&["cd"]),
            ShellCommand::ChangeDir(None)
        );
        assert_eq!(
            ShellCommand::from_words(&["umask", "022"]),
            ShellCommand::Umask(vec!["022".to_string()])
        );
        assert_eq!(
            ShellCommand::from_words(&["man", "gpg"]),
            ShellCommand::Manual(vec!["gpg".to_string()])
        );
        assert_eq!(
            ShellCommand::from_words(&["echo", "'a b'", "|", "wc"]),
            ShellCommand::Run("echo 'a b' | wc".to_string())
        );
    }

    #[tokio::test]
    async fn test_run_exit_code() {
        let ctx = ExecutionContext::new(GnupgConfig::default());
        let result = execute(ShellCommand::Run("exit 4".to_string()), &ctx)
            .await
            .unwrap();
        assert_eq!(result.rc, 4);
    }

    #[tokio::test]
    async fn test_change_dir_failure() {
        let ctx = ExecutionContext::new(GnupgConfig::default());
        let missing = "/nonexistent/gpgkeys-test-dir".to_string();
        let result = execute(ShellCommand::ChangeDir(Some(missing)), &ctx)
            .await
            .unwrap();
        assert_eq!(result.rc, 1);
    }

    #[tokio::test]
    async fn test_manual_without_page() {
        let ctx = ExecutionContext::new(GnupgConfig::default());
        let result = execute(ShellCommand::Manual(Vec::new()), &ctx).await.unwrap();
        assert!(result.is_success());
    }
}
