//! Command router for dispatching command lines
//!
//! This module provides the CommandRouter which resolves the command word of
//! a line and dispatches it:
//! - Key management commands → gpg
//! - `shell`, `!`, `.` → shell escapes
//! - `help`, `?` → help texts
//! - `quit`, `EOF`, `clear` → handled in place

use std::io::Write;
use std::time::Instant;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use tracing::debug;

use crate::error::{ExecutionError, GpgkeysError, Result};
use crate::parser::{CommandKind, CommandLine, Parser};

use super::context::ExecutionContext;
use super::gnupg::{self, GnupgPlan};
use super::help;
use super::killable::{RunOptions, has_pager, join_words, run_killable};
use super::result::ExecutionResult;
use super::shell::{self, ShellCommand};

/// Command router that dispatches command lines to their handlers
pub struct CommandRouter {
    /// Execution context
    context: ExecutionContext,

    parser: Parser,
}

impl CommandRouter {
    /// Create a new command router
    ///
    /// # Arguments
    /// * `context` - Execution context
    pub fn new(context: ExecutionContext) -> Self {
        Self {
            parser: Parser::with_syntax(context.syntax().clone()),
            context,
        }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Execute a line, reporting errors on stderr
    ///
    /// Parse and execution errors print `gpgkeys: <message>` and yield
    /// return code 1. An interrupted command yields 1 silently.
    pub async fn execute(&self, line: &str) -> ExecutionResult {
        match self.route(line).await {
            Ok(result) => result,
            Err(GpgkeysError::Execution(ExecutionError::Interrupted)) => {
                debug!("Interrupted: {line}");
                ExecutionResult::failure()
            }
            Err(e) => {
                eprintln!("gpgkeys: {e}");
                ExecutionResult::failure()
            }
        }
    }

    /// Route a line to its handler
    ///
    /// # Arguments
    /// * `line` - Command line as typed
    ///
    /// # Returns
    /// * `Result<ExecutionResult>` - Execution result or error
    pub async fn route(&self, line: &str) -> Result<ExecutionResult> {
        let Some(command) = self.parser.parse(line)? else {
            return Ok(ExecutionResult::success());
        };
        debug!("Routing command: {} {:?}", command.spec.name, command.rest);

        let start = Instant::now();

        let result = match command.spec.kind {
            CommandKind::Quit => Ok(ExecutionResult::quit()),
            CommandKind::Eof => {
                if self.context.is_interactive() {
                    println!();
                }
                Ok(ExecutionResult::quit())
            }
            CommandKind::Clear => self.clear(),
            CommandKind::Shell => {
                let words: Vec<String> = command.tokens().into_iter().map(|t| t.text).collect();
                shell::execute(ShellCommand::from_words(&words), &self.context).await
            }
            CommandKind::Help => Ok(self.help(command.rest.trim())),
            _ => self.gnupg(&command).await,
        };

        debug!("Command executed in {}ms", start.elapsed().as_millis());
        result
    }

    async fn gnupg(&self, command: &CommandLine) -> Result<ExecutionResult> {
        let args = command.args()?;
        let executable = self.context.executable();
        let plan = gnupg::plan(
            command.spec.kind,
            args,
            executable,
            self.context.is_interactive(),
            command.spec.requires_args,
        );

        match plan {
            Some(GnupgPlan::Run(words)) => {
                let line = format!("{executable} {}", join_words(&words));
                if self.context.is_verbose() {
                    eprintln!("gpgkeys: {line}");
                }
                let options = RunOptions {
                    pager: has_pager(&words),
                    ..Default::default()
                };
                let rc = run_killable(&line, &self.context.get_cancel_token(), options).await?;
                Ok(ExecutionResult::code(rc))
            }
            Some(GnupgPlan::Help) => Ok(self.help(command.spec.name)),
            None => Ok(ExecutionResult::success()),
        }
    }

    fn help(&self, topic: &str) -> ExecutionResult {
        if topic.is_empty() {
            print!("{}", help::overview(help::terminal_width()));
            return ExecutionResult::success();
        }
        match help::topic(topic) {
            Some(text) => {
                print!("{text}");
                ExecutionResult::success()
            }
            None => {
                eprintln!("gpgkeys: no help on '{topic}'");
                ExecutionResult::failure()
            }
        }
    }

    fn clear(&self) -> Result<ExecutionResult> {
        let mut stdout = std::io::stdout();
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        stdout.flush()?;
        Ok(ExecutionResult::success())
    }
}
