//! Command execution engine for gpgkeys
//!
//! This module provides the execution layer that turns parsed command lines
//! into processes. It includes:
//! - gpg invocation planning for the key management commands
//! - Shell escapes with the `cd`, `umask`, `ls`, `ll` and `man` builtins
//! - Help texts
//! - Child processes that Ctrl+C can interrupt
//! - Command router for dispatching lines to the handlers above

pub mod context;
pub mod gnupg;
pub mod help;
pub mod killable;
pub mod result;
pub mod router;
pub mod shell;

pub use context::ExecutionContext;
pub use result::ExecutionResult;
pub use router::CommandRouter;
pub use shell::apply_umask;

impl ExecutionContext {
    /// Execute a command line in this context
    pub async fn execute(&self, line: &str) -> ExecutionResult {
        CommandRouter::new(self.clone()).execute(line).await
    }
}
