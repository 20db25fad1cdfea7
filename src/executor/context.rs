//! Execution context management
//!
//! This module provides the ExecutionContext which carries the settings every
//! command needs: how to invoke gpg, whether the session is interactive, and
//! the cancellation token tripped by Ctrl+C.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::GnupgConfig;
use crate::parser::ShellSyntax;

/// Execution context shared by all commands of a session
#[derive(Clone)]
pub struct ExecutionContext {
    /// GnuPG settings
    gnupg: Arc<GnupgConfig>,

    /// Quote characters command lines are split with
    syntax: Arc<ShellSyntax>,

    /// Echo gpg command lines to stderr
    verbose: bool,

    /// Running inside the interactive shell rather than one-shot
    interactive: bool,

    /// Cancelled when the user presses Ctrl+C
    cancel_token: CancellationToken,
}

impl ExecutionContext {
    /// Create a new execution context
    ///
    /// # Arguments
    /// * `gnupg` - GnuPG settings
    ///
    /// # Returns
    /// * `Self` - New, interactive, non-verbose context
    pub fn new(gnupg: GnupgConfig) -> Self {
        Self {
            gnupg: Arc::new(gnupg),
            syntax: Arc::new(ShellSyntax::default()),
            verbose: false,
            interactive: true,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_syntax(mut self, syntax: ShellSyntax) -> Self {
        self.syntax = Arc::new(syntax);
        self
    }

    pub fn syntax(&self) -> &ShellSyntax {
        &self.syntax
    }

    pub fn gnupg(&self) -> &GnupgConfig {
        &self.gnupg
    }

    /// The gpg executable
    pub fn executable(&self) -> &str {
        &self.gnupg.executable
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Get the cancellation token for the running command
    pub fn get_cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Replace the token; a cancelled token stays cancelled forever
    pub fn reset_cancel_token(&mut self) {
        self.cancel_token = CancellationToken::new();
    }
}
