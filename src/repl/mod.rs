//! REPL (Read-Eval-Print Loop) engine for gpgkeys
//!
//! This module provides the interactive shell interface with features:
//! - Line editing with reedline and emacs key bindings
//! - File-backed command history with inline hints
//! - Context-aware TAB completion of commands, options, files and keys
//! - Highlighting of commands, options, operators and quoted spans
//! - Continuation lines after a trailing backslash

pub mod completer;
pub mod completion;
pub mod engine;
pub mod highlighter;
pub mod hinter;
pub mod prompt;
pub mod validator;

pub use completer::GpgkeysCompleter;
pub use engine::{ReadOutcome, ReplEngine};
pub use highlighter::GpgkeysHighlighter;
pub use hinter::GpgkeysHinter;
pub use prompt::GpgkeysPrompt;
pub use validator::GpgkeysValidator;
