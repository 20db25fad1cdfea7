//! gpgkeys library
//!
//! The building blocks of the gpgkeys shell: a quote-aware line lexer and
//! quoting codec, the command table, gpg and shell execution, and the
//! interactive line editor with context-aware completion.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `executor`: Command execution engine
//! - `parser`: Line lexer, quoting and command parsing
//! - `repl`: Interactive REPL engine and completion
//! - `utils`: Utility functions and helpers
//!
//! # Example
//!
//! ```no_run
//! use gpgkeys::{config::Config, executor::ExecutionContext};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let context = ExecutionContext::new(config.gnupg).with_interactive(false);
//!
//!     let result = context.execute("list --fingerprint alice").await;
//!     println!("gpg returned {}", result.rc);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod parser;
pub mod repl;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{GpgkeysError, Result};
pub use executor::{CommandRouter, ExecutionContext, ExecutionResult};
pub use parser::{Parser, QuotePolicy, Quoting};
pub use repl::ReplEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
