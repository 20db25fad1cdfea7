//! Error handling for gpgkeys.
//!
//! All fallible operations return [`Result`], whose error type
//! [`GpgkeysError`] wraps the parse, execution and configuration error kinds.
//! Parse and execution errors render as the bare message; the shell prefixes
//! them with `gpgkeys: ` when reporting.
//!
//! # Example
//!
//! ```rust
//! use gpgkeys::error::{GpgkeysError, ParseError, Result};
//!
//! fn reject(option: &str) -> Result<()> {
//!     Err(ParseError::UnknownOption(option.to_string()).into())
//! }
//!
//! let err = reject("--frob").unwrap_err();
//! assert!(matches!(err, GpgkeysError::Parse(_)));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, ExecutionError, GpgkeysError, ParseError, Result};
