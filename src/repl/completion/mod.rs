//! Completion system for the gpgkeys shell
//!
//! Completion works on the raw line and the cursor position, using the
//! quote-aware scanner so it copes with half-typed quotes and escapes.
//!
//! # Architecture
//!
//! - **Context**: Locates the word under the cursor and decides what it completes to
//! - **Provider**: Fetches raw candidates (filenames, commands, keys, keyservers)
//! - **Engine**: Dequotes the word, dispatches on the context and quotes the results
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use gpgkeys::config::GnupgConfig;
//! use gpgkeys::parser::Quoting;
//! use gpgkeys::repl::completion::{CompletionEngine, GnupgCandidateProvider};
//!
//! let provider = Arc::new(GnupgCandidateProvider::new(&GnupgConfig::default()));
//! let engine = CompletionEngine::new(provider, Quoting::default());
//!
//! // Complete "list --se" with the cursor at the end
//! let (start, candidates) = engine.complete("list --se", 9);
//! assert_eq!(start, 5);
//! assert_eq!(candidates[0].replacement, "--secret ");
//! ```

mod context;
mod engine;
mod filename;
mod keyring;
mod provider;

pub use context::{CompletionContext, CompletionWord};
pub use engine::{CompletionEngine, CompletionPair};
pub use keyring::{KeyListing, parse_keyservers};
pub use provider::{Candidate, CandidateProvider, GnupgCandidateProvider};
