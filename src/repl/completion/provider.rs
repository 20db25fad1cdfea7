//! Candidate provider for completion suggestions
//!
//! This module provides the trait and implementation for fetching completion
//! candidates: filenames, system commands, keys and keyservers.

use crate::config::GnupgConfig;

use super::filename;
use super::keyring::{Keyring, Keyservers};

/// A raw completion candidate, before quoting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub value: String,
    pub description: Option<String>,
}

impl Candidate {
    pub fn described(value: String, description: String) -> Self {
        Self {
            value,
            description: Some(description),
        }
    }
}

impl From<String> for Candidate {
    fn from(value: String) -> Self {
        Self {
            value,
            description: None,
        }
    }
}

impl From<&str> for Candidate {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

/// Trait for providing completion candidates
///
/// Prefixes are dequoted. Results are raw and get quoted by the engine.
pub trait CandidateProvider: Send + Sync {
    /// Files and directories; directories end in `/`
    fn filenames(&self, prefix: &str) -> Vec<String>;

    /// Executables on `$PATH`
    fn commands(&self, prefix: &str) -> Vec<String>;

    /// Short key ids, ignoring case
    fn key_ids(&self, prefix: &str) -> Vec<Candidate>;

    /// Full user ids, ignoring case
    fn user_ids(&self, prefix: &str) -> Vec<String>;

    /// Names within user ids, ignoring case
    fn names(&self, prefix: &str) -> Vec<String>;

    /// Keyservers from `gpg.conf`
    fn keyservers(&self, prefix: &str) -> Vec<String>;
}

/// Candidate provider backed by the filesystem and the GnuPG home
pub struct GnupgCandidateProvider {
    keyring: Keyring,
    keyservers: Keyservers,
}

impl GnupgCandidateProvider {
    /// Create a new candidate provider
    ///
    /// # Arguments
    /// * `gnupg` - gpg executable and home directory
    pub fn new(gnupg: &GnupgConfig) -> Self {
        Self {
            keyring: Keyring::new(gnupg.executable.clone(), &gnupg.home),
            keyservers: Keyservers::new(&gnupg.home),
        }
    }
}

impl CandidateProvider for GnupgCandidateProvider {
    fn filenames(&self, prefix: &str) -> Vec<String> {
        filename::complete_filename(prefix)
    }

    fn commands(&self, prefix: &str) -> Vec<String> {
        filename::complete_command(prefix)
    }

    fn key_ids(&self, prefix: &str) -> Vec<Candidate> {
        self.keyring.with_listing(|keys| keys.key_ids(prefix))
    }

    fn user_ids(&self, prefix: &str) -> Vec<String> {
        self.keyring.with_listing(|keys| keys.user_ids(prefix))
    }

    fn names(&self, prefix: &str) -> Vec<String> {
        self.keyring.with_listing(|keys| keys.names(prefix))
    }

    fn keyservers(&self, prefix: &str) -> Vec<String> {
        self.keyservers.matching(prefix)
    }
}
