//! Utility functions and helpers for gpgkeys
//!
//! This module provides common utility functions used throughout the application:
//! - File system helpers
//! - String decoding for gpg's machine-readable output
//! - Password database lookups

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::Result;

pub use fs::expand_home;

/// File system utilities
pub mod fs {
    use super::*;

    /// Ensure directory exists, create if not
    ///
    /// # Arguments
    /// * `path` - Directory path
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn ensure_dir_exists<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Expand home directory in path
    ///
    /// # Arguments
    /// * `path` - Path potentially starting with ~
    ///
    /// # Returns
    /// * `PathBuf` - Expanded path
    pub fn expand_home(path: &Path) -> PathBuf {
        let Some(home) = dirs::home_dir() else {
            return path.to_path_buf();
        };
        match path.strip_prefix("~") {
            Ok(rest) => home.join(rest),
            Err(_) => path.to_path_buf(),
        }
    }

    /// Modification time of a file, `None` if it does not exist
    pub fn modified(path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    /// Latest modification time among `paths`
    ///
    /// Used as a cache key: a cache is stale when this value changes.
    pub fn latest_modified<'a, I>(paths: I) -> Option<SystemTime>
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        paths.into_iter().filter_map(|p| modified(p)).max()
    }
}

/// String utilities
pub mod string {
    /// Decode `\xNN` escapes as written by `gpg --with-colons`
    ///
    /// gpg escapes colons and control characters in user ids. The decoded
    /// bytes are interpreted as UTF-8, replacing invalid sequences.
    ///
    /// # Arguments
    /// * `s` - Field text from a colon listing
    ///
    /// # Returns
    /// * `String` - Decoded text
    pub fn unescape_colons(s: &str) -> String {
        let bytes = s.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\\'
                && bytes.get(i + 1) == Some(&b'x')
                && let Some(hex) = s.get(i + 2..i + 4)
                && is_hex(hex)
                && let Ok(byte) = u8::from_str_radix(hex, 16)
            {
                out.push(byte);
                i += 4;
                continue;
            }
            out.push(bytes[i]);
            i += 1;
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// True if `s` is non-empty and consists of hex digits only
    pub fn is_hex(s: &str) -> bool {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

/// Password database lookups for `~user` paths
pub mod users {
    use std::path::Path;

    use tracing::debug;

    /// Default location of the password database
    pub const PASSWD: &str = "/etc/passwd";

    /// Read a password database, `None` if it cannot be read
    pub fn read_passwd(path: &Path) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("Cannot read {}: {e}", path.display());
                None
            }
        }
    }

    /// `(name, home)` of every entry, skipping comments and blank names
    pub fn entries(passwd: &str) -> impl Iterator<Item = (&str, &str)> {
        passwd
            .lines()
            .filter(|line| !line.starts_with('#'))
            .filter_map(|line| {
                let mut fields = line.split(':');
                let name = fields.next().filter(|name| !name.is_empty())?;
                Some((name, fields.nth(4).unwrap_or_default()))
            })
    }

    /// Home directory of `name`
    pub fn home_of<'a>(passwd: &'a str, name: &str) -> Option<&'a str> {
        entries(passwd)
            .find(|(user, _)| *user == name)
            .map(|(_, home)| home)
            .filter(|home| !home.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(fs::expand_home(Path::new("~/.gnupg")), home.join(".gnupg"));
        assert_eq!(fs::expand_home(Path::new("~")), home);
        assert_eq!(
            fs::expand_home(Path::new("/etc/passwd")),
            PathBuf::from("/etc/passwd")
        );
        assert_eq!(fs::expand_home(Path::new("~jane")), PathBuf::from("~jane"));
    }

    #[test]
    fn test_ensure_dir_exists() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        fs::ensure_dir_exists(&nested).unwrap();
    }

    #[test]
    fn test_latest_modified() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("pubring.kbx");
        std::fs::write(&present, b"x").unwrap();
        let missing = dir.path().join("secring.gpg");

        let paths = vec![present.clone(), missing];
        assert_eq!(fs::latest_modified(&paths), fs::modified(&present));
        assert!(fs::latest_modified(&Vec::<PathBuf>::new()).is_none());
    }

    #[test]
    fn test_unescape_colons() {
        assert_eq!(string::unescape_colons("plain"), "plain");
        assert_eq!(
            string::unescape_colons(r"Alice \x3a Work <a@b.org>"),
            "Alice : Work <a@b.org>"
        );
        assert_eq!(string::unescape_colons(r"J\xc3\xbcrgen"), "Jürgen");
        assert_eq!(string::unescape_colons(r"trailing\x4"), r"trailing\x4");
        assert_eq!(string::unescape_colons(r"bad\xzz"), r"bad\xzz");
    }

    #[test]
    fn test_is_hex() {
        assert!(string::is_hex("DEADbeef"));
        assert!(!string::is_hex(""));
        assert!(!string::is_hex("0xAB"));
    }

    #[test]
    fn test_passwd_entries() {
        let passwd = "root:x:0:0:root:/root:/bin/sh\n\
                      # comment\n\
                      rob:x:1000:1000::/home/rob:/bin/sh\n\
                      nohome:x:1001:1001::\n";
        let names: Vec<&str> = users::entries(passwd).map(|(name, _)| name).collect();
        assert_eq!(names, vec!["root", "rob", "nohome"]);
        assert_eq!(users::home_of(passwd, "rob"), Some("/home/rob"));
        assert_eq!(users::home_of(passwd, "nohome"), None);
        assert_eq!(users::home_of(passwd, "ro"), None);
    }
}
