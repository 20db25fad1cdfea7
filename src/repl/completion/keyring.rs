//! Key and keyserver candidates
//!
//! Keys come from `gpg --list-keys --with-colons`, keyservers from the
//! `keyserver` lines of `gpg.conf`. Both are cached and reloaded when the
//! modification time of the files they are read from changes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use tracing::{debug, warn};

use super::provider::Candidate;
use crate::utils::fs::latest_modified;
use crate::utils::string::unescape_colons;

/// Keyring files whose modification invalidates the key cache
const KEYRINGS: &[&str] = &["pubring.kbx", "pubring.gpg", "secring.gpg"];

/// A value loaded from files, reloaded when their latest mtime changes
struct WatchedCache<T> {
    paths: Vec<PathBuf>,
    state: RwLock<Option<(Option<SystemTime>, T)>>,
}

impl<T> WatchedCache<T> {
    fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            state: RwLock::new(None),
        }
    }

    fn with<R>(&self, load: impl FnOnce() -> T, f: impl FnOnce(&T) -> R) -> R {
        let stamp = latest_modified(&self.paths);
        {
            let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let Some((cached, value)) = guard.as_ref()
                && *cached == stamp
            {
                return f(value);
            }
        }

        debug!("Reloading cache for {:?}", self.paths);
        let value = load();
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let (_, value) = guard.insert((stamp, value));
        f(value)
    }
}

/// Keys of the public keyring, indexed for completion
#[derive(Debug, Default, Clone, PartialEq)]
pub struct KeyListing {
    /// Short key id (last eight hex digits) to primary user id
    key_ids: BTreeMap<String, String>,
    /// Lowercased user id to user id
    user_ids: BTreeMap<String, String>,
    /// Lowercased name to name
    names: BTreeMap<String, String>,
}

impl KeyListing {
    /// Parse the output of `gpg --list-keys --with-colons`
    ///
    /// Older gpg versions put the primary user id on the `pub` record,
    /// newer ones on the `uid` records that follow it.
    pub fn parse(colons: &str) -> Self {
        let mut listing = Self::default();
        let mut current: Option<String> = None;

        for line in colons.lines() {
            let fields: Vec<&str> = line.split(':').collect();
            match fields.first().copied() {
                Some("pub") => {
                    current = fields.get(4).map(|id| short_key_id(id));
                    if let Some(user_id) = fields.get(9).filter(|u| !u.is_empty()) {
                        listing.add(current.as_deref(), &unescape_colons(user_id));
                    }
                }
                Some("uid") => {
                    if let Some(user_id) = fields.get(9).filter(|u| !u.is_empty()) {
                        listing.add(current.as_deref(), &unescape_colons(user_id));
                    }
                }
                _ => {}
            }
        }
        listing
    }

    fn add(&mut self, key_id: Option<&str>, user_id: &str) {
        if let Some(key_id) = key_id {
            self.key_ids
                .entry(key_id.to_string())
                .or_insert_with(|| user_id.to_string());
        }
        self.user_ids
            .entry(user_id.to_lowercase())
            .or_insert_with(|| user_id.to_string());
        for name in parse_names(user_id) {
            self.names
                .entry(name.to_lowercase())
                .or_insert_with(|| name.to_string());
        }
    }

    /// Key ids starting with `prefix`, ignoring case, described by user id
    pub fn key_ids(&self, prefix: &str) -> Vec<Candidate> {
        let prefix = prefix.to_uppercase();
        self.key_ids
            .iter()
            .filter(|(id, _)| id.starts_with(&prefix))
            .map(|(id, user_id)| Candidate::described(id.clone(), user_id.clone()))
            .collect()
    }

    /// Full user ids starting with `prefix`, ignoring case
    pub fn user_ids(&self, prefix: &str) -> Vec<String> {
        matching(&self.user_ids, prefix)
    }

    /// Names within user ids starting with `prefix`, ignoring case
    pub fn names(&self, prefix: &str) -> Vec<String> {
        matching(&self.names, prefix)
    }
}

fn matching(map: &BTreeMap<String, String>, prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    map.iter()
        .filter(|(key, _)| key.starts_with(&prefix))
        .map(|(_, value)| value.clone())
        .collect()
}

fn short_key_id(id: &str) -> String {
    let start = id.len().saturating_sub(8);
    id.get(start..).unwrap_or(id).to_uppercase()
}

/// The words of the name part of a user id
///
/// The name part is everything before a trailing `(comment)` and
/// `<email>`. Initials like `J.` and single letters are skipped.
pub fn parse_names(user_id: &str) -> Vec<&str> {
    let mut name = user_id.trim();
    if name.ends_with('>')
        && let Some(at) = name.rfind('<')
    {
        name = name[..at].trim_end();
    }
    if name.ends_with(')')
        && let Some(at) = name.find('(')
    {
        name = name[..at].trim_end();
    }
    name.split_whitespace()
        .filter(|word| {
            let len = word.chars().count();
            len > 1 && !(len == 2 && word.ends_with('.'))
        })
        .collect()
}

/// Keys of the local keyring
pub struct Keyring {
    executable: String,
    cache: WatchedCache<KeyListing>,
}

impl Keyring {
    /// # Arguments
    /// * `executable` - gpg executable
    /// * `home` - GnuPG home holding the keyring files
    pub fn new(executable: impl Into<String>, home: &Path) -> Self {
        Self {
            executable: executable.into(),
            cache: WatchedCache::new(KEYRINGS.iter().map(|name| home.join(name)).collect()),
        }
    }

    /// Run `f` on the current key listing, reloading it if the keyring changed
    pub fn with_listing<R>(&self, f: impl FnOnce(&KeyListing) -> R) -> R {
        self.cache.with(|| self.read_keys(), f)
    }

    fn read_keys(&self) -> KeyListing {
        let line = format!("{} --list-keys --with-colons", self.executable);
        let output = Command::new("/bin/sh")
            .arg("-c")
            .arg(&line)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();
        match output {
            Ok(output) if output.status.success() => {
                KeyListing::parse(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                warn!("{line} exited with {}", output.status);
                KeyListing::default()
            }
            Err(e) => {
                warn!("Cannot run {line}: {e}");
                KeyListing::default()
            }
        }
    }
}

/// Keyservers configured in `gpg.conf`
pub struct Keyservers {
    conf: PathBuf,
    cache: WatchedCache<Vec<String>>,
}

impl Keyservers {
    pub fn new(home: &Path) -> Self {
        let conf = home.join("gpg.conf");
        Self {
            cache: WatchedCache::new(vec![conf.clone()]),
            conf,
        }
    }

    /// Keyservers starting with `prefix`
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.cache.with(
            || match std::fs::read_to_string(&self.conf) {
                Ok(text) => parse_keyservers(&text),
                Err(e) => {
                    debug!("Cannot read {}: {e}", self.conf.display());
                    Vec::new()
                }
            },
            |servers| {
                servers
                    .iter()
                    .filter(|s| s.starts_with(prefix))
                    .cloned()
                    .collect()
            },
        )
    }
}

/// The hosts of all `keyserver <host>` lines
pub fn parse_keyservers(conf: &str) -> Vec<String> {
    conf.lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            match (words.next(), words.next()) {
                (Some("keyserver"), Some(host)) => Some(host.to_string()),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
tru::1:1700000000:0:3:1:5
pub:u:4096:1:0123456789ABCDEF:1700000000:::u:::scESC::::::23::0:
fpr:::::::::ABCDEF0123456789ABCDEF0123456789ABCDEF:
uid:u::::1700000000::HASH::Alice Liddell (Work) <alice@example.org>::::::::::0:
uid:u::::1700000000::HASH::Alice L. <alice@home.example>::::::::::0:
pub:-:1024:17:FEDCBA9876543210:1100000000:::-:J\\x3a R. Hacker <jr@example.org>::scSC:
";

    #[test]
    fn test_parse_listing() {
        let listing = KeyListing::parse(LISTING);

        let ids = listing.key_ids("");
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].value, "76543210");
        assert_eq!(ids[0].description.as_deref(), Some("J: R. Hacker <jr@example.org>"));
        assert_eq!(ids[1].value, "89ABCDEF");
        assert_eq!(
            ids[1].description.as_deref(),
            Some("Alice Liddell (Work) <alice@example.org>")
        );

        assert_eq!(listing.key_ids("89ab").len(), 1);
        assert!(listing.key_ids("00").is_empty());
    }

    #[test]
    fn test_user_ids_and_names() {
        let listing = KeyListing::parse(LISTING);
        assert_eq!(
            listing.user_ids("alice"),
            vec![
                "Alice L. <alice@home.example>".to_string(),
                "Alice Liddell (Work) <alice@example.org>".to_string(),
            ]
        );
        assert_eq!(listing.names("al"), vec!["Alice".to_string()]);
        assert_eq!(listing.names("lid"), vec!["Liddell".to_string()]);
        assert_eq!(listing.names("hack"), vec!["Hacker".to_string()]);
        assert!(listing.names("r.").is_empty());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            parse_names("Alice Liddell (Work) <alice@example.org>"),
            vec!["Alice", "Liddell"]
        );
        assert_eq!(parse_names("J. R. R. Tolkien"), vec!["Tolkien"]);
        assert!(parse_names("<nobody@example.org>").is_empty());
    }

    #[test]
    fn test_parse_keyservers() {
        let conf = "# comment\nkeyserver hkps://keys.openpgp.org\n\
                    keyserver-options auto-key-retrieve\n  keyserver  hkp://pool.example  \n\
                    keyserver\n";
        assert_eq!(
            parse_keyservers(conf),
            vec!["hkps://keys.openpgp.org", "hkp://pool.example"]
        );
    }

    #[test]
    fn test_keyservers_reload_on_change() {
        let home = tempfile::tempdir().unwrap();
        let servers = Keyservers::new(home.path());
        assert!(servers.matching("").is_empty());

        std::fs::write(home.path().join("gpg.conf"), "keyserver hkp://a.example\n").unwrap();
        assert_eq!(servers.matching("hkp"), vec!["hkp://a.example"]);
        assert!(servers.matching("ldap").is_empty());
    }

    #[test]
    fn test_keyring_with_failing_gpg() {
        let home = tempfile::tempdir().unwrap();
        let keyring = Keyring::new("false", home.path());
        assert!(keyring.with_listing(|l| l.key_ids("")).is_empty());
    }
}
