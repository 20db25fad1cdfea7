//! Filesystem candidates: filenames, user names and executables on `$PATH`

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::utils::expand_home;
use crate::utils::users::{self, PASSWD};

/// Complete a dequoted filename prefix
///
/// The directory part is kept as typed; it is tilde-expanded only to list
/// the directory. Hidden entries are offered only when the name part starts
/// with a dot. Directories carry a trailing `/`.
pub fn complete_filename(text: &str) -> Vec<String> {
    if text.starts_with('~') && !text.contains('/') {
        let users = complete_username(text);
        if !users.is_empty() {
            return users;
        }
    }

    let (dir, base) = match text.rfind('/') {
        Some(at) => text.split_at(at + 1),
        None => ("", text),
    };
    let listing = if dir.is_empty() {
        PathBuf::from(".")
    } else {
        expand_home(Path::new(dir))
    };

    let entries = match fs::read_dir(&listing) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot list {}: {e}", listing.display());
            return Vec::new();
        }
    };

    let mut matches: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(base) || (name.starts_with('.') && !base.starts_with('.')) {
                return None;
            }
            // Follow symlinks so links to directories complete like directories
            let is_dir = fs::metadata(entry.path()).is_ok_and(|m| m.is_dir());
            Some(format!("{dir}{name}{}", if is_dir { "/" } else { "" }))
        })
        .collect();
    matches.sort();
    matches
}

/// Complete `~prefix` to `~user/` from the password database
pub fn complete_username(text: &str) -> Vec<String> {
    let Some(prefix) = text.strip_prefix('~') else {
        return Vec::new();
    };
    users::read_passwd(Path::new(PASSWD))
        .map(|passwd| users_matching(&passwd, prefix))
        .unwrap_or_default()
}

fn users_matching(passwd: &str, prefix: &str) -> Vec<String> {
    let names: BTreeSet<&str> = users::entries(passwd)
        .map(|(name, _)| name)
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.into_iter().map(|name| format!("~{name}/")).collect()
}

/// Complete a command name from the executables on `$PATH`
pub fn complete_command(prefix: &str) -> Vec<String> {
    let Some(path) = std::env::var_os("PATH") else {
        return Vec::new();
    };
    executables_in(std::env::split_paths(&path), prefix)
}

fn executables_in<I: IntoIterator<Item = PathBuf>>(dirs: I, prefix: &str) -> Vec<String> {
    let mut found = BTreeSet::new();
    for dir in dirs {
        let dir = expand_home(&dir);
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.filter_map(|entry| entry.ok()) {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with(prefix) && is_executable(&entry.path()) {
                found.insert(name);
            }
        }
    }
    found.into_iter().collect()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
