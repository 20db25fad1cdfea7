//! Command table of the gpgkeys shell
//!
//! Every command is described once, statically: its name, aliases, help
//! text, option vocabulary and the candidate source used to complete its
//! arguments.

/// Commands understood by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Quit,
    Eof,
    Clear,
    Version,
    GenKey,
    GenRevoke,
    Import,
    Export,
    List,
    ListSig,
    CheckSig,
    Edit,
    LSign,
    Sign,
    Del,
    Search,
    Recv,
    Send,
    Refresh,
    Fetch,
    Dump,
    FDump,
    Shell,
    Help,
}

/// Where completion candidates for plain arguments come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSource {
    /// Nothing to complete
    None,
    /// Files and directories
    Filename,
    /// Key ids and user ids from the keyring
    KeyId,
    /// Keyservers from gpg.conf
    Keyserver,
    /// Executables on the search path
    Command,
    /// Help topics
    Topic,
}

const GLOBAL: &[&str] = &[];
const KEY: &[&str] = &["--openpgp"];
const SIGN: &[&str] = &["--local-user"];
const LIST: &[&str] = &["--fingerprint", "--with-colons"];
const INPUT: &[&str] = &["--merge-only"];
const OUTPUT: &[&str] = &["--armor", "--output"];
const CLEAN: &[&str] = &["--clean"];
const MINIMAL: &[&str] = &["--minimal"];
const SERVER: &[&str] = &["--keyserver"];
const EXPERT: &[&str] = &["--expert"];
const SECRET: &[&str] = &["--secret"];
const DELETE: &[&str] = &["--secret-and-public"];

/// Options whose value is completed from a dedicated source
pub const OPTION_SOURCES: &[(&str, CompletionSource)] = &[
    ("--output", CompletionSource::Filename),
    ("--local-user", CompletionSource::KeyId),
    ("--keyserver", CompletionSource::Keyserver),
];

/// Static description of a command
#[derive(Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub summary: &'static str,
    pub usage: &'static str,
    /// Option groups making up the vocabulary
    option_groups: &'static [&'static [&'static str]],
    /// Completion source for plain arguments
    pub source: CompletionSource,
    /// The interactive command shows its help when called without arguments
    pub requires_args: bool,
}

impl CommandSpec {
    /// The command's option vocabulary, sorted
    pub fn options(&self) -> Vec<&'static str> {
        let mut options: Vec<&'static str> =
            self.option_groups.iter().flat_map(|g| g.iter().copied()).collect();
        options.sort_unstable();
        options
    }

    /// Options of the vocabulary starting with `prefix`
    pub fn options_matching(&self, prefix: &str) -> Vec<&'static str> {
        self.options()
            .into_iter()
            .filter(|o| o.starts_with(prefix))
            .collect()
    }

    /// `EOF` is bound to ^D and never typed or listed
    pub fn is_hidden(&self) -> bool {
        self.kind == CommandKind::Eof
    }
}

macro_rules! command {
    ($kind:ident, $name:literal, [$($alias:literal),*], $summary:literal, $usage:literal,
     [$($group:ident),*], $source:ident, $requires:literal) => {
        CommandSpec {
            kind: CommandKind::$kind,
            name: $name,
            aliases: &[$($alias),*],
            summary: $summary,
            usage: $usage,
            option_groups: &[$($group),*],
            source: CompletionSource::$source,
            requires_args: $requires,
        }
    };
}

/// All commands, in the order `help` lists them
pub static COMMANDS: &[CommandSpec] = &[
    command!(CheckSig, "checksig", [], "List keys with signatures and also verify the signatures",
        "checksig [<keyspec>]", [GLOBAL, LIST], KeyId, false),
    command!(Clear, "clear", [], "Clear the screen", "clear", [], None, false),
    command!(Del, "del", [], "Delete a key from the keyring", "del <keyspec>",
        [GLOBAL, DELETE, SECRET], KeyId, true),
    command!(Dump, "dump", [], "Print the packet sequence of keys", "dump [<keyspec>]",
        [GLOBAL, SECRET, CLEAN, MINIMAL], KeyId, false),
    command!(Edit, "edit", ["e"], "Enter the key edit menu", "edit <keyspec>",
        [GLOBAL, KEY, SIGN, EXPERT], KeyId, true),
    command!(Eof, "EOF", [], "End the session", "^D", [], None, false),
    command!(Export, "export", [], "Export keys to stdout or to a file", "export [<keyspec>]",
        [GLOBAL, OUTPUT, SECRET, CLEAN, MINIMAL], KeyId, false),
    command!(FDump, "fdump", [], "Print the packet sequence of keys in a file",
        "fdump <filename>", [GLOBAL], Filename, true),
    command!(Fetch, "fetch", [], "Fetch keys from a URL", "fetch <url>",
        [GLOBAL, INPUT, CLEAN], None, true),
    command!(GenKey, "genkey", [], "Generate a new key pair and certificate", "genkey",
        [GLOBAL, KEY, EXPERT], None, false),
    command!(GenRevoke, "genrevoke", [], "Generate a revocation certificate for a key",
        "genrevoke <keyspec>", [GLOBAL, KEY, OUTPUT], KeyId, true),
    command!(Help, "help", ["?"], "Interactive help", "help [<topic>]", [], Topic, false),
    command!(Import, "import", [], "Import keys from a file", "import <filename>",
        [GLOBAL, INPUT, CLEAN, MINIMAL], Filename, true),
    command!(List, "list", ["ls"], "List keys", "list [<keyspec>]",
        [GLOBAL, LIST, SECRET], KeyId, false),
    command!(ListSig, "listsig", ["ll"], "List keys with signatures", "listsig [<keyspec>]",
        [GLOBAL, LIST], KeyId, false),
    command!(LSign, "lsign", [], "Sign a key with a local signature", "lsign <keyspec>",
        [GLOBAL, KEY, SIGN], KeyId, true),
    command!(Quit, "quit", [], "End the session", "quit", [], None, false),
    command!(Recv, "recv", [], "Fetch keys from a keyserver", "recv <keyids>",
        [GLOBAL, SERVER, INPUT, CLEAN], KeyId, true),
    command!(Refresh, "refresh", [], "Refresh keys from a keyserver", "refresh [<keyspec>]",
        [GLOBAL, SERVER, CLEAN], KeyId, false),
    command!(Search, "search", [], "Search for keys on a keyserver", "search <keyspec>",
        [GLOBAL, SERVER, INPUT, CLEAN], KeyId, true),
    command!(Send, "send", [], "Send keys to a keyserver", "send <keyspec>",
        [GLOBAL, SERVER, CLEAN], KeyId, true),
    command!(Shell, "shell", ["!", "."], "Execute a shell command or start an interactive shell",
        "! [<command>]", [GLOBAL], Filename, false),
    command!(Sign, "sign", [], "Sign a key with an exportable signature", "sign <keyspec>",
        [GLOBAL, KEY, SIGN], KeyId, true),
    command!(Version, "version", [], "Print the GnuPG version", "version", [], None, false),
];

/// Look up a command by exact name or alias
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|c| c.name == name)
        .or_else(|| COMMANDS.iter().find(|c| c.aliases.contains(&name)))
}

/// Resolve a typed command word: exact name, alias, then unique prefix
pub fn resolve(word: &str) -> Option<&'static CommandSpec> {
    if word.is_empty() {
        return None;
    }
    if let Some(spec) = find(word) {
        return Some(spec);
    }
    let mut candidates = COMMANDS
        .iter()
        .filter(|c| !c.is_hidden() && c.name.starts_with(word));
    match (candidates.next(), candidates.next()) {
        (Some(spec), None) => Some(spec),
        _ => None,
    }
}

/// Split a line into its command word and the rest
///
/// A leading `!`, `.` or `?` is a command of its own even when glued to
/// the following text, e.g. `!ls` or `?import`.
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    if let Some(first) = line.chars().next()
        && matches!(first, '!' | '.' | '?')
    {
        return (&line[..1], &line[1..]);
    }
    let end = line
        .find(|c: char| c.is_whitespace() || "|;&><".contains(c))
        .unwrap_or(line.len());
    (&line[..end], &line[end..])
}

/// Names offered when completing the command word
pub fn command_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = COMMANDS
        .iter()
        .filter(|c| !c.is_hidden())
        .flat_map(|c| std::iter::once(c.name).chain(c.aliases.iter().copied()))
        .filter(|n| n.chars().all(|c| c.is_ascii_alphanumeric()))
        .collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name_and_alias() {
        assert_eq!(find("list").map(|c| c.kind), Some(CommandKind::List));
        assert_eq!(find("ls").map(|c| c.kind), Some(CommandKind::List));
        assert_eq!(find("ll").map(|c| c.kind), Some(CommandKind::ListSig));
        assert_eq!(find("e").map(|c| c.kind), Some(CommandKind::Edit));
        assert_eq!(find("!").map(|c| c.kind), Some(CommandKind::Shell));
        assert_eq!(find(".").map(|c| c.kind), Some(CommandKind::Shell));
        assert_eq!(find("?").map(|c| c.kind), Some(CommandKind::Help));
        assert!(find("frob").is_none());
    }

    #[test]
    fn test_resolve_unique_prefix() {
        assert_eq!(resolve("gen").map(|c| c.kind), None);
        assert_eq!(resolve("genk").map(|c| c.kind), Some(CommandKind::GenKey));
        assert_eq!(resolve("imp").map(|c| c.kind), Some(CommandKind::Import));
        assert_eq!(resolve("li").map(|c| c.kind), None);
        assert_eq!(resolve("").map(|c| c.kind), None);
        assert_eq!(resolve("E").map(|c| c.kind), None);
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("list foo"), ("list", " foo"));
        assert_eq!(split_command("  !ls -l"), ("!", "ls -l"));
        assert_eq!(split_command("?import"), ("?", "import"));
        assert_eq!(split_command("list|less"), ("list", "|less"));
        assert_eq!(split_command(""), ("", ""));
    }

    #[test]
    fn test_option_vocabulary() {
        let export = find("export").map(|c| c.options()).unwrap_or_default();
        assert_eq!(
            export,
            vec!["--armor", "--clean", "--minimal", "--output", "--secret"]
        );

        let del = find("del").map(|c| c.options_matching("--sec")).unwrap_or_default();
        assert_eq!(del, vec!["--secret", "--secret-and-public"]);

        let fdump = find("fdump").map(|c| c.options()).unwrap_or_default();
        assert!(fdump.is_empty());
    }

    #[test]
    fn test_command_names() {
        let names = command_names();
        assert!(names.contains(&"list"));
        assert!(names.contains(&"ls"));
        assert!(names.contains(&"checksig"));
        assert!(!names.contains(&"EOF"));
        assert!(!names.contains(&"!"));
    }

    #[test]
    fn test_every_command_has_help() {
        for spec in COMMANDS {
            assert!(!spec.summary.is_empty(), "{}", spec.name);
            assert!(!spec.usage.is_empty(), "{}", spec.name);
        }
    }
}
