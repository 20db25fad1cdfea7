//! gpg command lines for the key management commands
//!
//! Each command maps to one gpg action. The assembled line keeps the user's
//! quoting and is handed to the shell, so redirections and pipes typed after
//! the arguments work as usual.

use crate::parser::{Args, CommandKind};

/// What to do for a key management command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GnupgPlan {
    /// Run gpg with these words after the executable
    Run(Vec<String>),
    /// Required arguments are missing; show the command's help instead
    Help,
}

/// The gpg action for a command, taking `--secret` style switches into account
pub fn action(kind: CommandKind, args: &Args) -> Option<&'static str> {
    let action = match kind {
        CommandKind::Version => "--version",
        CommandKind::GenKey => "--gen-key",
        CommandKind::GenRevoke => "--gen-revoke",
        CommandKind::Import => "--import",
        CommandKind::Export | CommandKind::Dump if args.secret => "--export-secret-keys",
        CommandKind::Export | CommandKind::Dump => "--export",
        CommandKind::List if args.secret => "--list-secret-keys",
        CommandKind::List => "--list-keys",
        CommandKind::ListSig => "--list-sigs",
        CommandKind::CheckSig => "--check-sigs",
        CommandKind::Edit => "--edit-key",
        CommandKind::LSign => "--lsign-key",
        CommandKind::Sign => "--sign-key",
        CommandKind::Del if args.secret_and_public => "--delete-secret-and-public-key",
        CommandKind::Del if args.secret => "--delete-secret-key",
        CommandKind::Del => "--delete-key",
        CommandKind::Search => "--search-keys",
        CommandKind::Recv => "--recv-keys",
        CommandKind::Send => "--send-keys",
        CommandKind::Refresh => "--refresh-keys",
        CommandKind::Fetch => "--fetch-keys",
        CommandKind::FDump => "--list-packets",
        CommandKind::Quit
        | CommandKind::Eof
        | CommandKind::Clear
        | CommandKind::Shell
        | CommandKind::Help => return None,
    };
    Some(action)
}

/// Plan the gpg invocation for a command
///
/// # Arguments
/// * `kind` - The command
/// * `args` - Its parsed arguments
/// * `executable` - The gpg executable, needed for the `dump` pipeline
/// * `interactive` - Whether the shell is interactive; one-shot `import`
///   and `fdump` read stdin when given no file
/// * `requires_args` - Show help instead of running without arguments
///
/// # Returns
/// * `Option<GnupgPlan>` - `None` if the command does not run gpg
pub fn plan(
    kind: CommandKind,
    mut args: Args,
    executable: &str,
    interactive: bool,
    requires_args: bool,
) -> Option<GnupgPlan> {
    let action = action(kind, &args)?;

    let reads_stdin = matches!(kind, CommandKind::Import | CommandKind::FDump);
    if args.args.is_empty() && !(reads_stdin && args.reads_stdin_redirect()) {
        if reads_stdin && !interactive {
            args.args.push("-".to_string());
        } else if requires_args {
            return Some(GnupgPlan::Help);
        }
    }

    let mut words = vec![action.to_string()];
    if kind == CommandKind::Dump {
        words.extend(args.options());
        words.extend(args.args.iter().cloned());
        words.extend([
            "|".to_string(),
            executable.to_string(),
            "--list-packets".to_string(),
        ]);
        words.extend(args.pipe.iter().cloned());
    } else {
        words.extend(args.tuple());
    }
    Some(GnupgPlan::Run(words))
}
