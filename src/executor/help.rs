//! Help texts
//!
//! `help` without a topic lists all commands and their shortcuts in columns.
//! `help <topic>` shows the usage line, the options and aliases of one
//! command, followed by its summary.

use crate::parser::command::{self, COMMANDS, CommandKind};

pub const DOC_HEADER: &str = "Available commands (type help <topic>):";
pub const ALIAS_HEADER: &str = "Shortcut commands (type help <topic>):";

const DEFAULT_WIDTH: usize = 80;

/// Width of the terminal, or 80 when not attached to one
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .ok()
        .filter(|cols| *cols > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

/// The command overview printed by `help`
pub fn overview(width: usize) -> String {
    let names: Vec<&str> = COMMANDS
        .iter()
        .filter(|c| !c.is_hidden())
        .map(|c| c.name)
        .collect();
    let mut aliases: Vec<&str> = COMMANDS
        .iter()
        .flat_map(|c| c.aliases.iter().copied())
        .collect();
    aliases.sort_unstable();

    let mut out = String::new();
    topics(&mut out, DOC_HEADER, &names, width);
    topics(&mut out, ALIAS_HEADER, &aliases, width);
    out
}

fn topics(out: &mut String, header: &str, words: &[&str], width: usize) {
    out.push_str(header);
    out.push('\n');
    out.push_str(&"=".repeat(header.len()));
    out.push('\n');
    for row in columnize(words, width.saturating_sub(1)) {
        out.push_str(&row);
        out.push('\n');
    }
    out.push('\n');
}

/// Lay out words in as few rows as fit into `width`, filling columns first
pub fn columnize(words: &[&str], width: usize) -> Vec<String> {
    if words.is_empty() {
        return Vec::new();
    }

    for rows in 1..words.len() {
        let columns: Vec<&[&str]> = words.chunks(rows).collect();
        let widths: Vec<usize> = columns
            .iter()
            .map(|col| col.iter().map(|w| w.len()).max().unwrap_or(0))
            .collect();
        let total = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
        if total <= width {
            return (0..rows)
                .map(|r| {
                    let cells: Vec<String> = columns
                        .iter()
                        .zip(&widths)
                        .filter_map(|(col, &w)| col.get(r).map(|word| format!("{word:<w$}")))
                        .collect();
                    cells.join("  ").trim_end().to_string()
                })
                .collect();
        }
    }
    words.iter().map(|w| w.to_string()).collect()
}

/// Help for one command, `None` if `topic` names no command
pub fn topic(topic: &str) -> Option<String> {
    let spec = command::find(topic)?;

    let mut usage = spec.usage.to_string();
    match topic {
        "?" => usage = usage.replacen(spec.name, "?", 1),
        "." => usage = usage.replacen('!', ".", 1),
        _ => {}
    }

    let options = spec.options();
    let aliases: Vec<&str> = spec
        .aliases
        .iter()
        .copied()
        .filter(|a| match spec.kind {
            CommandKind::Shell | CommandKind::Help => {
                *a != topic && !(topic == "shell" && *a == "!")
            }
            _ => true,
        })
        .collect();

    let mut out = String::new();
    if !usage.is_empty() {
        out.push_str(&usage);
        out.push('\n');
    }
    if !options.is_empty() {
        out.push_str(&format!("Options: {}\n", options.join(" ")));
    }
    if !aliases.is_empty() {
        let mut aliases = aliases;
        aliases.sort_unstable();
        out.push_str(&format!("Aliases: {}\n", aliases.join(" ")));
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(spec.summary);
    out.push_str("\n\n");
    Some(out)
}
