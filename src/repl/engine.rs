//! Line editor setup for the interactive shell

use std::sync::Arc;

use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, History, KeyCode, KeyModifiers, MenuBuilder,
    Reedline, ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::parser::Quoting;
use crate::utils::fs::ensure_dir_exists;

use super::completer::GpgkeysCompleter;
use super::completion::CandidateProvider;
use super::highlighter::GpgkeysHighlighter;
use super::hinter::GpgkeysHinter;
use super::prompt::GpgkeysPrompt;
use super::validator::GpgkeysValidator;

const COMPLETION_MENU: &str = "completion_menu";

/// What the user did at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line was entered
    Line(String),
    /// ^D on an empty line
    Eof,
    /// ^C at the prompt
    Interrupted,
}

/// REPL engine for interactive command input
pub struct ReplEngine {
    /// Line editor for command input
    editor: Reedline,

    /// Prompt shown for every line
    prompt: GpgkeysPrompt,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `config` - Session configuration (history, quoting policy, character classes)
    /// * `quoting` - Quoting codec used by completion
    /// * `provider` - Source of completion candidates
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(
        config: &Config,
        quoting: Quoting,
        provider: Arc<dyn CandidateProvider>,
    ) -> Result<Self> {
        let syntax = quoting.syntax().clone();

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );
        let completion_menu = Box::new(ColumnarMenu::default().with_name(COMPLETION_MENU));

        let editor = Reedline::create()
            .with_history(Self::history(config)?)
            .with_completer(Box::new(GpgkeysCompleter::new(provider, quoting)))
            .with_quick_completions(true)
            .with_partial_completions(true)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_hinter(Box::new(GpgkeysHinter::new(&syntax)))
            .with_highlighter(Box::new(GpgkeysHighlighter::new(&syntax, true)))
            .with_validator(Box::new(GpgkeysValidator::new(&syntax)))
            .with_edit_mode(Box::new(Emacs::new(keybindings)));

        Ok(Self {
            editor,
            prompt: GpgkeysPrompt::default(),
        })
    }

    /// Build the history, file-backed if persistence is enabled
    fn history(config: &Config) -> Result<Box<dyn History>> {
        let history = &config.history;
        if history.persist {
            if let Some(parent) = history.file_path.parent() {
                ensure_dir_exists(parent)?;
            }
            match FileBackedHistory::with_file(history.max_size, history.file_path.clone()) {
                Ok(file_history) => {
                    debug!("History file: {}", history.file_path.display());
                    return Ok(Box::new(file_history));
                }
                Err(e) => warn!(
                    "Cannot use history file {}: {e}",
                    history.file_path.display()
                ),
            }
        }
        Ok(Box::new(FileBackedHistory::new(history.max_size)?))
    }

    /// Read a single line of input
    ///
    /// # Returns
    /// * `Result<ReadOutcome>` - The line, or what ended the read
    pub fn read_line(&mut self) -> Result<ReadOutcome> {
        match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => Ok(ReadOutcome::Line(line)),
            Signal::CtrlD => Ok(ReadOutcome::Eof),
            _ => Ok(ReadOutcome::Interrupted),
        }
    }
}
