//! Prompt of the gpgkeys shell

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

/// Fixed `gpgkeys> ` prompt
pub struct GpgkeysPrompt {
    text: String,
}

impl GpgkeysPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Default for GpgkeysPrompt {
    fn default() -> Self {
        Self::new("gpgkeys> ")
    }
}

impl Prompt for GpgkeysPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    /// The indicator is part of the left prompt
    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    /// Shown on continuation lines after a trailing backslash
    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "> ".into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-i-search: {}) ", prefix, history_search.term).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt() {
        let prompt = GpgkeysPrompt::default();
        assert_eq!(prompt.render_prompt_left(), "gpgkeys> ");
        assert_eq!(prompt.render_prompt_right(), "");
        assert_eq!(prompt.render_prompt_indicator(PromptEditMode::Default), "");
    }

    #[test]
    fn test_multiline_indicator() {
        let prompt = GpgkeysPrompt::new("> ");
        assert_eq!(prompt.render_prompt_multiline_indicator(), "> ");
    }
}
