//! Injectable confirmation prompts.
//!
//! Resources that may destroy user data ask a [`Prompter`] first.
//! [`TerminalPrompter`] asks on the terminal; [`FixedPrompter`] answers
//! without input, for `--yes` and for sessions with no terminal attached.
use anyhow::{Context as _, Result};
use console::Term;
use dialoguer::Confirm;

/// Yes/no confirmation capability.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Ask `question`, returning `default` when the operator just presses
    /// enter.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn confirm(&self, question: &str, default: bool) -> Result<bool>;
}

/// Asks on the controlling terminal; blocks until answered.
///
/// Falls back to the default answer when stderr is not a terminal.
#[derive(Debug, Clone)]
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    /// Create a prompter that draws on stderr.
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Whether a terminal is attached to answer prompts.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        if !self.is_interactive() {
            return Ok(default);
        }
        Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact_on(&self.term)
            .context("reading confirmation")
    }
}

/// Answers every prompt without asking.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrompter {
    answer: Option<bool>,
}

impl FixedPrompter {
    /// Answer "yes" to everything.
    #[must_use]
    pub const fn yes() -> Self {
        Self { answer: Some(true) }
    }

    /// Take each prompt's default answer.
    #[must_use]
    pub const fn defaults() -> Self {
        Self { answer: None }
    }
}

impl Prompter for FixedPrompter {
    fn confirm(&self, _question: &str, default: bool) -> Result<bool> {
        Ok(self.answer.unwrap_or(default))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn fixed_yes_overrides_default() {
        assert!(FixedPrompter::yes().confirm("Overwrite?", false).unwrap());
    }

    #[test]
    fn fixed_defaults_returns_default() {
        let p = FixedPrompter::defaults();
        assert!(!p.confirm("Overwrite?", false).unwrap());
        assert!(p.confirm("Continue?", true).unwrap());
    }

    #[test]
    fn mock_prompter_records_question() {
        let mut mock = MockPrompter::new();
        mock.expect_confirm()
            .withf(|q, default| q.contains("id_ed25519") && !*default)
            .times(1)
            .returning(|_, _| Ok(true));
        assert!(mock.confirm("Overwrite ~/.ssh/id_ed25519?", false).unwrap());
    }
}
