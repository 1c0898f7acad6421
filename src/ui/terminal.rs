//! dialoguer/console implementation of [`Prompter`].

use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};

use crate::error::PromptError;

use super::{Decision, Level, Prompter};

/// Prompts on the controlling terminal; status lines go to stderr.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn input(&self, prompt: &str) -> Result<String, PromptError> {
        let value: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value.trim().to_string())
    }
}

impl Prompter for TerminalPrompter {
    fn confirm_init(&self) -> Result<bool, PromptError> {
        self.confirm(
            "This directory is not a git repository. Initialize one here?",
            false,
        )
    }

    fn enter_credential(&self) -> Result<String, PromptError> {
        let value = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Gemini API key (leave empty to cancel)")
            .allow_empty_password(true)
            .interact()?;
        Ok(value.trim().to_string())
    }

    fn confirm_save_credential(&self) -> Result<bool, PromptError> {
        self.confirm("Save the API key in this repository's git config?", true)
    }

    fn confirm_stage_all(&self) -> Result<bool, PromptError> {
        self.confirm("No changes are staged. Stage all changes?", true)
    }

    fn enter_intent(&self) -> Result<String, PromptError> {
        self.input("What does this commit do?")
    }

    fn choose_action(&self) -> Result<Decision, PromptError> {
        let index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What next?")
            .items(&Decision::ALL.map(|d| d.as_str()))
            .default(0)
            .interact()?;
        Ok(Decision::ALL.get(index).copied().unwrap_or(Decision::Cancel))
    }

    fn enter_rewrite_hint(&self) -> Result<String, PromptError> {
        self.input("How should it change? (optional)")
    }

    fn show_suggestion(&self, suggestion: &str) {
        println!();
        println!("  {}", style("Suggested commit message").dim());
        println!("  {}", style(suggestion).bold().green());
        println!();
    }

    fn status(&self, level: Level, message: &str) {
        let line = match level {
            Level::Info => style(message).cyan(),
            Level::Success => style(message).green(),
            Level::Warning => style(message).yellow(),
            Level::Error => style(message).red().bold(),
        };
        let _ = Term::stderr().write_line(&line.to_string());
    }
}
