//! Terminal interaction: prompts, the suggestion display and status lines.

pub mod terminal;

use std::fmt;

use crate::error::PromptError;

pub use terminal::TerminalPrompter;

/// What to do with the current suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Commit,
    Rewrite,
    Cancel,
}

impl Decision {
    /// Menu order for the choice prompt.
    pub const ALL: [Decision; 3] = [Decision::Commit, Decision::Rewrite, Decision::Cancel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Commit => "Commit",
            Decision::Rewrite => "Rewrite",
            Decision::Cancel => "Cancel",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// Everything the workflow asks of the user.
///
/// Each prompt is one blocking request/response with the terminal.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    fn confirm_init(&self) -> Result<bool, PromptError>;

    /// Masked input. An empty string means the user declined.
    fn enter_credential(&self) -> Result<String, PromptError>;

    fn confirm_save_credential(&self) -> Result<bool, PromptError>;

    fn confirm_stage_all(&self) -> Result<bool, PromptError>;

    fn enter_intent(&self) -> Result<String, PromptError>;

    fn choose_action(&self) -> Result<Decision, PromptError>;

    /// Optional guidance for the rewrite; may be empty.
    fn enter_rewrite_hint(&self) -> Result<String, PromptError>;

    fn show_suggestion(&self, suggestion: &str);

    fn status(&self, level: Level, message: &str);
}
