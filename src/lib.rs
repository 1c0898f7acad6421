//! gemit - AI-assisted git commit messages.
//!
//! # Overview
//!
//! gemit inspects the staged changes of the current repository, asks the
//! Gemini API for a one-line commit message based on a short description of
//! the change, and lets the user commit it, ask for a rewrite, or cancel.

pub mod config;
pub mod credential;
pub mod error;
pub mod git;
pub mod suggest;
pub mod ui;
pub mod workflow;

// Re-export commonly used types
pub use config::{EnvSnapshot, Settings};
pub use credential::Credential;
pub use error::{GitError, PromptError, SuggestError};
pub use git::{GitGateway, SystemRunner, Vcs};
pub use suggest::{GeminiClient, Suggester};
pub use ui::{Decision, Level, Prompter, TerminalPrompter};
pub use workflow::{AbortReason, Outcome, Workflow, WorkflowOptions};
