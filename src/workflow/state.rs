//! Workflow states and terminal outcomes.

use std::fmt;

/// Position in the commit workflow.
///
/// `Done` and `Aborted` are terminal; every other state has exactly one
/// transition step in [`Workflow::step`](super::Workflow::step).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Preflight,
    CredentialResolution,
    StagingCheck,
    IntentAcquisition,
    Generating,
    AwaitingDecision,
    Committing,
    Done { committed: bool },
    Aborted(AbortReason),
}

impl State {
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Done { .. } | State::Aborted(_))
    }
}

/// Why a run ended without reaching a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    ToolMissing,
    NotARepository,
    MergeConflict,
    MissingCredential,
    NothingStaged,
    EmptyIntent,
    NoSuggestion,
    Cancelled,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AbortReason::ToolMissing => "git is not available",
            AbortReason::NotARepository => "not a git repository",
            AbortReason::MergeConflict => "unresolved merge conflicts",
            AbortReason::MissingCredential => "no API key",
            AbortReason::NothingStaged => "nothing staged",
            AbortReason::EmptyIntent => "no description of the change",
            AbortReason::NoSuggestion => "no suggestion available",
            AbortReason::Cancelled => "cancelled by user",
        };
        f.write_str(text)
    }
}

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The commit was created with this exact message.
    Committed { message: String },
    /// The commit was attempted and git rejected it.
    CommitFailed,
    Aborted(AbortReason),
}
