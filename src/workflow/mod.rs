//! The commit workflow as an explicit state machine.
//!
//! [`Workflow::step`] performs one transition; [`Workflow::run`] drives it
//! from [`State::Preflight`] to a terminal state. Gateway failures have
//! already been reported to the user by the time they reach this module and
//! only turn into an [`AbortReason`]. Prompt I/O failures are the one error
//! that propagates.

pub mod state;

use tracing::{debug, warn};

use crate::config::EnvSnapshot;
use crate::credential::Credential;
use crate::error::{PromptError, SuggestError};
use crate::git::Vcs;
use crate::suggest::{Suggester, build_prompt, rewrite_intent};
use crate::ui::{Decision, Level, Prompter};

pub use state::{AbortReason, Outcome, State};

const GIT_MISSING_MESSAGE: &str =
    "git is not installed or not on PATH. Install it from https://git-scm.com/downloads";

/// Options taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct WorkflowOptions {
    /// Initial description of the change. Blank counts as absent.
    pub intent: Option<String>,
    /// Commit the first suggestion without asking.
    pub auto_confirm: bool,
}

/// One run of the commit workflow.
pub struct Workflow<'a> {
    vcs: &'a dyn Vcs,
    suggester: &'a dyn Suggester,
    prompter: &'a dyn Prompter,
    env: EnvSnapshot,
    options: WorkflowOptions,
    /// Set once in `CredentialResolution`, read-only afterwards.
    credential: Option<Credential>,
    intent: String,
    suggestion: String,
}

impl<'a> Workflow<'a> {
    pub fn new(
        vcs: &'a dyn Vcs,
        suggester: &'a dyn Suggester,
        prompter: &'a dyn Prompter,
        env: EnvSnapshot,
        options: WorkflowOptions,
    ) -> Self {
        Self {
            vcs,
            suggester,
            prompter,
            env,
            options,
            credential: None,
            intent: String::new(),
            suggestion: String::new(),
        }
    }

    /// Drive the workflow to a terminal state.
    pub async fn run(&mut self) -> Result<Outcome, PromptError> {
        let mut state = State::Preflight;
        loop {
            debug!("Workflow state: {:?}", state);
            state = match state {
                State::Done { committed: true } => {
                    return Ok(Outcome::Committed {
                        message: self.suggestion.clone(),
                    });
                }
                State::Done { committed: false } => return Ok(Outcome::CommitFailed),
                State::Aborted(reason) => {
                    debug!("Workflow aborted: {}", reason);
                    return Ok(Outcome::Aborted(reason));
                }
                state => self.step(state).await?,
            };
        }
    }

    /// Perform one transition. Terminal states map to themselves, so callers
    /// stepping manually should stop on [`State::is_terminal`].
    pub async fn step(&mut self, state: State) -> Result<State, PromptError> {
        match state {
            State::Preflight => self.preflight().await,
            State::CredentialResolution => self.acquire_credential().await,
            State::StagingCheck => Ok(if self.vcs.ensure_staged_changes().await? {
                State::IntentAcquisition
            } else {
                State::Aborted(AbortReason::NothingStaged)
            }),
            State::IntentAcquisition => self.acquire_intent(),
            State::Generating => Ok(self.generate().await),
            State::AwaitingDecision => self.decide(),
            State::Committing => Ok(self.commit().await),
            terminal @ (State::Done { .. } | State::Aborted(_)) => Ok(terminal),
        }
    }

    /// The current suggestion, empty before the first successful generation.
    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }

    async fn preflight(&mut self) -> Result<State, PromptError> {
        if !self.vcs.check_tool_available().await {
            self.prompter.status(Level::Error, GIT_MISSING_MESSAGE);
            return Ok(State::Aborted(AbortReason::ToolMissing));
        }
        if !self.vcs.ensure_repository().await? {
            return Ok(State::Aborted(AbortReason::NotARepository));
        }
        if !self.vcs.ensure_no_merge_conflict().await {
            return Ok(State::Aborted(AbortReason::MergeConflict));
        }
        Ok(State::CredentialResolution)
    }

    async fn acquire_credential(&mut self) -> Result<State, PromptError> {
        if self.credential.is_some() {
            return Ok(State::StagingCheck);
        }

        if let Some(credential) = self.vcs.resolve_credential(&self.env).await {
            self.credential = Some(credential);
            return Ok(State::StagingCheck);
        }

        let entered = self.prompter.enter_credential()?;
        let entered = entered.trim();
        if entered.is_empty() {
            return Ok(State::Aborted(AbortReason::MissingCredential));
        }

        let credential = Credential::from(entered.to_string());
        if self.prompter.confirm_save_credential()? {
            self.vcs.persist_credential(&credential).await;
        }
        self.credential = Some(credential);
        Ok(State::StagingCheck)
    }

    fn acquire_intent(&mut self) -> Result<State, PromptError> {
        let from_cli = self
            .options
            .intent
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let intent = match from_cli {
            Some(intent) => intent.to_string(),
            None => self.prompter.enter_intent()?.trim().to_string(),
        };

        if intent.is_empty() {
            self.prompter
                .status(Level::Warning, "A description of the change is required.");
            return Ok(State::Aborted(AbortReason::EmptyIntent));
        }

        self.intent = intent;
        Ok(State::Generating)
    }

    async fn generate(&mut self) -> State {
        let Some(credential) = self.credential.as_ref() else {
            return State::Aborted(AbortReason::MissingCredential);
        };

        let summary = self.vcs.summarize_staged_changes().await;
        let prompt = build_prompt(&self.intent, &summary);

        let result = match self.suggester.request_suggestion(credential, &prompt).await {
            Ok(text) if text.trim().is_empty() => Err(SuggestError::EmptyResponse),
            other => other,
        };

        match result {
            Ok(suggestion) => {
                self.prompter.show_suggestion(&suggestion);
                self.suggestion = suggestion;
                if self.options.auto_confirm {
                    State::Committing
                } else {
                    State::AwaitingDecision
                }
            }
            Err(e) => {
                warn!("Suggestion request failed: {}", e);
                self.prompter.status(Level::Error, &e.user_message());
                self.prompter
                    .status(Level::Error, "Could not get a suggestion.");
                State::Aborted(AbortReason::NoSuggestion)
            }
        }
    }

    fn decide(&mut self) -> Result<State, PromptError> {
        match self.prompter.choose_action()? {
            Decision::Commit => Ok(State::Committing),
            Decision::Cancel => {
                self.prompter.status(Level::Warning, "Operation cancelled.");
                Ok(State::Aborted(AbortReason::Cancelled))
            }
            Decision::Rewrite => {
                let hint = self.prompter.enter_rewrite_hint()?;
                self.intent = rewrite_intent(&self.suggestion, &hint);
                Ok(State::Generating)
            }
        }
    }

    async fn commit(&mut self) -> State {
        if self.suggestion.trim().is_empty() {
            return State::Aborted(AbortReason::NoSuggestion);
        }
        let committed = self.vcs.commit(&self.suggestion).await;
        State::Done { committed }
    }
}
