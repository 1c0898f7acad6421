//! Error types for gemit modules using thiserror.

use thiserror::Error;

/// Errors from running the git binary.
///
/// A non-zero exit status is not an error at this level; callers inspect
/// [`GitOutput`](crate::git::GitOutput) because for commands like
/// `git diff --quiet` the exit code is the answer.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git not found. Install it from https://git-scm.com/downloads")]
    NotInstalled,

    #[error("Failed to spawn git process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git {command} exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// Errors from the remote suggestion endpoint.
#[derive(Error, Debug)]
pub enum SuggestError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Rate limited by the Gemini API (HTTP 429)")]
    RateLimited,

    #[error("Could not connect to the Gemini API: {0}")]
    Connection(String),

    #[error("Gemini API request timed out")]
    Timeout,

    #[error("Gemini API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Gemini API returned an unexpected response: {0}")]
    MalformedResponse(String),

    #[error("Gemini API returned no suggestion text")]
    EmptyResponse,
}

impl SuggestError {
    /// One actionable line for the terminal.
    ///
    /// Unlike `Display`, this never includes response bodies.
    pub fn user_message(&self) -> String {
        match self {
            SuggestError::ClientBuild(_) => "Could not set up the HTTP client.".to_string(),
            SuggestError::RateLimited => {
                "Rate limit reached for the Gemini API. Wait a minute and try again.".to_string()
            }
            SuggestError::Connection(_) => {
                "Could not reach the Gemini API. Check your internet connection.".to_string()
            }
            SuggestError::Timeout => {
                "The Gemini API did not answer in time. Try again or raise GEMIT_TIMEOUT."
                    .to_string()
            }
            SuggestError::Http { status, .. } if *status == 400 || *status == 403 => format!(
                "The Gemini API rejected the request (HTTP {}). Check that your API key is valid.",
                status
            ),
            SuggestError::Http { status, .. } => {
                format!("The Gemini API returned an error (HTTP {}).", status)
            }
            SuggestError::MalformedResponse(_) | SuggestError::EmptyResponse => {
                "The Gemini API returned a response without a usable suggestion.".to_string()
            }
        }
    }
}

/// Errors from terminal prompts.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Prompt failed: {0}")]
    Io(#[from] dialoguer::Error),
}
