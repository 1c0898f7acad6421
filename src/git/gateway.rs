//! Repository operations used by the commit workflow.
//!
//! Every operation degrades to a boolean or `Option` and reports what went
//! wrong on the terminal; nothing here returns a git failure to the caller.
//! Only prompt failures propagate.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::EnvSnapshot;
use crate::credential::{self, ConfigStore, Credential};
use crate::error::{GitError, PromptError};
use crate::ui::{Level, Prompter};

use super::runner::{GitOutput, GitRunner};
use super::status::{conflicted_paths, parse_porcelain};

/// Branch name used for newly initialized repositories.
pub const DEFAULT_BRANCH: &str = "main";

pub const NO_CHANGES_SUMMARY: &str = "No changes staged.";
pub const UNAVAILABLE_SUMMARY: &str = "Could not retrieve diff summary.";

/// The version-control operations the workflow needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Whether git can be invoked at all. Never fails.
    async fn check_tool_available(&self) -> bool;

    /// Make sure the working directory is inside a repository, offering to
    /// create one. `false` means the user declined or init failed.
    async fn ensure_repository(&self) -> Result<bool, PromptError>;

    /// `false` when unresolved merge conflicts (or an unreadable status) make
    /// committing unsafe.
    async fn ensure_no_merge_conflict(&self) -> bool;

    /// Environment first, then repository-local config. Never prompts.
    async fn resolve_credential(&self, env: &EnvSnapshot) -> Option<Credential>;

    /// Save the credential to repository-local config. Failures are reported.
    async fn persist_credential(&self, credential: &Credential);

    /// Make sure something is staged, offering to stage everything.
    async fn ensure_staged_changes(&self) -> Result<bool, PromptError>;

    /// `git diff --cached --stat`, or a placeholder line. Never fails.
    async fn summarize_staged_changes(&self) -> String;

    /// Commit with exactly `message`. Failures are reported, not retried.
    async fn commit(&self, message: &str) -> bool;
}

/// [`Vcs`] over a [`GitRunner`], prompting through a [`Prompter`].
pub struct GitGateway<'a, R: GitRunner> {
    runner: R,
    prompter: &'a dyn Prompter,
}

impl<'a, R: GitRunner> GitGateway<'a, R> {
    pub fn new(runner: R, prompter: &'a dyn Prompter) -> Self {
        Self { runner, prompter }
    }

    /// Run git, logging spawn failures and returning `None` for them.
    async fn git(&self, args: &[&str]) -> Option<GitOutput> {
        match self.runner.run(args).await {
            Ok(output) => Some(output),
            Err(e) => {
                warn!("git {} failed to run: {}", args.join(" "), e);
                None
            }
        }
    }

    async fn is_inside_work_tree(&self) -> bool {
        self.git(&["rev-parse", "--is-inside-work-tree"])
            .await
            .is_some_and(|out| out.success() && out.stdout.trim() == "true")
    }

    /// Initialize a repository on the default branch.
    ///
    /// Older git has no `init -b`, so fall back to plain init plus a rename.
    /// The repository is usable even if the rename fails.
    async fn init_repository(&self) -> bool {
        if let Some(out) = self.git(&["init", "-b", DEFAULT_BRANCH]).await {
            if out.success() {
                return true;
            }
            debug!("git init -b unsupported: {}", out.diagnostic());
        }

        match self.git(&["init"]).await {
            Some(out) if out.success() => {}
            Some(out) => {
                self.prompter.status(
                    Level::Error,
                    &format!("Failed to initialize repository: {}", out.diagnostic()),
                );
                return false;
            }
            None => {
                self.prompter
                    .status(Level::Error, "Failed to initialize repository.");
                return false;
            }
        }

        match self.git(&["branch", "-M", DEFAULT_BRANCH]).await {
            Some(out) if out.success() => {}
            Some(out) => warn!(
                "Could not rename initial branch to {}: {}",
                DEFAULT_BRANCH,
                out.diagnostic()
            ),
            None => warn!("Could not rename initial branch to {}", DEFAULT_BRANCH),
        }

        true
    }

    /// Whether the index differs from HEAD.
    ///
    /// `git diff --cached --quiet` exits 1 when there is a difference.
    async fn has_staged_changes(&self) -> bool {
        self.git(&["diff", "--cached", "--quiet"])
            .await
            .is_some_and(|out| out.code == Some(1))
    }
}

#[async_trait]
impl<'a, R: GitRunner> ConfigStore for GitGateway<'a, R> {
    async fn get(&self, key: &str) -> Option<String> {
        let out = self.git(&["config", "--local", "--get", key]).await?;
        if !out.success() {
            return None;
        }
        let value = out.stdout.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// The value travels as a `git config` argument and is visible in the
    /// process list while that short-lived git runs. It is never logged and
    /// never included in the returned error.
    async fn set(&self, key: &str, value: &str) -> Result<(), GitError> {
        let out = self.runner.run(&["config", "--local", key, value]).await?;
        if out.success() {
            Ok(())
        } else {
            Err(GitError::NonZeroExit {
                command: "config".to_string(),
                code: out.code.unwrap_or(-1),
                stderr: out.diagnostic().to_string(),
            })
        }
    }
}

#[async_trait]
impl<'a, R: GitRunner> Vcs for GitGateway<'a, R> {
    async fn check_tool_available(&self) -> bool {
        self.git(&["--version"]).await.is_some_and(|out| out.success())
    }

    async fn ensure_repository(&self) -> Result<bool, PromptError> {
        if self.is_inside_work_tree().await {
            return Ok(true);
        }

        if !self.prompter.confirm_init()? {
            self.prompter.status(Level::Warning, "Operation cancelled.");
            return Ok(false);
        }

        if !self.init_repository().await {
            return Ok(false);
        }

        self.prompter.status(
            Level::Success,
            &format!("Initialized a new git repository on branch '{}'.", DEFAULT_BRANCH),
        );
        Ok(true)
    }

    async fn ensure_no_merge_conflict(&self) -> bool {
        let Some(out) = self.git(&["status", "--porcelain"]).await else {
            self.prompter
                .status(Level::Error, "Could not read repository status.");
            return false;
        };
        if !out.success() {
            self.prompter.status(
                Level::Error,
                &format!("Could not read repository status: {}", out.diagnostic()),
            );
            return false;
        }

        let entries = parse_porcelain(&out.stdout);
        let conflicts = conflicted_paths(&entries);
        if conflicts.is_empty() {
            return true;
        }

        self.prompter.status(
            Level::Error,
            &format!("Merge conflicts in: {}", conflicts.join(", ")),
        );
        self.prompter.status(
            Level::Info,
            "Resolve the conflicts, mark them with `git add <file>`, then run gemit again.",
        );
        false
    }

    async fn resolve_credential(&self, env: &EnvSnapshot) -> Option<Credential> {
        credential::resolve_credential(env, self).await
    }

    async fn persist_credential(&self, credential: &Credential) {
        match credential::persist_credential(self, credential).await {
            Ok(()) => self.prompter.status(
                Level::Success,
                "API key saved to this repository's git config.",
            ),
            Err(e) => {
                warn!("Failed to save API key: {}", e);
                self.prompter
                    .status(Level::Warning, "Could not save the API key to git config.");
            }
        }
    }

    async fn ensure_staged_changes(&self) -> Result<bool, PromptError> {
        if self.has_staged_changes().await {
            return Ok(true);
        }

        let Some(out) = self.git(&["status", "--porcelain"]).await.filter(|o| o.success())
        else {
            self.prompter
                .status(Level::Error, "Could not read repository status.");
            return Ok(false);
        };

        if parse_porcelain(&out.stdout).is_empty() {
            self.prompter
                .status(Level::Info, "Nothing to commit, working tree clean.");
            return Ok(false);
        }

        if !self.prompter.confirm_stage_all()? {
            self.prompter.status(
                Level::Warning,
                "Nothing staged. Stage changes with `git add` and run gemit again.",
            );
            return Ok(false);
        }

        match self.git(&["add", "-A"]).await {
            Some(out) if out.success() => {
                self.prompter.status(Level::Success, "Staged all changes.");
                Ok(true)
            }
            Some(out) => {
                self.prompter.status(
                    Level::Error,
                    &format!("Failed to stage changes: {}", out.diagnostic()),
                );
                Ok(false)
            }
            None => {
                self.prompter
                    .status(Level::Error, "Failed to stage changes.");
                Ok(false)
            }
        }
    }

    async fn summarize_staged_changes(&self) -> String {
        match self.git(&["diff", "--cached", "--stat"]).await {
            Some(out) if out.success() => {
                let stat = out.stdout.trim();
                if stat.is_empty() {
                    NO_CHANGES_SUMMARY.to_string()
                } else {
                    stat.to_string()
                }
            }
            _ => UNAVAILABLE_SUMMARY.to_string(),
        }
    }

    async fn commit(&self, message: &str) -> bool {
        match self.git(&["commit", "-m", message]).await {
            Some(out) if out.success() => {
                self.prompter.status(Level::Success, "Committed.");
                true
            }
            Some(out) => {
                self.prompter.status(
                    Level::Error,
                    &format!("Commit failed: {}", out.diagnostic()),
                );
                false
            }
            None => {
                self.prompter
                    .status(Level::Error, "Commit failed: git could not be run.");
                false
            }
        }
    }
}
