//! git subprocess execution.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::GitError;

/// Captured result of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The most useful diagnostic text: stderr, or stdout when stderr is empty.
    pub fn diagnostic(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Trait for running git commands.
///
/// Only failing to start git is an error; the exit code is returned as data.
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn run(&self, args: &[&str]) -> Result<GitOutput, GitError>;
}

/// Runs the system `git` binary in a fixed working directory.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    program: Option<PathBuf>,
    workdir: PathBuf,
}

impl SystemRunner {
    /// Locate `git` on PATH. A missing binary surfaces on the first `run`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: which::which("git").ok(),
            workdir: workdir.into(),
        }
    }
}

#[async_trait]
impl GitRunner for SystemRunner {
    async fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        let program = self.program.as_ref().ok_or(GitError::NotInstalled)?;

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(GitError::SpawnFailed)?;

        let result = GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        debug!(
            "git {} -> {:?}",
            args.first().copied().unwrap_or_default(),
            result.code
        );

        Ok(result)
    }
}
