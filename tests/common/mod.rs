//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;
use std::process::Command;
use std::sync::Mutex;

use gemit::error::PromptError;
use gemit::{Decision, Level, Prompter};

/// A git repository in a temp directory, driven through the git CLI.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
}

impl TestRepo {
    /// Create a new empty repository on `main` with a local identity.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Self { dir };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in the repository and return stdout. Panics on failure.
    pub fn git(&self, args: &[&str]) -> String {
        let output = self.git_raw(args);
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run git without asserting success.
    pub fn git_raw(&self, args: &[&str]) -> std::process::Output {
        Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git")
    }

    pub fn write(&self, name: &str, content: &str) {
        std::fs::write(self.path().join(name), content).expect("Failed to write test file");
    }

    pub fn stage(&self, name: &str) {
        self.git(&["add", name]);
    }

    /// Write, stage and commit a file.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) {
        self.write(name, content);
        self.stage(name);
        self.git(&["commit", "-q", "-m", message]);
    }

    /// Subject line of HEAD.
    pub fn head_subject(&self) -> String {
        self.git(&["log", "-1", "--format=%s"]).trim().to_string()
    }

    pub fn commit_count(&self) -> usize {
        let output = self.git_raw(&["rev-list", "--count", "HEAD"]);
        if !output.status.success() {
            return 0;
        }
        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse()
            .unwrap_or(0)
    }

    /// Leave `conflict.txt` in an unmerged state.
    pub fn create_merge_conflict(&self) {
        self.commit_file("conflict.txt", "base\n", "chore: base");
        self.git(&["checkout", "-q", "-b", "other"]);
        self.commit_file("conflict.txt", "theirs\n", "chore: theirs");
        self.git(&["checkout", "-q", "main"]);
        self.commit_file("conflict.txt", "ours\n", "chore: ours");
        let merge = self.git_raw(&["merge", "other"]);
        assert!(!merge.status.success(), "merge should conflict");
    }
}

/// Prompter with fixed answers that records everything shown.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub init: bool,
    pub credential: String,
    pub save_credential: bool,
    pub stage_all: bool,
    pub intent: String,
    pub decisions: Mutex<Vec<Decision>>,
    pub hints: Mutex<Vec<String>>,
    pub shown: Mutex<Vec<String>>,
    pub statuses: Mutex<Vec<(Level, String)>>,
    pub asked: Mutex<Vec<&'static str>>,
}

impl ScriptedPrompter {
    fn ask(&self, name: &'static str) {
        self.asked.lock().unwrap().push(name);
    }

    pub fn was_asked(&self, name: &str) -> bool {
        self.asked.lock().unwrap().iter().any(|asked| *asked == name)
    }

    pub fn status_messages(&self) -> Vec<String> {
        self.statuses
            .lock()
            .unwrap()
            .iter()
            .map(|(_, msg)| msg.clone())
            .collect()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm_init(&self) -> Result<bool, PromptError> {
        self.ask("confirm_init");
        Ok(self.init)
    }

    fn enter_credential(&self) -> Result<String, PromptError> {
        self.ask("enter_credential");
        Ok(self.credential.clone())
    }

    fn confirm_save_credential(&self) -> Result<bool, PromptError> {
        self.ask("confirm_save_credential");
        Ok(self.save_credential)
    }

    fn confirm_stage_all(&self) -> Result<bool, PromptError> {
        self.ask("confirm_stage_all");
        Ok(self.stage_all)
    }

    fn enter_intent(&self) -> Result<String, PromptError> {
        self.ask("enter_intent");
        Ok(self.intent.clone())
    }

    fn choose_action(&self) -> Result<Decision, PromptError> {
        self.ask("choose_action");
        Ok(self.decisions.lock().unwrap().remove(0))
    }

    fn enter_rewrite_hint(&self) -> Result<String, PromptError> {
        self.ask("enter_rewrite_hint");
        Ok(self.hints.lock().unwrap().remove(0))
    }

    fn show_suggestion(&self, suggestion: &str) {
        self.shown.lock().unwrap().push(suggestion.to_string());
    }

    fn status(&self, level: Level, message: &str) {
        self.statuses
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}
