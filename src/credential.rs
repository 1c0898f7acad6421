//! API key resolution.
//!
//! Resolution order:
//! 1. `GEMINI_API_KEY` environment variable
//! 2. `gemit.apikey` in the repository's local git config
//!
//! Prompting for a key is left to the workflow.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::config::{CREDENTIAL_CONFIG_KEY, CREDENTIAL_ENV_VAR, EnvSnapshot};
use crate::error::GitError;

/// The API key. Redacted from `Debug` output.
pub type Credential = SecretString;

/// Key/value configuration scoped to the current repository.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read a value, `None` when unset or unreadable.
    async fn get(&self, key: &str) -> Option<String>;

    /// Write a value to the repository-local configuration.
    async fn set(&self, key: &str, value: &str) -> Result<(), GitError>;
}

/// Resolve the credential without prompting.
///
/// The store is only consulted when the environment has no usable value.
pub async fn resolve_credential(env: &EnvSnapshot, store: &dyn ConfigStore) -> Option<Credential> {
    if let Some(value) = env.get(CREDENTIAL_ENV_VAR) {
        debug!("Using API key from {}", CREDENTIAL_ENV_VAR);
        return Some(SecretString::from(value.trim().to_string()));
    }

    let value = store.get(CREDENTIAL_CONFIG_KEY).await?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    debug!("Using API key from git config {}", CREDENTIAL_CONFIG_KEY);
    Some(SecretString::from(value.to_string()))
}

/// Save the credential to the repository-local configuration.
pub async fn persist_credential(
    store: &dyn ConfigStore,
    credential: &Credential,
) -> Result<(), GitError> {
    store
        .set(CREDENTIAL_CONFIG_KEY, credential.expose_secret())
        .await
}
