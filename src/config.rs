//! Runtime settings read from the environment.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use tracing::warn;

/// Environment variable holding the API key. Takes precedence over git config.
pub const CREDENTIAL_ENV_VAR: &str = "GEMINI_API_KEY";

/// Repository-local git config key the API key is saved under.
pub const CREDENTIAL_CONFIG_KEY: &str = "gemit.apikey";

/// Environment variable to override the default model.
pub const MODEL_ENV_VAR: &str = "GEMIT_MODEL";

/// Environment variable to override the API base URL.
pub const API_BASE_ENV_VAR: &str = "GEMIT_API_BASE";

/// Environment variable to set a request timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "GEMIT_TIMEOUT";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

const TRACKED_VARS: [&str; 4] = [
    CREDENTIAL_ENV_VAR,
    MODEL_ENV_VAR,
    API_BASE_ENV_VAR,
    TIMEOUT_ENV_VAR,
];

/// Immutable copy of the environment variables gemit reads.
///
/// Captured once at startup so nothing downstream reaches for
/// `std::env` on its own.
#[derive(Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub fn from_process() -> Self {
        let vars = TRACKED_VARS
            .iter()
            .filter_map(|name| env::var(name).ok().map(|v| (name.to_string(), v)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `name`, treating empty strings as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

impl std::fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Names only: the snapshot may carry the API key.
        f.debug_struct("EnvSnapshot")
            .field("vars", &self.vars.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Settings for the suggestion client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub model: String,
    pub api_base: String,
    /// `None` means the request may block indefinitely.
    pub timeout: Option<Duration>,
}

impl Settings {
    /// Build settings from the environment, with an optional CLI model override.
    pub fn from_env(env: &EnvSnapshot, model_override: Option<&str>) -> Self {
        let model = model_override
            .filter(|m| !m.trim().is_empty())
            .or_else(|| env.get(MODEL_ENV_VAR))
            .unwrap_or(DEFAULT_MODEL)
            .trim()
            .to_string();

        let api_base = env
            .get(API_BASE_ENV_VAR)
            .unwrap_or(DEFAULT_API_BASE)
            .trim()
            .trim_end_matches('/')
            .to_string();

        Self {
            model,
            api_base,
            timeout: parse_timeout(env.get(TIMEOUT_ENV_VAR)),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_env(&EnvSnapshot::default(), None)
    }
}

/// Parse the timeout override.
///
/// Logs a warning if the value is set but not a positive integer.
fn parse_timeout(raw: Option<&str>) -> Option<Duration> {
    let raw = raw?.trim();
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!(
                "Invalid {} value '{}', requests will not time out",
                TIMEOUT_ENV_VAR, raw
            );
            None
        }
    }
}
