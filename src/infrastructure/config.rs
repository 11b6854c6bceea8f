//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::domain::value_objects::StorySettings;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Remote story service base URL. `None` disables the remote backend.
    pub remote_url: Option<String>,
    /// Bearer token for the remote story service
    pub remote_api_key: Option<String>,
    pub remote_timeout: Duration,

    /// Whether the local model runtime may be used at all
    pub local_runtime_enabled: bool,
    /// Runtime executable, resolved on PATH
    pub local_runtime_program: String,
    pub local_model: String,
    pub process_timeout: Duration,

    /// Upper bound on every availability probe
    pub probe_timeout: Duration,

    pub story: StorySettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            remote_url: non_empty_var("STORY_REMOTE_URL"),
            remote_api_key: non_empty_var("STORY_REMOTE_API_KEY"),
            remote_timeout: secs_var("STORY_REMOTE_TIMEOUT_SECS", 30)?,

            local_runtime_enabled: env::var("STORY_LOCAL_RUNTIME_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("STORY_LOCAL_RUNTIME_ENABLED must be true or false")?,
            local_runtime_program: env::var("STORY_LOCAL_RUNTIME_PROGRAM")
                .unwrap_or_else(|_| "ollama".to_string()),
            local_model: env::var("STORY_LOCAL_MODEL").unwrap_or_else(|_| "mistral".to_string()),
            process_timeout: secs_var("STORY_PROCESS_TIMEOUT_SECS", 60)?,

            probe_timeout: secs_var("STORY_PROBE_TIMEOUT_SECS", 2)?,

            story: StorySettings::from_env(),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn secs_var(key: &str, default: u64) -> Result<Duration> {
    let secs: u64 = match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds", key))?,
        Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_duration_uses_default() {
        let timeout = secs_var("STORY_TEST_UNSET_TIMEOUT_SECS", 42).unwrap();
        assert_eq!(timeout, Duration::from_secs(42));
        assert!(non_empty_var("STORY_TEST_UNSET_URL").is_none());
    }
}
