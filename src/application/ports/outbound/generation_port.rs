//! Generation backend port - one strategy for writing a chapter
//!
//! The orchestrator walks an ordered list of these. Implementations must be
//! safe to call concurrently for different stories.

use std::time::Duration;

use async_trait::async_trait;

use crate::application::dto::{ChapterResult, GenerationRequest};

/// What a backend handed back
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOutput {
    /// Already in the chapter shape
    Structured(ChapterResult),
    /// Free text that may embed a JSON payload and needs repair
    Raw(String),
}

/// Backend-level failures. All are recoverable at the orchestrator boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    /// Probe failed; the orchestrator moves to the next backend
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
    /// Backend was attempted but failed mid-call
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
    /// Output could not be turned into a chapter, not even as raw text
    #[error("Malformed output: {0}")]
    MalformedOutput(String),
    /// Backend or caller deadline elapsed
    #[error("{backend} timed out after {elapsed_ms}ms")]
    Timeout { backend: String, elapsed_ms: u128 },
}

#[async_trait]
pub trait StoryBackend: Send + Sync {
    /// Short name used in logs and status reports
    fn name(&self) -> &str;

    /// Upper bound on a single generate call. `None` means the backend never suspends.
    fn timeout(&self) -> Option<Duration>;

    /// Whether the backend can be used right now. Must not fail: errors mean `false`.
    async fn probe(&self) -> bool;

    async fn generate(
        &self,
        request: &GenerationRequest,
        want_choices: bool,
    ) -> Result<BackendOutput, GenerationError>;
}
