//! Process runner port - spawning local programs
//!
//! Wrapping subprocess calls behind a trait keeps the process backend testable
//! without a model runtime installed.

use std::time::Duration;

use async_trait::async_trait;

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProcessError {
    #[error("Program not found: {0}")]
    NotFound(String),
    #[error("Failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },
    #[error("I/O error: {0}")]
    Io(String),
    #[error("{program} did not finish within {secs}s")]
    Timeout { program: String, secs: u64 },
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` and capture its output, killing it after `timeout`
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError>;
}
