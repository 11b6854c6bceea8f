//! Tokio-backed process runner

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::application::ports::outbound::{ProcessError, ProcessOutput, ProcessRunner};

/// Runs programs found on `PATH`. A program still running at the timeout is killed.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Whether `program` resolves on `PATH`
    pub fn is_installed(program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError> {
        let binary = which::which(program).map_err(|_| ProcessError::NotFound(program.to_string()))?;

        let child = Command::new(&binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProcessError::Spawn {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        debug!(program, arg_count = args.len(), "Spawned process");

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let result = ProcessOutput {
                    success: output.status.success(),
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                debug!(
                    program,
                    success = result.success,
                    stdout_len = result.stdout.len(),
                    stderr_len = result.stderr.len(),
                    "Process finished"
                );
                Ok(result)
            }
            Ok(Err(e)) => Err(ProcessError::Io(e.to_string())),
            Err(_) => {
                warn!(program, timeout_secs = timeout.as_secs(), "Process timed out");
                Err(ProcessError::Timeout {
                    program: program.to_string(),
                    secs: timeout.as_secs(),
                })
            }
        }
    }
}
