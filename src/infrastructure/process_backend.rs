//! Local model runtime backend
//!
//! Invokes an installed runtime as `<program> run <model> <prompt>` and hands
//! its stdout to the orchestrator for repair.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::application::dto::GenerationRequest;
use crate::application::ports::outbound::{
    BackendOutput, GenerationError, ProcessError, ProcessRunner, StoryBackend,
};
use crate::application::services::story::build_chapter_prompt;
use crate::domain::value_objects::StatRange;

pub struct ProcessStoryBackend {
    runner: Arc<dyn ProcessRunner>,
    enabled: bool,
    program: String,
    model: String,
    timeout: Duration,
    probe_timeout: Duration,
    stat_range: StatRange,
}

impl ProcessStoryBackend {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        program: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            enabled: true,
            program: program.into(),
            model: model.into(),
            timeout,
            probe_timeout: Duration::from_secs(2),
            stat_range: StatRange::default(),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn with_stat_range(mut self, stat_range: StatRange) -> Self {
        self.stat_range = stat_range;
        self
    }
}

#[async_trait]
impl StoryBackend for ProcessStoryBackend {
    fn name(&self) -> &str {
        "process"
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn probe(&self) -> bool {
        if !self.enabled {
            return false;
        }
        match self
            .runner
            .run(&self.program, &["--version".to_string()], self.probe_timeout)
            .await
        {
            Ok(output) => output.success,
            Err(e) => {
                debug!(program = %self.program, error = %e, "Local runtime probe failed");
                false
            }
        }
    }

    #[instrument(skip(self, request), fields(chapter = request.chapter_number, model = %self.model))]
    async fn generate(
        &self,
        request: &GenerationRequest,
        want_choices: bool,
    ) -> Result<BackendOutput, GenerationError> {
        let prompt = build_chapter_prompt(request, want_choices, self.stat_range);
        let args = vec!["run".to_string(), self.model.clone(), prompt];

        let output = self
            .runner
            .run(&self.program, &args, self.timeout)
            .await
            .map_err(|e| match e {
                ProcessError::NotFound(program) => {
                    GenerationError::BackendUnavailable(format!("{} is not installed", program))
                }
                ProcessError::Timeout { .. } => GenerationError::Timeout {
                    backend: "process".to_string(),
                    elapsed_ms: self.timeout.as_millis(),
                },
                other => GenerationError::GenerationFailed(other.to_string()),
            })?;

        if !output.success {
            let detail = output.stderr.trim();
            warn!(exit_code = ?output.exit_code, stderr = %detail, "Local runtime failed");
            return Err(GenerationError::GenerationFailed(if detail.is_empty() {
                format!("{} exited with {:?}", self.program, output.exit_code)
            } else {
                detail.to_string()
            }));
        }

        Ok(BackendOutput::Raw(output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::application::ports::outbound::ProcessOutput;

    /// Replays canned results and records every invocation
    struct FakeRunner {
        version_ok: bool,
        result: Result<ProcessOutput, ProcessError>,
        invocations: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl FakeRunner {
        fn new(version_ok: bool, result: Result<ProcessOutput, ProcessError>) -> Arc<Self> {
            Arc::new(Self {
                version_ok,
                result,
                invocations: Mutex::new(Vec::new()),
            })
        }

        fn invocations(&self) -> Vec<(String, Vec<String>)> {
            self.invocations.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessRunner for FakeRunner {
        async fn run(
            &self,
            program: &str,
            args: &[String],
            _timeout: Duration,
        ) -> Result<ProcessOutput, ProcessError> {
            self.invocations
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            if args.first().map(String::as_str) == Some("--version") {
                return Ok(output(self.version_ok, "runtime 0.1", ""));
            }
            self.result.clone()
        }
    }

    fn output(success: bool, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            success,
            exit_code: Some(if success { 0 } else { 1 }),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    fn backend(runner: Arc<FakeRunner>) -> ProcessStoryBackend {
        ProcessStoryBackend::new(runner, "ollama", "mistral", Duration::from_secs(60))
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("Pip", "hedgehog", "curious", "mystery", 1)
    }

    #[tokio::test]
    async fn test_probe_runs_version_check() {
        let runner = FakeRunner::new(true, Ok(output(true, "", "")));
        assert!(backend(runner.clone()).probe().await);
        assert_eq!(
            runner.invocations(),
            vec![("ollama".to_string(), vec!["--version".to_string()])]
        );

        let broken = FakeRunner::new(false, Ok(output(true, "", "")));
        assert!(!backend(broken).probe().await);
    }

    #[tokio::test]
    async fn test_disabled_backend_never_spawns() {
        let runner = FakeRunner::new(true, Ok(output(true, "", "")));
        let backend = backend(runner.clone()).with_enabled(false);

        assert!(!backend.probe().await);
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_generate_passes_model_and_prompt() {
        let stdout = r#"{"content": "Pip found a clue."}"#;
        let runner = FakeRunner::new(true, Ok(output(true, stdout, "")));

        let result = backend(runner.clone()).generate(&request(), true).await.unwrap();
        assert_eq!(result, BackendOutput::Raw(stdout.to_string()));

        let (program, args) = runner.invocations().remove(0);
        assert_eq!(program, "ollama");
        assert_eq!(args[0], "run");
        assert_eq!(args[1], "mistral");
        assert!(args[2].contains("Pip, a hedgehog"));
        assert!(args[2].contains("exactly 2 choice options"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_stderr() {
        let runner = FakeRunner::new(true, Ok(output(false, "", "model not found")));
        let result = backend(runner).generate(&request(), false).await;

        assert!(matches!(result, Err(GenerationError::GenerationFailed(msg)) if msg == "model not found"));
    }

    #[tokio::test]
    async fn test_runner_errors_are_mapped() {
        let missing = FakeRunner::new(true, Err(ProcessError::NotFound("ollama".into())));
        assert!(matches!(
            backend(missing).generate(&request(), false).await,
            Err(GenerationError::BackendUnavailable(_))
        ));

        let slow = FakeRunner::new(
            true,
            Err(ProcessError::Timeout {
                program: "ollama".into(),
                secs: 60,
            }),
        );
        assert!(matches!(
            backend(slow).generate(&request(), false).await,
            Err(GenerationError::Timeout { .. })
        ));
    }
}
