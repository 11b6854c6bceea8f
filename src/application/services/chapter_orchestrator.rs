//! Chapter Orchestrator - always produce a chapter
//!
//! Backends are tried in priority order. Each one is probed at call time, then
//! asked to generate under its own timeout (further bounded by an optional
//! caller deadline). Output is repaired into the chapter shape. Any failure is
//! logged and the next backend is tried; the caller never sees an error.
//!
//! The deterministic template backend is expected last in the list. If the
//! list is exhausted anyway, a minimal built-in chapter is returned.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::application::dto::{ChapterResult, GenerationRequest};
use crate::application::ports::outbound::{BackendOutput, GenerationError, StoryBackend};
use crate::application::services::story::{conform, repair_output};
use crate::domain::services::ChoicePolicy;
use crate::domain::value_objects::ChoiceSet;

/// Availability of one backend at the moment it was probed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub name: String,
    pub available: bool,
}

pub struct ChapterOrchestrator {
    backends: Vec<Arc<dyn StoryBackend>>,
    policy: ChoicePolicy,
}

impl ChapterOrchestrator {
    /// `backends` in priority order, highest first
    pub fn new(backends: Vec<Arc<dyn StoryBackend>>, policy: ChoicePolicy) -> Self {
        Self { backends, policy }
    }

    pub fn policy(&self) -> ChoicePolicy {
        self.policy
    }

    /// Generate a chapter with no caller deadline
    pub async fn generate_chapter(&self, request: &GenerationRequest) -> ChapterResult {
        self.run(request, None).await
    }

    /// Generate a chapter, abandoning any suspending backend once `deadline` passes
    pub async fn generate_chapter_before(
        &self,
        request: &GenerationRequest,
        deadline: Instant,
    ) -> ChapterResult {
        self.run(request, Some(deadline)).await
    }

    /// Probe every backend, in priority order
    pub async fn backend_status(&self) -> Vec<BackendStatus> {
        let mut statuses = Vec::with_capacity(self.backends.len());
        for backend in &self.backends {
            statuses.push(BackendStatus {
                name: backend.name().to_string(),
                available: backend.probe().await,
            });
        }
        statuses
    }

    #[instrument(
        skip(self, request),
        fields(chapter = request.chapter_number, genre = %request.genre)
    )]
    async fn run(&self, request: &GenerationRequest, deadline: Option<Instant>) -> ChapterResult {
        let want_choices = self.policy.should_include_choices(request.chapter_number);
        debug!(want_choices, "Starting chapter generation");

        for backend in &self.backends {
            match self.attempt(backend.as_ref(), request, want_choices, deadline).await {
                Ok(result) => {
                    info!(
                        backend = backend.name(),
                        has_choices = result.choices.is_some(),
                        "Chapter generated"
                    );
                    return result.with_backend(backend.name());
                }
                Err(GenerationError::BackendUnavailable(reason)) => {
                    debug!(backend = backend.name(), %reason, "Skipping backend");
                }
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "Backend failed, trying next");
                }
            }
        }

        warn!("Every backend failed, using built-in chapter");
        last_resort_chapter(request, want_choices)
    }

    async fn attempt(
        &self,
        backend: &dyn StoryBackend,
        request: &GenerationRequest,
        want_choices: bool,
        deadline: Option<Instant>,
    ) -> Result<ChapterResult, GenerationError> {
        let suspends = backend.timeout().is_some();
        let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));

        if suspends && remaining == Some(Duration::ZERO) {
            return Err(GenerationError::Timeout {
                backend: backend.name().to_string(),
                elapsed_ms: 0,
            });
        }

        let probe_limit = if suspends { remaining } else { None };
        let available = bounded(probe_limit, backend.probe()).await.unwrap_or(false);
        if !available {
            return Err(GenerationError::BackendUnavailable(
                "probe reported unavailable".to_string(),
            ));
        }

        let limit = match (backend.timeout(), deadline) {
            (Some(own), Some(d)) => Some(own.min(d.saturating_duration_since(Instant::now()))),
            (Some(own), None) => Some(own),
            (None, _) => None,
        };

        let started = Instant::now();
        let output = bounded(limit, backend.generate(request, want_choices))
            .await
            .ok_or_else(|| GenerationError::Timeout {
                backend: backend.name().to_string(),
                elapsed_ms: started.elapsed().as_millis(),
            })??;

        match output {
            BackendOutput::Structured(result) => conform(result, want_choices),
            BackendOutput::Raw(text) => repair_output(&text, want_choices),
        }
    }
}

/// Await `future`, giving up after `limit` when one is set
async fn bounded<F: Future>(limit: Option<Duration>, future: F) -> Option<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, future).await.ok(),
        None => Some(future.await),
    }
}

fn last_resort_chapter(request: &GenerationRequest, want_choices: bool) -> ChapterResult {
    let content = format!(
        "Chapter {}: {} the {} continues their {} adventure. With their {} personality, \
         they face new challenges and discover amazing things along the way.",
        request.chapter_number,
        request.character_name,
        request.character_type,
        request.genre,
        request.personality
    );
    ChapterResult::new(content, want_choices.then(ChoiceSet::fallback)).with_backend("built-in")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use crate::domain::value_objects::{BranchId, StatName};
    use crate::infrastructure::template_backend::TemplateBackend;

    enum Behavior {
        Unavailable,
        Fails,
        Returns(BackendOutput),
        Hangs,
    }

    /// Scripted backend that counts how often it is asked to generate
    struct ScriptedBackend {
        name: &'static str,
        behavior: Behavior,
        timeout: Duration,
        calls: AtomicU32,
    }

    impl ScriptedBackend {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                timeout: Duration::from_millis(50),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StoryBackend for ScriptedBackend {
        fn name(&self) -> &str {
            self.name
        }

        fn timeout(&self) -> Option<Duration> {
            Some(self.timeout)
        }

        async fn probe(&self) -> bool {
            !matches!(self.behavior, Behavior::Unavailable)
        }

        async fn generate(
            &self,
            _request: &GenerationRequest,
            _want_choices: bool,
        ) -> Result<BackendOutput, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Unavailable => Err(GenerationError::BackendUnavailable("down".into())),
                Behavior::Fails => Err(GenerationError::GenerationFailed("boom".into())),
                Behavior::Returns(output) => Ok(output.clone()),
                Behavior::Hangs => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(BackendOutput::Raw("too late".into()))
                }
            }
        }
    }

    fn request(chapter: u32) -> GenerationRequest {
        GenerationRequest::new("Luna", "unicorn", "brave and kind", "fantasy", chapter)
    }

    fn orchestrator(backends: Vec<Arc<dyn StoryBackend>>) -> ChapterOrchestrator {
        ChapterOrchestrator::new(backends, ChoicePolicy::default())
    }

    /// Scripted backends in order, then the template floor
    fn with_template(scripted: &[&Arc<ScriptedBackend>]) -> Vec<Arc<dyn StoryBackend>> {
        let mut backends: Vec<Arc<dyn StoryBackend>> = scripted
            .iter()
            .map(|b| Arc::clone(b) as Arc<dyn StoryBackend>)
            .collect();
        backends.push(Arc::new(TemplateBackend::new()));
        backends
    }

    #[tokio::test]
    async fn test_all_unavailable_falls_back_to_template() {
        let remote = ScriptedBackend::new("remote", Behavior::Unavailable);
        let process = ScriptedBackend::new("process", Behavior::Unavailable);
        let service = orchestrator(with_template(&[&remote, &process]));

        let result = service.generate_chapter(&request(1)).await;

        assert_eq!(result.backend, "template");
        assert!(result.content.contains("Luna"));
        let choices = result.choices.expect("chapter 1 offers choices");
        assert!(choices.iter().all(|(_, branch)| !branch.effects.is_zero()));
        assert_eq!(remote.calls(), 0);
        assert_eq!(process.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_choice_chapter_has_no_choices() {
        let service = orchestrator(with_template(&[]));
        let result = service.generate_chapter(&request(2)).await;

        assert!(!result.content.is_empty());
        assert!(result.choices.is_none());
    }

    #[tokio::test]
    async fn test_first_available_backend_wins() {
        let structured = ChapterResult::new("Luna found a silver bridge.", None);
        let remote = ScriptedBackend::new("remote", Behavior::Returns(BackendOutput::Structured(structured)));
        let process = ScriptedBackend::new("process", Behavior::Returns(BackendOutput::Raw("unused".into())));
        let service = orchestrator(with_template(&[&remote, &process]));

        let result = service.generate_chapter(&request(2)).await;

        assert_eq!(result.backend, "remote");
        assert_eq!(result.content, "Luna found a silver bridge.");
        assert_eq!(process.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_through_to_next_backend() {
        let remote = ScriptedBackend::new("remote", Behavior::Fails);
        let raw = r#"Okay! {"content": "Luna met a fox.", "choices": {"optionA": {"text": "Follow", "statChanges": {"courage": 7}}, "optionB": {"text": "Wave", "statChanges": {"friendship": 6}}}}"#;
        let process = ScriptedBackend::new("process", Behavior::Returns(BackendOutput::Raw(raw.into())));
        let service = orchestrator(with_template(&[&remote, &process]));

        let result = service.generate_chapter(&request(3)).await;

        assert_eq!(remote.calls(), 1);
        assert_eq!(result.backend, "process");
        assert_eq!(result.content, "Luna met a fox.");
        let choices = result.choices.unwrap();
        assert_eq!(choices.branch(BranchId::A).effects.get(StatName::Courage), 7);
    }

    #[tokio::test]
    async fn test_prose_output_gets_fallback_choices() {
        let process = ScriptedBackend::new(
            "process",
            Behavior::Returns(BackendOutput::Raw("Luna sang to the stars.".into())),
        );
        let service = orchestrator(with_template(&[&process]));

        let result = service.generate_chapter(&request(6)).await;

        assert_eq!(result.backend, "process");
        assert_eq!(result.content, "Luna sang to the stars.");
        assert_eq!(result.choices, Some(ChoiceSet::fallback()));
    }

    #[tokio::test]
    async fn test_empty_output_falls_through() {
        let process = ScriptedBackend::new("process", Behavior::Returns(BackendOutput::Raw("   ".into())));
        let service = orchestrator(with_template(&[&process]));

        let result = service.generate_chapter(&request(2)).await;
        assert_eq!(result.backend, "template");
    }

    #[tokio::test]
    async fn test_json_without_content_falls_through() {
        let raw = r#"{"content": ""}"#;
        let process = ScriptedBackend::new("process", Behavior::Returns(BackendOutput::Raw(raw.into())));
        let service = orchestrator(with_template(&[&process]));

        let result = service.generate_chapter(&request(2)).await;
        assert_eq!(result.backend, "template");
        assert_ne!(result.content, raw);
    }

    #[tokio::test]
    async fn test_hanging_backend_times_out() {
        let remote = ScriptedBackend::new("remote", Behavior::Hangs);
        let service = orchestrator(with_template(&[&remote]));

        let result = service.generate_chapter(&request(1)).await;

        assert_eq!(remote.calls(), 1);
        assert_eq!(result.backend, "template");
        assert!(result.choices.is_some());
    }

    #[tokio::test]
    async fn test_elapsed_deadline_skips_suspending_backends() {
        let remote = ScriptedBackend::new("remote", Behavior::Returns(BackendOutput::Raw("x".into())));
        let service = orchestrator(with_template(&[&remote]));

        let deadline = Instant::now() - Duration::from_millis(1);
        let result = service.generate_chapter_before(&request(4), deadline).await;

        assert_eq!(remote.calls(), 0);
        assert_eq!(result.backend, "template");
    }

    #[tokio::test]
    async fn test_empty_backend_list_still_returns_chapter() {
        let service = orchestrator(vec![]);

        let with_choices = service.generate_chapter(&request(1)).await;
        assert_eq!(with_choices.backend, "built-in");
        assert!(with_choices.content.contains("Luna the unicorn"));
        assert_eq!(with_choices.choices, Some(ChoiceSet::fallback()));

        let without = service.generate_chapter(&request(2)).await;
        assert!(without.choices.is_none());
    }

    #[tokio::test]
    async fn test_choices_present_exactly_when_policy_requires() {
        let prose = ScriptedBackend::new("process", Behavior::Returns(BackendOutput::Raw("text".into())));
        let failing = ScriptedBackend::new("remote", Behavior::Fails);
        let scenarios: Vec<Vec<Arc<dyn StoryBackend>>> = vec![
            Vec::new(),
            with_template(&[]),
            vec![prose as Arc<dyn StoryBackend>],
            vec![failing as Arc<dyn StoryBackend>],
        ];

        for backends in scenarios {
            let service = orchestrator(backends);
            for chapter in 1..=10 {
                let result = service.generate_chapter(&request(chapter)).await;
                assert!(!result.content.is_empty());
                assert_eq!(
                    result.choices.is_some(),
                    service.policy().should_include_choices(chapter),
                    "chapter {}",
                    chapter
                );
            }
        }
    }

    #[tokio::test]
    async fn test_backend_status_reports_each_backend() {
        let remote = ScriptedBackend::new("remote", Behavior::Unavailable);
        let service = orchestrator(with_template(&[&remote]));

        let status = service.backend_status().await;
        assert_eq!(
            status,
            vec![
                BackendStatus { name: "remote".into(), available: false },
                BackendStatus { name: "template".into(), available: true },
            ]
        );
    }
}
