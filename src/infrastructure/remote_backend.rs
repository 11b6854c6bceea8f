//! HTTP client for a remote story generation service
//!
//! The service exposes `GET /health` and `POST /generate-story`. When it was
//! started with an API key, every call except the health check must carry it as
//! a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::dto::GenerationRequest;
use crate::application::ports::outbound::{BackendOutput, GenerationError, StoryBackend};

/// Client for the remote story service. Disabled when no base URL is configured.
pub struct RemoteStoryBackend {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    probe_timeout: Duration,
}

impl RemoteStoryBackend {
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            api_key: None,
            timeout,
            probe_timeout: Duration::from_secs(2),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Check if the service answers its health endpoint
    pub async fn health_check(&self) -> Result<bool, RemoteError> {
        let base_url = self.base_url.as_deref().ok_or(RemoteError::NotConfigured)?;

        let response = self
            .client
            .get(format!("{}/health", base_url))
            .timeout(self.probe_timeout)
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    /// Ask the service for a chapter and return the raw response body
    pub async fn generate_story(
        &self,
        request: &GenerationRequest,
        include_choices: bool,
    ) -> Result<String, RemoteError> {
        let base_url = self.base_url.as_deref().ok_or(RemoteError::NotConfigured)?;

        let body = GenerateStoryBody {
            request,
            include_choices,
        };

        let response = self
            .authorized(self.client.post(format!("{}/generate-story", base_url)))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::ApiError {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl StoryBackend for RemoteStoryBackend {
    fn name(&self) -> &str {
        "remote"
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn probe(&self) -> bool {
        if !self.is_configured() {
            return false;
        }
        match self.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                debug!(error = %e, "Remote story service health check failed");
                false
            }
        }
    }

    #[instrument(skip(self, request), fields(chapter = request.chapter_number))]
    async fn generate(
        &self,
        request: &GenerationRequest,
        want_choices: bool,
    ) -> Result<BackendOutput, GenerationError> {
        match self.generate_story(request, want_choices).await {
            Ok(body) => Ok(BackendOutput::Raw(body)),
            Err(RemoteError::NotConfigured) => Err(GenerationError::BackendUnavailable(
                RemoteError::NotConfigured.to_string(),
            )),
            Err(RemoteError::HttpError(e)) if e.is_timeout() => Err(GenerationError::Timeout {
                backend: "remote".to_string(),
                elapsed_ms: self.timeout.as_millis(),
            }),
            Err(e) => Err(GenerationError::GenerationFailed(e.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Remote story service URL is not configured")]
    NotConfigured,
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateStoryBody<'a> {
    #[serde(flatten)]
    request: &'a GenerationRequest,
    include_choices: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::domain::value_objects::{StatName, StatProfile};

    fn request() -> GenerationRequest {
        GenerationRequest::new("Luna", "unicorn", "brave and kind", "fantasy", 3)
            .with_previous_choice("Trust your heart")
            .with_stats(StatProfile::new().with_stat(StatName::Courage, 60))
    }

    fn backend(server: &MockServer) -> RemoteStoryBackend {
        RemoteStoryBackend::new(Some(&server.uri()), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_probe_without_url_is_false() {
        let backend = RemoteStoryBackend::new(None, Duration::from_secs(5));
        assert!(!backend.is_configured());
        assert!(!backend.probe().await);

        let blank = RemoteStoryBackend::new(Some("  "), Duration::from_secs(5));
        assert!(!blank.is_configured());
    }

    #[tokio::test]
    async fn test_probe_uses_health_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
            .mount(&server)
            .await;

        assert!(backend(&server).probe().await);
    }

    #[tokio::test]
    async fn test_probe_false_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!backend(&server).probe().await);
    }

    #[tokio::test]
    async fn test_generate_posts_camel_case_request() {
        let server = MockServer::start().await;
        let reply = json!({"content": "Luna crossed the rainbow bridge."});
        Mock::given(method("POST"))
            .and(path("/generate-story"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({
                "characterName": "Luna",
                "chapterNumber": 3,
                "previousChoice": "Trust your heart",
                "characterStats": {"courage": 60},
                "includeChoices": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend(&server).with_api_key(Some("secret".to_string()));
        let output = backend.generate(&request(), true).await.unwrap();

        match output {
            BackendOutput::Raw(body) => {
                let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
                assert_eq!(parsed, reply);
            }
            other => panic!("expected raw output, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_error_status_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-story"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})))
            .mount(&server)
            .await;

        let result = backend(&server).generate(&request(), false).await;
        assert!(matches!(result, Err(GenerationError::GenerationFailed(msg)) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-story"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let backend = RemoteStoryBackend::new(Some(&server.uri()), Duration::from_millis(100));
        let result = backend.generate(&request(), false).await;
        assert!(matches!(result, Err(GenerationError::Timeout { .. })));
    }
}
