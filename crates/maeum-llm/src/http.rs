//! HTTP chat backend.
//!
//! [`HttpBackend`] posts a [`GenerationRequest`] as JSON to the configured
//! chat endpoint and reads the answer from the response body.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use maeum_types::config::BackendConfig;

use crate::error::{BackendError, Result};
use crate::generator::Generator;
use crate::types::{GenerationRequest, extract_answer};

/// A [`Generator`] backed by an HTTP chat server.
///
/// ```rust,ignore
/// use maeum_llm::{HttpBackend, GenerationRequest, Generator};
///
/// let backend = HttpBackend::new(&config.backend)?;
/// let answer = backend
///     .generate(&GenerationRequest::new("hi", "be brief", 256))
///     .await?;
/// ```
pub struct HttpBackend {
    base_url: String,
    chat_path: String,
    health_path: String,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend from configuration.
    ///
    /// The client-level timeout matches `timeout_secs`, so a hung server
    /// surfaces as [`BackendError::Timeout`] even without an outer deadline.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_path: config.chat_path.clone(),
            health_path: config.health_path.clone(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

#[async_trait]
impl Generator for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = self.url(&self.chat_path);

        debug!(
            url = %url,
            chars = request.message.len(),
            triage = request.context.is_some(),
            "forwarding turn to backend"
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(BackendError::from_transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "backend returned error status");
            if status.as_u16() == 503 {
                return Err(BackendError::Unavailable(body));
            }
            return Err(BackendError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout
            } else {
                BackendError::InvalidResponse(format!("failed to parse response: {e}"))
            }
        })?;

        let answer = extract_answer(&body).ok_or_else(|| {
            BackendError::InvalidResponse("no `response` field in body".into())
        })?;

        debug!(chars = answer.len(), "backend answer received");
        Ok(answer)
    }

    async fn health(&self) -> Result<()> {
        let url = self.url(&self.health_path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(BackendError::from_transport)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::Unavailable(format!("health check HTTP {status}")))
        }
    }
}
