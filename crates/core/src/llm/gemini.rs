// crates/core/src/llm/gemini.rs
//! Gemini REST client. One `generateContent` call per request.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::envelope::{classify, GenerateContentResponse};
use super::provider::LlmProvider;
use super::types::GenerationError;

/// Production endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Overall per-call deadline when none is configured.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Establishing a connection gets a shorter budget than the full call.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// HTTP client for the Gemini `generateContent` endpoint.
///
/// Holds one pooled reqwest session shared by all in-flight requests;
/// cheap to share behind an `Arc`. Dropping the client releases the
/// session. The API key travels in the `x-goog-api-key` header and is
/// never logged or echoed into error details.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a client for the production endpoint with the default
    /// per-call deadline.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        self.base_url = base.trim_end_matches('/').to_string();
        self
    }

    /// Override the overall per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, model_name: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model_name)
    }

    /// Send the request and decode the envelope. Runs under the caller's
    /// deadline in [`Self::generate`].
    async fn call(
        &self,
        model_name: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint(model_name))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let detail = if e.is_connect() {
                    format!("could not connect to provider: {e}")
                } else {
                    format!("request failed: {e}")
                };
                GenerationError::transport(detail)
            })?;

        let status = response.status();
        if !status.is_success() {
            // Auth, quota, and server-side errors all land here. The body
            // is logged for operators but never propagated.
            let body = response.text().await.unwrap_or_default();
            warn!(
                model = %model_name,
                status = %status,
                body = %&body[..body.len().min(500)],
                "gemini API returned an error status"
            );
            return Err(GenerationError::transport(format!("gemini API returned {status}")));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GenerationError::empty(format!("malformed response envelope: {e}")))
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate(&self, model_name: &str, prompt: &str) -> Result<String, GenerationError> {
        debug!(
            model = %model_name,
            prompt_len = prompt.len(),
            "gemini: sending generateContent"
        );
        let t0 = Instant::now();

        // One deadline over the whole exchange. An abandoned call yields
        // no partial outcome; the timeout maps straight to a transport
        // failure, matching caller-side cancellation semantics.
        let envelope = match tokio::time::timeout(self.timeout, self.call(model_name, prompt)).await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    model = %model_name,
                    timeout_secs = self.timeout.as_secs(),
                    "gemini: call abandoned at deadline"
                );
                return Err(GenerationError::transport(format!(
                    "deadline of {}s exceeded waiting for the provider",
                    self.timeout.as_secs()
                )));
            }
        };

        let text = classify(model_name, Some(&envelope))?;
        debug!(
            model = %model_name,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            reply_len = text.len(),
            "gemini: response classified as success"
        );
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

impl Drop for GeminiClient {
    fn drop(&mut self) {
        // Session release happens via reqwest's pool teardown; the log
        // line marks the exactly-once shutdown point.
        debug!("gemini: client dropped, HTTP session released");
    }
}
