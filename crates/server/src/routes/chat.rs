// crates/server/src/routes/chat.rs
//! Chat endpoint: the single request-processing pipeline.
//!
//! POST /chat: validate → resolve model → compose prompt → generate →
//! map the outcome to a reply or an API error.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use mentor_chat_core::compose;

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub selected_model_id: Option<String>,
    #[serde(default)]
    pub assisted_learning: bool,
}

/// Response body for a successful generation.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat - Relay one message to the selected model.
///
/// The handler dispatches on the generation outcome's variant only; all
/// provider-specific classification already happened in the client.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    if req.message.is_empty() {
        return Err(ApiError::EmptyMessage);
    }

    let selector = req.selected_model_id.as_deref().unwrap_or("");
    let model_name = state.registry.resolve(selector);
    let prompt = compose(&req.message, req.assisted_learning);

    tracing::info!(
        model = %model_name,
        assisted_learning = req.assisted_learning,
        message_len = req.message.len(),
        "Processing chat message"
    );

    match state.llm.generate(model_name, &prompt).await {
        Ok(reply) => Ok(Json(ChatResponse { reply })),
        Err(source) => Err(ApiError::Generation {
            model: model_name.to_string(),
            source,
        }),
    }
}

/// Create the chat routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use mentor_chat_core::llm::BlockStage;
    use mentor_chat_core::prompt::ASSISTED_LEARNING_TEMPLATE;
    use mentor_chat_core::{GenerationError, LlmProvider, ModelRegistry};

    /// Scripted provider: returns a canned outcome and records every
    /// (model, prompt) pair it was called with.
    struct ScriptedProvider {
        script: Box<dyn Fn() -> Result<String, GenerationError> + Send + Sync>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedProvider {
        fn replying(reply: &'static str) -> Arc<Self> {
            Self::with(move || Ok(reply.to_string()))
        }

        fn failing(make: impl Fn() -> GenerationError + Send + Sync + 'static) -> Arc<Self> {
            Self::with(move || Err(make()))
        }

        fn with(
            script: impl Fn() -> Result<String, GenerationError> + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                script: Box::new(script),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(
            &self,
            model_name: &str,
            prompt: &str,
        ) -> Result<String, GenerationError> {
            self.calls
                .lock()
                .unwrap()
                .push((model_name.to_string(), prompt.to_string()));
            (self.script)()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn app(llm: Arc<ScriptedProvider>) -> axum::Router {
        let state = AppState::new(ModelRegistry::with_defaults(), llm);
        crate::routes::api_routes(state)
    }

    async fn post_chat(app: axum::Router, body: serde_json::Value) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_chat_returns_reply() {
        let llm = ScriptedProvider::replying("Hi there!");
        let (status, body) = post_chat(
            app(llm.clone()),
            serde_json::json!({ "message": "hello", "selectedModelId": "1" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let response: ChatResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(response.reply, "Hi there!");

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("gemini-2.0-flash".to_string(), "hello".to_string()));
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected_without_remote_call() {
        let llm = ScriptedProvider::replying("never sent");
        let (status, body) = post_chat(
            app(llm.clone()),
            serde_json::json!({ "message": "" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Message cannot be empty"));
        assert!(llm.calls().is_empty(), "no remote call may happen on validation failure");
    }

    #[tokio::test]
    async fn test_unknown_selector_falls_back_to_default_model() {
        let llm = ScriptedProvider::replying("ok");
        let (status, _) = post_chat(
            app(llm.clone()),
            serde_json::json!({ "message": "hi", "selectedModelId": "9" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(llm.calls()[0].0, "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_missing_selector_falls_back_to_default_model() {
        let llm = ScriptedProvider::replying("ok");
        let (status, _) = post_chat(
            app(llm.clone()),
            serde_json::json!({ "message": "hi" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(llm.calls()[0].0, "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_assisted_learning_prefixes_template() {
        let llm = ScriptedProvider::replying("ok");
        let (status, _) = post_chat(
            app(llm.clone()),
            serde_json::json!({ "message": "explain gravity", "assistedLearning": true }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let prompt = &llm.calls()[0].1;
        assert!(prompt.starts_with(ASSISTED_LEARNING_TEMPLATE));
        assert!(prompt.ends_with("explain gravity"));
    }

    #[tokio::test]
    async fn test_plain_message_is_sent_unchanged() {
        let llm = ScriptedProvider::replying("ok");
        post_chat(
            app(llm.clone()),
            serde_json::json!({ "message": "explain gravity", "assistedLearning": false }),
        )
        .await;

        assert_eq!(llm.calls()[0].1, "explain gravity");
    }

    #[tokio::test]
    async fn test_blocked_generation_maps_to_400() {
        let llm = ScriptedProvider::failing(|| GenerationError::Blocked {
            stage: BlockStage::Prompt,
            reason: "SAFETY".to_string(),
        });
        let (status, body) = post_chat(
            app(llm),
            serde_json::json!({ "message": "something off-limits" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("safety policy"));
        assert!(body.contains("gemini-2.0-flash"));
    }

    #[tokio::test]
    async fn test_empty_generation_maps_to_502() {
        let llm = ScriptedProvider::failing(|| GenerationError::empty("no candidates"));
        let (status, body) = post_chat(app(llm), serde_json::json!({ "message": "hi" })).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("no usable response"));
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_502() {
        let llm = ScriptedProvider::failing(|| GenerationError::transport("dns failure"));
        let (status, body) = post_chat(app(llm), serde_json::json!({ "message": "hi" })).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.contains("dns failure"), "raw transport detail must not leak");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let llm = ScriptedProvider::replying("unused");
        let response = app(llm)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
