pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::enhancement::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/enhance-prompt", post(handlers::handle_enhance_prompt))
        .route("/templates", get(handlers::handle_templates))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::enhancement::enhancer::Enhancer;
    use crate::llm_client::{Instruction, TextGenerator, UpstreamError};

    struct StubGenerator(Option<&'static str>);

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _instruction: &Instruction) -> Result<String, UpstreamError> {
            self.0.map(str::to_string).ok_or(UpstreamError::Api {
                status: 500,
                message: "down".to_string(),
            })
        }

        async fn test_connection(&self) -> bool {
            self.0.is_some()
        }

        fn backend_name(&self) -> &'static str {
            "stub"
        }
    }

    fn app(reply: Option<&'static str>) -> Router {
        build_router(AppState {
            enhancer: Enhancer::new(Arc::new(StubGenerator(reply))),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_enhance_prompt_returns_result() {
        let reply = r#"{"enhanced_prompt": "Write a friendly post", "prompt_structure": {}}"#;
        let (status, body) = send(
            app(Some(reply)),
            post_json(
                "/enhance-prompt",
                json!({"original_prompt": "write a blog post", "enhancement_type": "creative"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enhanced_prompt"], "Write a friendly post");
        assert_eq!(body["enhancement_type"], "creative");
        assert_eq!(body["estimated_improvement"], 75);
        assert_eq!(body["word_count_original"], 4);
        assert_eq!(body["word_count_enhanced"], 4);
        assert_eq!(body["prompt_structure"]["examples"], json!([]));
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_enhance_prompt_degrades_to_fallback() {
        let (status, body) = send(
            app(None),
            post_json(
                "/enhance-prompt",
                json!({
                    "original_prompt": "write a blog post",
                    "enhancement_type": "creative",
                    "target_audience": "beginner"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["estimated_improvement"], 70);
        assert_eq!(body["prompt_structure"]["target_audience"], "beginner");
    }

    #[tokio::test]
    async fn test_enhance_prompt_rejects_unknown_type() {
        let (status, body) = send(
            app(None),
            post_json(
                "/enhance-prompt",
                json!({"original_prompt": "write a blog post", "enhancement_type": "poetry"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_enhance_prompt_rejects_malformed_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/enhance-prompt")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app(None), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_health_reports_upstream_state() {
        let (_, body) = send(app(Some("{}")), get_req("/health")).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["upstream_api"], "connected");
        assert_eq!(body["backend"], "stub");

        let (status, body) = send(app(None), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["upstream_api"], "disconnected");
    }

    #[tokio::test]
    async fn test_templates_lists_enumerations() {
        let (status, body) = send(app(None), get_req("/templates")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enhancement_types"].as_array().unwrap().len(), 5);
        assert_eq!(body["enhancement_types"][1]["id"], "creative");
        assert_eq!(body["target_audiences"].as_array().unwrap().len(), 6);
        assert_eq!(body["target_audiences"][3]["name"], "Expert/Professional");
    }

    #[tokio::test]
    async fn test_root_and_unknown_routes() {
        let (status, body) = send(app(None), get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Prompt-to-JSON Enhancer API is running!");

        let (status, body) = send(app(None), get_req("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
