//! Failover backend for a hosted inference API.
//!
//! Candidates are tried strictly in order with no delay between them. The
//! first 200 wins. A 503 (model still loading), any other status, or a
//! transport error moves on to the next candidate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::prompts::PROBE_INPUT;
use super::{preview, Instruction, TextGenerator, UpstreamError, PROBE_TIMEOUT};

/// Models tried in order for every generation.
pub const CANDIDATE_MODELS: [&str; 3] = [
    "mistralai/Mistral-7B-Instruct-v0.2",
    "HuggingFaceH4/zephyr-7b-beta",
    "google/flan-t5-large",
];

/// Per-call timeout for content generation, applied to each candidate.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_NEW_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<InferenceParameters>,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    api_token: String,
    base_url: String,
    models: Vec<String>,
    generation_timeout: Duration,
    probe_timeout: Duration,
}

impl InferenceClient {
    pub fn new(api_token: String, base_url: String) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            models: CANDIDATE_MODELS.iter().map(|m| m.to_string()).collect(),
            generation_timeout: GENERATION_TIMEOUT,
            probe_timeout: PROBE_TIMEOUT,
        })
    }

    /// Overrides the per-candidate generation timeout and the probe timeout.
    pub fn with_timeouts(mut self, generation: Duration, probe: Duration) -> Self {
        self.generation_timeout = generation;
        self.probe_timeout = probe;
        self
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    async fn try_model(&self, model: &str, prompt: &str) -> Result<String, UpstreamError> {
        let request = InferenceRequest {
            inputs: prompt,
            parameters: Some(InferenceParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
                return_full_text: false,
            }),
        };

        let response = self
            .client
            .post(self.model_url(model))
            .bearer_auth(&self.api_token)
            .timeout(self.generation_timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(extract_generated_text(&body))
    }
}

#[async_trait]
impl TextGenerator for InferenceClient {
    async fn generate(&self, instruction: &Instruction) -> Result<String, UpstreamError> {
        let prompt = instruction.combined();

        for (attempt, model) in self.models.iter().enumerate() {
            debug!(
                "Inference attempt {}/{}: model '{}'",
                attempt + 1,
                self.models.len(),
                model
            );

            match self.try_model(model, &prompt).await {
                Ok(text) => {
                    info!("Inference model '{}' succeeded ({} chars)", model, text.len());
                    debug!("Inference reply: {}", preview(&text, 200));
                    return Ok(text);
                }
                Err(UpstreamError::Api { status: 503, .. }) => {
                    warn!("Inference model '{}' is loading (503), trying next", model);
                }
                Err(e) => {
                    warn!("Inference model '{}' failed: {}", model, e);
                }
            }
        }

        warn!("All {} inference candidates failed", self.models.len());
        Err(UpstreamError::NoUpstreamAvailable {
            attempted: self.models.len(),
        })
    }

    async fn test_connection(&self) -> bool {
        let Some(model) = self.models.first() else {
            return false;
        };
        let request = InferenceRequest {
            inputs: PROBE_INPUT,
            parameters: None,
        };

        let result = self
            .client
            .post(self.model_url(model))
            .bearer_auth(&self.api_token)
            .timeout(self.probe_timeout)
            .json(&request)
            .send()
            .await;

        match result {
            // 503 means the service exists but the model is still warming up
            Ok(response) => matches!(
                response.status(),
                StatusCode::OK | StatusCode::SERVICE_UNAVAILABLE
            ),
            Err(e) => {
                warn!("Inference API connection test failed: {e}");
                false
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "inference"
    }
}

/// Pulls the first `generated_text` out of an inference reply.
///
/// Handles `[{"generated_text": ...}]`, `{"generated_text": ...}` and plain
/// text bodies. Any other JSON is returned in its serialized form.
fn extract_generated_text(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    let generated = match &value {
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("generated_text"))
            .and_then(Value::as_str),
        Value::Object(map) => map.get("generated_text").and_then(Value::as_str),
        _ => None,
    };

    if let Some(text) = generated {
        return text.to_string();
    }
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
