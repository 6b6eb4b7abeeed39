//! Single-endpoint backend for chat-completion shaped APIs.
//!
//! One POST per generation carrying a system/user message pair. A non-200
//! status or a timeout fails the call; this layer never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::prompts::PROBE_MESSAGE;
use super::{preview, Instruction, TextGenerator, UpstreamError, PROBE_TIMEOUT};

/// Per-call timeout for content generation.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_TOKENS: u32 = 4000;
const PROBE_MAX_TOKENS: u32 = 10;
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    generation_timeout: Duration,
    probe_timeout: Duration,
}

impl ChatCompletionClient {
    pub fn new(api_key: String, api_url: String, model: String) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            api_url,
            model,
            generation_timeout: GENERATION_TIMEOUT,
            probe_timeout: PROBE_TIMEOUT,
        })
    }

    /// Overrides the per-call generation and probe timeouts.
    pub fn with_timeouts(mut self, generation: Duration, probe: Duration) -> Self {
        self.generation_timeout = generation;
        self.probe_timeout = probe;
        self
    }

    async fn post(
        &self,
        request: &ChatRequest<'_>,
        timeout: Duration,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(request)
            .send()
            .await
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn generate(&self, instruction: &Instruction) -> Result<String, UpstreamError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &instruction.system,
                },
                ChatMessage {
                    role: "user",
                    content: &instruction.user,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            stream: false,
        };

        let response = self
            .post(&request, self.generation_timeout)
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Chat API request timed out after {:?}", self.generation_timeout);
                } else {
                    error!("Chat API request failed: {e}");
                }
                UpstreamError::Http(e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("Chat API error {}: {}", status, preview(&body, 500));
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                UpstreamError::Malformed("response has no choices[0].message.content".to_string())
            })?;

        debug!(
            "Chat API reply ({} chars): {}",
            content.len(),
            preview(&content, 200)
        );
        Ok(content)
    }

    async fn test_connection(&self) -> bool {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: PROBE_MESSAGE,
            }],
            max_tokens: PROBE_MAX_TOKENS,
            temperature: TEMPERATURE,
            stream: false,
        };

        match self.post(&request, self.probe_timeout).await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                warn!("Chat API connection test failed: {e}");
                false
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "chat"
    }
}
