/// LLM Client — the single point of entry for all upstream model calls.
///
/// ARCHITECTURAL RULE: No other module may call a model API directly.
/// Every upstream interaction goes through a `TextGenerator` built here.
///
/// Two backends implement the trait and are chosen once at startup:
/// - `ChatCompletionClient`: one chat-completion endpoint, no retry.
/// - `InferenceClient`: ordered model failover over a hosted inference API.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::UpstreamConfig;

pub mod chat;
pub mod inference;
pub mod prompts;

pub use chat::ChatCompletionClient;
pub use inference::InferenceClient;

/// Per-call timeout for connectivity probes.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    #[error("No upstream available after trying {attempted} candidate(s)")]
    NoUpstreamAvailable { attempted: usize },
}

/// Templated instruction text for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub system: String,
    pub user: String,
}

impl Instruction {
    /// Single-string form for inference endpoints that take no message roles.
    pub fn combined(&self) -> String {
        format!(
            "{}\n\n{}\n\n{}",
            self.system,
            self.user,
            prompts::RESPONSE_CUE
        )
    }
}

/// "Generate text for a templated prompt, or fail."
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw reply text. Never retries beyond the backend's own
    /// candidate list.
    async fn generate(&self, instruction: &Instruction) -> Result<String, UpstreamError>;

    /// Cheap reachability check used by the health endpoint.
    async fn test_connection(&self) -> bool;

    /// Short backend identifier for logs and health output.
    fn backend_name(&self) -> &'static str;
}

/// Builds the backend selected by configuration.
pub fn build_generator(config: &UpstreamConfig) -> Result<Arc<dyn TextGenerator>, UpstreamError> {
    let generator: Arc<dyn TextGenerator> = match config {
        UpstreamConfig::Chat {
            api_key,
            api_url,
            model,
        } => Arc::new(ChatCompletionClient::new(
            api_key.clone(),
            api_url.clone(),
            model.clone(),
        )?),
        UpstreamConfig::Inference {
            api_token,
            base_url,
        } => Arc::new(InferenceClient::new(api_token.clone(), base_url.clone())?),
    };
    Ok(generator)
}

/// First `max_chars` characters of `text`, for log previews.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
