use thiserror::Error;

const DEFAULT_CHAT_API_URL: &str = "https://api.x.ai/v1/chat/completions";
const DEFAULT_CHAT_MODEL: &str = "grok-beta";
const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

/// Startup configuration failures. Any of these keeps the service from starting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    MissingCredential(&'static str),

    #[error("Invalid value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Which upstream backend to build, with its credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamConfig {
    Chat {
        api_key: String,
        api_url: String,
        model: String,
    },
    Inference {
        api_token: String,
        base_url: String,
    },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if the selected backend's credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("UPSTREAM_BACKEND").unwrap_or_else(|| "chat".to_string());

        let upstream = match backend.trim().to_ascii_lowercase().as_str() {
            "chat" => UpstreamConfig::Chat {
                api_key: require(&lookup, "XAI_API_KEY")?,
                api_url: lookup("XAI_API_URL").unwrap_or_else(|| DEFAULT_CHAT_API_URL.to_string()),
                model: lookup("XAI_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            },
            "inference" => UpstreamConfig::Inference {
                api_token: require(&lookup, "HF_API_TOKEN")?,
                base_url: lookup("HF_API_URL")
                    .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string()),
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "UPSTREAM_BACKEND",
                    reason: format!("expected 'chat' or 'inference', got '{other}'"),
                })
            }
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                reason: format!("'{raw}' is not a valid port number"),
            })?,
            None => 8000,
        };

        Ok(Config {
            upstream,
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingCredential(key))
}
