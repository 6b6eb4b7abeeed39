use serde::Deserialize;
use thiserror::Error;

use crate::models::enhancement::{
    EnhancementRequest, EnhancementType, TargetAudience, UnknownVariant,
};

pub const MIN_PROMPT_CHARS: usize = 3;
pub const MAX_PROMPT_CHARS: usize = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Prompt must be at least 3 characters long")]
    PromptTooShort,

    #[error("Prompt must be at most 5000 characters long")]
    PromptTooLong,

    #[error("enhancement_type must be one of: {allowed}; got '{got}'")]
    UnknownEnhancementType { got: String, allowed: String },

    #[error("target_audience must be one of: {allowed}; got '{got}'")]
    UnknownTargetAudience { got: String, allowed: String },
}

/// Raw request body for POST /enhance-prompt. Enumerations arrive as plain
/// strings so unknown values produce a descriptive validation error.
#[derive(Debug, Clone, Deserialize)]
pub struct EnhancePromptBody {
    pub original_prompt: String,
    pub enhancement_type: Option<String>,
    pub target_audience: Option<String>,
    pub include_examples: Option<bool>,
}

impl EnhancePromptBody {
    /// Checks length bounds and enumeration membership. Missing enumerations
    /// default to `general`; `include_examples` defaults to true.
    pub fn validate(self) -> Result<EnhancementRequest, ValidationError> {
        if self.original_prompt.trim().chars().count() < MIN_PROMPT_CHARS {
            return Err(ValidationError::PromptTooShort);
        }
        if self.original_prompt.chars().count() > MAX_PROMPT_CHARS {
            return Err(ValidationError::PromptTooLong);
        }

        let enhancement_type = match self.enhancement_type.as_deref() {
            None => EnhancementType::default(),
            Some(raw) => raw
                .parse::<EnhancementType>()
                .map_err(|UnknownVariant(got)| ValidationError::UnknownEnhancementType {
                    got,
                    allowed: join_ids(EnhancementType::ALL.iter().map(|t| t.as_str())),
                })?,
        };

        let target_audience = match self.target_audience.as_deref() {
            None => TargetAudience::default(),
            Some(raw) => raw
                .parse::<TargetAudience>()
                .map_err(|UnknownVariant(got)| ValidationError::UnknownTargetAudience {
                    got,
                    allowed: join_ids(TargetAudience::ALL.iter().map(|a| a.as_str())),
                })?,
        };

        Ok(EnhancementRequest {
            original_prompt: self.original_prompt,
            enhancement_type,
            target_audience,
            include_examples: self.include_examples.unwrap_or(true),
        })
    }
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(", ")
}
