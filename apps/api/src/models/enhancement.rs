use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of enhancement applied to a prompt. Selects the type-specific
/// instruction fragment and the fallback tone template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementType {
    #[default]
    General,
    Creative,
    Technical,
    Business,
    Educational,
}

impl EnhancementType {
    pub const ALL: [EnhancementType; 5] = [
        EnhancementType::General,
        EnhancementType::Creative,
        EnhancementType::Technical,
        EnhancementType::Business,
        EnhancementType::Educational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnhancementType::General => "general",
            EnhancementType::Creative => "creative",
            EnhancementType::Technical => "technical",
            EnhancementType::Business => "business",
            EnhancementType::Educational => "educational",
        }
    }

    /// Human-readable label used by the templates listing.
    pub fn display_name(&self) -> &'static str {
        match self {
            EnhancementType::General => "General Enhancement",
            EnhancementType::Creative => "Creative Writing",
            EnhancementType::Technical => "Technical/Coding",
            EnhancementType::Business => "Business/Marketing",
            EnhancementType::Educational => "Educational",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EnhancementType::General => "Balanced enhancement for any prompt type",
            EnhancementType::Creative => "Optimized for creative and artistic prompts",
            EnhancementType::Technical => "Best for programming and technical prompts",
            EnhancementType::Business => "Tailored for business and marketing prompts",
            EnhancementType::Educational => "Perfect for learning and teaching prompts",
        }
    }
}

impl fmt::Display for EnhancementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnhancementType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Intended reader of the enhanced prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetAudience {
    #[default]
    General,
    Beginner,
    Intermediate,
    Expert,
    Student,
    Business,
}

impl TargetAudience {
    pub const ALL: [TargetAudience; 6] = [
        TargetAudience::General,
        TargetAudience::Beginner,
        TargetAudience::Intermediate,
        TargetAudience::Expert,
        TargetAudience::Student,
        TargetAudience::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetAudience::General => "general",
            TargetAudience::Beginner => "beginner",
            TargetAudience::Intermediate => "intermediate",
            TargetAudience::Expert => "expert",
            TargetAudience::Student => "student",
            TargetAudience::Business => "business",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TargetAudience::General => "General Audience",
            TargetAudience::Beginner => "Beginner",
            TargetAudience::Intermediate => "Intermediate",
            TargetAudience::Expert => "Expert/Professional",
            TargetAudience::Student => "Student",
            TargetAudience::Business => "Business Professional",
        }
    }
}

impl fmt::Display for TargetAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetAudience {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

/// A validated enhancement request. Only constructed through request validation,
/// so both enumerations are always members of their closed sets.
#[derive(Debug, Clone)]
pub struct EnhancementRequest {
    pub original_prompt: String,
    pub enhancement_type: EnhancementType,
    pub target_audience: TargetAudience,
    pub include_examples: bool,
}

/// Structured breakdown of an enhanced prompt. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptStructure {
    pub context: String,
    pub objective: String,
    pub requirements: Vec<String>,
    pub target_audience: String,
    pub output_format: String,
    pub tone_and_style: String,
    pub examples: Vec<String>,
    pub constraints: Vec<String>,
}

/// Final record returned to the caller for one enhancement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedResult {
    pub original_prompt: String,
    pub enhanced_prompt: String,
    pub prompt_structure: PromptStructure,
    pub improvement_summary: Vec<String>,
    /// Always within 1..=100.
    pub estimated_improvement: u8,
    pub enhancement_type: EnhancementType,
    pub word_count_original: usize,
    pub word_count_enhanced: usize,
    pub created_at: DateTime<Utc>,
    pub usage_tips: Vec<String>,
}

/// Whitespace token count, as used for both word-count metrics.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
