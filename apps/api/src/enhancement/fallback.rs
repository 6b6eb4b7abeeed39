//! Fallback synthesis — a complete, well-formed reply built without any model.
//!
//! Used when every upstream candidate fails or the reply cannot be parsed.
//! Pure and total: the same inputs always yield the same reply.

use crate::enhancement::normalizer::NormalizedReply;
use crate::models::enhancement::{EnhancementType, PromptStructure, TargetAudience};

/// Lower than the normalizer default: no model output backs this reply.
pub const FALLBACK_ESTIMATED_IMPROVEMENT: u8 = 70;

pub const FALLBACK_REQUIREMENTS: [&str; 4] = [
    "Provide clear and specific information",
    "Use well-organized structure with logical flow",
    "Include relevant details and examples where helpful",
    "Stay focused on the stated objective",
];

pub const FALLBACK_CONSTRAINTS: [&str; 3] = [
    "Avoid vague or ambiguous statements",
    "Do not include irrelevant information",
    "Keep the response within a reasonable length",
];

pub const FALLBACK_IMPROVEMENT_SUMMARY: [&str; 4] = [
    "Added clear context and objective",
    "Specified requirements and constraints",
    "Defined output format",
    "Tailored tone and style to the enhancement type",
];

pub const FALLBACK_USAGE_TIPS: [&str; 3] = [
    "Review the requirements and adjust them to your needs",
    "Add specific examples to get more targeted results",
    "Iterate on the prompt based on the responses you receive",
];

const FALLBACK_OUTPUT_FORMAT: &str = "Well-structured response with clear sections and headings";

/// Tone template per enhancement type.
pub fn tone_for(enhancement_type: EnhancementType) -> &'static str {
    match enhancement_type {
        EnhancementType::Creative => "Imaginative, engaging, and expressive",
        EnhancementType::Technical => "Precise, detailed, and technically accurate",
        EnhancementType::Business => "Professional, persuasive, and results-oriented",
        EnhancementType::Educational => "Clear, instructive, and encouraging",
        EnhancementType::General => "Clear, helpful, and well-organized",
    }
}

/// Builds a full reply from the request inputs, salvaging `ai_fragment` when usable.
pub fn synthesize(
    original_prompt: &str,
    enhancement_type: EnhancementType,
    target_audience: TargetAudience,
    ai_fragment: Option<&str>,
) -> NormalizedReply {
    let tone = tone_for(enhancement_type);
    let context = format!(
        "{} task prepared for a {} audience",
        capitalize(enhancement_type.as_str()),
        target_audience.as_str()
    );

    let enhanced_prompt = ai_fragment
        .and_then(|fragment| salvage_fragment(fragment, original_prompt))
        .unwrap_or_else(|| templated_prompt(original_prompt, &context, tone));

    NormalizedReply {
        enhanced_prompt,
        prompt_structure: PromptStructure {
            context,
            objective: original_prompt.trim().to_string(),
            requirements: owned(&FALLBACK_REQUIREMENTS),
            target_audience: target_audience.as_str().to_string(),
            output_format: FALLBACK_OUTPUT_FORMAT.to_string(),
            tone_and_style: tone.to_string(),
            examples: Vec::new(),
            constraints: owned(&FALLBACK_CONSTRAINTS),
        },
        improvement_summary: owned(&FALLBACK_IMPROVEMENT_SUMMARY),
        estimated_improvement: FALLBACK_ESTIMATED_IMPROVEMENT,
        usage_tips: owned(&FALLBACK_USAGE_TIPS),
    }
}

/// Returns the fragment minus any echo of the prompt, if it still carries
/// at least as much text as the prompt itself.
fn salvage_fragment(fragment: &str, original_prompt: &str) -> Option<String> {
    let original = original_prompt.trim();
    let cleaned = if original.is_empty() {
        fragment.trim().to_string()
    } else {
        fragment.replace(original, "").trim().to_string()
    };

    if cleaned.is_empty() || cleaned.chars().count() < original.chars().count() {
        None
    } else {
        Some(cleaned)
    }
}

fn templated_prompt(original_prompt: &str, context: &str, tone: &str) -> String {
    let requirements = FALLBACK_REQUIREMENTS
        .iter()
        .map(|r| format!("- {r}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Context: {context}.\n\n\
        Objective: {objective}\n\n\
        Requirements:\n{requirements}\n\n\
        Output Format: {output_format}.\n\n\
        Additional Instructions: Use a tone that is {tone_lower}. \
        Ask clarifying questions if any part of the request is ambiguous.",
        objective = original_prompt.trim(),
        output_format = FALLBACK_OUTPUT_FORMAT,
        tone_lower = tone.to_lowercase(),
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_total_over_every_pair() {
        for t in EnhancementType::ALL {
            for a in TargetAudience::ALL {
                let reply = synthesize("explain monads", t, a, None);
                assert_eq!(reply.estimated_improvement, FALLBACK_ESTIMATED_IMPROVEMENT);
                assert_eq!(reply.prompt_structure.target_audience, a.as_str());
                assert_eq!(reply.prompt_structure.tone_and_style, tone_for(t));
                assert_eq!(reply.prompt_structure.requirements.len(), 4);
                assert_eq!(reply.prompt_structure.constraints.len(), 3);
                assert!(reply.prompt_structure.examples.is_empty());
                assert_eq!(reply.improvement_summary.len(), 4);
                assert_eq!(reply.usage_tips.len(), 3);
                assert!(!reply.enhanced_prompt.is_empty());
            }
        }
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let a = synthesize(
            "write a blog post",
            EnhancementType::Creative,
            TargetAudience::Beginner,
            None,
        );
        let b = synthesize(
            "write a blog post",
            EnhancementType::Creative,
            TargetAudience::Beginner,
            None,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_templated_prompt_has_all_headings() {
        let reply = synthesize(
            "write a blog post",
            EnhancementType::Creative,
            TargetAudience::Beginner,
            None,
        );
        for heading in [
            "Context:",
            "Objective: write a blog post",
            "Requirements:",
            "Output Format:",
            "Additional Instructions:",
        ] {
            assert!(
                reply.enhanced_prompt.contains(heading),
                "missing {heading:?} in {}",
                reply.enhanced_prompt
            );
        }
        assert_eq!(
            reply.prompt_structure.context,
            "Creative task prepared for a beginner audience"
        );
    }

    #[test]
    fn test_long_fragment_is_salvaged_without_echo() {
        let fragment = "write a blog post\nDraft a 900-word post for newcomers covering setup, first steps, and common pitfalls.";
        let reply = synthesize(
            "write a blog post",
            EnhancementType::General,
            TargetAudience::General,
            Some(fragment),
        );
        assert_eq!(
            reply.enhanced_prompt,
            "Draft a 900-word post for newcomers covering setup, first steps, and common pitfalls."
        );
        assert_eq!(reply.estimated_improvement, 70);
    }

    #[test]
    fn test_pure_echo_fragment_is_discarded() {
        let reply = synthesize(
            "write a blog post",
            EnhancementType::General,
            TargetAudience::General,
            Some("  write a blog post  "),
        );
        assert!(reply.enhanced_prompt.starts_with("Context:"));
    }

    #[test]
    fn test_short_fragment_is_discarded() {
        let reply = synthesize(
            "write a detailed blog post about rust",
            EnhancementType::Technical,
            TargetAudience::Expert,
            Some("ok"),
        );
        assert!(reply.enhanced_prompt.contains("Objective: write a detailed blog post about rust"));
    }
}
