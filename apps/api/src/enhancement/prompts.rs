// Prompt templates for the enhancement pipeline.
// Every outbound instruction is assembled here from fixed fragments.

use crate::llm_client::Instruction;
use crate::models::enhancement::{EnhancementType, TargetAudience};

/// Base instruction block. Defines the JSON schema the model must return.
pub const ENHANCE_SYSTEM_BASE: &str = r#"You are an expert prompt engineer. Your task is to transform a basic prompt into a highly structured and effective prompt that will produce much better AI responses.

You must respond with a JSON object containing these exact fields:
{
    "enhanced_prompt": "The complete, enhanced prompt ready to use",
    "prompt_structure": {
        "context": "Background context and setting",
        "objective": "Clear statement of what needs to be accomplished",
        "requirements": ["list", "of", "specific", "requirements"],
        "target_audience": "Intended audience for the output",
        "output_format": "Expected format and structure",
        "tone_and_style": "Desired tone and writing style",
        "examples": ["optional", "examples"],
        "constraints": ["things", "to", "avoid"]
    },
    "improvement_summary": ["List of key improvements made"],
    "estimated_improvement": 85,
    "usage_tips": ["Tips for using this enhanced prompt effectively"]
}

IMPORTANT: Respond ONLY with valid JSON. Do not include any markdown formatting, code blocks, or explanatory text."#;

/// User prompt template. Replace `{original_prompt}` before sending.
pub const ENHANCE_USER_TEMPLATE: &str = r#"Transform this basic prompt into a highly effective, structured prompt:

ORIGINAL PROMPT:
"{original_prompt}"

Remember to respond ONLY with the JSON object as specified. Make sure the enhanced prompt is significantly more detailed, specific, and likely to produce better AI responses."#;

fn type_fragment(enhancement_type: EnhancementType) -> &'static str {
    match enhancement_type {
        EnhancementType::Creative => "\n\nFocus on: storytelling elements, creative constraints, artistic vision, emotional tone, and imaginative requirements.",
        EnhancementType::Technical => "\n\nFocus on: technical specifications, code requirements, system constraints, performance criteria, and implementation details.",
        EnhancementType::Business => "\n\nFocus on: business objectives, target market, success metrics, brand voice, and commercial considerations.",
        EnhancementType::Educational => "\n\nFocus on: learning objectives, knowledge level, teaching methods, assessment criteria, and pedagogical approach.",
        EnhancementType::General => "\n\nApply balanced enhancement suitable for any domain.",
    }
}

fn audience_fragment(target_audience: TargetAudience) -> &'static str {
    match target_audience {
        TargetAudience::Beginner => "\n\nTailor for beginners: use simple language, provide more context, include step-by-step guidance.",
        TargetAudience::Expert => "\n\nTailor for experts: use technical terminology, assume deep knowledge, focus on advanced concepts.",
        TargetAudience::Business => "\n\nTailor for business professionals: focus on ROI, efficiency, scalability, and business impact.",
        TargetAudience::Student => "\n\nTailor for students: emphasize learning, provide educational context, include practice opportunities.",
        // intermediate has no dedicated fragment
        TargetAudience::General | TargetAudience::Intermediate => {
            "\n\nMaintain accessibility for a general audience."
        }
    }
}

/// Base block + type fragment + audience fragment.
pub fn build_system_prompt(
    enhancement_type: EnhancementType,
    target_audience: TargetAudience,
) -> String {
    let mut prompt = String::with_capacity(ENHANCE_SYSTEM_BASE.len() + 256);
    prompt.push_str(ENHANCE_SYSTEM_BASE);
    prompt.push_str(type_fragment(enhancement_type));
    prompt.push_str(audience_fragment(target_audience));
    prompt
}

pub fn build_user_prompt(original_prompt: &str) -> String {
    ENHANCE_USER_TEMPLATE.replace("{original_prompt}", original_prompt)
}

pub fn build_instruction(
    original_prompt: &str,
    enhancement_type: EnhancementType,
    target_audience: TargetAudience,
) -> Instruction {
    Instruction {
        system: build_system_prompt(enhancement_type, target_audience),
        user: build_user_prompt(original_prompt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_is_deterministic_for_every_pair() {
        for t in EnhancementType::ALL {
            for a in TargetAudience::ALL {
                assert_eq!(build_system_prompt(t, a), build_system_prompt(t, a));
                assert!(build_system_prompt(t, a).starts_with(ENHANCE_SYSTEM_BASE));
            }
        }
    }

    #[test]
    fn test_system_prompt_selects_fragments() {
        let prompt = build_system_prompt(EnhancementType::Technical, TargetAudience::Expert);
        assert!(prompt.contains("technical specifications"));
        assert!(prompt.contains("Tailor for experts"));
        assert!(!prompt.contains("balanced enhancement"));
    }

    #[test]
    fn test_intermediate_audience_uses_general_fragment() {
        let intermediate =
            build_system_prompt(EnhancementType::General, TargetAudience::Intermediate);
        let general = build_system_prompt(EnhancementType::General, TargetAudience::General);
        assert_eq!(intermediate, general);
    }

    #[test]
    fn test_user_prompt_quotes_original() {
        let user = build_user_prompt("write a blog post");
        assert!(user.contains("ORIGINAL PROMPT:\n\"write a blog post\""));
        assert!(!user.contains("{original_prompt}"));
    }

    #[test]
    fn test_build_instruction_pairs_system_and_user() {
        let instruction = build_instruction(
            "summarize this",
            EnhancementType::Business,
            TargetAudience::Business,
        );
        assert!(instruction.system.contains("business objectives"));
        assert!(instruction.system.contains("ROI"));
        assert!(instruction.user.contains("\"summarize this\""));
    }
}
