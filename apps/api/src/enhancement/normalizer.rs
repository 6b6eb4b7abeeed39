//! Response normalization — coerces an upstream reply into the fixed schema.
//!
//! This is the only place where loosely-typed model output crosses into the
//! strongly-typed data model. Everything operates on `serde_json::Value`.
//!
//! Only two conditions fail: the reply does not parse as a JSON object, or it
//! lacks a string `enhanced_prompt` or an object `prompt_structure` (`null`
//! counts as missing). Anything sparser than that is filled in place with
//! deterministic defaults.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::enhancement::PromptStructure;

/// Used when the reply omits `estimated_improvement`.
pub const DEFAULT_ESTIMATED_IMPROVEMENT: u8 = 75;

pub const DEFAULT_IMPROVEMENT_SUMMARY: [&str; 3] = [
    "Prompt structure enhanced",
    "Context and requirements added",
    "Output format specified",
];

pub const DEFAULT_USAGE_TIPS: [&str; 2] = [
    "Use this enhanced prompt as-is",
    "Adjust requirements based on your specific needs",
];

/// Text fields of `prompt_structure` that get a placeholder when missing.
const REQUIRED_TEXT_FIELDS: [&str; 5] = [
    "context",
    "objective",
    "target_audience",
    "output_format",
    "tone_and_style",
];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("reply is not a JSON object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field '{0}' is not a JSON object")]
    FieldNotAnObject(&'static str),

    #[error("field '{0}' is not a string")]
    FieldNotAString(&'static str),
}

/// An upstream reply after normalization, before metrics are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReply {
    pub enhanced_prompt: String,
    pub prompt_structure: PromptStructure,
    pub improvement_summary: Vec<String>,
    pub estimated_improvement: u8,
    pub usage_tips: Vec<String>,
}

/// Strips ```json ... ```, ```lang ... ``` or ``` ... ``` fences from model output.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // language tag, if any, sits directly against the backticks
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parses and normalizes a raw upstream reply.
pub fn normalize_reply(raw: &str) -> Result<NormalizedReply, ParseError> {
    let parsed: Value = serde_json::from_str(strip_code_fences(raw))?;
    normalize_value(&parsed)
}

/// Normalizes an already-parsed JSON tree.
pub fn normalize_value(parsed: &Value) -> Result<NormalizedReply, ParseError> {
    let root = parsed.as_object().ok_or(ParseError::NotAnObject)?;

    let enhanced_prompt = present(root, "enhanced_prompt")
        .ok_or(ParseError::MissingField("enhanced_prompt"))?
        .as_str()
        .ok_or(ParseError::FieldNotAString("enhanced_prompt"))?;
    let structure = present(root, "prompt_structure")
        .ok_or(ParseError::MissingField("prompt_structure"))?
        .as_object()
        .ok_or(ParseError::FieldNotAnObject("prompt_structure"))?;

    let prompt_structure = normalize_structure(structure);

    let improvement_summary = present(root, "improvement_summary")
        .map(coerce_list)
        .unwrap_or_else(|| owned(&DEFAULT_IMPROVEMENT_SUMMARY));
    let usage_tips = present(root, "usage_tips")
        .map(coerce_list)
        .unwrap_or_else(|| owned(&DEFAULT_USAGE_TIPS));
    let estimated_improvement = present(root, "estimated_improvement")
        .and_then(coerce_percentage)
        .unwrap_or(DEFAULT_ESTIMATED_IMPROVEMENT);

    Ok(NormalizedReply {
        enhanced_prompt: enhanced_prompt.to_string(),
        prompt_structure,
        improvement_summary,
        estimated_improvement,
        usage_tips,
    })
}

fn normalize_structure(structure: &Map<String, Value>) -> PromptStructure {
    let [context, objective, target_audience, output_format, tone_and_style] =
        REQUIRED_TEXT_FIELDS.map(|field| {
            present(structure, field)
                .map(value_to_text)
                .unwrap_or_else(|| placeholder(field))
        });

    let requirements = present(structure, "requirements")
        .map(coerce_list)
        .unwrap_or_else(|| vec![placeholder("requirements")]);

    PromptStructure {
        context,
        objective,
        requirements,
        target_audience,
        output_format,
        tone_and_style,
        examples: present(structure, "examples")
            .map(coerce_list)
            .unwrap_or_default(),
        constraints: present(structure, "constraints")
            .map(coerce_list)
            .unwrap_or_default(),
    }
}

/// Field lookup that treats an explicit `null` as absent.
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn placeholder(field: &str) -> String {
    format!("Not specified - {field}")
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Strings pass through unquoted; every other value uses its compact JSON form.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A list stays a list; anything else becomes a single-element list.
fn coerce_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_to_text).collect(),
        other => vec![value_to_text(other)],
    }
}

/// Accepts numbers and numeric strings, clamped into 1..=100.
fn coerce_percentage(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(1.0, 100.0) as u8)
}
