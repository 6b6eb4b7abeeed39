//! Axum route handlers for the Enhancement API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;

use crate::enhancement::validation::EnhancePromptBody;
use crate::errors::AppError;
use crate::models::enhancement::{EnhancedResult, EnhancementType, TargetAudience};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct EnhancementTypeInfo {
    pub id: EnhancementType,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AudienceInfo {
    pub id: TargetAudience,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub enhancement_types: Vec<EnhancementTypeInfo>,
    pub target_audiences: Vec<AudienceInfo>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /enhance-prompt
///
/// Validates the body, then runs the enhancement pipeline. Upstream trouble
/// degrades to a fallback result rather than an error response.
pub async fn handle_enhance_prompt(
    State(state): State<AppState>,
    payload: Result<Json<EnhancePromptBody>, JsonRejection>,
) -> Result<Json<EnhancedResult>, AppError> {
    let Json(body) = payload?;
    let request = body.validate()?;

    tracing::info!(
        "Enhancing prompt: {}...",
        request.original_prompt.chars().take(50).collect::<String>()
    );

    Ok(Json(state.enhancer.enhance(&request).await))
}

/// GET /templates
///
/// Lists the supported enhancement types and audiences.
pub async fn handle_templates() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        enhancement_types: EnhancementType::ALL
            .into_iter()
            .map(|t| EnhancementTypeInfo {
                id: t,
                name: t.display_name(),
                description: t.description(),
            })
            .collect(),
        target_audiences: TargetAudience::ALL
            .into_iter()
            .map(|a| AudienceInfo {
                id: a,
                name: a.display_name(),
            })
            .collect(),
    })
}
