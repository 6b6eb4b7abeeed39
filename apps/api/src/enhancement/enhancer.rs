//! Enhancement orchestration — the full pipeline for one request.
//!
//! Flow: build instruction → call upstream → normalize (or fall back) →
//!       word counts → EnhancedResult.
//!
//! Failures from the upstream model never reach the caller. A transport
//! failure or exhausted failover goes straight to the fallback synthesizer;
//! a reply that is not JSON goes there too, offered as a salvage fragment.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::enhancement::fallback;
use crate::enhancement::normalizer::{
    normalize_reply, strip_code_fences, NormalizedReply, ParseError,
};
use crate::enhancement::prompts::build_instruction;
use crate::llm_client::{preview, TextGenerator};
use crate::models::enhancement::{word_count, EnhancedResult, EnhancementRequest};

/// Which path produced the final reply. Logged for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Upstream,
    Fallback,
}

#[derive(Clone)]
pub struct Enhancer {
    generator: Arc<dyn TextGenerator>,
}

impl Enhancer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Runs the pipeline. Always returns a complete result.
    pub async fn enhance(&self, request: &EnhancementRequest) -> EnhancedResult {
        let (reply, source) = self.produce_reply(request).await;
        info!(
            "Enhanced prompt via {:?} (type={}, audience={}, improvement={})",
            source, request.enhancement_type, request.target_audience, reply.estimated_improvement
        );
        assemble(request, reply)
    }

    /// Reachability of the configured upstream.
    pub async fn test_connection(&self) -> bool {
        self.generator.test_connection().await
    }

    pub fn backend_name(&self) -> &'static str {
        self.generator.backend_name()
    }

    async fn produce_reply(&self, request: &EnhancementRequest) -> (NormalizedReply, ReplySource) {
        let instruction = build_instruction(
            &request.original_prompt,
            request.enhancement_type,
            request.target_audience,
        );

        let raw = match self.generator.generate(&instruction).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Upstream '{}' unavailable, using fallback: {e}",
                    self.generator.backend_name()
                );
                let reply = fallback::synthesize(
                    &request.original_prompt,
                    request.enhancement_type,
                    request.target_audience,
                    None,
                );
                return (reply, ReplySource::Fallback);
            }
        };

        match normalize_reply(&raw) {
            Ok(reply) => (reply, ReplySource::Upstream),
            Err(e) => {
                warn!("Upstream reply could not be parsed ({e}), using fallback");
                debug!("Unparsed upstream reply: {}...", preview(&raw, 500));

                // well-formed JSON of the wrong shape is never salvaged
                let fragment = match e {
                    ParseError::InvalidJson(_) => Some(strip_code_fences(&raw)),
                    _ => None,
                };
                let reply = fallback::synthesize(
                    &request.original_prompt,
                    request.enhancement_type,
                    request.target_audience,
                    fragment,
                );
                (reply, ReplySource::Fallback)
            }
        }
    }
}

/// Attaches request echoes and metrics to the chosen reply.
fn assemble(request: &EnhancementRequest, reply: NormalizedReply) -> EnhancedResult {
    let mut prompt_structure = reply.prompt_structure;
    if !request.include_examples {
        prompt_structure.examples.clear();
    }

    EnhancedResult {
        word_count_original: word_count(&request.original_prompt),
        word_count_enhanced: word_count(&reply.enhanced_prompt),
        original_prompt: request.original_prompt.clone(),
        enhanced_prompt: reply.enhanced_prompt,
        prompt_structure,
        improvement_summary: reply.improvement_summary,
        estimated_improvement: reply.estimated_improvement,
        enhancement_type: request.enhancement_type,
        created_at: Utc::now(),
        usage_tips: reply.usage_tips,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
