// Prompt enhancement: template → upstream → normalize or fall back → metrics.
// All model calls go through llm_client; nothing here talks HTTP directly.

pub mod enhancer;
pub mod fallback;
pub mod handlers;
pub mod normalizer;
pub mod prompts;
pub mod validation;
