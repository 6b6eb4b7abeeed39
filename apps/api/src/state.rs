use crate::enhancement::enhancer::Enhancer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline bound to the upstream backend chosen from config.
    pub enhancer: Enhancer,
}
