// Shared prompt fragments used at the transport layer.
// Task-specific templates live beside the service that uses them.

/// Cue appended to combined prompts so text-completion models answer with JSON.
pub const RESPONSE_CUE: &str = "JSON RESPONSE:";

/// User message sent by the chat backend's connectivity probe.
pub const PROBE_MESSAGE: &str = "Test";

/// Input sent by the inference backend's connectivity probe.
pub const PROBE_INPUT: &str = "Hello";
