//! Request and response types for the chat backend.

use serde::{Deserialize, Serialize};

use maeum_types::ContextState;

/// Payload sent to the backend chat endpoint.
///
/// `coding_mode` is always `true` for turns forwarded by maeum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub message: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub coding_mode: bool,

    /// Structured triage context, attached only to ERROR_CUT turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
}

impl GenerationRequest {
    /// A verbatim forward of the user's turn.
    pub fn new(
        message: impl Into<String>,
        system_prompt: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            message: message.into(),
            system_prompt: system_prompt.into(),
            max_tokens,
            coding_mode: true,
            context: None,
        }
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Session state and local hints attached to an error triage request.
///
/// The hints are extracted mechanically from the error text; cause and fix
/// are left to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    pub phase: String,
    pub tolerance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ErrorContext {
    pub fn new(state: ContextState) -> Self {
        Self {
            phase: state.phase.to_string(),
            tolerance: state.tolerance.to_string(),
            error_type: None,
            location: None,
        }
    }
}

/// Pull the answer text out of a backend response body.
///
/// The chat endpoint answers `{"response": "..."}`; `content` and `text`
/// are accepted as fallbacks.
pub fn extract_answer(body: &serde_json::Value) -> Option<String> {
    ["response", "content", "text"]
        .iter()
        .find_map(|key| body.get(key).and_then(|v| v.as_str()))
        .map(String::from)
}
