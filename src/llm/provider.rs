//! Provider trait — the per-backend wire format.
//!
//! A provider knows where to send a prompt, what the request body looks like
//! and how to pull the generated text back out of the response envelope.
//! Transport is handled by `InferenceClient`.

use serde_json::Value;

use crate::llm::huggingface::HuggingFaceProvider;
use crate::llm::llm_config::{BackendConfig, ProviderKind};
use crate::llm::openrouter::OpenRouterProvider;

pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "openrouter", "huggingface").
    fn id(&self) -> &'static str;

    /// Full URL the request is POSTed to.
    fn endpoint(&self) -> String;

    fn bearer_token(&self) -> &str;

    fn build_request(&self, prompt: &str) -> Value;

    /// Pull the model text out of a decoded envelope.
    ///
    /// Never fails: when the expected path is missing the whole envelope is
    /// returned stringified, so extraction downstream still sees something.
    fn extract_raw_output(&self, envelope: &Value) -> String;
}

/// Factory: build the provider selected by `config`.
pub fn build_provider(config: &BackendConfig) -> Box<dyn Provider> {
    match config.kind {
        ProviderKind::OpenRouter => Box::new(OpenRouterProvider::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model_id.clone(),
            config.max_tokens,
        )),
        ProviderKind::HuggingFace => Box::new(HuggingFaceProvider::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model_id.clone(),
            config.max_tokens,
        )),
    }
}

/// Shared fallback for envelopes that don't have the expected shape.
pub(crate) fn text_or_envelope(text: Option<&str>, envelope: &Value) -> String {
    match text {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => envelope.to_string(),
    }
}
