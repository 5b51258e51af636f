//! HuggingFace provider — hosted text-generation inference.
//!
//! The endpoint is `{base_url}/{model}` and answers with a list:
//! ```json
//! [{"generated_text":"..."}]
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::llm::provider::{text_or_envelope, Provider};

#[derive(Debug, Clone, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
struct TextGenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

pub struct HuggingFaceProvider {
    api_key: String,
    base_url: String,
    model: String,
    max_new_tokens: u32,
}

impl HuggingFaceProvider {
    pub fn new(api_key: String, base_url: String, model: String, max_new_tokens: u32) -> Self {
        Self {
            api_key,
            base_url,
            model,
            max_new_tokens,
        }
    }
}

impl Provider for HuggingFaceProvider {
    fn id(&self) -> &'static str {
        "huggingface"
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.model)
    }

    fn bearer_token(&self) -> &str {
        &self.api_key
    }

    fn build_request(&self, prompt: &str) -> Value {
        let request = TextGenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: self.max_new_tokens,
            },
        };
        serde_json::json!(request)
    }

    fn extract_raw_output(&self, envelope: &Value) -> String {
        let first = envelope
            .as_array()
            .and_then(|items| items.first())
            .and_then(|item| item["generated_text"].as_str());
        text_or_envelope(first, envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> HuggingFaceProvider {
        HuggingFaceProvider::new(
            "hf-key".to_string(),
            "https://api-inference.huggingface.co/models".to_string(),
            "gpt2".to_string(),
            200,
        )
    }

    #[test]
    fn endpoint_includes_the_model() {
        assert_eq!(
            provider().endpoint(),
            "https://api-inference.huggingface.co/models/gpt2"
        );
    }

    #[test]
    fn request_carries_inputs_and_token_bound() {
        let body = provider().build_request("smile");
        assert_eq!(body["inputs"], "smile");
        assert_eq!(body["parameters"]["max_new_tokens"], 200);
    }

    #[test]
    fn first_generated_text_is_used() {
        let envelope = json!([
            {"generated_text": "first"},
            {"generated_text": "second"}
        ]);
        assert_eq!(provider().extract_raw_output(&envelope), "first");
    }

    #[test]
    fn model_loading_envelope_is_stringified() {
        let envelope = json!({"error": "Model gpt2 is currently loading", "estimated_time": 20.0});
        assert_eq!(provider().extract_raw_output(&envelope), envelope.to_string());
    }

    #[test]
    fn empty_list_is_stringified() {
        assert_eq!(provider().extract_raw_output(&json!([])), "[]");
    }
}
