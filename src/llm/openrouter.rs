//! OpenRouter provider — OpenAI-compatible `/chat/completions`.
//!
//! ```json
//! {"choices":[{"message":{"role":"assistant","content":"{\"viseme\":\"AA\"}"}}]}
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::llm::provider::{text_or_envelope, Provider};

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenRouterProvider {
    pub fn new(api_key: String, base_url: String, model: String, max_tokens: u32) -> Self {
        Self {
            api_key,
            base_url,
            model,
            max_tokens,
        }
    }
}

impl Provider for OpenRouterProvider {
    fn id(&self) -> &'static str {
        "openrouter"
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn bearer_token(&self) -> &str {
        &self.api_key
    }

    fn build_request(&self, prompt: &str) -> Value {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };
        serde_json::json!(request)
    }

    fn extract_raw_output(&self, envelope: &Value) -> String {
        text_or_envelope(
            envelope["choices"][0]["message"]["content"].as_str(),
            envelope,
        )
    }
}
