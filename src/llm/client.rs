use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::llm::interface::{InferenceError, InferenceExchange, TextGenerator};
use crate::llm::llm_config::BackendConfig;
use crate::llm::provider::build_provider;

/// HTTP client for the configured text-generation backend.
///
/// One `infer` call is one POST. No retries and no timeout beyond what the
/// transport applies on its own.
#[derive(Clone)]
pub struct InferenceClient {
    http: Client,
}

impl InferenceClient {
    pub fn new() -> Result<Self, InferenceError> {
        let http = Client::builder()
            .build()
            .map_err(InferenceError::ClientBuild)?;
        Ok(Self { http })
    }

    /// Use a pre-built `reqwest::Client` (e.g. one with `no_proxy()` for local mocks).
    pub fn with_http(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TextGenerator for InferenceClient {
    async fn infer(
        &self,
        prompt: &str,
        config: &BackendConfig,
    ) -> Result<InferenceExchange, InferenceError> {
        let provider = build_provider(config);
        let url = provider.endpoint();
        info!(
            "[LLM] Calling {} model={} max_tokens={}",
            provider.id(),
            config.model_id,
            config.max_tokens
        );

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", provider.bearer_token()))
            .header("Content-Type", "application/json")
            .json(&provider.build_request(prompt))
            .send()
            .await
            .map_err(|source| InferenceError::Transport {
                provider: provider.id(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| InferenceError::Transport {
                provider: provider.id(),
                source,
            })?;

        if !status.is_success() {
            warn!("[LLM] {} returned HTTP {}", provider.id(), status);
            return Err(InferenceError::HttpStatus {
                provider: provider.id(),
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Value =
            serde_json::from_str(&body).map_err(|source| InferenceError::UpstreamFormat {
                provider: provider.id(),
                source,
            })?;

        let raw_output = provider.extract_raw_output(&envelope);
        debug!(
            "[LLM] Raw output ({} chars): {}",
            raw_output.len(),
            raw_output.chars().take(200).collect::<String>()
        );

        Ok(InferenceExchange {
            prompt: prompt.to_string(),
            raw_output,
        })
    }
}
