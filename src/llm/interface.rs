use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::llm_config::BackendConfig;

// ── Error Types ────────────────────────────────────────

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    HttpStatus {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} response body is not valid JSON: {source}")]
    UpstreamFormat {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl InferenceError {
    /// Transport failures and non-success statuses; everything except an
    /// undecodable envelope.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            InferenceError::Transport { .. } | InferenceError::HttpStatus { .. }
        )
    }
}

// ── Exchange ───────────────────────────────────────────

/// One prompt and what the model said back. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceExchange {
    pub prompt: String,
    pub raw_output: String,
}

// ── Generator Trait ────────────────────────────────────

/// Anything that can turn a prompt into raw model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Issue exactly one request against the backend described by `config`.
    async fn infer(
        &self,
        prompt: &str,
        config: &BackendConfig,
    ) -> Result<InferenceExchange, InferenceError>;
}
