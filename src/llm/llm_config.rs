//! Backend configuration, resolved from the environment on every request.

use crate::config::{self, ConfigSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const BACKEND_TYPE_VAR: &str = "AI_BACKEND_TYPE";
pub const OPENROUTER_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const OPENROUTER_MODEL_VAR: &str = "OPENROUTER_MODEL";
pub const OPENROUTER_BASE_URL_VAR: &str = "OPENROUTER_BASE_URL";
pub const HUGGINGFACE_KEY_VAR: &str = "HUGGINGFACE_API_KEY";
pub const HUGGINGFACE_MODEL_VAR: &str = "HUGGINGFACE_MODEL";
pub const HUGGINGFACE_BASE_URL_VAR: &str = "HUGGINGFACE_BASE_URL";
pub const MAX_TOKENS_VAR: &str = "AI_MAX_TOKENS";

pub const DEFAULT_OPENROUTER_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Generic placeholder; real deployments are expected to set `HUGGINGFACE_MODEL`.
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "gpt2";
pub const DEFAULT_HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MAX_TOKENS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenRouter,
    HuggingFace,
}

impl ProviderKind {
    /// Parse the `AI_BACKEND_TYPE` selector. Case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Some(ProviderKind::OpenRouter),
            "huggingface" => Some(ProviderKind::HuggingFace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::HuggingFace => "huggingface",
        }
    }

    fn key_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => OPENROUTER_KEY_VAR,
            ProviderKind::HuggingFace => HUGGINGFACE_KEY_VAR,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no backend configured")]
    NoBackend,
    #[error("unknown backend type '{0}'")]
    UnknownBackend(String),
    #[error("backend '{kind}' selected but {var} is not set")]
    MissingCredential {
        kind: ProviderKind,
        var: &'static str,
    },
}

/// Everything needed to talk to exactly one provider.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model_id: String,
    pub base_url: String,
    pub max_tokens: u32,
}

// Keep the credential out of logs.
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("kind", &self.kind)
            .field("api_key", &"<redacted>")
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl BackendConfig {
    /// Pick the provider and its settings.
    ///
    /// An explicit `AI_BACKEND_TYPE` wins. Otherwise the provider is inferred
    /// from whichever credential is present, OpenRouter first.
    pub fn resolve(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let kind = match source.get_non_empty(BACKEND_TYPE_VAR) {
            Some(explicit) => {
                ProviderKind::parse(&explicit).ok_or(ConfigError::UnknownBackend(explicit))?
            }
            None if source.get_non_empty(OPENROUTER_KEY_VAR).is_some() => ProviderKind::OpenRouter,
            None if source.get_non_empty(HUGGINGFACE_KEY_VAR).is_some() => {
                ProviderKind::HuggingFace
            }
            None => return Err(ConfigError::NoBackend),
        };

        let api_key =
            source
                .get_non_empty(kind.key_var())
                .ok_or(ConfigError::MissingCredential {
                    kind,
                    var: kind.key_var(),
                })?;

        let (model_var, default_model, url_var, default_url) = match kind {
            ProviderKind::OpenRouter => (
                OPENROUTER_MODEL_VAR,
                DEFAULT_OPENROUTER_MODEL,
                OPENROUTER_BASE_URL_VAR,
                DEFAULT_OPENROUTER_BASE_URL,
            ),
            ProviderKind::HuggingFace => (
                HUGGINGFACE_MODEL_VAR,
                DEFAULT_HUGGINGFACE_MODEL,
                HUGGINGFACE_BASE_URL_VAR,
                DEFAULT_HUGGINGFACE_BASE_URL,
            ),
        };

        Ok(Self {
            kind,
            api_key,
            model_id: source
                .get_non_empty(model_var)
                .unwrap_or_else(|| default_model.to_string()),
            base_url: source
                .get_non_empty(url_var)
                .unwrap_or_else(|| default_url.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_tokens: config::get_parsed::<u32>(source, MAX_TOKENS_VAR)
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_TOKENS),
        })
    }
}
