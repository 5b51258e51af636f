pub mod client;
pub mod huggingface;
pub mod interface;
pub mod llm_config;
pub mod openrouter;
pub mod provider;

pub use client::InferenceClient;
pub use interface::{InferenceError, InferenceExchange, TextGenerator};
pub use llm_config::{BackendConfig, ConfigError, ProviderKind};
pub use provider::{build_provider, Provider};
