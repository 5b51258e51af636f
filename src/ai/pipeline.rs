//! Command pipeline — user text in, validated avatar command out.
//!
//! Stateless between calls. Backend selection and extraction mode are read
//! from the config source on every call, so a changed environment takes
//! effect on the next request.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::ai::command::AvatarCommand;
use crate::ai::extractor::{extract, ExtractMode};
use crate::ai::prompts::build_command_prompt;
use crate::ai::validator::validate;
use crate::avatar::applier::{ApplyReport, AvatarCommandApplier};
use crate::avatar::session::AvatarSession;
use crate::config::ConfigSource;
use crate::llm::interface::{InferenceError, TextGenerator};
use crate::llm::llm_config::{BackendConfig, ConfigError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

#[derive(Clone)]
pub struct CommandPipeline {
    generator: Arc<dyn TextGenerator>,
    settings: Arc<dyn ConfigSource>,
}

impl CommandPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: Arc<dyn ConfigSource>) -> Self {
        Self {
            generator,
            settings,
        }
    }

    /// Resolve the backend, ask the model, and turn whatever it said into a
    /// command. Only configuration and transport problems are errors; a model
    /// that ignores the instructions produces a `raw`-only command.
    pub async fn interpret(&self, user_text: &str) -> Result<AvatarCommand, PipelineError> {
        let backend = BackendConfig::resolve(self.settings.as_ref())?;
        let mode = ExtractMode::from_source(self.settings.as_ref());

        let prompt = build_command_prompt(user_text);
        let exchange = self.generator.infer(&prompt, &backend).await?;

        let command = validate(&extract(&exchange.raw_output, mode));
        info!(
            "[Infer] backend={} look_at={} blendshapes={} viseme={} raw={}",
            backend.kind,
            command.look_at.is_some(),
            command.blendshapes.as_ref().map_or(0, |b| b.len()),
            command.viseme.is_some(),
            command.raw.is_some()
        );
        Ok(command)
    }

    /// `interpret`, then apply the result to `session`.
    pub async fn interpret_and_apply(
        &self,
        user_text: &str,
        applier: &AvatarCommandApplier,
        session: &mut dyn AvatarSession,
    ) -> Result<(AvatarCommand, ApplyReport), PipelineError> {
        let command = self.interpret(user_text).await?;
        let report = applier.apply(&command, session);
        Ok((command, report))
    }
}
