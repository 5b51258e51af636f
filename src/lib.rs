pub mod ai;
pub mod avatar;
pub mod config;
pub mod llm;
pub mod server;

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::ai::pipeline::CommandPipeline;
use crate::config::{ConfigSource, ProcessEnv};
use crate::llm::client::InferenceClient;
use crate::server::config::{load_config, DEFAULT_CONFIG_FILE, SERVER_CONFIG_VAR};
use crate::server::InferServer;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Run the inference server until Ctrl-C.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    let env = ProcessEnv;
    let config_path = env
        .get_non_empty(SERVER_CONFIG_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = load_config(&config_path);

    let generator = Arc::new(InferenceClient::new()?);
    let pipeline = Arc::new(CommandPipeline::new(generator, Arc::new(env)));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("[Server] Failed to listen for Ctrl-C: {}", e);
        }
        info!("[Server] Ctrl-C received, stopping");
    };

    InferServer::new(pipeline, &config)
        .serve_until(shutdown)
        .await?;
    Ok(())
}
