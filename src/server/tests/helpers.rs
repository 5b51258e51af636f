use crate::ai::pipeline::CommandPipeline;
use crate::config::ConfigSource;
use crate::llm::client::InferenceClient;
use crate::llm::llm_config::{
    HUGGINGFACE_BASE_URL_VAR, HUGGINGFACE_KEY_VAR, OPENROUTER_BASE_URL_VAR, OPENROUTER_KEY_VAR,
};
use crate::server::config::ServerConfig;
use crate::server::infer::InferServer;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, RwLock};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Settings ────────────────────────────────────────────────

/// Settings that can change between requests.
#[derive(Default)]
pub struct SharedSettings {
    values: RwLock<HashMap<String, String>>,
}

impl SharedSettings {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Arc<Self> {
        let settings = Self::default();
        for (k, v) in pairs {
            settings.set(k, v);
        }
        Arc::new(settings)
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

impl ConfigSource for SharedSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }
}

pub fn openrouter_settings(upstream: &MockServer) -> Arc<SharedSettings> {
    let base_url = format!("{}/api/v1", upstream.uri());
    SharedSettings::from_pairs(&[
        (OPENROUTER_KEY_VAR, "or-test-key"),
        (OPENROUTER_BASE_URL_VAR, base_url.as_str()),
    ])
}

pub fn huggingface_settings(upstream: &MockServer) -> Arc<SharedSettings> {
    let base_url = format!("{}/models", upstream.uri());
    SharedSettings::from_pairs(&[
        (HUGGINGFACE_KEY_VAR, "hf-test-key"),
        (HUGGINGFACE_BASE_URL_VAR, base_url.as_str()),
    ])
}

// ── Upstream mocks ──────────────────────────────────────────

/// Mount an OpenRouter-style completion whose assistant content is `content`.
pub async fn mount_openrouter_reply(upstream: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-test",
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })))
        .mount(upstream)
        .await;
}

/// Body of the single request the upstream received, as JSON.
pub async fn only_upstream_body(upstream: &MockServer) -> Value {
    let requests = upstream.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "expected exactly one upstream call");
    serde_json::from_slice(&requests[0].body).unwrap()
}

// ── Server setup ────────────────────────────────────────────

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn build_pipeline(settings: Arc<dyn ConfigSource>) -> Arc<CommandPipeline> {
    let generator = Arc::new(InferenceClient::with_http(http_client()));
    Arc::new(CommandPipeline::new(generator, settings))
}

/// Start an `InferServer` on a free loopback port.
pub async fn start_test_server(settings: Arc<dyn ConfigSource>) -> InferServer {
    let config = ServerConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
    };
    let mut server = InferServer::new(build_pipeline(settings), &config);
    server.start().await.expect("failed to bind test server");
    server
}

pub fn infer_url(server: &InferServer) -> String {
    format!("http://127.0.0.1:{}/api/infer", server.port)
}

/// POST `{ "inputText": text }` and return (status, body).
pub async fn post_instruction(server: &InferServer, text: &str) -> (u16, Value) {
    let resp = http_client()
        .post(infer_url(server))
        .json(&json!({ "inputText": text }))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}
