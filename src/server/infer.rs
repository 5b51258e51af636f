use serde_json::{json, Value};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use warp::http::{Method, StatusCode};
use warp::hyper::body::Bytes;
use warp::Filter;

use super::config::ServerConfig;
use crate::ai::pipeline::{CommandPipeline, PipelineError};

pub const NO_BACKEND_MESSAGE: &str = "No AI backend configured";
pub const CALL_FAILED_MESSAGE: &str = "AI call failed";
/// Instructions are a sentence or two; anything bigger is refused unread.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

/// HTTP front for the command pipeline.
/// Serves `POST /api/infer` with `{ "inputText": "..." }`.
pub struct InferServer {
    pub port: u16,
    addr: SocketAddr,
    pipeline: Arc<CommandPipeline>,
}

impl InferServer {
    pub fn new(pipeline: Arc<CommandPipeline>, config: &ServerConfig) -> Self {
        Self {
            port: config.port,
            addr: config.addr(),
            pipeline,
        }
    }

    pub fn routes(
        pipeline: Arc<CommandPipeline>,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let infer = warp::post()
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::bytes())
            .and(warp::any().map(move || pipeline.clone()))
            .and_then(handle_infer);
        let other_methods = warp::method().and_then(reject_method);

        warp::path!("api" / "infer")
            .and(infer.or(other_methods).unify())
            .recover(handle_rejection)
    }

    /// Bind and serve in the background. Stores the actual port.
    pub async fn start(&mut self) -> Result<SocketAddr, warp::Error> {
        let (addr, fut) =
            warp::serve(Self::routes(self.pipeline.clone())).try_bind_ephemeral(self.addr)?;
        self.port = addr.port();
        info!("[Server] Inference endpoint on http://{}/api/infer", addr);
        tokio::spawn(fut);
        Ok(addr)
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<(), warp::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (addr, fut) = warp::serve(Self::routes(self.pipeline.clone()))
            .try_bind_with_graceful_shutdown(self.addr, shutdown)?;
        info!("[Server] Inference endpoint on http://{}/api/infer", addr);
        fut.await;
        info!("[Server] Shut down");
        Ok(())
    }
}

async fn handle_infer(body: Bytes, pipeline: Arc<CommandPipeline>) -> Result<JsonReply, Infallible> {
    let request_id = Uuid::new_v4();
    info!(%request_id, "[Infer] POST /api/infer ({} bytes)", body.len());

    let (status, payload) = respond(&Method::POST, &body, &pipeline).await;
    if status != StatusCode::OK {
        warn!(%request_id, "[Infer] Responding {}", status.as_u16());
    }
    Ok(json_reply(status, &payload))
}

/// Everything but POST gets 405 without touching the body or the backend.
/// POST falls through so a body-limit rejection reaches `handle_rejection`.
async fn reject_method(method: Method) -> Result<JsonReply, warp::Rejection> {
    if method == Method::POST {
        return Err(warp::reject::not_found());
    }
    info!("[Infer] {} /api/infer rejected", method);
    Ok(json_reply(StatusCode::METHOD_NOT_ALLOWED, &method_not_allowed()))
}

async fn handle_rejection(err: warp::Rejection) -> Result<JsonReply, warp::Rejection> {
    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        warn!("[Infer] Body over {} bytes refused", MAX_BODY_BYTES);
        return Ok(json_reply(
            StatusCode::PAYLOAD_TOO_LARGE,
            &json!({ "error": "payload too large" }),
        ));
    }
    if err.find::<warp::reject::LengthRequired>().is_some() {
        return Ok(json_reply(
            StatusCode::LENGTH_REQUIRED,
            &json!({ "error": "length required" }),
        ));
    }
    Err(err)
}

fn json_reply(status: StatusCode, payload: &Value) -> JsonReply {
    warp::reply::with_status(warp::reply::json(payload), status)
}

fn method_not_allowed() -> Value {
    json!({ "error": "method" })
}

/// Map one request onto a status and JSON body.
pub async fn respond(method: &Method, body: &[u8], pipeline: &CommandPipeline) -> (StatusCode, Value) {
    if *method != Method::POST {
        return (StatusCode::METHOD_NOT_ALLOWED, method_not_allowed());
    }

    let input = input_text(body);
    match pipeline.interpret(&input).await {
        Ok(command) => match serde_json::to_value(&command) {
            Ok(value) => (StatusCode::OK, value),
            Err(e) => call_failed(e.to_string()),
        },
        Err(PipelineError::Config(e)) => {
            warn!("[Infer] Backend resolution failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": NO_BACKEND_MESSAGE }),
            )
        }
        Err(PipelineError::Inference(e)) => call_failed(e.to_string()),
    }
}

fn call_failed(detail: String) -> (StatusCode, Value) {
    error!("[Infer] {}: {}", CALL_FAILED_MESSAGE, detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": CALL_FAILED_MESSAGE, "detail": detail }),
    )
}

/// `inputText` from the body; anything missing or malformed reads as "".
fn input_text(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("inputText").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}
