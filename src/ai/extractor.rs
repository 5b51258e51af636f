//! Pulls a JSON object out of free-form model output.
//!
//! Models wrap their JSON in prose, code fences or both. The default mode
//! takes everything between the first `{` and the last `}` and tries to
//! parse that. It does not balance braces: prose containing a literal `{` or
//! `}` before or after the object makes the slice overreach and the parse
//! fail, in which case the output degrades to `{"raw": ...}`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ConfigSource;

pub const EXTRACT_MODE_VAR: &str = "AI_EXTRACT_MODE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// First `{` to last `}`, best effort.
    #[default]
    BraceScan,
    /// The whole (trimmed) output must be a JSON object.
    Strict,
}

impl ExtractMode {
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        match source
            .get_non_empty(EXTRACT_MODE_VAR)
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
        {
            Some("strict") => ExtractMode::Strict,
            _ => ExtractMode::BraceScan,
        }
    }
}

pub fn extract(raw_output: &str, mode: ExtractMode) -> Map<String, Value> {
    let parsed = match mode {
        ExtractMode::BraceScan => brace_candidate(raw_output).and_then(parse_object),
        ExtractMode::Strict => parse_object(raw_output.trim()),
    };

    parsed.unwrap_or_else(|| {
        debug!("[Extract] No JSON object found, falling back to raw ({:?})", mode);
        raw_fallback(raw_output)
    })
}

/// Inclusive slice from the first `{` to the last `}`, if the pair is ordered.
fn brace_candidate(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    (last > first).then(|| &text[first..=last])
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    serde_json::from_str::<Map<String, Value>>(candidate).ok()
}

fn raw_fallback(raw_output: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("raw".to_string(), Value::String(raw_output.to_string()));
    map
}
