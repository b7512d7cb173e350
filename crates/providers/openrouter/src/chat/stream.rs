//! Chat-completions SSE frames to stream deltas.

use serde_json::{json, Value};
use tracing::warn;

use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_streaming_sse::{ProviderChunk, SseEvent};
use crate::ai_sdk_types::v2::StreamDelta;
use crate::provider_openrouter::extract::{
    image_file, new_source_id, reasoning_text, response_metadata, url_citation,
};
use crate::provider_openrouter::finish_reason::map_finish_reason;
use crate::provider_openrouter::usage::normalize_usage;

/// Per-request parser state for `chat.completion.chunk` frames.
pub struct ChatChunkParser {
    scope: String,
    metadata_sent: bool,
    upstream_provider: Option<String>,
}

impl ChatChunkParser {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            metadata_sent: false,
            upstream_provider: None,
        }
    }

    fn deltas(&mut self, chunk: &Value) -> Vec<StreamDelta> {
        let mut out = Vec::new();
        if let Some(error) = chunk.get("error").filter(|e| !e.is_null()) {
            warn!(target: "ai_sdk::openrouter", error = %error, "error frame in stream");
            out.push(StreamDelta::Error(error.clone()));
            return out;
        }

        if !self.metadata_sent {
            if let Some(meta) = response_metadata(chunk) {
                self.metadata_sent = true;
                out.push(StreamDelta::ResponseMetadata(meta));
            }
        }
        if let Some(provider) = chunk.get("provider").and_then(Value::as_str) {
            self.upstream_provider = Some(provider.to_string());
        }

        if let Some(choice) = chunk
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
        {
            if let Some(delta) = choice.get("delta").or_else(|| choice.get("message")) {
                push_delta_content(delta, &mut out);
            }
            if let Some(reason) = choice.get("finish_reason").and_then(Value::as_str) {
                out.push(StreamDelta::FinishReason(map_finish_reason(Some(reason))));
            }
        }

        if let Some(raw) = chunk.get("usage").filter(|u| u.is_object()) {
            let (usage, metadata) =
                normalize_usage(raw, self.upstream_provider.as_deref(), &self.scope);
            out.push(StreamDelta::Usage {
                usage,
                provider_metadata: Some(metadata),
            });
        }
        out
    }
}

fn push_delta_content(delta: &Value, out: &mut Vec<StreamDelta>) {
    let details: Vec<Value> = delta
        .get("reasoning_details")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let reasoning = match delta.get("reasoning").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => reasoning_text(&details),
    };
    if !reasoning.is_empty() || !details.is_empty() {
        out.push(StreamDelta::ReasoningDelta {
            delta: reasoning,
            details,
        });
    }

    if let Some(text) = delta.get("content").and_then(Value::as_str) {
        if !text.is_empty() {
            out.push(StreamDelta::TextDelta {
                delta: text.to_string(),
            });
        }
    }

    if let Some(tool_calls) = delta.get("tool_calls").and_then(Value::as_array) {
        for (position, call) in tool_calls.iter().enumerate() {
            let function = call.get("function");
            out.push(StreamDelta::ToolCallDelta {
                index: call
                    .get("index")
                    .and_then(Value::as_u64)
                    .map(|i| i as usize)
                    .unwrap_or(position),
                id: call
                    .get("id")
                    .and_then(Value::as_str)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string),
                name: function
                    .and_then(|f| f.get("name"))
                    .and_then(Value::as_str)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string),
                arguments: function
                    .and_then(|f| f.get("arguments"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });
        }
    }

    if let Some(images) = delta.get("images").and_then(Value::as_array) {
        for image in images {
            if let Some((media_type, data)) = image_file(image) {
                out.push(StreamDelta::File { media_type, data });
            }
        }
    }

    if let Some(annotations) = delta.get("annotations").and_then(Value::as_array) {
        for annotation in annotations {
            if let Some((url, title)) = url_citation(annotation) {
                out.push(StreamDelta::Source {
                    id: new_source_id(),
                    url,
                    title,
                });
            }
        }
    }
}

impl ProviderChunk for ChatChunkParser {
    fn try_from_sse(&mut self, event: &SseEvent) -> Result<Option<Vec<StreamDelta>>, SdkError> {
        if event.is_done() {
            return Ok(Some(vec![StreamDelta::Finish {
                finish_reason: None,
                usage: None,
                provider_metadata: None,
            }]));
        }
        match event.json() {
            Ok(chunk) => Ok(Some(self.deltas(&chunk))),
            Err(e) => {
                warn!(target: "ai_sdk::openrouter", error = %e, "malformed stream chunk");
                Ok(Some(vec![StreamDelta::Error(json!({
                    "message": format!("malformed stream chunk: {e}"),
                    "raw": event.raw_value(),
                }))]))
            }
        }
    }
}
