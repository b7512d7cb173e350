//! Responses-API SSE events to stream deltas.
//!
//! The terminal delta is produced by `response.completed` (or
//! `response.incomplete` / `response.failed`); a trailing `[DONE]` is ignored.

use std::collections::HashSet;

use serde_json::{json, Value};
use tracing::{trace, warn};

use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_streaming_sse::{ProviderChunk, SseEvent};
use crate::ai_sdk_types::v2::StreamDelta;
use crate::provider_openrouter::extract::{new_source_id, response_metadata, url_citation};
use crate::provider_openrouter::finish_reason::map_responses_finish_reason;
use crate::provider_openrouter::usage::normalize_usage;

pub struct ResponsesChunkParser {
    scope: String,
    metadata_sent: bool,
    has_function_calls: bool,
    /// Output indexes whose arguments arrived through delta events.
    streamed_arguments: HashSet<usize>,
    /// Output indexes whose reasoning text arrived through delta events.
    streamed_reasoning: HashSet<usize>,
}

fn output_index(event: &Value) -> usize {
    event
        .get("output_index")
        .and_then(Value::as_u64)
        .map(|i| i as usize)
        .unwrap_or(0)
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn summary_text(item: &Value) -> String {
    item.get("summary")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

impl ResponsesChunkParser {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            metadata_sent: false,
            has_function_calls: false,
            streamed_arguments: HashSet::new(),
            streamed_reasoning: HashSet::new(),
        }
    }

    fn deltas(&mut self, event: &Value) -> Vec<StreamDelta> {
        let kind = event.get("type").and_then(Value::as_str).unwrap_or_default();
        let mut out = Vec::new();
        match kind {
            "response.created" | "response.in_progress" => {
                if !self.metadata_sent {
                    if let Some(meta) = event.get("response").and_then(response_metadata) {
                        self.metadata_sent = true;
                        out.push(StreamDelta::ResponseMetadata(meta));
                    }
                }
            }
            "response.output_item.added" => {
                let item = event.get("item").unwrap_or(&Value::Null);
                if item.get("type").and_then(Value::as_str) == Some("function_call") {
                    self.has_function_calls = true;
                    let index = output_index(event);
                    let arguments = str_field(item, "arguments").unwrap_or_default();
                    if !arguments.is_empty() {
                        self.streamed_arguments.insert(index);
                    }
                    out.push(StreamDelta::ToolCallDelta {
                        index,
                        id: str_field(item, "call_id"),
                        name: str_field(item, "name"),
                        arguments,
                    });
                }
            }
            "response.function_call_arguments.delta" => {
                let index = output_index(event);
                self.streamed_arguments.insert(index);
                out.push(StreamDelta::ToolCallDelta {
                    index,
                    id: None,
                    name: None,
                    arguments: str_field(event, "delta").unwrap_or_default(),
                });
            }
            "response.output_item.done" => {
                let index = output_index(event);
                let item = event.get("item").unwrap_or(&Value::Null);
                match item.get("type").and_then(Value::as_str) {
                    Some("function_call") => {
                        self.has_function_calls = true;
                        // the done item is authoritative for call_id and name
                        let arguments = if self.streamed_arguments.contains(&index) {
                            String::new()
                        } else {
                            str_field(item, "arguments").unwrap_or_default()
                        };
                        out.push(StreamDelta::ToolCallDelta {
                            index,
                            id: str_field(item, "call_id"),
                            name: str_field(item, "name"),
                            arguments,
                        });
                        out.push(StreamDelta::ToolCallEnd { index });
                    }
                    Some("reasoning") => {
                        let text = if self.streamed_reasoning.contains(&index) {
                            String::new()
                        } else {
                            summary_text(item)
                        };
                        out.push(StreamDelta::ReasoningDelta {
                            delta: text,
                            details: vec![item.clone()],
                        });
                    }
                    _ => {}
                }
            }
            "response.output_text.delta" => {
                if let Some(delta) = str_field(event, "delta") {
                    out.push(StreamDelta::TextDelta { delta });
                }
            }
            "response.reasoning_text.delta" | "response.reasoning_summary_text.delta" => {
                self.streamed_reasoning.insert(output_index(event));
                if let Some(delta) = str_field(event, "delta") {
                    out.push(StreamDelta::ReasoningDelta {
                        delta,
                        details: vec![],
                    });
                }
            }
            "response.output_text.annotation.added" => {
                if let Some((url, title)) = event.get("annotation").and_then(url_citation) {
                    out.push(StreamDelta::Source {
                        id: new_source_id(),
                        url,
                        title,
                    });
                }
            }
            "response.completed" | "response.incomplete" | "response.failed" => {
                let response = event.get("response").unwrap_or(&Value::Null);
                if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
                    out.push(StreamDelta::Error(error.clone()));
                }
                let calls_in_output = response
                    .get("output")
                    .and_then(Value::as_array)
                    .is_some_and(|items| {
                        items.iter().any(|i| {
                            i.get("type").and_then(Value::as_str) == Some("function_call")
                        })
                    });
                let status = response
                    .get("status")
                    .and_then(Value::as_str)
                    .or_else(|| kind.strip_prefix("response."));
                let incomplete_reason = response
                    .get("incomplete_details")
                    .and_then(|d| d.get("reason"))
                    .and_then(Value::as_str);
                let finish_reason = map_responses_finish_reason(
                    status,
                    incomplete_reason,
                    self.has_function_calls || calls_in_output,
                );
                let (usage, provider_metadata) = match response.get("usage").filter(|u| u.is_object()) {
                    Some(raw) => {
                        let provider = response.get("provider").and_then(Value::as_str);
                        let (usage, metadata) = normalize_usage(raw, provider, &self.scope);
                        (Some(usage), Some(metadata))
                    }
                    None => (None, None),
                };
                out.push(StreamDelta::Finish {
                    finish_reason: Some(finish_reason),
                    usage,
                    provider_metadata,
                });
            }
            "error" | "response.error" => {
                warn!(target: "ai_sdk::openrouter", "error event in stream");
                out.push(StreamDelta::Error(
                    event.get("error").cloned().unwrap_or_else(|| event.clone()),
                ));
            }
            other => {
                trace!(target: "ai_sdk::openrouter", event = other, "ignored responses event");
            }
        }
        out
    }
}

impl ProviderChunk for ResponsesChunkParser {
    fn try_from_sse(&mut self, event: &SseEvent) -> Result<Option<Vec<StreamDelta>>, SdkError> {
        if event.is_done() {
            return Ok(None);
        }
        match event.json() {
            Ok(value) => Ok(Some(self.deltas(&value))),
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
