//! Incremental reconstruction of a response from wire-neutral deltas.
//!
//! Each logical block (text, reasoning, one tool call per index) moves
//! `absent -> open -> closed`. Text and reasoning deltas are forwarded as they
//! arrive; tool arguments accumulate until the block closes and are parsed
//! then. The accumulator lives for one request and is cleared on finish.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{trace, warn};

use crate::ai_sdk_types::json::parse_tool_arguments;
use crate::ai_sdk_types::v2 as v2t;
use crate::core::error::SdkError;
use crate::core::outcome::{outcome_channel, FinishSummary, OutcomeSender, StreamOutcome};

#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Provider-metadata scope used for reasoning details and usage extras.
    pub provider_scope: String,
    /// Forward `StreamDelta::Raw` as `StreamPart::Raw`.
    pub include_raw: bool,
}

impl AssemblerConfig {
    pub fn new(provider_scope: impl Into<String>) -> Self {
        Self {
            provider_scope: provider_scope.into(),
            include_raw: false,
        }
    }
}

#[derive(Debug, Default)]
struct ToolBlock {
    id: Option<String>,
    name: Option<String>,
    args: String,
    started: bool,
    closed: bool,
}

#[derive(Debug, Default)]
struct Accumulator {
    text_open: Option<String>,
    reasoning_open: Option<String>,
    reasoning_details: Vec<Value>,
    tools: BTreeMap<usize, ToolBlock>,
    finish_reason: Option<v2t::FinishReason>,
    usage: Option<v2t::Usage>,
    provider_metadata: v2t::ProviderMetadata,
}

/// Per-request stream state machine. Not shared across requests.
pub struct StreamAssembler {
    cfg: AssemblerConfig,
    acc: Accumulator,
    text_seq: usize,
    reasoning_seq: usize,
    finished: bool,
    outcome: OutcomeSender,
}

impl StreamAssembler {
    pub fn new(cfg: AssemblerConfig) -> (Self, StreamOutcome) {
        let (outcome, rx) = outcome_channel();
        (
            Self {
                cfg,
                acc: Accumulator::default(),
                text_seq: 0,
                reasoning_seq: 0,
                finished: false,
                outcome,
            },
            rx,
        )
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Apply one delta and return the parts it produces, in order.
    pub fn apply(&mut self, delta: v2t::StreamDelta) -> Result<Vec<v2t::StreamPart>, SdkError> {
        let mut out = Vec::new();
        if self.finished {
            self.apply_after_finish(delta);
            return Ok(out);
        }
        match delta {
            v2t::StreamDelta::ResponseMetadata(meta) => {
                out.push(v2t::StreamPart::ResponseMetadata { meta });
            }
            v2t::StreamDelta::TextDelta { delta } => {
                if delta.is_empty() {
                    return Ok(out);
                }
                self.close_reasoning(&mut out);
                let id = self.open_text(&mut out);
                out.push(v2t::StreamPart::TextDelta {
                    id,
                    delta,
                    provider_metadata: None,
                });
            }
            v2t::StreamDelta::ReasoningDelta { delta, details } => {
                if delta.is_empty() && details.is_empty() {
                    return Ok(out);
                }
                self.close_text(&mut out);
                let id = self.open_reasoning(&mut out);
                for detail in details {
                    merge_reasoning_detail(&mut self.acc.reasoning_details, detail);
                }
                if !delta.is_empty() {
                    out.push(v2t::StreamPart::ReasoningDelta {
                        id,
                        delta,
                        provider_metadata: None,
                    });
                }
            }
            v2t::StreamDelta::ToolCallDelta {
                index,
                id,
                name,
                arguments,
            } => {
                self.apply_tool_delta(index, id, name, arguments, &mut out)?;
            }
            v2t::StreamDelta::ToolCallEnd { index } => {
                self.close_tool(index, &mut out)?;
            }
            v2t::StreamDelta::ToolCall {
                id,
                name,
                arguments,
            } => {
                self.close_reasoning(&mut out);
                let input = parse_arguments(&arguments)?;
                emit_tool_input(&id, &name, &arguments, &mut out);
                out.push(v2t::StreamPart::ToolCall(v2t::ToolCallPart::new(
                    id, name, input,
                )));
            }
            v2t::StreamDelta::ToolResult {
                tool_call_id,
                tool_name,
                result,
                is_error,
            } => {
                out.push(v2t::StreamPart::ToolResult {
                    tool_call_id,
                    tool_name,
                    result,
                    is_error,
                    preliminary: false,
                    provider_metadata: None,
                });
            }
            v2t::StreamDelta::Source { id, url, title } => {
                out.push(v2t::StreamPart::SourceUrl {
                    id,
                    url,
                    title,
                    provider_metadata: None,
                });
            }
            v2t::StreamDelta::File { media_type, data } => {
                out.push(v2t::StreamPart::File { media_type, data });
            }
            v2t::StreamDelta::FinishReason(reason) => {
                self.acc.finish_reason = Some(reason);
            }
            v2t::StreamDelta::Usage {
                usage,
                provider_metadata,
            } => {
                self.acc.usage = Some(usage);
                if let Some(md) = provider_metadata {
                    v2t::merge_provider_metadata(&mut self.acc.provider_metadata, md);
                }
            }
            v2t::StreamDelta::Finish {
                finish_reason,
                usage,
                provider_metadata,
            } => {
                if let Some(reason) = finish_reason {
                    self.acc.finish_reason = Some(reason);
                }
                if let Some(usage) = usage {
                    self.acc.usage = Some(usage);
                }
                if let Some(md) = provider_metadata {
                    v2t::merge_provider_metadata(&mut self.acc.provider_metadata, md);
                }
                self.finish_into(&mut out)?;
            }
            v2t::StreamDelta::Error(error) => {
                self.acc.finish_reason = Some(v2t::FinishReason::Error);
                out.push(v2t::StreamPart::Error { error });
            }
            v2t::StreamDelta::Raw(raw_value) => {
                if self.cfg.include_raw {
                    out.push(v2t::StreamPart::Raw { raw_value });
                }
            }
        }
        Ok(out)
    }

    /// Synthesize the terminal finish for a stream that ended cleanly without one.
    pub fn finish(&mut self) -> Result<Vec<v2t::StreamPart>, SdkError> {
        let mut out = Vec::new();
        if !self.finished {
            self.finish_into(&mut out)?;
        }
        Ok(out)
    }

    /// Mark the stream drained so outcome waiters resolve.
    pub fn close(&self) {
        self.outcome.close();
    }

    fn apply_after_finish(&mut self, delta: v2t::StreamDelta) {
        match delta {
            v2t::StreamDelta::Usage {
                usage,
                provider_metadata,
            }
            | v2t::StreamDelta::Finish {
                usage: Some(usage),
                provider_metadata,
                ..
            } => {
                trace!(target: "ai_sdk::assembler", "usage after finish");
                self.outcome.update_summary(|summary| {
                    summary.usage = usage;
                    if let Some(md) = provider_metadata {
                        let target = summary.provider_metadata.get_or_insert_with(Default::default);
                        v2t::merge_provider_metadata(target, md);
                    }
                });
            }
            other => {
                trace!(target: "ai_sdk::assembler", delta = ?other, "ignoring delta after finish");
            }
        }
    }

    fn open_text(&mut self, out: &mut Vec<v2t::StreamPart>) -> String {
        if let Some(id) = &self.acc.text_open {
            return id.clone();
        }
        self.text_seq += 1;
        let id = format!("txt-{}", self.text_seq);
        out.push(v2t::StreamPart::TextStart {
            id: id.clone(),
            provider_metadata: None,
        });
        self.acc.text_open = Some(id.clone());
        id
    }

    fn close_text(&mut self, out: &mut Vec<v2t::StreamPart>) {
        if let Some(id) = self.acc.text_open.take() {
            out.push(v2t::StreamPart::TextEnd {
                id,
                provider_metadata: None,
            });
        }
    }

    fn open_reasoning(&mut self, out: &mut Vec<v2t::StreamPart>) -> String {
        if let Some(id) = &self.acc.reasoning_open {
            return id.clone();
        }
        self.reasoning_seq += 1;
        let id = format!("reasoning-{}", self.reasoning_seq);
        out.push(v2t::StreamPart::ReasoningStart {
            id: id.clone(),
            provider_metadata: None,
        });
        self.acc.reasoning_open = Some(id.clone());
        id
    }

    fn close_reasoning(&mut self, out: &mut Vec<v2t::StreamPart>) {
        let Some(id) = self.acc.reasoning_open.take() else {
            return;
        };
        let details = std::mem::take(&mut self.acc.reasoning_details);
        let provider_metadata = if details.is_empty() {
            None
        } else {
            let mut md = v2t::ProviderMetadata::new();
            v2t::insert_provider_metadata(
                &mut md,
                &self.cfg.provider_scope,
                "reasoning_details",
                Value::Array(details),
            );
            Some(md)
        };
        out.push(v2t::StreamPart::ReasoningEnd {
            id,
            provider_metadata,
        });
    }

    fn apply_tool_delta(
        &mut self,
        index: usize,
        id: Option<String>,
        name: Option<String>,
        arguments: String,
        out: &mut Vec<v2t::StreamPart>,
    ) -> Result<(), SdkError> {
        if self.acc.tools.get(&index).is_some_and(|b| b.closed) {
            warn!(target: "ai_sdk::assembler", index, "delta for closed tool call ignored");
            return Ok(());
        }
        if !self.acc.tools.contains_key(&index) {
            self.close_reasoning(out);
            let open: Vec<usize> = self
                .acc
                .tools
                .iter()
                .filter(|(_, b)| !b.closed)
                .map(|(i, _)| *i)
                .collect();
            for prev in open {
                self.close_tool(prev, out)?;
            }
            trace!(target: "ai_sdk::assembler", index, "tool call opened");
        }

        let block = self.acc.tools.entry(index).or_default();
        if block.id.is_none() {
            block.id = id.filter(|s| !s.is_empty());
        }
        if block.name.is_none() {
            block.name = name.filter(|s| !s.is_empty());
        }
        block.args.push_str(&arguments);

        if block.started {
            if !arguments.is_empty() {
                if let Some(id) = &block.id {
                    out.push(tool_input_delta(id, arguments));
                }
            }
        } else if let (Some(id), Some(name)) = (&block.id, &block.name) {
            block.started = true;
            emit_start_with_held(id, name, &block.args, out);
        }
        Ok(())
    }

    fn close_tool(&mut self, index: usize, out: &mut Vec<v2t::StreamPart>) -> Result<(), SdkError> {
        let Some(block) = self.acc.tools.get_mut(&index) else {
            return Ok(());
        };
        if block.closed {
            return Ok(());
        }
        block.closed = true;

        let id = block
            .id
            .get_or_insert_with(|| format!("call_{}", uuid::Uuid::new_v4().simple()))
            .clone();
        let name = match &block.name {
            Some(name) => name.clone(),
            None => {
                warn!(target: "ai_sdk::assembler", index, tool_call_id = %id, "tool call closed without a name");
                String::new()
            }
        };
        if !block.started {
            block.started = true;
            emit_start_with_held(&id, &name, &block.args, out);
        }
        let input = parse_arguments(&block.args)?;
        out.push(v2t::StreamPart::ToolInputEnd {
            id: id.clone(),
            provider_executed: false,
            provider_metadata: None,
        });
        out.push(v2t::StreamPart::ToolCall(v2t::ToolCallPart::new(
            id, name, input,
        )));
        Ok(())
    }

    fn finish_into(&mut self, out: &mut Vec<v2t::StreamPart>) -> Result<(), SdkError> {
        self.close_reasoning(out);
        self.close_text(out);
        let open: Vec<usize> = self
            .acc
            .tools
            .iter()
            .filter(|(_, b)| !b.closed)
            .map(|(i, _)| *i)
            .collect();
        for index in open {
            self.close_tool(index, out)?;
        }

        let acc = std::mem::take(&mut self.acc);
        let summary = FinishSummary {
            usage: acc.usage.unwrap_or_default(),
            finish_reason: acc.finish_reason.unwrap_or_default(),
            provider_metadata: if acc.provider_metadata.is_empty() {
                None
            } else {
                Some(acc.provider_metadata)
            },
        };
        out.push(v2t::StreamPart::Finish {
            usage: summary.usage.clone(),
            finish_reason: summary.finish_reason,
            provider_metadata: summary.provider_metadata.clone(),
        });
        self.outcome.set_summary(summary);
        self.finished = true;
        trace!(target: "ai_sdk::assembler", "finished");
        Ok(())
    }
}

/// Streamed reasoning details arrive as fragments of one detail. Consecutive
/// fragments with the same `type` and `index` are folded so a replayed turn
/// carries the same consolidated detail a non-streaming response would.
fn merge_reasoning_detail(details: &mut Vec<Value>, fragment: Value) {
    let Some(last) = details.last_mut() else {
        details.push(fragment);
        return;
    };
    let (Some(prev), Some(next)) = (last.as_object_mut(), fragment.as_object()) else {
        details.push(fragment);
        return;
    };
    let same_block =
        prev.get("type") == next.get("type") && prev.get("index") == next.get("index");
    let conflicting_id = matches!(
        (non_empty_str(prev.get("id")), non_empty_str(next.get("id"))),
        (Some(a), Some(b)) if a != b
    );
    if !same_block || conflicting_id {
        details.push(fragment);
        return;
    }
    for (key, value) in next {
        match (key.as_str(), value) {
            ("text" | "summary", Value::String(piece)) => {
                match prev.entry(key.clone()).or_insert(Value::Null) {
                    Value::String(existing) => existing.push_str(piece),
                    slot => *slot = value.clone(),
                }
            }
            _ => {
                let missing = match prev.get(key) {
                    None | Some(Value::Null) => true,
                    Some(Value::String(existing)) => existing.is_empty(),
                    Some(_) => false,
                };
                if missing && !value.is_null() {
                    prev.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn parse_arguments(raw: &str) -> Result<Value, SdkError> {
    parse_tool_arguments(raw).map_err(|e| SdkError::Decode {
        message: format!("invalid tool-call arguments: {e}"),
        raw: raw.to_string(),
    })
}

fn tool_input_delta(id: &str, delta: String) -> v2t::StreamPart {
    v2t::StreamPart::ToolInputDelta {
        id: id.to_string(),
        delta,
        provider_executed: false,
        provider_metadata: None,
    }
}

fn emit_start_with_held(id: &str, name: &str, held: &str, out: &mut Vec<v2t::StreamPart>) {
    out.push(v2t::StreamPart::ToolInputStart {
        id: id.to_string(),
        tool_name: name.to_string(),
        provider_executed: false,
        provider_metadata: None,
    });
    if !held.is_empty() {
        out.push(tool_input_delta(id, held.to_string()));
    }
}

fn emit_tool_input(id: &str, name: &str, arguments: &str, out: &mut Vec<v2t::StreamPart>) {
    emit_start_with_held(id, name, arguments, out);
    out.push(v2t::StreamPart::ToolInputEnd {
        id: id.to_string(),
        provider_executed: false,
        provider_metadata: None,
    });
}
