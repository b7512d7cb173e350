//! Server-Sent Events decoding and the chunk-parser seam.
//!
//! [`SseDecoder`] turns arbitrary byte chunks into complete [`SseEvent`]s.
//! Each backend dialect implements [`ProviderChunk`] to translate events into
//! wire-neutral [`StreamDelta`]s, and [`pipeline::drive_stream`] wires both to
//! the core stream assembler.

use crate::ai_sdk_core::error::SdkError;
use crate::ai_sdk_types::v2::StreamDelta;
use bytes::Bytes;
use serde_json::Value;
use std::collections::VecDeque;

/// Terminal sentinel sent by chat-completions style backends.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One dispatched SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// `event:` field; the responses dialect names every event here.
    pub event: Option<String>,
    /// `data:` lines joined with `\n`.
    pub data: Bytes,
    pub id: Option<String>,
    /// `retry:` reconnection hint in milliseconds.
    pub retry: Option<u64>,
}

impl SseEvent {
    pub fn data(data: impl Into<Bytes>) -> Self {
        Self {
            event: None,
            data: data.into(),
            id: None,
            retry: None,
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Whether the payload is the literal `[DONE]` sentinel.
    pub fn is_done(&self) -> bool {
        std::str::from_utf8(&self.data).is_ok_and(|s| s.trim() == DONE_SENTINEL)
    }

    /// Payload parsed as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.data)
    }

    /// Payload as JSON when it parses, otherwise as a lossy string.
    pub fn raw_value(&self) -> Value {
        self.json()
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.data).into_owned()))
    }
}

/// Incremental SSE decoder.
///
/// Bytes are split into lines as they arrive (`\n`, `\r\n` or a lone `\r`);
/// a blank line dispatches the pending event. Chunk boundaries may fall
/// anywhere, including between the `\r` and `\n` of one line ending.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the line still missing its terminator.
    partial_line: Vec<u8>,
    pending: PendingEvent,
    ready: VecDeque<SseEvent>,
}

#[derive(Debug, Default)]
struct PendingEvent {
    event: Option<String>,
    data: Option<String>,
    id: Option<String>,
    retry: Option<u64>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and drain every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> impl Iterator<Item = SseEvent> + '_ {
        self.partial_line.extend_from_slice(chunk);
        self.consume_lines();
        self.ready.drain(..)
    }

    /// True while an unterminated line or undispatched data is held.
    pub fn has_buffered_data(&self) -> bool {
        !self.partial_line.is_empty() || self.pending.data.is_some()
    }

    /// Flush at end of input.
    ///
    /// Routers may close the connection right after the last `data:` line
    /// without the blank line that normally dispatches it.
    pub fn finish(&mut self) -> impl Iterator<Item = SseEvent> + '_ {
        if self.has_buffered_data() {
            self.partial_line.extend_from_slice(b"\n\n");
            self.consume_lines();
        }
        self.ready.drain(..)
    }

    fn consume_lines(&mut self) {
        let mut line_start = 0;
        let mut i = 0;
        while i < self.partial_line.len() {
            let next = match self.partial_line[i] {
                b'\n' => i + 1,
                b'\r' => match self.partial_line.get(i + 1) {
                    Some(b'\n') => i + 2,
                    Some(_) => i + 1,
                    // a following '\n' may still arrive
                    None => break,
                },
                _ => {
                    i += 1;
                    continue;
                }
            };
            let line = String::from_utf8_lossy(&self.partial_line[line_start..i]).into_owned();
            self.on_line(&line);
            line_start = next;
            i = next;
        }
        self.partial_line.drain(..line_start);
    }

    fn on_line(&mut self, line: &str) {
        if line.is_empty() {
            self.dispatch();
            return;
        }
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => match &mut self.pending.data {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => self.pending.data = Some(value.to_string()),
            },
            "event" => self.pending.event = Some(value.to_string()),
            "id" => self.pending.id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse() {
                    self.pending.retry = Some(ms);
                }
            }
            _ => {}
        }
    }

    /// Events without data lines are dropped, per the SSE processing model.
    fn dispatch(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if let Some(data) = pending.data {
            self.ready.push_back(SseEvent {
                event: pending.event,
                data: Bytes::from(data),
                id: pending.id,
                retry: pending.retry,
            });
        }
    }
}

/// Backend-specific translation of SSE events into stream deltas.
///
/// Implementations keep whatever per-stream state they need (tool indices,
/// seen item ids) and are used for exactly one response.
pub trait ProviderChunk {
    /// Translate one SSE event.
    ///
    /// Returns:
    /// - `Ok(Some(deltas))` for a recognized event
    /// - `Ok(None)` for events to skip (heartbeats, unknown event types)
    /// - `Err(e)` for a failure that must end the stream
    fn try_from_sse(&mut self, event: &SseEvent) -> Result<Option<Vec<StreamDelta>>, SdkError>;
}

pub mod pipeline;
pub use pipeline::{drive_stream, DriveConfig};

#[cfg(test)]
#[path = "../tests/decoder_tests.rs"]
mod decoder_tests;

#[cfg(test)]
#[path = "../tests/pipeline_tests.rs"]
mod pipeline_tests;
