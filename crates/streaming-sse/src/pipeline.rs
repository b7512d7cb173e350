//! Bytes to unified stream parts.
//!
//! The driver chains the SSE decoder, a backend [`ProviderChunk`] parser and
//! the core [`StreamAssembler`]. It processes one event completely before
//! pulling the next chunk.

use crate::ai_sdk_core::assembler::{AssemblerConfig, StreamAssembler};
use crate::ai_sdk_core::error::{classify_transport_error, TransportError};
use crate::ai_sdk_core::{PartStream, StreamOutcome};
use crate::ai_sdk_types::v2 as v2t;
use crate::streaming_sse::{ProviderChunk, SseDecoder, SseEvent};
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use tracing::debug;

/// Per-stream driver settings.
#[derive(Debug, Clone)]
pub struct DriveConfig {
    /// Call warnings reported through the leading `StreamStart` part.
    pub warnings: Vec<v2t::CallWarning>,
    pub assembler: AssemblerConfig,
}

/// Drive a backend byte stream through `parser` and the stream assembler.
///
/// - `StreamStart` is always yielded first.
/// - A transport or parser error ends the stream with `Err`; no finish part
///   is synthesized and the outcome resolves to `Cancelled`.
/// - Events after the terminal finish are still consumed so that a trailing
///   usage frame reaches the outcome.
/// - A clean end of input without a finish frame finishes with the reason
///   recorded so far (`unknown` when none was seen).
pub fn drive_stream<S, P>(bytes: S, mut parser: P, cfg: DriveConfig) -> (PartStream, StreamOutcome)
where
    S: Stream<Item = Result<Bytes, TransportError>> + Send + 'static,
    P: ProviderChunk + Send + 'static,
{
    let include_raw = cfg.assembler.include_raw;
    let (mut assembler, outcome) = StreamAssembler::new(cfg.assembler);
    let warnings = cfg.warnings;

    let stream = async_stream::try_stream! {
        yield v2t::StreamPart::StreamStart { warnings };

        let mut decoder = SseDecoder::new();
        futures_util::pin_mut!(bytes);
        let mut at_eof = false;
        while !at_eof {
            let events: Vec<SseEvent> = match bytes.next().await {
                Some(chunk) => {
                    let chunk = chunk.map_err(classify_transport_error)?;
                    decoder.push(&chunk).collect()
                }
                None => {
                    at_eof = true;
                    decoder.finish().collect()
                }
            };
            for event in events {
                if include_raw {
                    for part in assembler.apply(v2t::StreamDelta::Raw(event.raw_value()))? {
                        yield part;
                    }
                }
                let Some(deltas) = parser.try_from_sse(&event)? else {
                    continue;
                };
                for delta in deltas {
                    for part in assembler.apply(delta)? {
                        yield part;
                    }
                }
            }
        }

        if !assembler.is_finished() {
            debug!(target: "ai_sdk::stream", "stream ended without a finish frame");
        }
        for part in assembler.finish()? {
            yield part;
        }
        assembler.close();
    };
    (Box::pin(stream), outcome)
}
