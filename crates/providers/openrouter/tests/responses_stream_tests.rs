use crate::ai_sdk_core::assembler::AssemblerConfig;
use crate::ai_sdk_core::error::TransportError;
use crate::ai_sdk_core::StreamOutcome;
use crate::ai_sdk_streaming_sse::{drive_stream, DriveConfig};
use crate::ai_sdk_types::v2 as v2t;
use crate::provider_openrouter::responses::stream::ResponsesChunkParser;
use crate::provider_openrouter::support::{collect_parts, done_chunk};
use bytes::Bytes;
use futures_util::stream;
use serde_json::{json, Value};

const SCOPE: &str = "openrouter";

/// One responses-API event, framed with its `event:` line.
fn event(mut data: Value, kind: &str) -> Bytes {
    data["type"] = json!(kind);
    Bytes::from(format!("event: {kind}\ndata: {data}\n\n"))
}

fn completed(status: &str, extra: Value) -> Bytes {
    let mut response = json!({ "id": "resp_1", "status": status, "output": [] });
    if let (Some(target), Some(extra)) = (response.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
    event(
        json!({ "response": response }),
        &format!("response.{status}"),
    )
}

async fn run(chunks: Vec<Bytes>) -> (Vec<v2t::StreamPart>, StreamOutcome) {
    let bytes = stream::iter(chunks.into_iter().map(Ok::<_, TransportError>));
    let (parts, outcome) = drive_stream(
        bytes,
        ResponsesChunkParser::new(SCOPE),
        DriveConfig {
            warnings: vec![],
            assembler: AssemblerConfig::new(SCOPE),
        },
    );
    (collect_parts(parts).await, outcome)
}

fn finish(parts: &[v2t::StreamPart]) -> (&v2t::Usage, v2t::FinishReason) {
    match parts.last() {
        Some(v2t::StreamPart::Finish {
            usage,
            finish_reason,
            ..
        }) => (usage, *finish_reason),
        other => panic!("expected finish, got {other:?}"),
    }
}

fn text_of(parts: &[v2t::StreamPart]) -> String {
    parts
        .iter()
        .filter_map(|p| match p {
            v2t::StreamPart::TextDelta { delta, .. } => Some(delta.as_str()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn text_events_and_completion() {
    let (parts, outcome) = run(vec![
        event(
            json!({ "response": { "id": "resp_1", "model": "openai/gpt-4o", "created_at": 1_700_000_000 } }),
            "response.created",
        ),
        event(json!({ "output_index": 0, "delta": "Hel" }), "response.output_text.delta"),
        event(json!({ "output_index": 0, "delta": "lo" }), "response.output_text.delta"),
        completed(
            "completed",
            json!({ "usage": { "input_tokens": 5, "output_tokens": 2, "total_tokens": 7 } }),
        ),
        done_chunk(),
    ])
    .await;

    match &parts[1] {
        v2t::StreamPart::ResponseMetadata { meta } => {
            assert_eq!(meta.id.as_deref(), Some("resp_1"));
            assert_eq!(meta.timestamp_ms, Some(1_700_000_000_000));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(text_of(&parts), "Hello");
    let (usage, reason) = finish(&parts);
    assert_eq!(reason, v2t::FinishReason::Stop);
    assert_eq!(usage.input_tokens, Some(5));
    assert_eq!(usage.output_tokens, Some(2));
    let summary = outcome.wait().await.unwrap();
    assert_eq!(summary.usage.total_tokens, Some(7));
}

#[tokio::test]
async fn streamed_function_call_arguments() {
    let item = json!({ "type": "function_call", "id": "fc_1", "call_id": "call_1", "name": "f", "arguments": "" });
    let mut done_item = item.clone();
    done_item["arguments"] = json!("{\"a\":1}");
    let (parts, _) = run(vec![
        event(json!({ "output_index": 0, "item": item }), "response.output_item.added"),
        event(
            json!({ "output_index": 0, "delta": "{\"a\":" }),
            "response.function_call_arguments.delta",
        ),
        event(
            json!({ "output_index": 0, "delta": "1}" }),
            "response.function_call_arguments.delta",
        ),
        event(json!({ "output_index": 0, "item": done_item }), "response.output_item.done"),
        completed("completed", json!({})),
    ])
    .await;

    let calls: Vec<&v2t::ToolCallPart> = parts
        .iter()
        .filter_map(|p| match p {
            v2t::StreamPart::ToolCall(call) => Some(call),
            _ => None,
        })
        .collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tool_call_id, "call_1");
    assert_eq!(calls[0].tool_name, "f");
    assert_eq!(calls[0].input, json!({"a": 1}));
    assert_eq!(finish(&parts).1, v2t::FinishReason::ToolCalls);
}

#[tokio::test]
async fn call_id_and_name_from_done_item_after_streamed_arguments() {
    let (parts, _) = run(vec![
        event(
            json!({ "output_index": 0, "item": { "type": "function_call", "id": "fc_1", "arguments": "" } }),
            "response.output_item.added",
        ),
        event(
            json!({ "output_index": 0, "delta": "{\"a\":1}" }),
            "response.function_call_arguments.delta",
        ),
        event(
            json!({ "output_index": 0, "item": {
                "type": "function_call", "id": "fc_1", "call_id": "call_1", "name": "f", "arguments": "{\"a\":1}",
            } }),
            "response.output_item.done",
        ),
        completed("completed", json!({})),
    ])
    .await;

    let calls: Vec<&v2t::ToolCallPart> = parts
        .iter()
        .filter_map(|p| match p {
            v2t::StreamPart::ToolCall(call) => Some(call),
            _ => None,
        })
        .collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tool_call_id, "call_1");
    assert_eq!(calls[0].tool_name, "f");
    assert_eq!(calls[0].input, json!({"a": 1}));

    let input: String = parts
        .iter()
        .filter_map(|p| match p {
            v2t::StreamPart::ToolInputDelta { id, delta, .. } if id == "call_1" => {
                Some(delta.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(input, "{\"a\":1}");
}

#[tokio::test]
async fn function_call_delivered_only_on_done() {
    let (parts, _) = run(vec![
        event(
            json!({ "output_index": 2, "item": {
                "type": "function_call", "call_id": "call_9", "name": "g", "arguments": "{\"b\":true}",
            } }),
            "response.output_item.done",
        ),
        completed("completed", json!({})),
    ])
    .await;
    let call = parts
        .iter()
        .find_map(|p| match p {
            v2t::StreamPart::ToolCall(call) => Some(call),
            _ => None,
        })
        .expect("tool call");
    assert_eq!(call.tool_call_id, "call_9");
    assert_eq!(call.input, json!({"b": true}));
}

#[tokio::test]
async fn reasoning_summary_then_text() {
    let reasoning_item = json!({
        "type": "reasoning",
        "id": "rs_1",
        "summary": [{ "type": "summary_text", "text": "plan" }],
        "encrypted_content": "opaque",
    });
    let (parts, _) = run(vec![
        event(
            json!({ "output_index": 0, "summary_index": 0, "delta": "plan" }),
            "response.reasoning_summary_text.delta",
        ),
        event(
            json!({ "output_index": 0, "item": reasoning_item }),
            "response.output_item.done",
        ),
        event(json!({ "output_index": 1, "delta": "done" }), "response.output_text.delta"),
        completed("completed", json!({})),
    ])
    .await;

    let reasoning: String = parts
        .iter()
        .filter_map(|p| match p {
            v2t::StreamPart::ReasoningDelta { delta, .. } => Some(delta.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(reasoning, "plan");
    let details = parts
        .iter()
        .find_map(|p| match p {
            v2t::StreamPart::ReasoningEnd {
                provider_metadata: Some(md),
                ..
            } => md[SCOPE].get("reasoning_details").cloned(),
            _ => None,
        })
        .expect("reasoning details");
    assert_eq!(details, json!([reasoning_item]));
    assert_eq!(text_of(&parts), "done");
}

#[tokio::test]
async fn reasoning_item_without_deltas_uses_summary_text() {
    let (parts, _) = run(vec![
        event(
            json!({ "output_index": 0, "item": {
                "type": "reasoning",
                "summary": [{ "type": "summary_text", "text": "quick" }],
            } }),
            "response.output_item.done",
        ),
        completed("completed", json!({})),
    ])
    .await;
    assert!(parts.iter().any(|p| matches!(
        p,
        v2t::StreamPart::ReasoningDelta { delta, .. } if delta == "quick"
    )));
}

#[tokio::test]
async fn incomplete_response_maps_reason() {
    let (parts, _) = run(vec![
        event(json!({ "output_index": 0, "delta": "cut" }), "response.output_text.delta"),
        completed(
            "incomplete",
            json!({ "incomplete_details": { "reason": "max_output_tokens" } }),
        ),
    ])
    .await;
    assert_eq!(finish(&parts).1, v2t::FinishReason::Length);
}

#[tokio::test]
async fn failed_response_reports_error() {
    let (parts, outcome) = run(vec![completed(
        "failed",
        json!({ "error": { "code": "server_error", "message": "exploded" } }),
    )])
    .await;
    assert!(parts.iter().any(|p| matches!(
        p,
        v2t::StreamPart::Error { error } if error["message"] == "exploded"
    )));
    assert_eq!(finish(&parts).1, v2t::FinishReason::Error);
    assert_eq!(
        outcome.finish_reason().await.unwrap(),
        v2t::FinishReason::Error
    );
}

#[tokio::test]
async fn annotations_become_sources() {
    let (parts, _) = run(vec![
        event(
            json!({
                "output_index": 0,
                "annotation": { "type": "url_citation", "url": "https://docs.rs", "title": "Docs" },
            }),
            "response.output_text.annotation.added",
        ),
        completed("completed", json!({})),
    ])
    .await;
    assert!(parts.iter().any(|p| matches!(
        p,
        v2t::StreamPart::SourceUrl { url, .. } if url == "https://docs.rs"
    )));
}

#[tokio::test]
async fn unknown_events_are_ignored() {
    let (parts, _) = run(vec![
        event(json!({ "sequence_number": 1 }), "response.content_part.added"),
        event(json!({ "output_index": 0, "delta": "ok" }), "response.output_text.delta"),
        completed("completed", json!({})),
    ])
    .await;
    assert_eq!(text_of(&parts), "ok");
    assert!(!parts
        .iter()
        .any(|p| matches!(p, v2t::StreamPart::Error { .. })));
}
