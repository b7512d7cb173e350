use crate::ai_sdk_core::assembler::{AssemblerConfig, StreamAssembler};
use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::v2::{self as v2t, FinishReason, StreamDelta, StreamPart, Usage};
use serde_json::json;

fn assembler() -> (StreamAssembler, crate::ai_sdk_core::StreamOutcome) {
    StreamAssembler::new(AssemblerConfig::new("openrouter"))
}

fn run(asm: &mut StreamAssembler, deltas: Vec<StreamDelta>) -> Vec<StreamPart> {
    let mut parts = Vec::new();
    for d in deltas {
        parts.extend(asm.apply(d).expect("apply"));
    }
    parts
}

fn tool_delta(index: usize, id: Option<&str>, name: Option<&str>, args: &str) -> StreamDelta {
    StreamDelta::ToolCallDelta {
        index,
        id: id.map(str::to_string),
        name: name.map(str::to_string),
        arguments: args.to_string(),
    }
}

fn finish() -> StreamDelta {
    StreamDelta::Finish {
        finish_reason: None,
        usage: None,
        provider_metadata: None,
    }
}

fn tool_calls(parts: &[StreamPart]) -> Vec<&v2t::ToolCallPart> {
    parts
        .iter()
        .filter_map(|p| match p {
            StreamPart::ToolCall(tc) => Some(tc),
            _ => None,
        })
        .collect()
}

#[test]
fn text_deltas_are_forwarded_verbatim_within_one_block() {
    let (mut asm, _) = assembler();
    let parts = run(
        &mut asm,
        vec![
            StreamDelta::TextDelta {
                delta: "**Plan**".into(),
            },
            StreamDelta::TextDelta { delta: "".into() },
            StreamDelta::TextDelta {
                delta: "**Next**".into(),
            },
            finish(),
        ],
    );
    let kinds: Vec<String> = parts
        .iter()
        .map(|p| match p {
            StreamPart::TextStart { id, .. } => format!("start:{id}"),
            StreamPart::TextDelta { id, delta, .. } => format!("delta:{id}:{delta}"),
            StreamPart::TextEnd { id, .. } => format!("end:{id}"),
            StreamPart::Finish { .. } => "finish".into(),
            other => panic!("unexpected part: {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "start:txt-1",
            "delta:txt-1:**Plan**",
            "delta:txt-1:**Next**",
            "end:txt-1",
            "finish"
        ]
    );
}

#[test]
fn reasoning_closes_before_text_and_carries_details() {
    let (mut asm, _) = assembler();
    let details = json!({"type": "reasoning.encrypted", "data": "abc"});
    let parts = run(
        &mut asm,
        vec![
            StreamDelta::ReasoningDelta {
                delta: "thinking".into(),
                details: vec![details.clone()],
            },
            StreamDelta::TextDelta {
                delta: "answer".into(),
            },
            finish(),
        ],
    );
    assert!(matches!(&parts[0], StreamPart::ReasoningStart { id, .. } if id == "reasoning-1"));
    assert!(matches!(&parts[1], StreamPart::ReasoningDelta { delta, .. } if delta == "thinking"));
    match &parts[2] {
        StreamPart::ReasoningEnd {
            id,
            provider_metadata: Some(md),
        } => {
            assert_eq!(id, "reasoning-1");
            assert_eq!(md["openrouter"]["reasoning_details"], json!([details]));
        }
        other => panic!("expected reasoning end, got {other:?}"),
    }
    assert!(matches!(&parts[3], StreamPart::TextStart { .. }));
}

fn reasoning_end_details(parts: &[StreamPart]) -> serde_json::Value {
    parts
        .iter()
        .find_map(|p| match p {
            StreamPart::ReasoningEnd {
                provider_metadata: Some(md),
                ..
            } => Some(md["openrouter"]["reasoning_details"].clone()),
            _ => None,
        })
        .expect("reasoning end with details")
}

#[test]
fn streamed_reasoning_detail_fragments_are_consolidated() {
    let (mut asm, _) = assembler();
    let fragment = |text: &str, extra: serde_json::Value| {
        let mut detail = json!({"type": "reasoning.text", "index": 0, "format": null, "text": text});
        if let (Some(target), Some(extra)) = (detail.as_object_mut(), extra.as_object()) {
            target.extend(extra.clone());
        }
        StreamDelta::ReasoningDelta {
            delta: text.into(),
            details: vec![detail],
        }
    };
    let parts = run(
        &mut asm,
        vec![
            fragment("Hel", json!({})),
            fragment("lo", json!({"format": "anthropic-claude-v1"})),
            fragment("", json!({"signature": "sig"})),
            finish(),
        ],
    );
    assert_eq!(
        reasoning_end_details(&parts),
        json!([{
            "type": "reasoning.text",
            "index": 0,
            "format": "anthropic-claude-v1",
            "text": "Hello",
            "signature": "sig",
        }])
    );
}

#[test]
fn distinct_reasoning_details_stay_separate() {
    let (mut asm, _) = assembler();
    let summary = json!({"type": "reasoning.summary", "index": 0, "summary": "plan"});
    let encrypted = json!({"type": "reasoning.encrypted", "index": 1, "data": "opaque"});
    let first_item = json!({"type": "reasoning", "id": "rs_1"});
    let second_item = json!({"type": "reasoning", "id": "rs_2"});
    let parts = run(
        &mut asm,
        vec![
            StreamDelta::ReasoningDelta {
                delta: "plan".into(),
                details: vec![summary.clone(), encrypted.clone()],
            },
            StreamDelta::ReasoningDelta {
                delta: String::new(),
                details: vec![first_item.clone(), second_item.clone()],
            },
            finish(),
        ],
    );
    assert_eq!(
        reasoning_end_details(&parts),
        json!([summary, encrypted, first_item, second_item])
    );
}

#[test]
fn tool_results_are_forwarded_between_tool_calls() {
    let (mut asm, _) = assembler();
    let parts = run(
        &mut asm,
        vec![
            tool_delta(0, Some("call_a"), Some("search"), "{\"q\":\"rust\"}"),
            StreamDelta::ToolCallEnd { index: 0 },
            StreamDelta::ToolResult {
                tool_call_id: "call_a".into(),
                tool_name: "search".into(),
                result: json!({"error": "quota"}),
                is_error: true,
            },
            tool_delta(1, Some("call_b"), Some("fetch"), "{}"),
            finish(),
        ],
    );
    let order: Vec<&str> = parts
        .iter()
        .filter_map(|p| match p {
            StreamPart::ToolCall(tc) => Some(tc.tool_call_id.as_str()),
            StreamPart::ToolResult { tool_call_id, .. } => Some(tool_call_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(order, ["call_a", "call_a", "call_b"]);
    match parts
        .iter()
        .find(|p| matches!(p, StreamPart::ToolResult { .. }))
    {
        Some(StreamPart::ToolResult {
            tool_name,
            result,
            is_error,
            preliminary,
            ..
        }) => {
            assert_eq!(tool_name, "search");
            assert_eq!(result, &json!({"error": "quota"}));
            assert!(*is_error);
            assert!(!*preliminary);
        }
        other => panic!("expected tool result, got {other:?}"),
    }
}

#[test]
fn tool_call_id_arriving_late_is_associated_by_index() {
    let (mut asm, _) = assembler();
    let parts = run(
        &mut asm,
        vec![
            tool_delta(0, None, None, ""),
            tool_delta(0, Some("call_1"), None, "{\"a\":1}"),
            finish(),
        ],
    );
    let calls = tool_calls(&parts);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tool_call_id, "call_1");
    assert_eq!(calls[0].input, json!({"a": 1}));
}

#[test]
fn tool_input_start_waits_for_id_and_replays_held_arguments() {
    let (mut asm, _) = assembler();
    let parts = run(
        &mut asm,
        vec![
            tool_delta(0, None, Some("lookup"), "{\"q\":"),
            tool_delta(0, Some("call_9"), None, "\"x\"}"),
            tool_delta(0, None, None, ""),
            StreamDelta::ToolCallEnd { index: 0 },
        ],
    );
    match &parts[..] {
        [StreamPart::ToolInputStart { id, tool_name, .. }, StreamPart::ToolInputDelta { delta, .. }, StreamPart::ToolInputEnd { .. }, StreamPart::ToolCall(tc)] =>
        {
            assert_eq!(id, "call_9");
            assert_eq!(tool_name, "lookup");
            assert_eq!(delta, "{\"q\":\"x\"}");
            assert_eq!(tc.input, json!({"q": "x"}));
        }
        other => panic!("unexpected parts: {other:?}"),
    }
}

#[test]
fn new_index_closes_previous_tool_and_preserves_order() {
    let (mut asm, _) = assembler();
    let parts = run(
        &mut asm,
        vec![
            tool_delta(0, Some("a"), Some("first"), "{}"),
            tool_delta(1, Some("b"), Some("second"), ""),
            tool_delta(0, None, None, "{\"late\":true}"),
            finish(),
        ],
    );
    let calls = tool_calls(&parts);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].tool_call_id, "a");
    assert_eq!(calls[0].input, json!({}));
    assert_eq!(calls[1].tool_call_id, "b");
    assert_eq!(calls[1].input, json!({}));
}

#[test]
fn malformed_arguments_surface_decode_error_with_raw() {
    let (mut asm, _) = assembler();
    asm.apply(tool_delta(0, Some("c"), Some("t"), "{\"a\":"))
        .expect("delta");
    match asm.apply(finish()) {
        Err(SdkError::Decode { raw, .. }) => assert_eq!(raw, "{\"a\":"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn missing_tool_call_id_is_synthesized() {
    let (mut asm, _) = assembler();
    let parts = run(
        &mut asm,
        vec![tool_delta(0, None, Some("t"), "{\"k\":2}"), finish()],
    );
    let calls = tool_calls(&parts);
    assert!(calls[0].tool_call_id.starts_with("call_"));
    assert_eq!(calls[0].tool_name, "t");
}

#[test]
fn finish_uses_recorded_reason_and_usage() {
    let (mut asm, outcome) = assembler();
    let usage = Usage {
        output_tokens: Some(3),
        ..Default::default()
    };
    let parts = run(
        &mut asm,
        vec![
            StreamDelta::FinishReason(FinishReason::Length),
            StreamDelta::Usage {
                usage: usage.clone(),
                provider_metadata: None,
            },
            finish(),
        ],
    );
    match parts.last() {
        Some(StreamPart::Finish {
            usage: u,
            finish_reason,
            ..
        }) => {
            assert_eq!(*finish_reason, FinishReason::Length);
            assert_eq!(u, &usage);
        }
        other => panic!("expected finish, got {other:?}"),
    }
    assert!(asm.is_finished());
    assert_eq!(
        outcome.snapshot().map(|s| s.finish_reason),
        Some(FinishReason::Length)
    );
}

#[test]
fn usage_after_finish_updates_outcome_only() {
    let (mut asm, outcome) = assembler();
    run(&mut asm, vec![finish()]);
    let late = run(
        &mut asm,
        vec![
            StreamDelta::Usage {
                usage: Usage {
                    input_tokens: Some(7),
                    ..Default::default()
                },
                provider_metadata: None,
            },
            StreamDelta::TextDelta {
                delta: "ignored".into(),
            },
        ],
    );
    assert!(late.is_empty());
    let summary = outcome.snapshot().expect("summary");
    assert_eq!(summary.usage.input_tokens, Some(7));
}

#[test]
fn error_delta_is_forwarded_and_marks_finish_reason() {
    let (mut asm, _) = assembler();
    let parts = run(
        &mut asm,
        vec![
            StreamDelta::Error(json!({"message": "boom"})),
            finish(),
        ],
    );
    assert!(matches!(&parts[0], StreamPart::Error { error } if error["message"] == "boom"));
    assert!(matches!(
        parts.last(),
        Some(StreamPart::Finish {
            finish_reason: FinishReason::Error,
            ..
        })
    ));
}

#[test]
fn raw_deltas_follow_include_raw() {
    let (mut quiet, _) = assembler();
    assert!(quiet.apply(StreamDelta::Raw(json!({"x": 1}))).unwrap().is_empty());

    let mut cfg = AssemblerConfig::new("openrouter");
    cfg.include_raw = true;
    let (mut loud, _) = StreamAssembler::new(cfg);
    let parts = loud.apply(StreamDelta::Raw(json!({"x": 1}))).unwrap();
    assert!(matches!(&parts[0], StreamPart::Raw { raw_value } if raw_value["x"] == 1));
}

#[test]
fn synthesized_finish_only_once() {
    let (mut asm, _) = assembler();
    run(
        &mut asm,
        vec![StreamDelta::TextDelta {
            delta: "partial".into(),
        }],
    );
    let parts = asm.finish().unwrap();
    assert!(matches!(parts.last(), Some(StreamPart::Finish { finish_reason: FinishReason::Unknown, .. })));
    assert!(asm.finish().unwrap().is_empty());
}
