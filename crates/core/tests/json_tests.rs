use crate::ai_sdk_core::json::{strip_null_members, without_null_fields};
use serde_json::json;

#[test]
fn unset_router_options_are_omitted() {
    let mut body = json!({
        "model": "openai/gpt-4o",
        "seed": null,
        "provider": { "order": null, "sort": "throughput" },
        "reasoning": { "effort": null },
    });
    strip_null_members(&mut body);
    assert_eq!(
        body,
        json!({
            "model": "openai/gpt-4o",
            "provider": { "sort": "throughput" },
            "reasoning": {},
        })
    );
}

#[test]
fn positional_nulls_inside_messages_survive() {
    let body = json!({
        "messages": [
            { "role": "assistant", "content": null, "tool_calls": [{ "id": "call_1", "extra": null }] },
            null,
        ],
        "stop": ["\n", null],
    });
    assert_eq!(
        without_null_fields(&body),
        json!({
            "messages": [
                { "role": "assistant", "tool_calls": [{ "id": "call_1" }] },
                null,
            ],
            "stop": ["\n", null],
        })
    );
    assert!(body["messages"][0].get("content").is_some(), "input is left untouched");
}
