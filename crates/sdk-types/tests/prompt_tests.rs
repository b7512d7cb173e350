use crate::ai_sdk_types::v2::{
    AssistantPart, ContentPart, DataContent, PromptMessage, ToolMessagePart, ToolResultOutput,
    UserPart,
};
use crate::ai_sdk_types::Role;
use serde_json::json;

#[test]
fn prompt_round_trips_through_serde() {
    let prompt = json!([
        {"role": "system", "content": "be brief"},
        {"role": "user", "content": [
            {"type": "text", "text": "Hi"},
            {"type": "file", "mediaType": "image/png", "data": {"type": "url", "url": "https://x/y.png"}}
        ]},
        {"role": "assistant", "content": [
            {"type": "reasoning", "text": "thinking"},
            {"type": "tool-call", "toolCallId": "call_1", "toolName": "lookup", "input": {"q": "rust"}}
        ]},
        {"role": "tool", "content": [
            {"type": "tool-result", "toolCallId": "call_1", "toolName": "lookup",
             "output": {"type": "execution-denied", "reason": "not allowed"}},
            {"type": "tool-approval-response", "approvalId": "a1", "approved": false}
        ]}
    ]);
    let messages: Vec<PromptMessage> = serde_json::from_value(prompt.clone()).unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role(), Role::System);
    match &messages[3] {
        PromptMessage::Tool { content, .. } => {
            assert!(matches!(
                &content[0],
                ToolMessagePart::ToolResult(tr)
                    if matches!(&tr.output, ToolResultOutput::ExecutionDenied { reason: Some(r) } if r == "not allowed")
            ));
            assert!(matches!(content[1], ToolMessagePart::ToolApprovalResponse(_)));
        }
        other => panic!("expected tool message, got {other:?}"),
    }
    assert_eq!(serde_json::to_value(&messages).unwrap(), prompt);
}

#[test]
fn unknown_role_names_the_tag() {
    let err = serde_json::from_value::<PromptMessage>(json!({"role": "critic", "content": "x"}))
        .unwrap_err();
    assert!(err.to_string().contains("critic"), "{err}");
}

#[test]
fn tool_part_in_user_message_is_rejected() {
    let err = serde_json::from_value::<PromptMessage>(json!({
        "role": "user",
        "content": [{"type": "tool-call", "toolCallId": "c", "toolName": "t", "input": {}}]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("tool-call"), "{err}");
}

#[test]
fn system_content_must_be_a_string() {
    assert!(serde_json::from_value::<PromptMessage>(json!({
        "role": "system",
        "content": [{"type": "text", "text": "x"}]
    }))
    .is_err());
}

#[test]
fn role_scoped_parts_convert_to_content_parts() {
    let user = ContentPart::from(UserPart::File {
        filename: Some("a.pdf".into()),
        data: DataContent::Bytes { bytes: vec![1, 2] },
        media_type: "application/pdf".into(),
        provider_options: None,
    });
    assert_eq!(user.tag(), "file");

    let assistant = ContentPart::from(AssistantPart::Reasoning {
        text: "hmm".into(),
        provider_options: None,
    });
    assert_eq!(assistant.tag(), "reasoning");
}

#[test]
fn tool_call_arguments_string_keeps_strings_verbatim() {
    let tc = crate::ai_sdk_types::v2::ToolCallPart::new("c", "t", json!("{\"a\":1}"));
    assert_eq!(tc.arguments_string(), "{\"a\":1}");
    let tc = crate::ai_sdk_types::v2::ToolCallPart::new("c", "t", json!({"a": 1}));
    assert_eq!(tc.arguments_string(), "{\"a\":1}");
}
