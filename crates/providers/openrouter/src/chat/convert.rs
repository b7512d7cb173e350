use serde_json::{json, Map, Value};
use tracing::debug;

use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::v2 as v2t;
use crate::ai_sdk_types::Role;
use crate::provider_openrouter::parts::{
    cache_control, part_to_backend, reasoning_details, BackendFragment, Dialect, PartContext,
};

fn misplaced(fragment: &BackendFragment, role: Role) -> SdkError {
    let kind = match fragment {
        BackendFragment::Content(_) => "content",
        BackendFragment::Reasoning { .. } => "reasoning",
        BackendFragment::ToolCall(_) => "tool call",
        BackendFragment::ToolOutput(_) => "tool output",
    };
    SdkError::invalid_argument(format!("{kind} is not valid in a {role} message"))
}

/// Convert a prompt to chat-completions `messages`.
///
/// A user message holding a single plain text part is sent as a string.
/// Assistant tool results (provider-executed tools) follow the assistant
/// message as `role: "tool"` messages, in their original order.
pub fn convert_chat_messages(prompt: &v2t::Prompt, scope: &str) -> Result<Vec<Value>, SdkError> {
    let mut messages: Vec<Value> = Vec::with_capacity(prompt.len());

    for message in prompt {
        match message {
            v2t::PromptMessage::System {
                content,
                provider_options,
            } => match cache_control(provider_options, scope) {
                Some(cc) => messages.push(json!({
                    "role": "system",
                    "content": [{ "type": "text", "text": content, "cache_control": cc }],
                })),
                None => messages.push(json!({ "role": "system", "content": content })),
            },
            v2t::PromptMessage::User {
                content,
                provider_options,
            } => {
                let message_cc = cache_control(provider_options, scope);
                if let [v2t::UserPart::Text {
                    text,
                    provider_options: part_options,
                }] = content.as_slice()
                {
                    if message_cc.is_none() && cache_control(part_options, scope).is_none() {
                        messages.push(json!({ "role": "user", "content": text }));
                        continue;
                    }
                }
                let last_text = content
                    .iter()
                    .rposition(|p| matches!(p, v2t::UserPart::Text { .. }));
                let mut parts = Vec::with_capacity(content.len());
                for (i, part) in content.iter().enumerate() {
                    let ctx = PartContext::new(Dialect::Chat, Role::User, scope)
                        .with_cache_control(message_cc.filter(|_| Some(i) == last_text));
                    let unified: v2t::ContentPart = part.clone().into();
                    for fragment in part_to_backend(&unified, &ctx) {
                        match fragment {
                            BackendFragment::Content(v) => parts.push(v),
                            other => return Err(misplaced(&other, Role::User)),
                        }
                    }
                }
                messages.push(json!({ "role": "user", "content": parts }));
            }
            v2t::PromptMessage::Assistant {
                content,
                provider_options,
            } => {
                let (assistant, tool_messages) =
                    convert_assistant(content, provider_options, scope)?;
                messages.extend(assistant);
                messages.extend(tool_messages);
            }
            v2t::PromptMessage::Tool { content, .. } => {
                for part in content {
                    match part {
                        v2t::ToolMessagePart::ToolResult(result) => {
                            let ctx = PartContext::new(Dialect::Chat, Role::Tool, scope);
                            let part = v2t::ContentPart::ToolResult(result.clone());
                            for fragment in part_to_backend(&part, &ctx) {
                                match fragment {
                                    BackendFragment::ToolOutput(v) => messages.push(v),
                                    other => return Err(misplaced(&other, Role::Tool)),
                                }
                            }
                        }
                        v2t::ToolMessagePart::ToolApprovalResponse(approval) => {
                            debug!(
                                target: "ai_sdk::openrouter",
                                approval_id = %approval.approval_id,
                                "tool approval responses are not forwarded"
                            );
                        }
                    }
                }
            }
        }
    }

    Ok(messages)
}

fn convert_assistant(
    content: &[v2t::AssistantPart],
    provider_options: &Option<v2t::ProviderOptions>,
    scope: &str,
) -> Result<(Option<Value>, Vec<Value>), SdkError> {
    let message_cc = cache_control(provider_options, scope);
    let last_text = content
        .iter()
        .rposition(|p| matches!(p, v2t::AssistantPart::Text { .. }));

    let mut text = String::new();
    let mut content_parts: Vec<Value> = vec![];
    let mut structured = false;
    let mut reasoning = String::new();
    let mut part_details: Vec<Value> = vec![];
    let mut tool_calls: Vec<Value> = vec![];
    let mut tool_messages: Vec<Value> = vec![];

    for (i, part) in content.iter().enumerate() {
        let ctx = PartContext::new(Dialect::Chat, Role::Assistant, scope)
            .with_cache_control(message_cc.filter(|_| Some(i) == last_text));
        let unified: v2t::ContentPart = part.clone().into();
        for fragment in part_to_backend(&unified, &ctx) {
            match fragment {
                BackendFragment::Content(v) => {
                    match v.get("type").and_then(Value::as_str) {
                        Some("text") => {
                            if let Some(t) = v.get("text").and_then(Value::as_str) {
                                text.push_str(t);
                            }
                            structured |= v.get("cache_control").is_some();
                        }
                        _ => structured = true,
                    }
                    content_parts.push(v);
                }
                BackendFragment::Reasoning { text: r, details } => {
                    reasoning.push_str(&r);
                    part_details.extend(details);
                }
                BackendFragment::ToolCall(v) => tool_calls.push(v),
                BackendFragment::ToolOutput(v) => tool_messages.push(v),
            }
        }
    }

    let message_details = reasoning_details(provider_options, scope);
    let details = if message_details.is_empty() {
        part_details
    } else {
        message_details
    };

    if content_parts.is_empty() && tool_calls.is_empty() && reasoning.is_empty() && details.is_empty()
    {
        return Ok((None, tool_messages));
    }

    let mut msg = Map::new();
    msg.insert("role".into(), json!("assistant"));
    msg.insert(
        "content".into(),
        if structured {
            Value::Array(content_parts)
        } else {
            Value::String(text)
        },
    );
    if !tool_calls.is_empty() {
        msg.insert("tool_calls".into(), Value::Array(tool_calls));
    }
    if !reasoning.is_empty() {
        msg.insert("reasoning".into(), Value::String(reasoning));
    }
    if !details.is_empty() {
        msg.insert("reasoning_details".into(), Value::Array(details));
    }
    Ok((Some(Value::Object(msg)), tool_messages))
}
