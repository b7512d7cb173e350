use serde_json::{json, Value};
use tracing::debug;

use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::v2 as v2t;
use crate::ai_sdk_types::Role;
use crate::provider_openrouter::parts::{
    cache_control, part_to_backend, BackendFragment, Dialect, PartContext,
};

/// Convert a prompt to responses-API input items.
///
/// An assistant message expands to one assistant message holding its text
/// and reasoning (emitted first, when non-empty) followed by its
/// `function_call` / `function_call_output` items in input order.
pub fn convert_responses_input(
    prompt: &v2t::Prompt,
    scope: &str,
) -> Result<Vec<Value>, SdkError> {
    let mut items: Vec<Value> = Vec::with_capacity(prompt.len());

    for message in prompt {
        match message {
            v2t::PromptMessage::System {
                content,
                provider_options,
            } => match cache_control(provider_options, scope) {
                Some(cc) => items.push(json!({
                    "role": "system",
                    "content": [{ "type": "input_text", "text": content, "cache_control": cc }],
                })),
                None => items.push(json!({ "role": "system", "content": content })),
            },
            v2t::PromptMessage::User {
                content,
                provider_options,
            } => {
                let message_cc = cache_control(provider_options, scope);
                let last_text = content
                    .iter()
                    .rposition(|p| matches!(p, v2t::UserPart::Text { .. }));
                let mut parts = Vec::with_capacity(content.len());
                for (i, part) in content.iter().enumerate() {
                    let ctx = PartContext::new(Dialect::Responses, Role::User, scope)
                        .with_cache_control(message_cc.filter(|_| Some(i) == last_text));
                    let unified: v2t::ContentPart = part.clone().into();
                    for fragment in part_to_backend(&unified, &ctx) {
                        match fragment {
                            BackendFragment::Content(v) => parts.push(v),
                            _ => {
                                return Err(SdkError::invalid_argument(format!(
                                    "{} part is not valid in a user message",
                                    unified.tag()
                                )))
                            }
                        }
                    }
                }
                items.push(json!({ "role": "user", "content": parts }));
            }
            v2t::PromptMessage::Assistant {
                content,
                provider_options,
            } => {
                let message_cc = cache_control(provider_options, scope);
                let last_text = content
                    .iter()
                    .rposition(|p| matches!(p, v2t::AssistantPart::Text { .. }));
                let mut output: Vec<Value> = vec![];
                let mut calls: Vec<Value> = vec![];
                for (i, part) in content.iter().enumerate() {
                    let ctx = PartContext::new(Dialect::Responses, Role::Assistant, scope)
                        .with_cache_control(message_cc.filter(|_| Some(i) == last_text));
                    let unified: v2t::ContentPart = part.clone().into();
                    for fragment in part_to_backend(&unified, &ctx) {
                        match fragment {
                            BackendFragment::Content(v)
                                if v.get("type").and_then(Value::as_str)
                                    == Some("output_text") =>
                            {
                                output.push(v)
                            }
                            BackendFragment::Content(_) => {
                                return Err(SdkError::invalid_argument(format!(
                                    "{} part is not supported in assistant messages of the responses dialect",
                                    unified.tag()
                                )))
                            }
                            BackendFragment::Reasoning { text, .. } => {
                                if !text.is_empty() {
                                    output.push(json!({ "type": "output_text", "text": text }));
                                }
                            }
                            BackendFragment::ToolCall(v) | BackendFragment::ToolOutput(v) => {
                                calls.push(v)
                            }
                        }
                    }
                }
                if !output.is_empty() {
                    items.push(json!({ "role": "assistant", "content": output }));
                }
                items.extend(calls);
            }
            v2t::PromptMessage::Tool { content, .. } => {
                for part in content {
                    match part {
                        v2t::ToolMessagePart::ToolResult(result) => {
                            let ctx = PartContext::new(Dialect::Responses, Role::Tool, scope);
                            let unified = v2t::ContentPart::ToolResult(result.clone());
                            items.extend(part_to_backend(&unified, &ctx).into_iter().filter_map(
                                |fragment| match fragment {
                                    BackendFragment::ToolOutput(v) => Some(v),
                                    _ => None,
                                },
                            ));
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

    Ok(items)
}
