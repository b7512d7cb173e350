use serde_json::Value;

use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::json::parse_tool_arguments;
use crate::ai_sdk_types::v2 as v2t;
use crate::provider_openrouter::error::error_from_body;
use crate::provider_openrouter::extract::{
    image_file, new_source_id, reasoning_text, response_metadata, url_citation,
};
use crate::provider_openrouter::finish_reason::map_finish_reason;
use crate::provider_openrouter::usage::normalize_usage;

/// A complete (non-streamed) response in unified form.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub content: Vec<v2t::Content>,
    pub finish_reason: v2t::FinishReason,
    pub usage: v2t::Usage,
    pub provider_metadata: Option<v2t::ProviderMetadata>,
    pub response: Option<v2t::ResponseMetadata>,
}

/// Usage and upstream-provider metadata common to both dialects.
pub(crate) fn usage_and_metadata(
    body: &Value,
    scope: &str,
) -> (v2t::Usage, Option<v2t::ProviderMetadata>) {
    let provider = body.get("provider").and_then(Value::as_str);
    match body.get("usage").filter(|u| u.is_object()) {
        Some(raw) => {
            let (usage, metadata) = normalize_usage(raw, provider, scope);
            (usage, Some(metadata))
        }
        None => {
            let metadata = provider.map(|p| {
                let mut md = v2t::ProviderMetadata::new();
                v2t::insert_provider_metadata(&mut md, scope, "provider", Value::from(p));
                md
            });
            (v2t::Usage::default(), metadata)
        }
    }
}

pub(crate) fn tool_call_content(
    id: &str,
    name: &str,
    arguments: &str,
) -> Result<v2t::Content, SdkError> {
    let input = parse_tool_arguments(arguments).map_err(|e| {
        SdkError::decode(format!("invalid arguments for tool call {name}: {e}"), arguments)
    })?;
    Ok(v2t::Content::ToolCall(v2t::ToolCallPart::new(id, name, input)))
}

/// Parse a `chat.completion` body.
///
/// An error envelope is classified; a body without choices is `NoContent`.
pub fn parse_chat_response(body: &Value, scope: &str) -> Result<ParsedResponse, SdkError> {
    if body.get("error").is_some_and(|e| !e.is_null()) {
        return Err(error_from_body(body));
    }
    let choice = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .ok_or_else(|| SdkError::NoContent {
            message: "response contained no choices".into(),
        })?;
    let message = choice.get("message").unwrap_or(&Value::Null);

    let mut content: Vec<v2t::Content> = Vec::new();
    let details: Vec<Value> = message
        .get("reasoning_details")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let reasoning = match message.get("reasoning").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => reasoning_text(&details),
    };
    if !reasoning.is_empty() || !details.is_empty() {
        let provider_metadata = (!details.is_empty()).then(|| {
            let mut md = v2t::ProviderMetadata::new();
            v2t::insert_provider_metadata(&mut md, scope, "reasoning_details", Value::Array(details));
            md
        });
        content.push(v2t::Content::Reasoning {
            text: reasoning,
            provider_metadata,
        });
    }

    if let Some(text) = message.get("content").and_then(Value::as_str) {
        if !text.is_empty() {
            content.push(v2t::Content::Text {
                text: text.to_string(),
                provider_metadata: None,
            });
        }
    }

    if let Some(calls) = message.get("tool_calls").and_then(Value::as_array) {
        for call in calls {
            let function = call.get("function");
            let id = call
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple()));
            let name = function
                .and_then(|f| f.get("name"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let arguments = function
                .and_then(|f| f.get("arguments"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            content.push(tool_call_content(&id, name, arguments)?);
        }
    }

    if let Some(images) = message.get("images").and_then(Value::as_array) {
        content.extend(images.iter().filter_map(image_file).map(|(media_type, data)| {
            v2t::Content::File { media_type, data }
        }));
    }

    if let Some(annotations) = message.get("annotations").and_then(Value::as_array) {
        content.extend(annotations.iter().filter_map(url_citation).map(|(url, title)| {
            v2t::Content::SourceUrl {
                id: new_source_id(),
                url,
                title,
                provider_metadata: None,
            }
        }));
    }

    let finish_reason =
        map_finish_reason(choice.get("finish_reason").and_then(Value::as_str));
    let (usage, provider_metadata) = usage_and_metadata(body, scope);
    Ok(ParsedResponse {
        content,
        finish_reason,
        usage,
        provider_metadata,
        response: response_metadata(body),
    })
}
