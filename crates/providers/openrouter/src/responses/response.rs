use serde_json::Value;

use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::v2 as v2t;
use crate::provider_openrouter::chat::response::{
    tool_call_content, usage_and_metadata, ParsedResponse,
};
use crate::provider_openrouter::error::error_from_body;
use crate::provider_openrouter::extract::{new_source_id, response_metadata, url_citation};
use crate::provider_openrouter::finish_reason::map_responses_finish_reason;

/// Parse a `response` object returned by `POST /responses`.
pub fn parse_responses_response(body: &Value, scope: &str) -> Result<ParsedResponse, SdkError> {
    if body.get("error").is_some_and(|e| !e.is_null()) {
        return Err(error_from_body(body));
    }
    let output = body
        .get("output")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| SdkError::NoContent {
            message: "response contained no output items".into(),
        })?;

    let mut content: Vec<v2t::Content> = Vec::new();
    let mut has_function_calls = false;
    for item in output {
        match item.get("type").and_then(Value::as_str) {
            Some("message") => {
                let parts = item.get("content").and_then(Value::as_array);
                for part in parts.into_iter().flatten() {
                    if part.get("type").and_then(Value::as_str) != Some("output_text") {
                        continue;
                    }
                    let text = part.get("text").and_then(Value::as_str).unwrap_or_default();
                    if !text.is_empty() {
                        content.push(v2t::Content::Text {
                            text: text.to_string(),
                            provider_metadata: None,
                        });
                    }
                    let annotations = part.get("annotations").and_then(Value::as_array);
                    content.extend(annotations.into_iter().flatten().filter_map(url_citation).map(
                        |(url, title)| v2t::Content::SourceUrl {
                            id: new_source_id(),
                            url,
                            title,
                            provider_metadata: None,
                        },
                    ));
                }
            }
            Some("reasoning") => {
                let text = item
                    .get("summary")
                    .and_then(Value::as_array)
                    .map(|parts| {
                        parts
                            .iter()
                            .filter_map(|p| p.get("text").and_then(Value::as_str))
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                    .unwrap_or_default();
                let mut metadata = v2t::ProviderMetadata::new();
                v2t::insert_provider_metadata(
                    &mut metadata,
                    scope,
                    "reasoning_details",
                    Value::Array(vec![item.clone()]),
                );
                content.push(v2t::Content::Reasoning {
                    text,
                    provider_metadata: Some(metadata),
                });
            }
            Some("function_call") => {
                has_function_calls = true;
                let str_of = |key: &str| item.get(key).and_then(Value::as_str).unwrap_or_default();
                content.push(tool_call_content(
                    str_of("call_id"),
                    str_of("name"),
                    str_of("arguments"),
                )?);
            }
            _ => {}
        }
    }

    let finish_reason = map_responses_finish_reason(
        body.get("status").and_then(Value::as_str),
        body.get("incomplete_details")
            .and_then(|d| d.get("reason"))
            .and_then(Value::as_str),
        has_function_calls,
    );
    let (usage, provider_metadata) = usage_and_metadata(body, scope);
    Ok(ParsedResponse {
        content,
        finish_reason,
        usage,
        provider_metadata,
        response: response_metadata(body),
    })
}
