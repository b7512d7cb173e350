//! Content-part converters.
//!
//! [`part_to_backend`] and [`backend_to_part`] are total over the five
//! unified part tags; the dialect only changes the wire shape.

use base64::Engine;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::json::parse_tool_arguments;
use crate::ai_sdk_types::v2 as v2t;
use crate::ai_sdk_types::Role;

/// Backend wire dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `POST /chat/completions`
    Chat,
    /// `POST /responses`
    Responses,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Chat => "chat",
            Dialect::Responses => "responses",
        }
    }

    pub fn endpoint_path(&self) -> &'static str {
        match self {
            Dialect::Chat => "/chat/completions",
            Dialect::Responses => "/responses",
        }
    }
}

/// Where a part is being converted.
#[derive(Debug, Clone, Copy)]
pub struct PartContext<'a> {
    pub dialect: Dialect,
    /// Role of the message that carried the part.
    pub role: Role,
    /// Provider-options scope (`openrouter`, `llmgateway`, ...).
    pub scope: &'a str,
    /// Message-level cache control, set by the message converter only for
    /// the part that should carry it.
    pub cache_control: Option<&'a Value>,
}

impl<'a> PartContext<'a> {
    pub fn new(dialect: Dialect, role: Role, scope: &'a str) -> Self {
        Self {
            dialect,
            role,
            scope,
            cache_control: None,
        }
    }

    pub fn with_cache_control(mut self, cache_control: Option<&'a Value>) -> Self {
        self.cache_control = cache_control;
        self
    }
}

/// One backend-side fragment produced from a unified part.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendFragment {
    /// Entry of a message `content` array.
    Content(Value),
    /// Reasoning text plus structured details. Chat messages carry it in
    /// `reasoning`/`reasoning_details`; responses input renders it as text.
    Reasoning { text: String, details: Vec<Value> },
    /// Chat `tool_calls[]` entry or responses `function_call` item.
    ToolCall(Value),
    /// Chat `role: "tool"` message or responses `function_call_output` item.
    ToolOutput(Value),
}

/// Cache-control annotation under `scope` (`cacheControl` or `cache_control`).
pub fn cache_control<'a>(
    options: &'a Option<v2t::ProviderOptions>,
    scope: &str,
) -> Option<&'a Value> {
    v2t::provider_option(options, scope, "cacheControl")
        .or_else(|| v2t::provider_option(options, scope, "cache_control"))
        .filter(|v| !v.is_null())
}

/// Reasoning details previously returned by the backend, replayed verbatim.
pub fn reasoning_details(options: &Option<v2t::ProviderOptions>, scope: &str) -> Vec<Value> {
    v2t::provider_option(options, scope, "reasoning_details")
        .or_else(|| v2t::provider_option(options, scope, "reasoningDetails"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn is_url_like(s: &str) -> bool {
    let lower = s.trim_start().get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
}

fn is_remote_url(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// URL or data URI for a file payload.
///
/// URLs and strings already shaped as `http(s)://` or `data:` pass through;
/// bytes and bare strings (assumed base64) are wrapped as a data URI.
pub fn file_data_url(data: &v2t::DataContent, media_type: &str) -> String {
    let media_type = if media_type == "image/*" {
        "image/jpeg"
    } else {
        media_type
    };
    match data {
        v2t::DataContent::Url { url } => url.clone(),
        v2t::DataContent::Base64 { base64 } if is_url_like(base64) => base64.clone(),
        v2t::DataContent::Base64 { base64 } => format!("data:{media_type};base64,{base64}"),
        v2t::DataContent::Bytes { bytes } => format!(
            "data:{media_type};base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        ),
    }
}

/// Split `data:<media>;base64,<payload>` into its media type and payload.
pub fn split_data_uri(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let media_type = header.strip_suffix(";base64")?;
    Some((media_type, payload))
}

fn data_from_url(url: &str, fallback_media_type: &str) -> (v2t::DataContent, String) {
    match split_data_uri(url) {
        Some((media_type, payload)) => (
            v2t::DataContent::Base64 {
                base64: payload.to_string(),
            },
            if media_type.is_empty() {
                fallback_media_type.to_string()
            } else {
                media_type.to_string()
            },
        ),
        None => (
            v2t::DataContent::Url {
                url: url.to_string(),
            },
            fallback_media_type.to_string(),
        ),
    }
}

/// Wire string for a tool result plus whether it reports an error.
///
/// `Content` results keep only their text entries, joined by newlines.
pub fn tool_output_text(output: &v2t::ToolResultOutput) -> (String, bool) {
    match output {
        v2t::ToolResultOutput::Text { value } => (value.clone(), false),
        v2t::ToolResultOutput::Json { value } => (value.to_string(), false),
        v2t::ToolResultOutput::ErrorText { value } => (value.clone(), true),
        v2t::ToolResultOutput::ErrorJson { value } => (value.to_string(), true),
        v2t::ToolResultOutput::ExecutionDenied { reason } => {
            let text = match reason.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
                Some(reason) => format!("Tool execution denied: {reason}"),
                None => "Tool execution denied.".to_string(),
            };
            (text, true)
        }
        v2t::ToolResultOutput::Content { value } => {
            let mut dropped = 0usize;
            let texts: Vec<&str> = value
                .iter()
                .filter_map(|item| match item {
                    v2t::ToolResultInlineContent::Text { text } => Some(text.as_str()),
                    v2t::ToolResultInlineContent::Media { .. } => {
                        dropped += 1;
                        None
                    }
                })
                .collect();
            if dropped > 0 {
                debug!(
                    target: "ai_sdk::openrouter",
                    dropped,
                    "tool result media entries are not forwarded"
                );
            }
            (texts.join("\n"), false)
        }
    }
}

fn with_cache_control(mut fragment: Value, cache_control: Option<&Value>) -> Value {
    if let (Some(cc), Some(obj)) = (cache_control, fragment.as_object_mut()) {
        obj.insert("cache_control".into(), cc.clone());
    }
    fragment
}

/// Convert one unified part into backend fragments.
pub fn part_to_backend(part: &v2t::ContentPart, ctx: &PartContext<'_>) -> Vec<BackendFragment> {
    let cc = cache_control(part.provider_options(), ctx.scope).or(ctx.cache_control);
    match part {
        v2t::ContentPart::Text { text, .. } => {
            let kind = match (ctx.dialect, ctx.role) {
                (Dialect::Chat, _) => "text",
                (Dialect::Responses, Role::Assistant) => "output_text",
                (Dialect::Responses, _) => "input_text",
            };
            vec![BackendFragment::Content(with_cache_control(
                json!({ "type": kind, "text": text }),
                cc,
            ))]
        }
        v2t::ContentPart::File {
            filename,
            data,
            media_type,
            ..
        } => {
            let url = file_data_url(data, media_type);
            let is_image = media_type.to_ascii_lowercase().starts_with("image/");
            let fragment = match (ctx.dialect, is_image) {
                (Dialect::Chat, true) => json!({
                    "type": "image_url",
                    "image_url": { "url": url, "detail": "auto" },
                }),
                (Dialect::Responses, true) => json!({
                    "type": "input_image",
                    "image_url": url,
                    "detail": "auto",
                }),
                (Dialect::Chat, false) => json!({
                    "type": "file",
                    "file": {
                        "filename": filename.as_deref().unwrap_or("file"),
                        "file_data": url,
                    },
                }),
                (Dialect::Responses, false) => {
                    let mut obj = Map::new();
                    obj.insert("type".into(), json!("input_file"));
                    obj.insert(
                        "filename".into(),
                        json!(filename.as_deref().unwrap_or("file")),
                    );
                    let key = if is_remote_url(&url) {
                        "file_url"
                    } else {
                        "file_data"
                    };
                    obj.insert(key.into(), Value::String(url));
                    Value::Object(obj)
                }
            };
            vec![BackendFragment::Content(with_cache_control(fragment, cc))]
        }
        v2t::ContentPart::Reasoning {
            text,
            provider_options,
        } => vec![BackendFragment::Reasoning {
            text: text.clone(),
            details: reasoning_details(provider_options, ctx.scope),
        }],
        v2t::ContentPart::ToolCall(call) => {
            let fragment = match ctx.dialect {
                Dialect::Chat => json!({
                    "id": call.tool_call_id,
                    "type": "function",
                    "function": {
                        "name": call.tool_name,
                        "arguments": call.arguments_string(),
                    },
                }),
                Dialect::Responses => json!({
                    "type": "function_call",
                    "call_id": call.tool_call_id,
                    "name": call.tool_name,
                    "arguments": call.arguments_string(),
                }),
            };
            vec![BackendFragment::ToolCall(fragment)]
        }
        v2t::ContentPart::ToolResult(result) => {
            let (output, is_error) = tool_output_text(&result.output);
            let fragment = match ctx.dialect {
                Dialect::Chat => json!({
                    "role": "tool",
                    "tool_call_id": result.tool_call_id,
                    "content": output,
                }),
                Dialect::Responses => {
                    let mut item = json!({
                        "type": "function_call_output",
                        "call_id": result.tool_call_id,
                        "output": output,
                    });
                    if is_error {
                        item["status"] = json!("incomplete");
                    }
                    item
                }
            };
            vec![BackendFragment::ToolOutput(fragment)]
        }
    }
}

fn str_at<'v>(value: &'v Value, path: &[&str]) -> Option<&'v str> {
    path.iter()
        .try_fold(value, |v, key| v.get(*key))
        .and_then(Value::as_str)
}

fn scoped(scope: &str, key: &str, value: Value) -> Option<v2t::ProviderOptions> {
    let mut options = v2t::ProviderOptions::new();
    options
        .entry(scope.to_string())
        .or_default()
        .insert(key.to_string(), value);
    Some(options)
}

/// Convert a backend fragment back into a unified part.
///
/// Optional fields the wire does not carry (tool names on outputs, file
/// names on images) come back empty; the part tag is always preserved.
pub fn backend_to_part(
    fragment: &BackendFragment,
    ctx: &PartContext<'_>,
) -> Result<v2t::ContentPart, SdkError> {
    match fragment {
        BackendFragment::Content(value) => {
            let kind = str_at(value, &["type"]).unwrap_or_default();
            let cache = value
                .get("cache_control")
                .and_then(|cc| scoped(ctx.scope, "cacheControl", cc.clone()));
            match kind {
                "text" | "input_text" | "output_text" => Ok(v2t::ContentPart::Text {
                    text: str_at(value, &["text"]).unwrap_or_default().to_string(),
                    provider_options: cache,
                }),
                "image_url" | "input_image" => {
                    let url = str_at(value, &["image_url", "url"])
                        .or_else(|| str_at(value, &["image_url"]))
                        .ok_or_else(|| {
                            SdkError::invalid_argument(format!("{kind} fragment has no url"))
                        })?;
                    let (data, media_type) = data_from_url(url, "image/*");
                    Ok(v2t::ContentPart::File {
                        filename: None,
                        data,
                        media_type,
                        provider_options: cache,
                    })
                }
                "file" | "input_file" => {
                    let (filename, url) = if kind == "file" {
                        (
                            str_at(value, &["file", "filename"]),
                            str_at(value, &["file", "file_data"]),
                        )
                    } else {
                        (
                            str_at(value, &["filename"]),
                            str_at(value, &["file_data"]).or_else(|| str_at(value, &["file_url"])),
                        )
                    };
                    let url = url.ok_or_else(|| {
                        SdkError::invalid_argument(format!("{kind} fragment has no data"))
                    })?;
                    let (data, media_type) = data_from_url(url, "application/octet-stream");
                    Ok(v2t::ContentPart::File {
                        filename: filename.map(str::to_string),
                        data,
                        media_type,
                        provider_options: cache,
                    })
                }
                other => Err(SdkError::invalid_argument(format!(
                    "unsupported {} content fragment type {other:?}",
                    ctx.dialect.as_str()
                ))),
            }
        }
        BackendFragment::Reasoning { text, details } => Ok(v2t::ContentPart::Reasoning {
            text: text.clone(),
            provider_options: if details.is_empty() {
                None
            } else {
                scoped(ctx.scope, "reasoning_details", Value::Array(details.clone()))
            },
        }),
        BackendFragment::ToolCall(value) => {
            let (id, name, arguments) = match ctx.dialect {
                Dialect::Chat => (
                    str_at(value, &["id"]),
                    str_at(value, &["function", "name"]),
                    str_at(value, &["function", "arguments"]),
                ),
                Dialect::Responses => (
                    str_at(value, &["call_id"]),
                    str_at(value, &["name"]),
                    str_at(value, &["arguments"]),
                ),
            };
            let arguments = arguments.unwrap_or_default();
            let input = parse_tool_arguments(arguments)
                .unwrap_or_else(|_| Value::String(arguments.to_string()));
            Ok(v2t::ContentPart::ToolCall(v2t::ToolCallPart::new(
                id.unwrap_or_default(),
                name.unwrap_or_default(),
                input,
            )))
        }
        BackendFragment::ToolOutput(value) => {
            let (id, output) = match ctx.dialect {
                Dialect::Chat => (str_at(value, &["tool_call_id"]), str_at(value, &["content"])),
                Dialect::Responses => (str_at(value, &["call_id"]), str_at(value, &["output"])),
            };
            let output = output.unwrap_or_default().to_string();
            let output = if str_at(value, &["status"]) == Some("incomplete") {
                v2t::ToolResultOutput::ErrorText { value: output }
            } else {
                v2t::ToolResultOutput::Text { value: output }
            };
            Ok(v2t::ContentPart::ToolResult(v2t::ToolResultPart {
                tool_call_id: id.unwrap_or_default().to_string(),
                tool_name: String::new(),
                output,
                provider_options: None,
            }))
        }
    }
}
