//! Field extraction shared by the stream parsers and response parsers.

use serde_json::Value;

use crate::ai_sdk_types::v2 as v2t;
use crate::provider_openrouter::parts::split_data_uri;

/// `id` / `model` / `created` (or `created_at`) of a response or chunk.
pub(crate) fn response_metadata(value: &Value) -> Option<v2t::ResponseMetadata> {
    let id = value.get("id").and_then(Value::as_str).map(str::to_string);
    let model_id = value.get("model").and_then(Value::as_str).map(str::to_string);
    let timestamp_ms = value
        .get("created")
        .or_else(|| value.get("created_at"))
        .and_then(Value::as_i64)
        .map(|secs| secs.saturating_mul(1000));
    if id.is_none() && model_id.is_none() && timestamp_ms.is_none() {
        return None;
    }
    Some(v2t::ResponseMetadata {
        id,
        timestamp_ms,
        model_id,
    })
}

/// A `url_citation` annotation, in either the nested chat shape
/// (`{type, url_citation: {url, title}}`) or the flat responses shape.
pub(crate) fn url_citation(annotation: &Value) -> Option<(String, Option<String>)> {
    if annotation.get("type").and_then(Value::as_str) != Some("url_citation") {
        return None;
    }
    let body = annotation.get("url_citation").unwrap_or(annotation);
    let url = body.get("url").and_then(Value::as_str)?.to_string();
    let title = body
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    Some((url, title))
}

/// Media type and payload of a generated image (`{image_url: {url}}`).
///
/// Data URIs are split; a remote URL is returned as-is.
pub(crate) fn image_file(image: &Value) -> Option<(String, String)> {
    let url = image
        .get("image_url")
        .and_then(|i| i.get("url").or(Some(i)))
        .and_then(Value::as_str)?;
    Some(match split_data_uri(url) {
        Some((media_type, payload)) => (media_type.to_string(), payload.to_string()),
        None => ("image/*".to_string(), url.to_string()),
    })
}

/// Readable text carried by reasoning detail entries
/// (`reasoning.text` and `reasoning.summary`; encrypted entries have none).
pub(crate) fn reasoning_text(details: &[Value]) -> String {
    details
        .iter()
        .filter_map(|d| match d.get("type").and_then(Value::as_str) {
            Some("reasoning.text") => d.get("text").and_then(Value::as_str),
            Some("reasoning.summary") => d.get("summary").and_then(Value::as_str),
            _ => None,
        })
        .collect()
}

pub(crate) fn new_source_id() -> String {
    format!("src-{}", uuid::Uuid::new_v4().simple())
}
