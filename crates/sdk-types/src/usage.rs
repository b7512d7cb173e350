//! Usage parsing for OpenAI-shaped usage objects.
//!
//! Both the chat-completions names (`prompt_tokens`, `completion_tokens`) and
//! the responses names (`input_tokens`, `output_tokens`) are understood. A
//! field the backend omitted stays `None`; nothing is defaulted to zero.

use crate::types::v2::{InputTokensDetails, OutputTokensDetails, Usage};
use serde_json::{Map, Value};

/// Top-level usage keys mapped onto the unified [`Usage`] fields.
pub const MODELED_USAGE_KEYS: &[&str] = &[
    "prompt_tokens",
    "input_tokens",
    "completion_tokens",
    "output_tokens",
    "total_tokens",
    "prompt_tokens_details",
    "input_tokens_details",
    "completion_tokens_details",
    "output_tokens_details",
    "cost",
    "is_byok",
];

fn u64_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_u64))
}

fn nested_u64(obj: &Map<String, Value>, parents: &[&str], key: &str) -> Option<u64> {
    parents
        .iter()
        .filter_map(|p| obj.get(*p).and_then(Value::as_object))
        .find_map(|details| details.get(key).and_then(Value::as_u64))
}

/// Parse an OpenAI-compatible usage object into [`Usage`].
///
/// Returns `None` when `u` is not a JSON object.
pub fn from_openai_compatible(u: &Value) -> Option<Usage> {
    let obj = u.as_object()?;
    let detail_parents_in = ["prompt_tokens_details", "input_tokens_details"];
    let detail_parents_out = ["completion_tokens_details", "output_tokens_details"];

    let cached_tokens = nested_u64(obj, &detail_parents_in, "cached_tokens");
    let cache_write_tokens = nested_u64(obj, &detail_parents_in, "cache_write_tokens")
        .or_else(|| nested_u64(obj, &detail_parents_in, "cache_creation_tokens"));
    let input_tokens_details = if cached_tokens.is_some() || cache_write_tokens.is_some() {
        Some(InputTokensDetails {
            cached_tokens,
            cache_write_tokens,
        })
    } else {
        None
    };

    let output_tokens_details = nested_u64(obj, &detail_parents_out, "reasoning_tokens")
        .map(|reasoning_tokens| OutputTokensDetails {
            reasoning_tokens: Some(reasoning_tokens),
        });

    Some(Usage {
        input_tokens: u64_field(obj, &["prompt_tokens", "input_tokens"]),
        output_tokens: u64_field(obj, &["completion_tokens", "output_tokens"]),
        total_tokens: u64_field(obj, &["total_tokens"]),
        input_tokens_details,
        output_tokens_details,
        cost_usd: obj.get("cost").and_then(Value::as_f64),
        is_byok: obj.get("is_byok").and_then(Value::as_bool),
        raw: Some(u.clone()),
    })
}

/// Keys present in `u` that [`from_openai_compatible`] does not model.
pub fn unmodeled_fields(u: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    if let Some(obj) = u.as_object() {
        for (k, v) in obj {
            if !MODELED_USAGE_KEYS.contains(&k.as_str()) {
                out.insert(k.clone(), v.clone());
            }
        }
    }
    out
}
