use serde_json::Value;

use crate::ai_sdk_types::usage::{from_openai_compatible, unmodeled_fields};
use crate::ai_sdk_types::v2 as v2t;

/// Normalize a backend usage object.
///
/// Modeled counters land on [`v2t::Usage`] (absent stays `None`). The raw
/// object, the serving upstream and every unmodeled key (`cost_details`,
/// `server_tool_use`, ...) go into provider metadata under `scope`.
pub fn normalize_usage(
    raw: &Value,
    upstream_provider: Option<&str>,
    scope: &str,
) -> (v2t::Usage, v2t::ProviderMetadata) {
    let mut metadata = v2t::ProviderMetadata::new();
    let Some(usage) = from_openai_compatible(raw) else {
        return (v2t::Usage::default(), metadata);
    };
    for (key, value) in unmodeled_fields(raw) {
        v2t::insert_provider_metadata(&mut metadata, scope, key, value);
    }
    v2t::insert_provider_metadata(&mut metadata, scope, "usage", raw.clone());
    if let Some(provider) = upstream_provider {
        v2t::insert_provider_metadata(&mut metadata, scope, "provider", Value::from(provider));
    }
    (usage, metadata)
}
