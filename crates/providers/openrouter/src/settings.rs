use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::ai_sdk_core::options::shallow_merge;
use crate::ai_sdk_core::SdkError;

/// Reasoning controls. `max_tokens` and `effort` are alternatives; when both
/// are set the token budget is sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReasoningSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,
    #[serde(default, alias = "maxTokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(flatten)]
    pub other: JsonMap<String, JsonValue>,
}

impl ReasoningSettings {
    pub fn to_body(&self) -> JsonValue {
        let mut body = JsonMap::new();
        if let Some(enabled) = self.enabled {
            body.insert("enabled".into(), enabled.into());
        }
        if let Some(exclude) = self.exclude {
            body.insert("exclude".into(), exclude.into());
        }
        match (self.max_tokens, self.effort.as_deref()) {
            (Some(max_tokens), _) => {
                body.insert("max_tokens".into(), max_tokens.into());
            }
            (None, Some(effort)) => {
                body.insert("effort".into(), effort.into());
            }
            (None, None) => {}
        }
        for (k, v) in &self.other {
            if !v.is_null() {
                body.insert(k.clone(), v.clone());
            }
        }
        JsonValue::Object(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<bool>,
}

/// A server-side augmentation such as `{"id": "web", "max_results": 3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub id: String,
    #[serde(flatten)]
    pub config: JsonMap<String, JsonValue>,
}

/// Upstream routing preferences, sent as the `provider` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderRouting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_fallbacks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_parameters: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_collection: Option<String>,
    #[serde(flatten)]
    pub other: JsonMap<String, JsonValue>,
}

/// Model settings for a router model.
///
/// Known fields are typed; any other key is kept in `other` and forwarded
/// to the request body unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenRouterModelSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<Plugin>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderRouting>,
    /// Fallback model list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// `true`/`false`, or a number requesting that many top logprobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    /// Deep-merged into the final body, after everything else.
    #[serde(
        default,
        rename = "extraBody",
        alias = "extra_body",
        skip_serializing_if = "Option::is_none"
    )]
    pub extra_body: Option<JsonMap<String, JsonValue>>,
    #[serde(flatten)]
    pub other: JsonMap<String, JsonValue>,
}

/// Spellings accepted for known keys, mapped to their canonical name.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("extra_body", "extraBody"),
    ("parallelToolCalls", "parallel_tool_calls"),
];

fn canonical_keys(map: &JsonMap<String, JsonValue>) -> JsonMap<String, JsonValue> {
    map.iter()
        .map(|(k, v)| {
            let key = KEY_ALIASES
                .iter()
                .find(|(alias, _)| alias == k)
                .map(|(_, canonical)| (*canonical).to_string())
                .unwrap_or_else(|| k.clone());
            (key, v.clone())
        })
        .collect()
}

impl OpenRouterModelSettings {
    /// Settings with call-time provider options shallow-merged over them: a
    /// call-time key replaces the model-level value wholesale.
    pub fn merged_with(
        &self,
        call_options: &JsonMap<String, JsonValue>,
        scope: &str,
    ) -> Result<Self, SdkError> {
        if call_options.is_empty() {
            return Ok(self.clone());
        }
        let mut base = match serde_json::to_value(self)? {
            JsonValue::Object(map) => map,
            _ => JsonMap::new(),
        };
        shallow_merge(&mut base, &canonical_keys(call_options));
        serde_json::from_value(JsonValue::Object(base)).map_err(|e| {
            SdkError::invalid_argument(format!("invalid {scope} provider options: {e}"))
        })
    }

    /// Whether extended usage accounting was requested.
    pub fn include_usage(&self) -> bool {
        self.usage
            .as_ref()
            .and_then(|u| u.include)
            .unwrap_or(false)
    }
}
