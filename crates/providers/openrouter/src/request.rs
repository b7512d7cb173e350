//! Request body builder.
//!
//! Model settings and call-time provider options are shallow-merged, the
//! prompt is converted for the dialect, and fields are written in a fixed
//! order: model and input, sampling, tools, output format, router fields,
//! unknown pass-through keys, streaming flags, then `extraBody`.

use serde_json::{json, Map, Value};

use crate::ai_sdk_core::options::{deep_merge, scoped_options};
use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_provider::Compatibility;
use crate::ai_sdk_types::v2 as v2t;
use crate::provider_openrouter::chat::convert::convert_chat_messages;
use crate::provider_openrouter::parts::Dialect;
use crate::provider_openrouter::prepare_tools::prepare_tools;
use crate::provider_openrouter::responses::convert::convert_responses_input;
use crate::provider_openrouter::settings::OpenRouterModelSettings;

#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Provider-options scope read from the call and messages.
    pub scope: &'a str,
    pub dialect: Dialect,
    pub compatibility: Compatibility,
    pub stream: bool,
}

#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub body: Value,
    pub warnings: Vec<v2t::CallWarning>,
}

fn unsupported(setting: &str, dialect: Dialect) -> v2t::CallWarning {
    v2t::CallWarning::UnsupportedSetting {
        setting: setting.to_string(),
        details: Some(format!(
            "{setting} is not supported by the {} dialect",
            dialect.as_str()
        )),
    }
}

fn insert_opt<T: Into<Value>>(body: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(v) = value {
        body.insert(key.to_string(), v.into());
    }
}

fn sampling_fields(
    body: &mut Map<String, Value>,
    call: &v2t::CallOptions,
    dialect: Dialect,
    warnings: &mut Vec<v2t::CallWarning>,
) {
    let stop = call
        .stop_sequences
        .as_ref()
        .filter(|s| !s.is_empty())
        .cloned();
    match dialect {
        Dialect::Chat => {
            insert_opt(body, "max_tokens", call.max_output_tokens);
            insert_opt(body, "temperature", call.temperature);
            insert_opt(body, "top_p", call.top_p);
            insert_opt(body, "top_k", call.top_k);
            insert_opt(body, "frequency_penalty", call.frequency_penalty);
            insert_opt(body, "presence_penalty", call.presence_penalty);
            insert_opt(body, "seed", call.seed);
            insert_opt(body, "stop", stop);
        }
        Dialect::Responses => {
            insert_opt(body, "max_output_tokens", call.max_output_tokens);
            insert_opt(body, "temperature", call.temperature);
            insert_opt(body, "top_p", call.top_p);
            let dropped = [
                ("topK", call.top_k.is_some()),
                ("seed", call.seed.is_some()),
                ("frequencyPenalty", call.frequency_penalty.is_some()),
                ("presencePenalty", call.presence_penalty.is_some()),
                ("stopSequences", stop.is_some()),
            ];
            for (setting, present) in dropped {
                if present {
                    warnings.push(unsupported(setting, dialect));
                }
            }
        }
    }
}

fn response_format(format: &v2t::ResponseFormat, dialect: Dialect) -> Option<(&'static str, Value)> {
    let v2t::ResponseFormat::Json {
        schema,
        name,
        description,
    } = format
    else {
        return None;
    };
    let json_schema = match schema {
        Some(schema) => {
            let mut json_schema = Map::new();
            json_schema.insert("name".into(), json!(name.as_deref().unwrap_or("response")));
            if let Some(description) = description {
                json_schema.insert("description".into(), json!(description));
            }
            json_schema.insert("schema".into(), schema.clone());
            json_schema.insert("strict".into(), json!(true));
            Some(json_schema)
        }
        None => None,
    };
    match (dialect, json_schema) {
        (Dialect::Chat, Some(json_schema)) => Some((
            "response_format",
            json!({ "type": "json_schema", "json_schema": Value::Object(json_schema) }),
        )),
        (Dialect::Chat, None) => Some(("response_format", json!({ "type": "json_object" }))),
        (Dialect::Responses, Some(mut json_schema)) => {
            let mut format = Map::new();
            format.insert("type".into(), json!("json_schema"));
            format.append(&mut json_schema);
            Some(("text", json!({ "format": Value::Object(format) })))
        }
        (Dialect::Responses, None) => {
            Some(("text", json!({ "format": { "type": "json_object" } })))
        }
    }
}

fn router_fields(
    body: &mut Map<String, Value>,
    settings: &OpenRouterModelSettings,
    dialect: Dialect,
    warnings: &mut Vec<v2t::CallWarning>,
) -> Result<(), SdkError> {
    if let Some(reasoning) = &settings.reasoning {
        let reasoning = reasoning.to_body();
        if reasoning.as_object().is_some_and(|o| !o.is_empty()) {
            body.insert("reasoning".into(), reasoning);
        }
    }
    if let Some(plugins) = settings.plugins.as_ref().filter(|p| !p.is_empty()) {
        body.insert("plugins".into(), serde_json::to_value(plugins)?);
    }
    if let Some(provider) = &settings.provider {
        body.insert("provider".into(), serde_json::to_value(provider)?);
    }
    insert_opt(body, "user", settings.user.clone());
    if let Some(models) = settings.models.as_ref().filter(|m| !m.is_empty()) {
        body.insert("models".into(), json!(models));
    }
    match (&settings.logprobs, dialect) {
        (None, _) | (Some(Value::Null), _) => {}
        (Some(Value::Number(n)), Dialect::Chat) => {
            body.insert("logprobs".into(), json!(true));
            body.insert("top_logprobs".into(), Value::Number(n.clone()));
        }
        (Some(other), Dialect::Chat) => {
            body.insert("logprobs".into(), other.clone());
        }
        (Some(_), Dialect::Responses) => warnings.push(unsupported("logprobs", dialect)),
    }
    insert_opt(body, "parallel_tool_calls", settings.parallel_tool_calls);
    Ok(())
}

/// Build the backend request body for one call.
///
/// Nothing is inserted for an absent value, so the body never carries nulls
/// of its own making.
pub fn build_request_body(
    model_id: &str,
    model_settings: &OpenRouterModelSettings,
    call: &v2t::CallOptions,
    ctx: &RequestContext<'_>,
) -> Result<PreparedRequest, SdkError> {
    let settings =
        model_settings.merged_with(&scoped_options(&call.provider_options, ctx.scope), ctx.scope)?;
    let mut warnings: Vec<v2t::CallWarning> = vec![];
    let mut body = Map::new();

    body.insert("model".into(), json!(model_id));
    let messages = match ctx.dialect {
        Dialect::Chat => convert_chat_messages(&call.prompt, ctx.scope)?,
        Dialect::Responses => convert_responses_input(&call.prompt, ctx.scope)?,
    };
    body.insert("messages".into(), Value::Array(messages));

    sampling_fields(&mut body, call, ctx.dialect, &mut warnings);

    let tools = prepare_tools(&call.tools, &call.tool_choice, ctx.dialect);
    warnings.extend(tools.warnings);
    insert_opt(&mut body, "tools", tools.tools);
    insert_opt(&mut body, "tool_choice", tools.tool_choice);

    if let Some((key, format)) = call
        .response_format
        .as_ref()
        .and_then(|f| response_format(f, ctx.dialect))
    {
        body.insert(key.into(), format);
    }

    router_fields(&mut body, &settings, ctx.dialect, &mut warnings)?;

    for (k, v) in &settings.other {
        if !v.is_null() {
            body.insert(k.clone(), v.clone());
        }
    }

    body.insert("stream".into(), json!(ctx.stream));
    let include_usage =
        settings.include_usage() || ctx.compatibility == Compatibility::Strict;
    if ctx.stream && include_usage {
        body.insert("stream_options".into(), json!({ "include_usage": true }));
    }

    let mut body = Value::Object(body);
    if let Some(extra) = settings.extra_body.filter(|e| !e.is_empty()) {
        deep_merge(&mut body, &Value::Object(extra));
    }
    Ok(PreparedRequest { body, warnings })
}
