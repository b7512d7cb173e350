use crate::ai_sdk_provider::Compatibility;
use crate::ai_sdk_types::v2 as v2t;
use crate::provider_openrouter::parts::Dialect;
use crate::provider_openrouter::request::{build_request_body, RequestContext};
use crate::provider_openrouter::settings::{OpenRouterModelSettings, ReasoningSettings};
use serde_json::json;

const SCOPE: &str = "openrouter";

fn ctx(dialect: Dialect, stream: bool) -> RequestContext<'static> {
    RequestContext {
        scope: SCOPE,
        dialect,
        compatibility: Compatibility::Compatible,
        stream,
    }
}

fn hi() -> v2t::CallOptions {
    v2t::CallOptions::new(vec![v2t::PromptMessage::user_text("Hi")])
}

#[test]
fn streaming_responses_body_with_usage_accounting() {
    let call = hi().with_provider_option(SCOPE, "usage", json!({"include": true}));
    let prepared = build_request_body(
        "x/y",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Responses, true),
    )
    .unwrap();
    assert_eq!(
        prepared.body,
        json!({
            "model": "x/y",
            "messages": [{ "role": "user", "content": [{ "type": "input_text", "text": "Hi" }] }],
            "stream": true,
            "stream_options": { "include_usage": true },
        })
    );
    assert!(prepared.warnings.is_empty());
}

#[test]
fn field_order_is_stable() {
    let settings = OpenRouterModelSettings {
        user: Some("u-1".into()),
        ..Default::default()
    };
    let call = hi().with_temperature(0.5).with_max_output_tokens(64);
    let prepared =
        build_request_body("m", &settings, &call, &ctx(Dialect::Chat, false)).unwrap();
    let keys: Vec<&str> = prepared
        .body
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        ["model", "messages", "max_tokens", "temperature", "user", "stream"]
    );
}

#[test]
fn no_stream_options_without_usage_request() {
    let prepared = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &hi(),
        &ctx(Dialect::Chat, true),
    )
    .unwrap();
    assert!(prepared.body.get("stream_options").is_none());
    assert_eq!(prepared.body["stream"], json!(true));
}

#[test]
fn strict_compatibility_always_requests_usage() {
    let strict = RequestContext {
        compatibility: Compatibility::Strict,
        ..ctx(Dialect::Chat, true)
    };
    let prepared =
        build_request_body("m", &OpenRouterModelSettings::default(), &hi(), &strict).unwrap();
    assert_eq!(prepared.body["stream_options"], json!({"include_usage": true}));

    let not_streaming = RequestContext {
        stream: false,
        ..strict
    };
    let prepared =
        build_request_body("m", &OpenRouterModelSettings::default(), &hi(), &not_streaming)
            .unwrap();
    assert!(prepared.body.get("stream_options").is_none());
}

#[test]
fn call_options_replace_model_settings_shallowly() {
    let settings = OpenRouterModelSettings {
        reasoning: Some(ReasoningSettings {
            effort: Some("high".into()),
            exclude: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };
    let call = hi().with_provider_option(SCOPE, "reasoning", json!({"max_tokens": 2048}));
    let prepared =
        build_request_body("m", &settings, &call, &ctx(Dialect::Chat, false)).unwrap();
    assert_eq!(prepared.body["reasoning"], json!({"max_tokens": 2048}));
}

#[test]
fn max_tokens_wins_over_effort() {
    let settings = OpenRouterModelSettings {
        reasoning: Some(ReasoningSettings {
            effort: Some("low".into()),
            max_tokens: Some(1000),
            ..Default::default()
        }),
        ..Default::default()
    };
    let prepared =
        build_request_body("m", &settings, &hi(), &ctx(Dialect::Chat, false)).unwrap();
    assert_eq!(prepared.body["reasoning"], json!({"max_tokens": 1000}));
}

#[test]
fn extra_body_is_merged_last_and_wins() {
    let call = hi()
        .with_temperature(0.2)
        .with_provider_option(SCOPE, "extraBody", json!({"temperature": 0.9, "transforms": ["middle-out"]}));
    let prepared = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Chat, false),
    )
    .unwrap();
    assert_eq!(prepared.body["temperature"], json!(0.9));
    assert_eq!(prepared.body["transforms"], json!(["middle-out"]));
    assert!(prepared.body.get("extraBody").is_none());
}

#[test]
fn unknown_keys_pass_through() {
    let call = hi()
        .with_provider_option(SCOPE, "transforms", json!(["middle-out"]))
        .with_provider_option(SCOPE, "route", json!("fallback"))
        .with_provider_option(SCOPE, "ignored_null", json!(null));
    let prepared = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Chat, false),
    )
    .unwrap();
    assert_eq!(prepared.body["transforms"], json!(["middle-out"]));
    assert_eq!(prepared.body["route"], json!("fallback"));
    assert!(prepared.body.get("ignored_null").is_none());
}

#[test]
fn options_for_other_scopes_are_ignored() {
    let call = hi().with_provider_option("openai", "reasoning", json!({"effort": "high"}));
    let prepared = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Chat, false),
    )
    .unwrap();
    assert!(prepared.body.get("reasoning").is_none());
}

#[test]
fn router_fields_are_forwarded() {
    let call = hi()
        .with_provider_option(SCOPE, "models", json!(["a/b", "c/d"]))
        .with_provider_option(SCOPE, "provider", json!({"order": ["groq"], "allow_fallbacks": false}))
        .with_provider_option(SCOPE, "plugins", json!([{"id": "web", "max_results": 3}]))
        .with_provider_option(SCOPE, "parallelToolCalls", json!(false))
        .with_provider_option(SCOPE, "logprobs", json!(5));
    let prepared = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Chat, false),
    )
    .unwrap();
    let body = &prepared.body;
    assert_eq!(body["models"], json!(["a/b", "c/d"]));
    assert_eq!(body["provider"], json!({"order": ["groq"], "allow_fallbacks": false}));
    assert_eq!(body["plugins"], json!([{"id": "web", "max_results": 3}]));
    assert_eq!(body["parallel_tool_calls"], json!(false));
    assert_eq!(body["logprobs"], json!(true));
    assert_eq!(body["top_logprobs"], json!(5));
}

#[test]
fn invalid_typed_option_is_an_invalid_argument() {
    let call = hi().with_provider_option(SCOPE, "models", json!("not-a-list"));
    let err = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Chat, false),
    )
    .unwrap_err();
    assert!(matches!(err, crate::ai_sdk_core::SdkError::InvalidArgument { .. }));
}

#[test]
fn responses_dialect_warns_about_unsupported_sampling() {
    let mut call = hi();
    call.top_k = Some(40);
    call.seed = Some(7);
    call.max_output_tokens = Some(100);
    let prepared = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Responses, false),
    )
    .unwrap();
    assert_eq!(prepared.body["max_output_tokens"], json!(100));
    assert!(prepared.body.get("top_k").is_none());
    assert!(prepared.body.get("seed").is_none());
    let settings: Vec<&str> = prepared
        .warnings
        .iter()
        .filter_map(|w| match w {
            v2t::CallWarning::UnsupportedSetting { setting, .. } => Some(setting.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(settings, ["topK", "seed"]);
}

#[test]
fn chat_sampling_fields_use_chat_names() {
    let mut call = hi();
    call.top_k = Some(40);
    call.stop_sequences = Some(vec!["END".into()]);
    call.frequency_penalty = Some(0.5);
    let prepared = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Chat, false),
    )
    .unwrap();
    assert_eq!(prepared.body["top_k"], json!(40));
    assert_eq!(prepared.body["stop"], json!(["END"]));
    assert_eq!(prepared.body["frequency_penalty"], json!(0.5));
    assert!(prepared.warnings.is_empty());
}

#[test]
fn tools_and_choice_use_dialect_shapes() {
    let tool = v2t::Tool::Function(v2t::FunctionTool {
        name: "get_weather".into(),
        description: Some("Weather".into()),
        input_schema: json!({"type": "object"}),
        strict: None,
        provider_options: None,
    });
    let mut call = hi().with_tools(vec![tool]);
    call.tool_choice = Some(v2t::ToolChoice::Tool {
        name: "get_weather".into(),
    });

    let chat = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Chat, false),
    )
    .unwrap();
    assert_eq!(
        chat.body["tools"],
        json!([{
            "type": "function",
            "function": { "name": "get_weather", "description": "Weather", "parameters": {"type": "object"} },
        }])
    );
    assert_eq!(
        chat.body["tool_choice"],
        json!({"type": "function", "function": {"name": "get_weather"}})
    );

    let responses = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Responses, false),
    )
    .unwrap();
    assert_eq!(
        responses.body["tools"],
        json!([{ "type": "function", "name": "get_weather", "description": "Weather", "parameters": {"type": "object"} }])
    );
    assert_eq!(
        responses.body["tool_choice"],
        json!({"type": "function", "name": "get_weather"})
    );
}

#[test]
fn provider_tools_warn_and_choice_needs_tools() {
    let mut call = hi().with_tools(vec![v2t::Tool::Provider(v2t::ProviderTool {
        id: "openai.web_search".into(),
        name: "web_search".into(),
        args: json!({}),
    })]);
    call.tool_choice = Some(v2t::ToolChoice::Required);
    let prepared = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Chat, false),
    )
    .unwrap();
    assert!(prepared.body.get("tools").is_none());
    assert!(prepared.body.get("tool_choice").is_none());
    assert!(matches!(
        prepared.warnings.as_slice(),
        [v2t::CallWarning::UnsupportedTool { tool_name, .. }] if tool_name == "web_search"
    ));
}

#[test]
fn json_response_format_per_dialect() {
    let mut call = hi();
    call.response_format = Some(v2t::ResponseFormat::Json {
        schema: Some(json!({"type": "object"})),
        name: None,
        description: None,
    });
    let chat = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Chat, false),
    )
    .unwrap();
    assert_eq!(
        chat.body["response_format"],
        json!({
            "type": "json_schema",
            "json_schema": { "name": "response", "schema": {"type": "object"}, "strict": true },
        })
    );
    let responses = build_request_body(
        "m",
        &OpenRouterModelSettings::default(),
        &call,
        &ctx(Dialect::Responses, false),
    )
    .unwrap();
    assert_eq!(
        responses.body["text"],
        json!({ "format": { "type": "json_schema", "name": "response", "schema": {"type": "object"}, "strict": true } })
    );
}
