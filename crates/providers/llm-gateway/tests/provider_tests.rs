use crate::ai_sdk_core::LanguageModel;
use crate::ai_sdk_provider::Compatibility;
use crate::ai_sdk_types::v2 as v2t;
use crate::provider_llm_gateway::{LlmGatewayProvider, LlmGatewayProviderBuilder, LLM_GATEWAY_PROFILE};
use crate::provider_openrouter::support::{
    collect_parts, done_chunk, json_chunk, user_prompt, TestTransport,
};
use serde_json::json;

fn provider(transport: TestTransport) -> LlmGatewayProvider<TestTransport> {
    builder(transport).build().expect("provider builds")
}

fn builder(transport: TestTransport) -> LlmGatewayProviderBuilder<TestTransport> {
    LlmGatewayProvider::builder()
        .with_api_key("gw-key")
        .with_transport(transport)
}

fn text_stream() -> Vec<bytes::Bytes> {
    vec![
        json_chunk(json!({ "id": "gw-1", "choices": [{ "delta": { "content": "pong" } }] })),
        json_chunk(json!({ "choices": [{ "delta": {}, "finish_reason": "stop" }] })),
        json_chunk(json!({
            "choices": [],
            "usage": { "prompt_tokens": 4, "completion_tokens": 1, "total_tokens": 5 },
        })),
        done_chunk(),
    ]
}

#[test]
fn profile_pins_gateway_defaults() {
    assert_eq!(LLM_GATEWAY_PROFILE.scope, "llmgateway");
    assert_eq!(LLM_GATEWAY_PROFILE.api_key_env, "LLM_GATEWAY_API_KEY");
    assert_eq!(LLM_GATEWAY_PROFILE.compatibility, Compatibility::Strict);

    let provider = provider(TestTransport::default());
    assert_eq!(provider.config().base_url, "https://api.llmgateway.io/v1");
    let model = provider.chat("openai/gpt-4o-mini");
    assert_eq!(model.provider_name(), "llmgateway");
    assert_eq!(model.model_id(), "openai/gpt-4o-mini");
}

#[tokio::test]
async fn streams_always_request_usage() {
    let transport = TestTransport::with_chunks(text_stream());
    let model = provider(transport.clone()).language_model("openai/gpt-4o-mini");
    let response = model.do_stream(user_prompt("ping")).await.unwrap();

    assert_eq!(
        transport.last_url().as_deref(),
        Some("https://api.llmgateway.io/v1/chat/completions")
    );
    assert_eq!(transport.header("authorization").as_deref(), Some("Bearer gw-key"));
    let body = transport.last_body().unwrap();
    assert_eq!(body["stream_options"], json!({"include_usage": true}));
    assert_eq!(
        body["messages"],
        json!([{ "role": "user", "content": "ping" }])
    );

    let parts = collect_parts(response.stream).await;
    assert!(parts.iter().any(|p| matches!(
        p,
        v2t::StreamPart::TextDelta { delta, .. } if delta == "pong"
    )));
    let summary = response.outcome.wait().await.unwrap();
    assert_eq!(summary.finish_reason, v2t::FinishReason::Stop);
    assert_eq!(summary.usage.total_tokens, Some(5));
    let metadata = summary.provider_metadata.expect("usage metadata");
    assert!(metadata.contains_key("llmgateway"));
    assert!(!metadata.contains_key("openrouter"));
}

#[tokio::test]
async fn compatible_mode_drops_stream_options() {
    let transport = TestTransport::with_chunks(text_stream());
    let model = builder(transport.clone())
        .with_compatibility(Compatibility::Compatible)
        .build()
        .unwrap()
        .chat("m");
    let response = model.do_stream(user_prompt("ping")).await.unwrap();
    collect_parts(response.stream).await;
    assert!(transport.last_body().unwrap().get("stream_options").is_none());
}

#[tokio::test]
async fn options_are_read_from_the_gateway_scope() {
    let transport = TestTransport::with_json(json!({
        "id": "gw-2",
        "choices": [{ "finish_reason": "stop", "message": { "role": "assistant", "content": "ok" } }],
        "usage": { "prompt_tokens": 2, "completion_tokens": 1 },
    }));
    let model = provider(transport.clone()).chat("m");
    let call = user_prompt("x")
        .with_provider_option("llmgateway", "reasoning", json!({"effort": "low"}))
        .with_provider_option("openrouter", "models", json!(["ignored/model"]));
    let response = model.do_generate(call).await.unwrap();

    let body = transport.last_body().unwrap();
    assert_eq!(body["reasoning"], json!({"effort": "low"}));
    assert!(body.get("models").is_none());
    assert!(matches!(&response.content[0], v2t::Content::Text { text, .. } if text == "ok"));
    let metadata = response.provider_metadata.expect("metadata");
    assert!(metadata.contains_key("llmgateway"));
}

#[tokio::test]
async fn custom_base_url_and_headers() {
    let transport = TestTransport::with_json(json!({
        "choices": [{ "finish_reason": "stop", "message": { "content": "ok" } }],
    }));
    let provider = builder(transport.clone())
        .with_base_url("https://gateway.internal/v1/")
        .with_header("X-Team", "search")
        .build()
        .unwrap();
    provider.chat("m").do_generate(user_prompt("x")).await.unwrap();
    assert_eq!(
        transport.last_url().as_deref(),
        Some("https://gateway.internal/v1/chat/completions")
    );
    assert_eq!(transport.header("x-team").as_deref(), Some("search"));
}
