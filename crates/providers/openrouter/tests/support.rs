use crate::ai_sdk_core::error::TransportError;
use crate::ai_sdk_core::transport::{ByteStream, HttpTransport, TransportConfig};
use crate::ai_sdk_core::PartStream;
use crate::ai_sdk_provider::StaticHeaders;
use crate::ai_sdk_types::v2 as v2t;
use crate::provider_openrouter::language_model::OpenRouterLanguageModel;
use crate::provider_openrouter::parts::Dialect;
use crate::provider_openrouter::provider::OpenRouterProvider;
use crate::provider_openrouter::OpenRouterProviderBuilder;
use crate::provider_openrouter::OPENROUTER_PROFILE;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Records the last request and replays canned responses.
#[derive(Clone, Default)]
pub(crate) struct TestTransport {
    chunks: Arc<Mutex<Vec<Bytes>>>,
    json_response: Arc<Mutex<Option<Value>>>,
    response_headers: Arc<Mutex<Vec<(String, String)>>>,
    error: Arc<Mutex<Option<TransportError>>>,
    last_url: Arc<Mutex<Option<String>>>,
    last_body: Arc<Mutex<Option<Value>>>,
    last_headers: Arc<Mutex<Option<Vec<(String, String)>>>>,
}

impl TestTransport {
    pub(crate) fn with_chunks(chunks: Vec<Bytes>) -> Self {
        let t = Self::default();
        *t.chunks.lock().unwrap() = chunks;
        t
    }

    pub(crate) fn with_json(body: Value) -> Self {
        let t = Self::default();
        *t.json_response.lock().unwrap() = Some(body);
        t
    }

    pub(crate) fn with_error(error: TransportError) -> Self {
        let t = Self::default();
        *t.error.lock().unwrap() = Some(error);
        t
    }

    pub(crate) fn with_response_headers(self, headers: Vec<(String, String)>) -> Self {
        *self.response_headers.lock().unwrap() = headers;
        self
    }

    pub(crate) fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }

    pub(crate) fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }

    pub(crate) fn last_headers(&self) -> Vec<(String, String)> {
        self.last_headers.lock().unwrap().clone().unwrap_or_default()
    }

    pub(crate) fn header(&self, name: &str) -> Option<String> {
        self.last_headers()
            .into_iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    fn record(&self, url: &str, headers: &[(String, String)], body: &Value) {
        *self.last_url.lock().unwrap() = Some(url.to_string());
        *self.last_headers.lock().unwrap() = Some(headers.to_vec());
        *self.last_body.lock().unwrap() = Some(body.clone());
    }
}

pub(crate) struct TestStreamResponse {
    headers: Vec<(String, String)>,
    chunks: Vec<Bytes>,
}

#[async_trait]
impl HttpTransport for TestTransport {
    type StreamResponse = TestStreamResponse;

    fn into_stream(resp: Self::StreamResponse) -> (ByteStream, Vec<(String, String)>) {
        let stream = stream::iter(resp.chunks.into_iter().map(Ok));
        (Box::pin(stream), resp.headers)
    }

    async fn post_json_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        _cfg: &TransportConfig,
    ) -> Result<Self::StreamResponse, TransportError> {
        self.record(url, headers, body);
        if let Some(err) = self.error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(TestStreamResponse {
            headers: self.response_headers.lock().unwrap().clone(),
            chunks: self.chunks.lock().unwrap().clone(),
        })
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        _cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        self.record(url, headers, body);
        if let Some(err) = self.error.lock().unwrap().take() {
            return Err(err);
        }
        let response = self
            .json_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TransportError::Other("no canned json response".into()))?;
        Ok((response, self.response_headers.lock().unwrap().clone()))
    }
}

pub(crate) fn json_chunk(val: Value) -> Bytes {
    Bytes::from(format!("data: {val}\n\n"))
}

pub(crate) fn done_chunk() -> Bytes {
    Bytes::from_static(b"data: [DONE]\n\n")
}

pub(crate) fn test_builder(transport: TestTransport) -> OpenRouterProviderBuilder<TestTransport> {
    OpenRouterProviderBuilder::new(OPENROUTER_PROFILE)
        .with_api_key("test-key")
        .with_transport(transport)
}

pub(crate) fn test_provider(transport: TestTransport) -> OpenRouterProvider<TestTransport> {
    test_builder(transport).build().expect("provider builds")
}

pub(crate) fn build_model(
    dialect: Dialect,
    transport: TestTransport,
) -> OpenRouterLanguageModel<TestTransport> {
    let provider = test_provider(transport);
    match dialect {
        Dialect::Chat => provider.chat("openai/gpt-4o"),
        Dialect::Responses => provider.responses("openai/gpt-4o"),
    }
}

pub(crate) fn static_headers(pairs: &[(&str, &str)]) -> Arc<StaticHeaders> {
    Arc::new(StaticHeaders(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    ))
}

pub(crate) fn user_prompt(text: &str) -> v2t::CallOptions {
    v2t::CallOptions::new(vec![v2t::PromptMessage::user_text(text)])
}

pub(crate) async fn collect_parts(mut stream: PartStream) -> Vec<v2t::StreamPart> {
    let mut parts = Vec::new();
    while let Some(part) = stream.next().await {
        parts.push(part.expect("stream part"));
    }
    parts
}
