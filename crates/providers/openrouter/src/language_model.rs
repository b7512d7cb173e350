use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::ai_sdk_core::assembler::AssemblerConfig;
use crate::ai_sdk_core::options::merge_provider_defaults;
use crate::ai_sdk_core::transport::HttpTransport;
use crate::ai_sdk_core::{GenerateResponse, LanguageModel, SdkError, StreamResponse};
use crate::ai_sdk_streaming_sse::{drive_stream, DriveConfig};
use crate::ai_sdk_types::v2 as v2t;
use crate::provider_openrouter::chat::response::{parse_chat_response, ParsedResponse};
use crate::provider_openrouter::chat::stream::ChatChunkParser;
use crate::provider_openrouter::config::OpenRouterConfig;
use crate::provider_openrouter::error::map_transport_error;
use crate::provider_openrouter::parts::Dialect;
use crate::provider_openrouter::request::{build_request_body, PreparedRequest, RequestContext};
use crate::provider_openrouter::responses::response::parse_responses_response;
use crate::provider_openrouter::responses::stream::ResponsesChunkParser;
use crate::provider_openrouter::settings::OpenRouterModelSettings;

/// A router model speaking one wire dialect.
pub struct OpenRouterLanguageModel<T: HttpTransport = crate::reqwest_transport::ReqwestTransport>
{
    pub model_id: String,
    pub dialect: Dialect,
    pub settings: OpenRouterModelSettings,
    pub config: OpenRouterConfig,
    pub http: T,
}

impl<T: HttpTransport> OpenRouterLanguageModel<T> {
    pub fn new(
        model_id: impl Into<String>,
        dialect: Dialect,
        settings: OpenRouterModelSettings,
        config: OpenRouterConfig,
        http: T,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            dialect,
            settings,
            config,
            http,
        }
    }

    fn prepare(
        &self,
        mut options: v2t::CallOptions,
        stream: bool,
    ) -> Result<(v2t::CallOptions, PreparedRequest), SdkError> {
        if let Some(defaults) = &self.config.default_options {
            merge_provider_defaults(&mut options.provider_options, defaults);
        }
        let ctx = RequestContext {
            scope: &self.config.provider_scope,
            dialect: self.dialect,
            compatibility: self.config.compatibility,
            stream,
        };
        let prepared = build_request_body(&self.model_id, &self.settings, &options, &ctx)?;
        debug!(
            target: "ai_sdk::openrouter",
            provider = self.config.provider_name,
            model = %self.model_id,
            dialect = self.dialect.as_str(),
            stream,
            warnings = prepared.warnings.len(),
            "sending request"
        );
        Ok((options, prepared))
    }

    async fn merge_headers(
        &self,
        call_headers: &HashMap<String, String>,
        streaming: bool,
    ) -> Result<Vec<(String, String)>, SdkError> {
        let mut merged: BTreeMap<String, String> = BTreeMap::new();
        merged.insert("content-type".into(), "application/json".into());
        merged.insert(
            "accept".into(),
            if streaming {
                "text/event-stream".into()
            } else {
                "application/json".into()
            },
        );
        for (k, v) in &self.config.headers {
            merged.insert(k.to_ascii_lowercase(), v.clone());
        }
        for (k, v) in self.config.header_source.headers().await? {
            merged.insert(k.to_ascii_lowercase(), v);
        }
        for (k, v) in call_headers {
            if v.trim().is_empty() {
                continue;
            }
            merged.insert(k.to_ascii_lowercase(), v.clone());
        }
        Ok(merged.into_iter().collect())
    }

    fn parse_response(&self, body: &Value) -> Result<ParsedResponse, SdkError> {
        match self.dialect {
            Dialect::Chat => parse_chat_response(body, &self.config.provider_scope),
            Dialect::Responses => parse_responses_response(body, &self.config.provider_scope),
        }
    }

    fn headers_vec_to_map(headers: Vec<(String, String)>) -> v2t::Headers {
        headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect()
    }
}

#[async_trait]
impl<T: HttpTransport + Send + Sync + 'static> LanguageModel for OpenRouterLanguageModel<T> {
    fn provider_name(&self) -> &'static str {
        self.config.provider_name
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn supported_urls(&self) -> HashMap<String, Vec<String>> {
        self.config.supported_urls.clone()
    }

    #[instrument(name = "openrouter.do_generate", skip_all, fields(model = %self.model_id))]
    async fn do_generate(&self, options: v2t::CallOptions) -> Result<GenerateResponse, SdkError> {
        let (options, prepared) = self.prepare(options, false)?;
        let headers = self.merge_headers(&options.headers, false).await?;
        let url = self.config.endpoint(self.dialect);
        let (response_body, response_headers) = self
            .http
            .post_json(&url, &headers, &prepared.body, &self.config.transport_cfg)
            .await
            .map_err(map_transport_error)?;

        let parsed = self.parse_response(&response_body)?;
        Ok(GenerateResponse {
            content: parsed.content,
            finish_reason: parsed.finish_reason,
            usage: parsed.usage,
            provider_metadata: parsed.provider_metadata,
            response: parsed.response,
            request_body: Some(prepared.body),
            response_headers: Some(Self::headers_vec_to_map(response_headers)),
            response_body: Some(response_body),
            warnings: prepared.warnings,
        })
    }

    #[instrument(name = "openrouter.do_stream", skip_all, fields(model = %self.model_id))]
    async fn do_stream(&self, options: v2t::CallOptions) -> Result<StreamResponse, SdkError> {
        let (options, prepared) = self.prepare(options, true)?;
        let headers = self.merge_headers(&options.headers, true).await?;
        let url = self.config.endpoint(self.dialect);
        let resp = self
            .http
            .post_json_stream(&url, &headers, &prepared.body, &self.config.transport_cfg)
            .await
            .map_err(map_transport_error)?;
        let (bytes, response_headers) = T::into_stream(resp);

        let mut assembler = AssemblerConfig::new(self.config.provider_scope.clone());
        assembler.include_raw = options.include_raw_chunks;
        let cfg = DriveConfig {
            warnings: prepared.warnings,
            assembler,
        };
        let scope = self.config.provider_scope.clone();
        let (stream, outcome) = match self.dialect {
            Dialect::Chat => drive_stream(bytes, ChatChunkParser::new(scope), cfg),
            Dialect::Responses => drive_stream(bytes, ResponsesChunkParser::new(scope), cfg),
        };
        Ok(StreamResponse {
            stream,
            outcome,
            request_body: Some(prepared.body),
            response_headers: Some(Self::headers_vec_to_map(response_headers)),
        })
    }
}
