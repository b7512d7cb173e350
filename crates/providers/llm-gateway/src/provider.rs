use std::sync::Arc;

use crate::ai_sdk_core::transport::{HttpTransport, TransportConfig};
use crate::ai_sdk_core::{LanguageModel, SdkError};
use crate::ai_sdk_provider::{Compatibility, HeaderSource};
use crate::ai_sdk_types::v2::ProviderOptions;
use crate::provider_openrouter::config::{OpenRouterConfig, RouterProfile};
use crate::provider_openrouter::language_model::OpenRouterLanguageModel;
use crate::provider_openrouter::settings::OpenRouterModelSettings;
use crate::provider_openrouter::{OpenRouterProvider, OpenRouterProviderBuilder};
use crate::reqwest_transport::ReqwestTransport;

pub const LLM_GATEWAY_PROFILE: RouterProfile = RouterProfile {
    provider_name: "llmgateway",
    scope: "llmgateway",
    default_base_url: "https://api.llmgateway.io/v1",
    api_key_env: "LLM_GATEWAY_API_KEY",
    display_name: "LLM Gateway",
    compatibility: Compatibility::Strict,
};

/// Factory for LLM Gateway chat models.
///
/// Provider options for these models live under the `llmgateway` key.
#[derive(Clone)]
pub struct LlmGatewayProvider<T: HttpTransport + Clone = ReqwestTransport> {
    inner: OpenRouterProvider<T>,
}

impl LlmGatewayProvider<ReqwestTransport> {
    pub fn builder() -> LlmGatewayProviderBuilder<ReqwestTransport> {
        LlmGatewayProviderBuilder {
            inner: OpenRouterProviderBuilder::new(LLM_GATEWAY_PROFILE),
        }
    }

    /// Build with defaults, reading the key from `LLM_GATEWAY_API_KEY`.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::builder().build()
    }
}

impl<T: HttpTransport + Clone> LlmGatewayProvider<T> {
    pub fn config(&self) -> &OpenRouterConfig {
        self.inner.config()
    }

    pub fn language_model(&self, model_id: impl Into<String>) -> OpenRouterLanguageModel<T> {
        self.inner.chat(model_id)
    }

    pub fn chat(&self, model_id: impl Into<String>) -> OpenRouterLanguageModel<T> {
        self.inner.chat(model_id)
    }

    pub fn chat_with_settings(
        &self,
        model_id: impl Into<String>,
        settings: OpenRouterModelSettings,
    ) -> OpenRouterLanguageModel<T> {
        self.inner.chat_with_settings(model_id, settings)
    }
}

impl<T: HttpTransport + Clone + Send + Sync + 'static> LlmGatewayProvider<T> {
    pub fn language_model_arc(&self, model_id: impl Into<String>) -> Arc<dyn LanguageModel> {
        self.inner.language_model_arc(model_id)
    }
}

pub struct LlmGatewayProviderBuilder<T = ReqwestTransport> {
    inner: OpenRouterProviderBuilder<T>,
}

impl<T> LlmGatewayProviderBuilder<T> {
    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        Self {
            inner: self.inner.with_api_key(api_key),
        }
    }

    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            inner: self.inner.with_base_url(base_url),
        }
    }

    pub fn with_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            inner: self.inner.with_header(name, value),
        }
    }

    pub fn with_query_param(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            inner: self.inner.with_query_param(name, value),
        }
    }

    /// Defaults to strict; `Compatible` only sends `stream_options` on request.
    pub fn with_compatibility(self, compatibility: Compatibility) -> Self {
        Self {
            inner: self.inner.with_compatibility(compatibility),
        }
    }

    pub fn with_transport_config(self, cfg: TransportConfig) -> Self {
        Self {
            inner: self.inner.with_transport_config(cfg),
        }
    }

    pub fn with_default_options(self, options: ProviderOptions) -> Self {
        Self {
            inner: self.inner.with_default_options(options),
        }
    }

    pub fn with_header_source(self, source: Arc<dyn HeaderSource>) -> Self {
        Self {
            inner: self.inner.with_header_source(source),
        }
    }

    pub fn with_transport<U>(self, transport: U) -> LlmGatewayProviderBuilder<U> {
        LlmGatewayProviderBuilder {
            inner: self.inner.with_transport(transport),
        }
    }
}

impl<T: HttpTransport + Clone> LlmGatewayProviderBuilder<T> {
    pub fn build(self) -> Result<LlmGatewayProvider<T>, SdkError> {
        Ok(LlmGatewayProvider {
            inner: self.inner.build()?,
        })
    }
}
