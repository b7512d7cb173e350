use std::future::Future;
use std::sync::Arc;

use crate::ai_sdk_core::transport::{HttpTransport, TransportConfig};
use crate::ai_sdk_core::{LanguageModel, SdkError};
use crate::ai_sdk_provider::{header_source_fn, Compatibility, Credentials, HeaderSource};
use crate::ai_sdk_types::v2::ProviderOptions;
use crate::provider_openrouter::config::{OpenRouterConfig, RouterProfile};
use crate::provider_openrouter::language_model::OpenRouterLanguageModel;
use crate::provider_openrouter::settings::OpenRouterModelSettings;
use crate::provider_openrouter::{OpenRouterProvider, OpenRouterProviderBuilder};
use crate::reqwest_transport::ReqwestTransport;

pub const DREAMS_ROUTER_PROFILE: RouterProfile = RouterProfile {
    provider_name: "dreamsrouter",
    scope: "dreamsrouter",
    default_base_url: "https://router.daydreams.systems/v1",
    api_key_env: "DREAMSROUTER_API_KEY",
    display_name: "Dreams Router",
    compatibility: Compatibility::Compatible,
};

/// Header carrying a signed x402 payment for one request.
pub const PAYMENT_HEADER: &str = "X-PAYMENT";

/// Factory for Dreams Router models in either dialect.
///
/// ```no_run
/// # use ai_sdk_router_rs::providers::dreams_router::DreamsRouterProvider;
/// let provider = DreamsRouterProvider::builder()
///     .with_payment_header(|| async { Ok("signed-payment".to_string()) })
///     .build()?;
/// let model = provider.responses("openai/gpt-4o");
/// # Ok::<(), ai_sdk_router_rs::core::SdkError>(())
/// ```
#[derive(Clone)]
pub struct DreamsRouterProvider<T: HttpTransport + Clone = ReqwestTransport> {
    inner: OpenRouterProvider<T>,
}

impl DreamsRouterProvider<ReqwestTransport> {
    pub fn builder() -> DreamsRouterProviderBuilder<ReqwestTransport> {
        DreamsRouterProviderBuilder {
            inner: OpenRouterProviderBuilder::new(DREAMS_ROUTER_PROFILE),
        }
    }

    /// Build with defaults, reading the key from `DREAMSROUTER_API_KEY`.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::builder().build()
    }
}

impl<T: HttpTransport + Clone> DreamsRouterProvider<T> {
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

    pub fn responses(&self, model_id: impl Into<String>) -> OpenRouterLanguageModel<T> {
        self.inner.responses(model_id)
    }

    pub fn responses_with_settings(
        &self,
        model_id: impl Into<String>,
        settings: OpenRouterModelSettings,
    ) -> OpenRouterLanguageModel<T> {
        self.inner.responses_with_settings(model_id, settings)
    }
}

impl<T: HttpTransport + Clone + Send + Sync + 'static> DreamsRouterProvider<T> {
    pub fn language_model_arc(&self, model_id: impl Into<String>) -> Arc<dyn LanguageModel> {
        self.inner.language_model_arc(model_id)
    }
}

pub struct DreamsRouterProviderBuilder<T = ReqwestTransport> {
    inner: OpenRouterProviderBuilder<T>,
}

impl<T> DreamsRouterProviderBuilder<T> {
    fn map(
        self,
        f: impl FnOnce(OpenRouterProviderBuilder<T>) -> OpenRouterProviderBuilder<T>,
    ) -> Self {
        Self {
            inner: f(self.inner),
        }
    }

    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        self.map(|b| b.with_api_key(api_key))
    }

    /// Session token from a wallet login; sent as `Authorization: Bearer`.
    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        let source: Arc<dyn HeaderSource> = Arc::new(Credentials::Bearer(token.into()));
        self.with_header_source(source)
    }

    /// Sign a fresh payment for every request.
    ///
    /// `sign` resolves to the encoded payment, sent as `X-PAYMENT`.
    pub fn with_payment_header<F, Fut>(self, sign: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, SdkError>> + Send + 'static,
    {
        let sign = Arc::new(sign);
        let source = header_source_fn(move || {
            let sign = Arc::clone(&sign);
            async move {
                let payment = sign().await?;
                Ok(vec![(PAYMENT_HEADER.to_string(), payment)])
            }
        });
        self.with_header_source(source)
    }

    pub fn with_header_source(self, source: Arc<dyn HeaderSource>) -> Self {
        self.map(|b| b.with_header_source(source))
    }

    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        self.map(|b| b.with_base_url(base_url))
    }

    pub fn with_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.map(|b| b.with_header(name, value))
    }

    pub fn with_query_param(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.map(|b| b.with_query_param(name, value))
    }

    pub fn with_compatibility(self, compatibility: Compatibility) -> Self {
        self.map(|b| b.with_compatibility(compatibility))
    }

    pub fn with_transport_config(self, cfg: TransportConfig) -> Self {
        self.map(|b| b.with_transport_config(cfg))
    }

    pub fn with_default_options(self, options: ProviderOptions) -> Self {
        self.map(|b| b.with_default_options(options))
    }

    pub fn with_transport<U>(self, transport: U) -> DreamsRouterProviderBuilder<U> {
        DreamsRouterProviderBuilder {
            inner: self.inner.with_transport(transport),
        }
    }
}

impl<T: HttpTransport + Clone> DreamsRouterProviderBuilder<T> {
    pub fn build(self) -> Result<DreamsRouterProvider<T>, SdkError> {
        Ok(DreamsRouterProvider {
            inner: self.inner.build()?,
        })
    }
}
