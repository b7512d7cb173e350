use std::sync::Arc;

use crate::ai_sdk_core::transport::{HttpTransport, TransportConfig};
use crate::ai_sdk_core::{LanguageModel, SdkError};
use crate::ai_sdk_provider::{
    load_api_key, normalize_base_url, Compatibility, Credentials, HeaderSource, ProviderSettings,
};
use crate::ai_sdk_types::v2::ProviderOptions;
use crate::provider_openrouter::config::{
    default_supported_urls, OpenRouterConfig, RouterProfile, OPENROUTER_PROFILE,
};
use crate::provider_openrouter::language_model::OpenRouterLanguageModel;
use crate::provider_openrouter::parts::Dialect;
use crate::provider_openrouter::settings::OpenRouterModelSettings;
use crate::reqwest_transport::ReqwestTransport;

/// Factory for OpenRouter models.
///
/// ```no_run
/// # use ai_sdk_router_rs::providers::openrouter::OpenRouterProvider;
/// let provider = OpenRouterProvider::builder()
///     .with_api_key("sk-or-...")
///     .with_app_title("my-app")
///     .build()?;
/// let model = provider.chat("anthropic/claude-3.5-sonnet");
/// # Ok::<(), ai_sdk_router_rs::core::SdkError>(())
/// ```
#[derive(Clone)]
pub struct OpenRouterProvider<T: HttpTransport + Clone = ReqwestTransport> {
    config: OpenRouterConfig,
    http: T,
}

impl OpenRouterProvider<ReqwestTransport> {
    pub fn builder() -> OpenRouterProviderBuilder<ReqwestTransport> {
        OpenRouterProviderBuilder::new(OPENROUTER_PROFILE)
    }

    /// Build with defaults, reading the key from `OPENROUTER_API_KEY`.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::builder().build()
    }
}

impl<T: HttpTransport + Clone> OpenRouterProvider<T> {
    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// Chat-completions model; same as [`Self::chat`].
    pub fn language_model(&self, model_id: impl Into<String>) -> OpenRouterLanguageModel<T> {
        self.chat(model_id)
    }

    pub fn chat(&self, model_id: impl Into<String>) -> OpenRouterLanguageModel<T> {
        self.chat_with_settings(model_id, OpenRouterModelSettings::default())
    }

    pub fn chat_with_settings(
        &self,
        model_id: impl Into<String>,
        settings: OpenRouterModelSettings,
    ) -> OpenRouterLanguageModel<T> {
        self.model(model_id, Dialect::Chat, settings)
    }

    pub fn responses(&self, model_id: impl Into<String>) -> OpenRouterLanguageModel<T> {
        self.responses_with_settings(model_id, OpenRouterModelSettings::default())
    }

    pub fn responses_with_settings(
        &self,
        model_id: impl Into<String>,
        settings: OpenRouterModelSettings,
    ) -> OpenRouterLanguageModel<T> {
        self.model(model_id, Dialect::Responses, settings)
    }

    pub(crate) fn model(
        &self,
        model_id: impl Into<String>,
        dialect: Dialect,
        settings: OpenRouterModelSettings,
    ) -> OpenRouterLanguageModel<T> {
        OpenRouterLanguageModel::new(
            model_id,
            dialect,
            settings,
            self.config.clone(),
            self.http.clone(),
        )
    }
}

impl<T: HttpTransport + Clone + Send + Sync + 'static> OpenRouterProvider<T> {
    /// Chat model behind a trait object.
    pub fn language_model_arc(&self, model_id: impl Into<String>) -> Arc<dyn LanguageModel> {
        Arc::new(self.chat(model_id))
    }
}

/// Builder shared by every router profile.
pub struct OpenRouterProviderBuilder<T = ReqwestTransport> {
    profile: RouterProfile,
    settings: ProviderSettings,
    header_source: Option<Arc<dyn HeaderSource>>,
    default_options: Option<ProviderOptions>,
    transport: T,
}

impl OpenRouterProviderBuilder<ReqwestTransport> {
    pub fn new(profile: RouterProfile) -> Self {
        Self {
            profile,
            settings: ProviderSettings::default(),
            header_source: None,
            default_options: None,
            transport: ReqwestTransport::default(),
        }
    }
}

impl<T> OpenRouterProviderBuilder<T> {
    pub fn profile(&self) -> &RouterProfile {
        &self.profile
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.settings.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.settings.base_url = Some(base_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.headers.push((name.into(), value.into()));
        self
    }

    /// Attribution: the site URL shown in the router's rankings.
    pub fn with_http_referer(self, url: impl Into<String>) -> Self {
        self.with_header("HTTP-Referer", url)
    }

    /// Attribution: the application name shown in the router's rankings.
    pub fn with_app_title(self, title: impl Into<String>) -> Self {
        self.with_header("X-Title", title)
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.query_params.push((name.into(), value.into()));
        self
    }

    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.settings.compatibility = Some(compatibility);
        self
    }

    /// Per-call transport settings (timeouts, null stripping).
    pub fn with_transport_config(mut self, cfg: TransportConfig) -> Self {
        self.settings.transport = Some(cfg);
        self
    }

    /// Provider options merged under every call's own options.
    pub fn with_default_options(mut self, options: ProviderOptions) -> Self {
        self.default_options = Some(options);
        self
    }

    /// Replace API-key authentication with headers produced per request.
    pub fn with_header_source(mut self, source: Arc<dyn HeaderSource>) -> Self {
        self.header_source = Some(source);
        self
    }

    pub fn with_transport<U>(self, transport: U) -> OpenRouterProviderBuilder<U> {
        OpenRouterProviderBuilder {
            profile: self.profile,
            settings: self.settings,
            header_source: self.header_source,
            default_options: self.default_options,
            transport,
        }
    }
}

impl<T: HttpTransport + Clone> OpenRouterProviderBuilder<T> {
    /// Resolve settings against the profile.
    ///
    /// Without a header source the API key is required, explicit or from the
    /// profile's environment variable.
    pub fn build(self) -> Result<OpenRouterProvider<T>, SdkError> {
        let profile = self.profile;
        let base_url = normalize_base_url(
            self.settings
                .base_url
                .as_deref()
                .unwrap_or(profile.default_base_url),
        )?;
        let header_source: Arc<dyn HeaderSource> = match self.header_source {
            Some(source) => source,
            None => Arc::new(Credentials::ApiKey(load_api_key(
                self.settings.api_key.as_deref(),
                profile.api_key_env,
                profile.display_name,
            )?)),
        };
        let config = OpenRouterConfig {
            provider_name: profile.provider_name,
            provider_scope: profile.scope.to_string(),
            base_url,
            headers: self.settings.headers,
            header_source,
            query_params: self.settings.query_params,
            supported_urls: default_supported_urls(),
            transport_cfg: self.settings.transport.unwrap_or_default(),
            compatibility: self
                .settings
                .compatibility
                .unwrap_or(profile.compatibility),
            default_options: self.default_options,
        };
        Ok(OpenRouterProvider {
            config,
            http: self.transport,
        })
    }
}
