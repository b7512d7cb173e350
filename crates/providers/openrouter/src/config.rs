use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::ai_sdk_core::transport::TransportConfig;
use crate::ai_sdk_provider::{endpoint_url, Compatibility, HeaderSource};
use crate::ai_sdk_types::v2::ProviderOptions;
use crate::provider_openrouter::parts::Dialect;

/// Static description of an OpenAI-shaped router backend.
#[derive(Debug, Clone, Copy)]
pub struct RouterProfile {
    /// Name reported by `LanguageModel::provider_name`.
    pub provider_name: &'static str,
    /// Provider-options and provider-metadata key.
    pub scope: &'static str,
    pub default_base_url: &'static str,
    pub api_key_env: &'static str,
    /// Human-readable name used in error messages.
    pub display_name: &'static str,
    pub compatibility: Compatibility,
}

pub const OPENROUTER_PROFILE: RouterProfile = RouterProfile {
    provider_name: "openrouter",
    scope: "openrouter",
    default_base_url: "https://openrouter.ai/api/v1",
    api_key_env: "OPENROUTER_API_KEY",
    display_name: "OpenRouter",
    compatibility: Compatibility::Compatible,
};

/// Resolved per-provider configuration shared by its models.
#[derive(Clone)]
pub struct OpenRouterConfig {
    pub provider_name: &'static str,
    pub provider_scope: String,
    pub base_url: String,
    /// Fixed headers (attribution, custom headers).
    pub headers: Vec<(String, String)>,
    /// Per-request headers, typically authentication.
    pub header_source: Arc<dyn HeaderSource>,
    pub query_params: Vec<(String, String)>,
    pub supported_urls: HashMap<String, Vec<String>>,
    pub transport_cfg: TransportConfig,
    pub compatibility: Compatibility,
    pub default_options: Option<ProviderOptions>,
}

impl OpenRouterConfig {
    pub fn endpoint(&self, dialect: Dialect) -> String {
        endpoint_url(&self.base_url, dialect.endpoint_path(), &self.query_params)
    }
}

impl fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("provider_name", &self.provider_name)
            .field("provider_scope", &self.provider_scope)
            .field("base_url", &self.base_url)
            .field(
                "headers",
                &self.headers.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("query_params", &self.query_params)
            .field("compatibility", &self.compatibility)
            .finish_non_exhaustive()
    }
}

/// Remote URLs the router fetches itself instead of needing inline data.
pub fn default_supported_urls() -> HashMap<String, Vec<String>> {
    HashMap::from([
        ("image/*".to_string(), vec![r"^https?://.*$".to_string()]),
        ("application/pdf".to_string(), vec![r"^https?://.*$".to_string()]),
    ])
}
