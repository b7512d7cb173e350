//! Provider plumbing shared by the router providers.
//!
//! Credentials and header producers, endpoint settings, environment key
//! lookup and URL helpers. Authentication flows that mint tokens (wallet
//! signatures, payment handshakes) live with the caller; providers only ask a
//! [`HeaderSource`] for the headers of the next request.

use crate::ai_sdk_core::transport::TransportConfig;
use crate::ai_sdk_core::SdkError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use url::Url;

/// Credentials provided by the application layer.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// API key sent as a bearer token.
    ApiKey(String),
    /// Bearer token, with or without the "Bearer " prefix.
    Bearer(String),
    /// No credentials provided; provider may fall back to environment.
    None,
}

impl Credentials {
    pub fn as_bearer(&self) -> Option<String> {
        let token = match self {
            Credentials::ApiKey(s) | Credentials::Bearer(s) => s.trim(),
            Credentials::None => return None,
        };
        if token.is_empty() {
            return None;
        }
        Some(if token.to_ascii_lowercase().starts_with("bearer ") {
            token.to_string()
        } else {
            format!("Bearer {token}")
        })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Credentials::None)
    }
}

/// Produces the authentication (and any other per-request) headers.
///
/// Called once per request, so implementations may refresh tokens or sign
/// payment headers on demand.
#[async_trait]
pub trait HeaderSource: Send + Sync {
    async fn headers(&self) -> Result<Vec<(String, String)>, SdkError>;
}

#[async_trait]
impl HeaderSource for Credentials {
    async fn headers(&self) -> Result<Vec<(String, String)>, SdkError> {
        Ok(self
            .as_bearer()
            .map(|v| vec![("authorization".to_string(), v)])
            .unwrap_or_default())
    }
}

/// Fixed header list.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders(pub Vec<(String, String)>);

#[async_trait]
impl HeaderSource for StaticHeaders {
    async fn headers(&self) -> Result<Vec<(String, String)>, SdkError> {
        Ok(self.0.clone())
    }
}

/// [`HeaderSource`] backed by an async closure.
pub struct FnHeaderSource<F> {
    f: F,
}

/// Adapt `f` into a shareable [`HeaderSource`].
pub fn header_source_fn<F, Fut>(f: F) -> Arc<dyn HeaderSource>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<(String, String)>, SdkError>> + Send + 'static,
{
    Arc::new(FnHeaderSource { f })
}

#[async_trait]
impl<F, Fut> HeaderSource for FnHeaderSource<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<(String, String)>, SdkError>> + Send,
{
    async fn headers(&self) -> Result<Vec<(String, String)>, SdkError> {
        (self.f)().await
    }
}

/// How closely a backend follows the OpenAI wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compatibility {
    /// Always request usage in streams (`stream_options.include_usage`).
    Strict,
    /// Request streamed usage only when the caller asks for it.
    #[default]
    Compatible,
}

/// Endpoint settings common to every router provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub headers: Vec<(String, String)>,
    pub query_params: Vec<(String, String)>,
    pub compatibility: Option<Compatibility>,
    pub transport: Option<TransportConfig>,
}

/// Resolve an API key from an explicit value or an environment variable.
pub fn load_api_key(
    explicit: Option<&str>,
    env_var: &str,
    description: &str,
) -> Result<String, SdkError> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(SdkError::invalid_argument(format!(
            "{description} API key is missing. Pass it explicitly or set the {env_var} environment variable."
        ))),
    }
}

/// Validate a base URL and strip trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String, SdkError> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed)
        .map_err(|e| SdkError::invalid_argument(format!("invalid base url {trimmed:?}: {e}")))?;
    Ok(trimmed.to_string())
}

/// Join `base` and `path` and append url-encoded query parameters.
pub fn endpoint_url(base: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    for (i, (k, v)) in query.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(&urlencoding::encode(k));
        url.push('=');
        url.push_str(&urlencoding::encode(v));
    }
    url
}

#[cfg(test)]
#[path = "../tests/provider_tests.rs"]
mod provider_tests;
