//! LLM Gateway provider.
//!
//! An OpenAI-compatible router that speaks the chat-completions dialect and
//! always reports usage on streams. Conversion is shared with the OpenRouter
//! provider; this crate only pins the gateway's endpoint, scope and key.

pub mod provider;

pub use provider::{LlmGatewayProvider, LlmGatewayProviderBuilder, LLM_GATEWAY_PROFILE};

/// Models created by [`LlmGatewayProvider`].
pub type LlmGatewayLanguageModel<T = crate::reqwest_transport::ReqwestTransport> =
    crate::provider_openrouter::OpenRouterLanguageModel<T>;

#[cfg(test)]
#[path = "../tests/provider_tests.rs"]
mod provider_tests;
