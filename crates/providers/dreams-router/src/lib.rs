//! Dreams Router provider.
//!
//! A payment-gated router. Authentication is whatever the caller's
//! [`HeaderSource`](crate::ai_sdk_provider::HeaderSource) produces per request:
//! a bearer token obtained from a wallet login, or an `X-PAYMENT` header
//! signed for the next call. Without one, `DREAMSROUTER_API_KEY` is used.

pub mod provider;

pub use provider::{DreamsRouterProvider, DreamsRouterProviderBuilder, DREAMS_ROUTER_PROFILE};

/// Models created by [`DreamsRouterProvider`].
pub type DreamsRouterLanguageModel<T = crate::reqwest_transport::ReqwestTransport> =
    crate::provider_openrouter::OpenRouterLanguageModel<T>;

#[cfg(test)]
#[path = "../tests/provider_tests.rs"]
mod provider_tests;
