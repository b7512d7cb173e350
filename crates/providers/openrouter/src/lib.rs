//! OpenRouter provider: chat-completions and responses-API dialects.
//!
//! The conversion core (part converters, message converters, request
//! builder, usage and finish-reason normalization, error classification) is
//! shared by every OpenAI-shaped router; LLM Gateway and Dreams Router reuse
//! it with their own [`RouterProfile`].

pub mod config;
pub mod error;
mod extract;
pub mod finish_reason;
pub mod language_model;
pub mod parts;
pub mod prepare_tools;
pub mod provider;
pub mod request;
pub mod settings;
pub mod usage;
pub mod chat {
    pub mod convert;
    pub mod response;
    pub mod stream;
}
pub mod responses {
    pub mod convert;
    pub mod response;
    pub mod stream;
}

pub use config::{OpenRouterConfig, RouterProfile, OPENROUTER_PROFILE};
pub use language_model::OpenRouterLanguageModel;
pub use parts::{backend_to_part, part_to_backend, BackendFragment, Dialect, PartContext};
pub use provider::{OpenRouterProvider, OpenRouterProviderBuilder};
pub use settings::OpenRouterModelSettings;

#[cfg(test)]
#[path = "../tests/support.rs"]
pub(crate) mod support;

#[cfg(test)]
#[path = "../tests/parts_tests.rs"]
mod parts_tests;

#[cfg(test)]
#[path = "../tests/convert_tests.rs"]
mod convert_tests;

#[cfg(test)]
#[path = "../tests/request_tests.rs"]
mod request_tests;

#[cfg(test)]
#[path = "../tests/normalize_tests.rs"]
mod normalize_tests;

#[cfg(test)]
#[path = "../tests/chat_stream_tests.rs"]
mod chat_stream_tests;

#[cfg(test)]
#[path = "../tests/responses_stream_tests.rs"]
mod responses_stream_tests;

#[cfg(test)]
#[path = "../tests/language_model_tests.rs"]
mod language_model_tests;
