#[path = "../crates/sdk-types/src/lib.rs"]
pub mod types;
#[path = "../crates/core/src/lib.rs"]
pub mod core;
#[path = "../crates/streaming-sse/src/lib.rs"]
pub mod streaming_sse;
#[path = "../crates/provider/src/lib.rs"]
pub mod provider;
#[path = "../crates/transports/reqwest/src/lib.rs"]
pub mod transport_reqwest;

#[path = "../crates/providers/openrouter/src/lib.rs"]
pub mod provider_openrouter;
#[path = "../crates/providers/llm-gateway/src/lib.rs"]
pub mod provider_llm_gateway;
#[path = "../crates/providers/dreams-router/src/lib.rs"]
pub mod provider_dreams_router;

pub mod transports {
    pub use crate::transport_reqwest as reqwest;
}

pub mod providers {
    pub use crate::provider_dreams_router as dreams_router;
    pub use crate::provider_llm_gateway as llm_gateway;
    pub use crate::provider_openrouter as openrouter;
}

pub(crate) use crate::core as ai_sdk_core;
pub(crate) use crate::provider as ai_sdk_provider;
pub(crate) use crate::streaming_sse as ai_sdk_streaming_sse;
pub(crate) use crate::transport_reqwest as reqwest_transport;
pub(crate) use crate::types as ai_sdk_types;
