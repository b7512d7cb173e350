pub mod assembler;
pub mod error;
pub mod json;
pub mod options;
pub mod outcome;
pub mod stream_collect;
pub mod transport;
pub mod v2;

pub use crate::core::assembler::{AssemblerConfig, StreamAssembler};
pub use crate::core::error::{SdkError, TransportError};
pub use crate::core::outcome::{FinishSummary, StreamOutcome};

pub use crate::core::v2::{GenerateResponse, LanguageModel, PartStream, StreamResponse};
pub use crate::ai_sdk_types::v2 as types;

#[cfg(test)]
#[path = "../tests/assembler_tests.rs"]
mod assembler_tests;

#[cfg(test)]
#[path = "../tests/json_tests.rs"]
mod json_tests;

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod options_tests;

#[cfg(test)]
#[path = "../tests/outcome_tests.rs"]
mod outcome_tests;

#[cfg(test)]
#[path = "../tests/stream_collect_tests.rs"]
mod stream_collect_tests;

#[cfg(test)]
#[path = "../tests/transport_tests.rs"]
mod transport_tests;
