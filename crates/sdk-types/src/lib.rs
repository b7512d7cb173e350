//! Unified type definitions for the router adapters.
//!
//! This crate holds the provider-agnostic prompt model, the content-part
//! vocabulary, usage accounting and the streaming delta/part enums shared by
//! every backend dialect.

pub mod json;
pub mod usage;
pub mod v2;

use serde::{Deserialize, Serialize};

/// Basic roles for chat messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub use v2::{ContentPart, StreamDelta, StreamPart, Usage};

#[cfg(test)]
#[path = "../tests/json_tests.rs"]
mod json_tests;

#[cfg(test)]
#[path = "../tests/prompt_tests.rs"]
mod prompt_tests;

#[cfg(test)]
#[path = "../tests/usage_tests.rs"]
mod usage_tests;
