//! Provider-agnostic prompt, content, usage and streaming types.
//! These mirror the language-model surface the host SDK speaks and are
//! converted to and from each backend dialect by the provider crates.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::types::Role;

// ---------- Provider plumbing ----------

/// Provider-specific input options passed through to providers.
/// Outer key is the provider id; inner keys are provider-defined option names.
use std::collections::HashMap;

pub type ProviderOptions = HashMap<String, HashMap<String, JsonValue>>;

/// Provider-specific output metadata passed through from providers.
/// Outer key is the provider id; inner keys are provider-defined metadata keys.
pub type ProviderMetadata = HashMap<String, HashMap<String, JsonValue>>;

/// HTTP headers map for response metadata.
pub type Headers = HashMap<String, String>;

pub(crate) fn headers_is_empty(map: &HashMap<String, String>) -> bool {
    map.is_empty()
}

pub(crate) fn provider_options_is_empty(map: &ProviderOptions) -> bool {
    map.is_empty()
}

pub(crate) fn bool_is_false(value: &bool) -> bool {
    !*value
}

/// Look up a single provider option value under `scope`.
pub fn provider_option<'a>(
    options: &'a Option<ProviderOptions>,
    scope: &str,
    key: &str,
) -> Option<&'a JsonValue> {
    options.as_ref()?.get(scope)?.get(key)
}

/// Insert `value` under `scope.key`, creating the scope map when missing.
pub fn insert_provider_metadata(
    metadata: &mut ProviderMetadata,
    scope: &str,
    key: impl Into<String>,
    value: JsonValue,
) {
    metadata
        .entry(scope.to_string())
        .or_default()
        .insert(key.into(), value);
}

/// Merge `other` into `target`; inner keys from `other` win.
pub fn merge_provider_metadata(target: &mut ProviderMetadata, other: ProviderMetadata) {
    for (scope, values) in other {
        target.entry(scope).or_default().extend(values);
    }
}

// ---------- Prompt ----------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum PromptMessage {
    System {
        content: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    User {
        content: Vec<UserPart>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    Assistant {
        content: Vec<AssistantPart>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    Tool {
        content: Vec<ToolMessagePart>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
}

impl PromptMessage {
    pub fn system(text: impl Into<String>) -> Self {
        PromptMessage::System {
            content: text.into(),
            provider_options: None,
        }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        PromptMessage::User {
            content: vec![UserPart::text(text)],
            provider_options: None,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            PromptMessage::System { .. } => Role::System,
            PromptMessage::User { .. } => Role::User,
            PromptMessage::Assistant { .. } => Role::Assistant,
            PromptMessage::Tool { .. } => Role::Tool,
        }
    }

    pub fn provider_options(&self) -> &Option<ProviderOptions> {
        match self {
            PromptMessage::System {
                provider_options, ..
            }
            | PromptMessage::User {
                provider_options, ..
            }
            | PromptMessage::Assistant {
                provider_options, ..
            }
            | PromptMessage::Tool {
                provider_options, ..
            } => provider_options,
        }
    }
}

pub type Prompt = Vec<PromptMessage>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UserPart {
    Text {
        text: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        data: DataContent,
        #[serde(rename = "mediaType")]
        media_type: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
}

impl UserPart {
    pub fn text(text: impl Into<String>) -> Self {
        UserPart::Text {
            text: text.into(),
            provider_options: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AssistantPart {
    Text {
        text: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    Reasoning {
        text: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        data: DataContent,
        #[serde(rename = "mediaType")]
        media_type: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    ToolCall(ToolCallPart),
    ToolResult(ToolResultPart),
}

/// File payload: a URL, a base64 string, or raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DataContent {
    /// Base64-encoded data string
    Base64 { base64: String },
    /// Raw bytes
    Bytes {
        #[serde(with = "serde_bytes")]
        bytes: Vec<u8>,
    },
    /// URL string
    Url { url: String },
}

impl From<Vec<u8>> for DataContent {
    fn from(bytes: Vec<u8>) -> Self {
        DataContent::Bytes { bytes }
    }
}

impl From<url::Url> for DataContent {
    fn from(url: url::Url) -> Self {
        DataContent::Url { url: url.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallPart {
    #[serde(rename = "toolCallId")]
    pub tool_call_id: String,
    #[serde(rename = "toolName")]
    pub tool_name: String,
    /// Tool input. A JSON string is forwarded verbatim as the argument
    /// string; any other value is serialized.
    pub input: JsonValue,
    #[serde(default, rename = "providerExecuted", skip_serializing_if = "bool_is_false")]
    pub provider_executed: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "providerMetadata"
    )]
    pub provider_metadata: Option<ProviderMetadata>,
    #[serde(default, skip_serializing_if = "bool_is_false")]
    pub dynamic: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "providerOptions"
    )]
    pub provider_options: Option<ProviderOptions>,
}

impl ToolCallPart {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: JsonValue) -> Self {
        Self {
            tool_call_id: id.into(),
            tool_name: name.into(),
            input,
            provider_executed: false,
            provider_metadata: None,
            dynamic: false,
            provider_options: None,
        }
    }

    /// Argument string as sent on the wire.
    pub fn arguments_string(&self) -> String {
        match &self.input {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ToolResultOutput {
    Text {
        value: String,
    },
    Json {
        value: JsonValue,
    },
    ErrorText {
        value: String,
    },
    ErrorJson {
        value: JsonValue,
    },
    Content {
        value: Vec<ToolResultInlineContent>,
    },
    ExecutionDenied {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ToolResultInlineContent {
    Text {
        text: String,
    },
    Media {
        data: String,
        #[serde(rename = "mediaType")]
        media_type: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResultPart {
    #[serde(rename = "toolCallId")]
    pub tool_call_id: String,
    #[serde(rename = "toolName")]
    pub tool_name: String,
    pub output: ToolResultOutput,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "providerOptions"
    )]
    pub provider_options: Option<ProviderOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ToolMessagePart {
    ToolResult(ToolResultPart),
    ToolApprovalResponse(ToolApprovalResponsePart),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolApprovalResponsePart {
    #[serde(rename = "approvalId")]
    pub approval_id: String,
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "providerOptions"
    )]
    pub provider_options: Option<ProviderOptions>,
}

// ---------- Unified content part ----------

/// One unified content part, independent of the message role that carried it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentPart {
    Text {
        text: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        data: DataContent,
        #[serde(rename = "mediaType")]
        media_type: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    Reasoning {
        text: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    ToolCall(ToolCallPart),
    ToolResult(ToolResultPart),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text {
            text: text.into(),
            provider_options: None,
        }
    }

    /// Wire tag of this part.
    pub fn tag(&self) -> &'static str {
        match self {
            ContentPart::Text { .. } => "text",
            ContentPart::File { .. } => "file",
            ContentPart::Reasoning { .. } => "reasoning",
            ContentPart::ToolCall(_) => "tool-call",
            ContentPart::ToolResult(_) => "tool-result",
        }
    }

    pub fn provider_options(&self) -> &Option<ProviderOptions> {
        match self {
            ContentPart::Text {
                provider_options, ..
            }
            | ContentPart::File {
                provider_options, ..
            }
            | ContentPart::Reasoning {
                provider_options, ..
            } => provider_options,
            ContentPart::ToolCall(tc) => &tc.provider_options,
            ContentPart::ToolResult(tr) => &tr.provider_options,
        }
    }
}

impl From<UserPart> for ContentPart {
    fn from(part: UserPart) -> Self {
        match part {
            UserPart::Text {
                text,
                provider_options,
            } => ContentPart::Text {
                text,
                provider_options,
            },
            UserPart::File {
                filename,
                data,
                media_type,
                provider_options,
            } => ContentPart::File {
                filename,
                data,
                media_type,
                provider_options,
            },
        }
    }
}

impl From<AssistantPart> for ContentPart {
    fn from(part: AssistantPart) -> Self {
        match part {
            AssistantPart::Text {
                text,
                provider_options,
            } => ContentPart::Text {
                text,
                provider_options,
            },
            AssistantPart::Reasoning {
                text,
                provider_options,
            } => ContentPart::Reasoning {
                text,
                provider_options,
            },
            AssistantPart::File {
                filename,
                data,
                media_type,
                provider_options,
            } => ContentPart::File {
                filename,
                data,
                media_type,
                provider_options,
            },
            AssistantPart::ToolCall(tc) => ContentPart::ToolCall(tc),
            AssistantPart::ToolResult(tr) => ContentPart::ToolResult(tr),
        }
    }
}

impl From<ToolResultPart> for ContentPart {
    fn from(part: ToolResultPart) -> Self {
        ContentPart::ToolResult(part)
    }
}

// ---------- Call options ----------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CallOptions {
    pub prompt: Prompt,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub top_p: Option<f32>,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub presence_penalty: Option<f32>,
    #[serde(default)]
    pub frequency_penalty: Option<f32>,
    #[serde(default)]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub response_format: Option<ResponseFormat>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub tool_choice: Option<ToolChoice>,
    #[serde(default)]
    pub include_raw_chunks: bool,
    #[serde(default, skip_serializing_if = "headers_is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "provider_options_is_empty")]
    pub provider_options: ProviderOptions,
}

impl CallOptions {
    pub fn new(prompt: Prompt) -> Self {
        Self {
            prompt,
            ..Default::default()
        }
    }
    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }
    pub fn with_max_output_tokens(mut self, n: u32) -> Self {
        self.max_output_tokens = Some(n);
        self
    }
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }
    /// Set a provider option under `scope`, replacing any previous value for `key`.
    pub fn with_provider_option(
        mut self,
        scope: impl Into<String>,
        key: impl Into<String>,
        value: JsonValue,
    ) -> Self {
        self.provider_options
            .entry(scope.into())
            .or_default()
            .insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseFormat {
    Text,
    Json {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<JsonValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "inputSchema")]
    pub input_schema: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "providerOptions"
    )]
    pub provider_options: Option<ProviderOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Tool {
    Function(FunctionTool),
    Provider(ProviderTool),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderTool {
    /// The provider tool id, formatted as "<provider>.<tool>".
    pub id: String,
    /// The custom tool name exposed to the model.
    pub name: String,
    /// Provider-defined tool arguments.
    #[serde(default)]
    pub args: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ToolChoice {
    Auto,
    None,
    Required,
    Tool {
        #[serde(rename = "toolName")]
        name: String,
    },
}

// ---------- Warnings / finish / usage ----------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CallWarning {
    UnsupportedSetting {
        setting: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    UnsupportedTool {
        tool_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    Other {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    Error,
    Other,
    Unknown,
}

impl Default for FinishReason {
    fn default() -> Self {
        FinishReason::Unknown
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InputTokensDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write_tokens: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputTokensDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u64>,
}

/// Token and cost accounting for one call.
///
/// Every field is optional: an absent backend field stays `None` and is never
/// reported as zero.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens_details: Option<InputTokensDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens_details: Option<OutputTokensDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "costUSD")]
    pub cost_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_byok: Option<bool>,
    /// Backend usage object exactly as received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<JsonValue>,
}

impl Usage {
    pub fn cached_input_tokens(&self) -> Option<u64> {
        self.input_tokens_details.as_ref()?.cached_tokens
    }

    pub fn cache_write_tokens(&self) -> Option<u64> {
        self.input_tokens_details.as_ref()?.cache_write_tokens
    }

    pub fn reasoning_tokens(&self) -> Option<u64> {
        self.output_tokens_details.as_ref()?.reasoning_tokens
    }

    pub fn is_empty(&self) -> bool {
        *self == Usage::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResponseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

// ---------- Model outputs ----------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Content {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    Reasoning {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    File {
        media_type: String,
        data: String,
    },
    SourceUrl {
        id: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    ToolCall(ToolCallPart),
    ToolResult {
        tool_call_id: String,
        tool_name: String,
        result: JsonValue,
        #[serde(default)]
        is_error: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
}

// ---------- Streaming ----------

/// One wire-neutral fragment decoded from a backend stream.
///
/// Chunk parsers translate backend frames into these; the stream assembler
/// turns them into ordered [`StreamPart`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamDelta {
    ResponseMetadata(ResponseMetadata),
    TextDelta {
        delta: String,
    },
    ReasoningDelta {
        delta: String,
        /// Structured reasoning entries (summaries, encrypted blobs) carried
        /// alongside the text.
        details: Vec<JsonValue>,
    },
    /// Partial tool call keyed by its positional index. `id` and `name` may
    /// be absent on any fragment.
    ToolCallDelta {
        index: usize,
        id: Option<String>,
        name: Option<String>,
        arguments: String,
    },
    /// The backend signalled the call at `index` complete.
    ToolCallEnd {
        index: usize,
    },
    /// A tool call delivered whole.
    ToolCall {
        id: String,
        name: String,
        arguments: String,
    },
    ToolResult {
        tool_call_id: String,
        tool_name: String,
        result: JsonValue,
        is_error: bool,
    },
    Source {
        id: String,
        url: String,
        title: Option<String>,
    },
    File {
        media_type: String,
        data: String,
    },
    /// Finish reason reported ahead of the terminal frame.
    FinishReason(FinishReason),
    Usage {
        usage: Usage,
        provider_metadata: Option<ProviderMetadata>,
    },
    /// Terminal frame. Missing fields fall back to values recorded earlier.
    Finish {
        finish_reason: Option<FinishReason>,
        usage: Option<Usage>,
        provider_metadata: Option<ProviderMetadata>,
    },
    Error(JsonValue),
    Raw(JsonValue),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamPart {
    // Text
    TextStart {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    TextDelta {
        id: String,
        delta: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    TextEnd {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    // Reasoning
    ReasoningStart {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    ReasoningDelta {
        id: String,
        delta: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    ReasoningEnd {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    // Tool input + calls/results
    ToolInputStart {
        id: String,
        tool_name: String,
        #[serde(default, rename = "providerExecuted")]
        provider_executed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    ToolInputDelta {
        id: String,
        delta: String,
        #[serde(default, rename = "providerExecuted")]
        provider_executed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    ToolInputEnd {
        id: String,
        #[serde(default, rename = "providerExecuted")]
        provider_executed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    ToolCall(ToolCallPart),
    ToolResult {
        tool_call_id: String,
        tool_name: String,
        result: JsonValue,
        #[serde(default)]
        is_error: bool,
        #[serde(default, skip_serializing_if = "bool_is_false")]
        preliminary: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    // Files and sources
    File {
        media_type: String,
        data: String,
    },
    SourceUrl {
        id: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    // Stream lifecycle and metadata
    StreamStart {
        warnings: Vec<CallWarning>,
    },
    ResponseMetadata {
        #[serde(flatten)]
        meta: ResponseMetadata,
    },
    Finish {
        usage: Usage,
        finish_reason: FinishReason,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    // Raw and error passthroughs
    Raw {
        raw_value: JsonValue,
    },
    Error {
        error: JsonValue,
    },
}
