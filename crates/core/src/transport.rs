use crate::core::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use serde_json::Value;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime};

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Whole-request deadline; `None` relies on the connect and idle limits.
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Duration,
    /// Longest gap allowed between two streamed chunks.
    pub idle_read_timeout: Duration,
    /// Drop object fields whose value is null before sending.
    pub strip_null_fields: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            connect_timeout: Duration::from_secs(10),
            idle_read_timeout: Duration::from_secs(45),
            strip_null_fields: true,
        }
    }
}

/// Headers never handed to observers verbatim.
const SENSITIVE_HEADERS: [&str; 4] = ["authorization", "x-payment", "x-api-key", "cookie"];

/// Replace credential-bearing header values with `[redacted]`.
pub fn redact_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| {
            if SENSITIVE_HEADERS.iter().any(|s| k.eq_ignore_ascii_case(s)) {
                (k.clone(), "[redacted]".to_string())
            } else {
                (k.clone(), v.clone())
            }
        })
        .collect()
}

/// One finished HTTP exchange as seen by a [`TransportObserver`].
///
/// Request headers are already redacted. Streaming exchanges are reported
/// when the response head arrives, so they carry no response body.
#[derive(Debug, Clone)]
pub struct TransportEvent {
    pub started_at: SystemTime,
    pub latency: Duration,
    pub url: String,
    pub status: Option<u16>,
    pub request_headers: Vec<(String, String)>,
    pub response_headers: Vec<(String, String)>,
    pub request_body: Value,
    pub response_body: Option<String>,
    pub error: Option<String>,
    pub is_stream: bool,
}

/// Host hook for request timing and auditing.
pub trait TransportObserver: Send + Sync {
    fn on_event(&self, event: TransportEvent);
}

static TRANSPORT_OBSERVER: OnceLock<Arc<dyn TransportObserver>> = OnceLock::new();

/// Install the process-wide observer. Returns false if one is already set.
pub fn set_transport_observer(observer: Arc<dyn TransportObserver>) -> bool {
    TRANSPORT_OBSERVER.set(observer).is_ok()
}

pub fn emit_transport_event(event: TransportEvent) {
    if let Some(observer) = TRANSPORT_OBSERVER.get() {
        observer.on_event(event);
    }
}

pub fn has_transport_observer() -> bool {
    TRANSPORT_OBSERVER.get().is_some()
}

/// HTTP seam under every router model.
///
/// Implementations make exactly one attempt and map non-2xx responses to
/// [`TransportError::HttpStatus`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Successful streaming response before it is split into bytes and headers.
    type StreamResponse: Send;

    fn into_stream(resp: Self::StreamResponse) -> (ByteStream, Vec<(String, String)>);

    async fn post_json_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<Self::StreamResponse, TransportError>;

    /// JSON POST returning the parsed body and response headers. A body that
    /// is not valid JSON surfaces as [`TransportError::InvalidJson`].
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError>;
}
