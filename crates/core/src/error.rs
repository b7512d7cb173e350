use serde_json::Value;
use std::time::{Duration, SystemTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("authentication failed (status {status}): {message}")]
    Authentication { status: u16, message: String },
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error("invalid request (status {status}): {message}")]
    InvalidRequest { status: u16, message: String },
    #[error("model or route not found: {message}")]
    ModelNotFound { message: String },
    #[error("rate limited: {message}")]
    RateLimited {
        /// Milliseconds suggested by Retry-After if present
        retry_after_ms: Option<u64>,
        message: String,
    },
    #[error("server error (status {status}): {message}")]
    Server { status: u16, message: String },
    #[error("upstream error (status {status}): {message}")]
    Upstream {
        status: u16,
        message: String,
        #[source]
        source: Option<Box<TransportError>>,
    },
    #[error("decode error: {message}")]
    Decode {
        message: String,
        /// Offending payload exactly as received
        raw: String,
    },
    #[error("no content: {message}")]
    NoContent { message: String },
    #[error("timeout")]
    Timeout,
    #[error("cancelled")]
    Cancelled,
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl SdkError {
    /// Whether a caller may retry the same request unchanged. Retry policy
    /// itself belongs to the transport layer.
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::RateLimited { .. } | SdkError::Server { .. } | SdkError::Timeout => true,
            SdkError::Transport(te) => te.is_transient(),
            _ => false,
        }
    }

    /// HTTP status associated with the error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Authentication { status, .. }
            | SdkError::InvalidRequest { status, .. }
            | SdkError::Server { status, .. }
            | SdkError::Upstream { status, .. } => Some(*status),
            SdkError::ModelNotFound { .. } => Some(404),
            SdkError::RateLimited { .. } => Some(429),
            SdkError::Transport(te) => te.status(),
            _ => None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        SdkError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>, raw: impl Into<String>) -> Self {
        SdkError::Decode {
            message: message.into(),
            raw: raw.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http status {status}: {sanitized}")]
    HttpStatus {
        status: u16,
        /// upstream body (should be treated as sensitive; only log sanitized)
        body: String,
        /// Retry-After header (ms) if available
        retry_after_ms: Option<u64>,
        /// Sanitized message for display
        sanitized: String,
        /// Upstream response headers (lowercased keys where possible)
        headers: Vec<(String, String)>,
    },
    #[error("network: {0}")]
    Network(String),
    #[error("connect timeout after {0:?}")]
    ConnectTimeout(Duration),
    #[error("idle read timeout after {0:?}")]
    IdleReadTimeout(Duration),
    #[error("body read error: {0}")]
    BodyRead(String),
    #[error("invalid json body: {message}")]
    InvalidJson { message: String, body: String },
    #[error("stream closed")]
    StreamClosed,
    #[error("other: {0}")]
    Other(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            TransportError::HttpStatus { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            TransportError::Network(_)
            | TransportError::ConnectTimeout(_)
            | TransportError::IdleReadTimeout(_)
            | TransportError::StreamClosed => true,
            _ => false,
        }
    }
}

pub fn http_status_fallback_message(status: u16) -> String {
    format!("http status {status}")
}

pub fn build_http_status_transport_error(
    status: u16,
    body: String,
    retry_after_ms: Option<u64>,
    headers: Vec<(String, String)>,
) -> TransportError {
    TransportError::HttpStatus {
        status,
        sanitized: display_body_for_error(&body),
        body,
        retry_after_ms,
        headers,
    }
}

pub fn display_body_for_error(body: &str) -> String {
    let trimmed = body.trim();
    let looks_like_json = trimmed.starts_with('{') || trimmed.starts_with('[');
    if looks_like_json {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(v) => v.to_string(), // minified JSON
            Err(_) => format!("{} bytes", body.len()),
        }
    } else {
        format!("{} bytes", body.len())
    }
}

/// Parse a `Retry-After` value into milliseconds relative to `now`.
///
/// Accepts delta-seconds (`"2"`) and HTTP-dates
/// (`"Wed, 21 Oct 2026 07:28:00 GMT"`). Dates in the past yield `0`.
pub fn parse_retry_after_ms(value: &str, now: SystemTime) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(secs) = value.parse::<u64>() {
        return Some(secs.saturating_mul(1000));
    }
    if let Ok(secs) = value.parse::<f64>() {
        if secs.is_finite() && secs >= 0.0 {
            return Some((secs * 1000.0).round() as u64);
        }
        return None;
    }
    let at = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let at = SystemTime::from(at);
    Some(match at.duration_since(now) {
        Ok(delta) => delta.as_millis().min(u128::from(u64::MAX)) as u64,
        Err(_) => 0,
    })
}

/// Retry hint from response headers. `retry-after-ms` wins over `retry-after`.
pub fn retry_after_from_headers(headers: &[(String, String)], now: SystemTime) -> Option<u64> {
    let find = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    };
    if let Some(ms) = find("retry-after-ms").and_then(|v| v.trim().parse::<f64>().ok()) {
        if ms.is_finite() && ms >= 0.0 {
            return Some(ms.round() as u64);
        }
    }
    find("retry-after").and_then(|v| parse_retry_after_ms(v, now))
}

/// Error kinds shared by the status table and the structured-body `type` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    NotFound,
    InvalidRequest,
    RateLimit,
    Server,
    Other,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Authentication,
            404 => ErrorKind::NotFound,
            400 => ErrorKind::InvalidRequest,
            429 => ErrorKind::RateLimit,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Other,
        }
    }

    /// Map a structured error `type` (or string `code`) onto a kind.
    pub fn from_error_type(error_type: &str) -> Option<Self> {
        let t = error_type.trim().to_ascii_lowercase();
        let kind = match t.as_str() {
            "authentication_error" | "authentication" | "invalid_api_key" | "unauthorized"
            | "permission_error" => ErrorKind::Authentication,
            "not_found_error" | "not_found" | "model_not_found" | "invalid_model" => {
                ErrorKind::NotFound
            }
            "invalid_request_error" | "invalid_request" | "bad_request" | "validation_error" => {
                ErrorKind::InvalidRequest
            }
            "rate_limit_error" | "rate_limit_exceeded" | "rate_limited" | "too_many_requests" => {
                ErrorKind::RateLimit
            }
            "server_error" | "api_error" | "internal_error" | "internal_server_error"
            | "overloaded_error" | "service_unavailable" => ErrorKind::Server,
            _ => return None,
        };
        Some(kind)
    }
}

/// `{ "error": { "type" | "code", "message" } }` body, leniently extracted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredErrorBody {
    pub error_type: Option<String>,
    pub message: Option<String>,
}

impl StructuredErrorBody {
    pub fn parse(body: &str) -> Option<Self> {
        let value = serde_json::from_str::<Value>(body.trim()).ok()?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let err = value.get("error")?;
        if let Some(message) = err.as_str() {
            return Some(Self {
                error_type: None,
                message: Some(message.to_string()),
            });
        }
        let obj = err.as_object()?;
        let error_type = obj
            .get("type")
            .and_then(Value::as_str)
            .or_else(|| obj.get("code").and_then(Value::as_str))
            .map(str::to_string);
        let message = obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self {
            error_type,
            message,
        })
    }
}

/// Classify a failed HTTP exchange into the unified taxonomy.
///
/// A structured body is classified by its `type` first; the HTTP status is
/// the fallback. `retry_after_ms` only matters for rate limits.
pub fn classify_http_error(
    status: u16,
    body: &str,
    retry_after_ms: Option<u64>,
    structured: Option<StructuredErrorBody>,
) -> SdkError {
    let structured = structured.or_else(|| StructuredErrorBody::parse(body));
    let kind = structured
        .as_ref()
        .and_then(|s| s.error_type.as_deref())
        .and_then(ErrorKind::from_error_type)
        .unwrap_or_else(|| ErrorKind::from_status(status));
    let message = structured
        .and_then(|s| s.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                http_status_fallback_message(status)
            } else {
                display_body_for_error(body)
            }
        });

    match kind {
        ErrorKind::Authentication => SdkError::Authentication { status, message },
        ErrorKind::NotFound => SdkError::ModelNotFound { message },
        ErrorKind::InvalidRequest => SdkError::InvalidRequest { status, message },
        ErrorKind::RateLimit => SdkError::RateLimited {
            retry_after_ms,
            message,
        },
        ErrorKind::Server => SdkError::Server { status, message },
        ErrorKind::Other => SdkError::Upstream {
            status,
            message,
            source: None,
        },
    }
}

/// Map a transport failure into the unified taxonomy.
pub fn classify_transport_error(te: TransportError) -> SdkError {
    match te {
        TransportError::HttpStatus {
            status,
            body,
            retry_after_ms,
            sanitized,
            headers,
        } => {
            let retry_after_ms =
                retry_after_ms.or_else(|| retry_after_from_headers(&headers, SystemTime::now()));
            match classify_http_error(status, &body, retry_after_ms, None) {
                SdkError::Upstream {
                    status, message, ..
                } => SdkError::Upstream {
                    status,
                    message,
                    source: Some(Box::new(TransportError::HttpStatus {
                        status,
                        body,
                        retry_after_ms,
                        sanitized,
                        headers,
                    })),
                },
                other => other,
            }
        }
        TransportError::InvalidJson { message, body } => SdkError::Decode { message, raw: body },
        TransportError::ConnectTimeout(_) | TransportError::IdleReadTimeout(_) => SdkError::Timeout,
        other => SdkError::Transport(other),
    }
}
