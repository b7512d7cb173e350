use std::time::SystemTime;

use crate::ai_sdk_core::error::{
    classify_http_error, classify_transport_error, retry_after_from_headers, SdkError,
    StructuredErrorBody, TransportError,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RouterErrorEnvelope {
    error: RouterErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct RouterErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    metadata: Option<RouterErrorMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct RouterErrorMetadata {
    #[serde(default)]
    raw: Option<Value>,
    #[serde(default)]
    provider_name: Option<String>,
}

impl RouterErrorBody {
    /// Numeric `code`, which routers set to the upstream HTTP status.
    fn status_code(&self) -> Option<u16> {
        self.code
            .as_ref()
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
            .filter(|c| (400..=599).contains(c))
    }

    /// Message with the upstream provider's raw error appended, when present.
    fn into_structured(self) -> StructuredErrorBody {
        let error_type = self
            .error_type
            .or_else(|| self.code.as_ref().and_then(Value::as_str).map(str::to_string));
        let raw = self.metadata.as_ref().and_then(|m| match m.raw.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Null => None,
            other => Some(other.to_string()),
        });
        let provider = self.metadata.and_then(|m| m.provider_name);
        let message = match (self.message, raw) {
            (Some(m), Some(raw)) if m != raw => Some(format!("{m}: {raw}")),
            (Some(m), _) => Some(m),
            (None, raw) => raw,
        }
        .map(|m| match provider {
            Some(p) => format!("{m} (provider: {p})"),
            None => m,
        });
        StructuredErrorBody {
            error_type,
            message,
        }
    }
}

fn parse_router_error(body: &str) -> Option<RouterErrorBody> {
    serde_json::from_str::<RouterErrorEnvelope>(body.trim())
        .ok()
        .map(|envelope| envelope.error)
}

/// Classify a transport failure, reading the router's error envelope
/// (`error.message`, `error.metadata.raw`) when the body carries one.
pub fn map_transport_error(te: TransportError) -> SdkError {
    let TransportError::HttpStatus {
        status,
        body,
        retry_after_ms,
        headers,
        ..
    } = &te
    else {
        return classify_transport_error(te);
    };
    let Some(parsed) = parse_router_error(body) else {
        return classify_transport_error(te);
    };
    let retry_after_ms =
        retry_after_ms.or_else(|| retry_after_from_headers(headers, SystemTime::now()));
    match classify_http_error(*status, body, retry_after_ms, Some(parsed.into_structured())) {
        SdkError::Upstream {
            status, message, ..
        } => SdkError::Upstream {
            status,
            message,
            source: Some(Box::new(te)),
        },
        other => other,
    }
}

/// Classify an error envelope delivered inside a successful (2xx) response
/// body or stream frame.
pub fn error_from_body(value: &Value) -> SdkError {
    let body = value.to_string();
    match serde_json::from_value::<RouterErrorEnvelope>(value.clone()) {
        Ok(envelope) => {
            let status = envelope.error.status_code().unwrap_or(500);
            classify_http_error(status, &body, None, Some(envelope.error.into_structured()))
        }
        Err(_) => classify_http_error(500, &body, None, None),
    }
}
