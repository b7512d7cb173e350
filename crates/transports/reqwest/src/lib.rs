//! Default [`HttpTransport`] over `reqwest` (rustls, native roots).
//!
//! One attempt per call. Non-2xx responses become
//! [`TransportError::HttpStatus`] carrying the body, the headers and the
//! parsed retry hint.

use crate::ai_sdk_core::error::{
    build_http_status_transport_error, retry_after_from_headers, TransportError,
};
use crate::ai_sdk_core::json::without_null_fields;
use crate::ai_sdk_core::transport::{
    emit_transport_event, has_transport_observer, redact_headers, ByteStream, HttpTransport,
    TransportConfig, TransportEvent,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::Value;
use std::error::Error as StdError;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, warn};

const TARGET: &str = "ai_sdk::transport::reqwest";

/// Clones share the connection pool.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client tuned for long-lived streaming connections.
    ///
    /// `cfg.request_timeout` is applied per request instead, so one client
    /// can serve providers with different deadlines.
    pub fn try_new(cfg: &TransportConfig) -> Result<Self, TransportError> {
        Self::from_builder(Client::builder(), cfg)
    }

    pub fn new(cfg: &TransportConfig) -> Self {
        match Self::try_new(cfg) {
            Ok(transport) => transport,
            Err(err) => {
                warn!(target: TARGET, error = %err, "using an untuned reqwest client");
                Self::with_client(Client::new())
            }
        }
    }

    /// Wrap a caller-configured client (proxies, custom roots).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn from_builder(
        builder: reqwest::ClientBuilder,
        cfg: &TransportConfig,
    ) -> Result<Self, TransportError> {
        let client = builder
            .connect_timeout(cfg.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .build()
            .map_err(|err| {
                TransportError::Other(format!(
                    "reqwest client build failed: {}",
                    error_chain(&err)
                ))
            })?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        call: &Call<'_>,
        cfg: &TransportConfig,
    ) -> Result<(reqwest::Response, Vec<(String, String)>), TransportError> {
        let mut req = self.client.post(call.url).json(&call.body);
        if let Some(timeout) = cfg.request_timeout {
            req = req.timeout(timeout);
        }
        for (k, v) in call.headers {
            // .json() sets the content type
            if !k.eq_ignore_ascii_case("content-type") {
                req = req.header(k, v);
            }
        }

        let resp = req.send().await.map_err(|e| {
            let detail = error_chain(&e);
            debug!(target: TARGET, url = call.url, %detail, "send failed");
            call.report(None, Vec::new(), None, Some(detail.clone()));
            if e.is_timeout() && !e.is_connect() {
                TransportError::ConnectTimeout(cfg.connect_timeout)
            } else {
                TransportError::Network(detail)
            }
        })?;

        let status = resp.status().as_u16();
        let headers = header_pairs(resp.headers());
        if resp.status().is_success() {
            return Ok((resp, headers));
        }

        let retry_after_ms = retry_after_from_headers(&headers, SystemTime::now());
        let body = resp.text().await.unwrap_or_default();
        debug!(target: TARGET, status, ?retry_after_ms, "non-success response");
        let err =
            build_http_status_transport_error(status, body.clone(), retry_after_ms, headers.clone());
        call.report(Some(status), headers, Some(body), Some(err.to_string()));
        Err(err)
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

/// One outgoing request plus what the observer needs to report it.
struct Call<'a> {
    url: &'a str,
    headers: &'a [(String, String)],
    body: Value,
    is_stream: bool,
    started_at: SystemTime,
    start: Instant,
}

impl<'a> Call<'a> {
    fn new(
        url: &'a str,
        headers: &'a [(String, String)],
        body: &Value,
        cfg: &TransportConfig,
        is_stream: bool,
    ) -> Self {
        let body = if cfg.strip_null_fields {
            without_null_fields(body)
        } else {
            body.clone()
        };
        Self {
            url,
            headers,
            body,
            is_stream,
            started_at: SystemTime::now(),
            start: Instant::now(),
        }
    }

    fn report(
        &self,
        status: Option<u16>,
        response_headers: Vec<(String, String)>,
        response_body: Option<String>,
        error: Option<String>,
    ) {
        if !has_transport_observer() {
            return;
        }
        emit_transport_event(TransportEvent {
            started_at: self.started_at,
            latency: self.start.elapsed(),
            url: self.url.to_string(),
            status,
            request_headers: redact_headers(self.headers),
            response_headers,
            request_body: self.body.clone(),
            response_body,
            error,
            is_stream: self.is_stream,
        });
    }
}

/// Fail the stream when no chunk arrives within `idle`.
fn idle_guarded<S>(inner: S, idle: Duration) -> ByteStream
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        futures_util::pin_mut!(inner);
        loop {
            let next = tokio::time::timeout(idle, inner.next())
                .await
                .map_err(|_| TransportError::IdleReadTimeout(idle))?;
            match next {
                None => break,
                Some(Ok(bytes)) => yield bytes,
                Some(Err(e)) if e.is_timeout() => Err(TransportError::IdleReadTimeout(idle))?,
                Some(Err(e)) => Err(TransportError::BodyRead(error_chain(&e)))?,
            }
        }
    })
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    type StreamResponse = (ByteStream, Vec<(String, String)>);

    fn into_stream(resp: Self::StreamResponse) -> (ByteStream, Vec<(String, String)>) {
        resp
    }

    async fn post_json_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<Self::StreamResponse, TransportError> {
        let call = Call::new(url, headers, body, cfg, true);
        let (resp, res_headers) = self.send(&call, cfg).await?;
        call.report(Some(resp.status().as_u16()), res_headers.clone(), None, None);
        Ok((
            idle_guarded(resp.bytes_stream(), cfg.idle_read_timeout),
            res_headers,
        ))
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        let call = Call::new(url, headers, body, cfg, false);
        let (resp, res_headers) = self.send(&call, cfg).await?;
        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| TransportError::BodyRead(error_chain(&e)))?;
        let parsed = serde_json::from_str::<Value>(&text);
        let error = parsed.as_ref().err().map(|e| format!("invalid json: {e}"));
        call.report(Some(status), res_headers.clone(), Some(text.clone()), error);
        match parsed {
            Ok(json) => Ok((json, res_headers)),
            Err(e) => Err(TransportError::InvalidJson {
                message: e.to_string(),
                body: text,
            }),
        }
    }
}

fn header_pairs(headers: &http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
        .collect()
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}
