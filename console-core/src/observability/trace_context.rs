//! Outgoing trace propagation for document API calls.
//!
//! Requests carry W3C `traceparent`/`tracestate` for the current span when it
//! is being exported, plus an `x-request-id` used to correlate client and
//! server logs (https://www.w3.org/TR/trace-context/).

use opentelemetry::trace::TraceContextExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, IntoUrl, RequestBuilder, Response};
use tracing_opentelemetry::OpenTelemetrySpanExt;
use uuid::Uuid;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Add `traceparent`/`tracestate` for the active span.
///
/// Leaves `headers` untouched when no OpenTelemetry context is attached,
/// which is the case whenever OTLP export is off.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let context = tracing::Span::current().context();
    let span_ref = context.span();
    let span = span_ref.span_context();
    if !span.is_valid() {
        return;
    }

    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span.trace_id(),
        span.span_id(),
        span.trace_flags().to_u8()
    );
    if let Ok(value) = HeaderValue::from_str(&traceparent) {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let tracestate = span.trace_state().header();
    if tracestate.is_empty() {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(&tracestate) {
        headers.insert(TRACESTATE_HEADER, value);
    }
}

/// Trace context plus the correlation id; an id that is not a valid header
/// value is skipped.
pub fn inject_trace_headers(headers: &mut HeaderMap, request_id: &str) {
    inject_trace_context(headers);
    if let Ok(value) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
}

/// A request whose trace headers are attached when it is sent, so they
/// reflect the span active at send time rather than at build time.
pub struct TracedRequest(RequestBuilder);

impl TracedRequest {
    pub fn new(request: RequestBuilder) -> Self {
        Self(request)
    }

    fn map(self, f: impl FnOnce(RequestBuilder) -> RequestBuilder) -> Self {
        Self(f(self.0))
    }

    pub fn json<T: serde::Serialize + ?Sized>(self, body: &T) -> Self {
        self.map(|request| request.json(body))
    }

    pub fn query<T: serde::Serialize + ?Sized>(self, query: &T) -> Self {
        self.map(|request| request.query(query))
    }

    pub fn bearer_auth<T: std::fmt::Display>(self, token: T) -> Self {
        self.map(|request| request.bearer_auth(token))
    }

    /// Send under a fresh request id, returned for logging.
    pub async fn send(self) -> (String, Result<Response, reqwest::Error>) {
        let request_id = Uuid::new_v4().to_string();
        let result = self.send_with_request_id(&request_id).await;
        (request_id, result)
    }

    pub async fn send_with_request_id(self, request_id: &str) -> Result<Response, reqwest::Error> {
        let mut trace_headers = HeaderMap::new();
        inject_trace_headers(&mut trace_headers, request_id);
        self.0.headers(trace_headers).send().await
    }
}

/// `traced_*` counterparts of `Client::get`/`post`/`put`/`delete`.
pub trait TracedClientExt {
    fn traced_get<U: IntoUrl>(&self, url: U) -> TracedRequest;
    fn traced_post<U: IntoUrl>(&self, url: U) -> TracedRequest;
    fn traced_put<U: IntoUrl>(&self, url: U) -> TracedRequest;
    fn traced_delete<U: IntoUrl>(&self, url: U) -> TracedRequest;
}

impl TracedClientExt for Client {
    fn traced_get<U: IntoUrl>(&self, url: U) -> TracedRequest {
        TracedRequest::new(self.get(url))
    }

    fn traced_post<U: IntoUrl>(&self, url: U) -> TracedRequest {
        TracedRequest::new(self.post(url))
    }

    fn traced_put<U: IntoUrl>(&self, url: U) -> TracedRequest {
        TracedRequest::new(self.put(url))
    }

    fn traced_delete<U: IntoUrl>(&self, url: U) -> TracedRequest {
        TracedRequest::new(self.delete(url))
    }
}
