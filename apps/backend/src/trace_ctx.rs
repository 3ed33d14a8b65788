//! Per-request trace id, readable from anywhere inside the request future.
//!
//! `RequestTrace` establishes the scope; error rendering reads it so every
//! problem-details body carries the id the client saw in `x-request-id`.

use std::sync::Arc;

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: Arc<str>;
}

/// Trace id stored in request extensions for middleware further down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub Arc<str>);

impl TraceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Current trace id, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|id| id.to_string())
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Run `future` with `trace_id` as the current trace id.
pub async fn with_trace_id<F, R>(trace_id: Arc<str>, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
