use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    HttpMessage,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::Instrument;
use uuid::Uuid;

use crate::trace_ctx::{self, TraceId};

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const MAX_INBOUND_ID_LEN: usize = 64;

/// Assigns each request a trace id, exposes it to handlers through
/// `trace_ctx`, wraps the request in a span and echoes it as `x-request-id`.
///
/// A well-formed inbound `x-request-id` is reused so ids line up with a proxy.
pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id: Arc<str> = inbound_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string()).into();
        req.extensions_mut().insert(TraceId(trace_id.clone()));

        let span = tracing::info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path(),
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let header_value = HeaderValue::from_str(&trace_id).ok();
            let mut res = trace_ctx::with_trace_id(trace_id, fut.instrument(span)).await?;
            if let Some(value) = header_value {
                res.headers_mut().insert(REQUEST_ID, value);
            }
            Ok(res)
        })
    }
}

fn inbound_id(req: &ServiceRequest) -> Option<String> {
    let raw = req.headers().get(&REQUEST_ID)?.to_str().ok()?.trim();
    let well_formed = !raw.is_empty()
        && raw.len() <= MAX_INBOUND_ID_LEN
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    well_formed.then(|| raw.to_string())
}
