//! Assertions on RFC 7807 error bodies, without depending on backend types.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Mirror of the backend's problem-details body.
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Assert `resp` is a problem-details error with the given code and status,
/// and that its `trace_id` matches the `x-trace-id` header (and
/// `x-request-id`, when the request went through the tracing middleware).
///
/// Returns the parsed body for further checks.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> ProblemDetails {
    assert_eq!(resp.status(), expected_status, "unexpected HTTP status");

    let headers = resp.headers().clone();
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(content_type, "application/problem+json");

    let body = actix_web::test::read_body(resp).await;
    let problem: ProblemDetails = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "body is not problem details ({e}): {}",
            String::from_utf8_lossy(&body)
        )
    });

    let header_trace = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present");
    assert_eq!(problem.trace_id, header_trace, "body trace_id vs x-trace-id");
    if let Some(request_id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        assert_eq!(problem.trace_id, request_id, "body trace_id vs x-request-id");
    }

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    if let Some(expected) = expected_detail_contains {
        assert!(
            problem.detail.contains(expected),
            "expected detail to contain '{expected}', got '{}'",
            problem.detail
        );
    }
    problem
}
