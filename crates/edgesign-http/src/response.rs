//! Response construction: JSON envelopes and CORS headers.

use serde::Serialize;
use tracing::error;

use crate::body::EdgesignResponseBody;
use crate::error::ServiceError;
use crate::model::{ErrorOutput, NotFoundOutput};

/// Content type for every JSON response.
pub const CONTENT_TYPE: &str = "application/json";

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Serialize `value` into a JSON response with `status`.
#[must_use]
pub fn json_response<T: Serialize>(
    status: http::StatusCode,
    value: &T,
) -> http::Response<EdgesignResponseBody> {
    match serde_json::to_vec(value) {
        Ok(json) => http::Response::builder()
            .status(status)
            .header("content-type", CONTENT_TYPE)
            .body(EdgesignResponseBody::from_bytes(json))
            .expect("valid JSON response"),
        Err(e) => {
            error!(error = %e, "Failed to serialize response body");
            error_to_response(&ServiceError::internal("failed to serialize response"))
        }
    }
}

/// Render a [`ServiceError`] as `{"success":false,"error":...}`.
#[must_use]
pub fn error_to_response(err: &ServiceError) -> http::Response<EdgesignResponseBody> {
    let json = serde_json::to_vec(&ErrorOutput {
        success: false,
        error: err.message.clone(),
    })
    .expect("JSON serialization of error cannot fail");

    http::Response::builder()
        .status(err.status_code())
        .header("content-type", CONTENT_TYPE)
        .body(EdgesignResponseBody::from_bytes(json))
        .expect("valid error response")
}

/// The 404 body `{"error":"Not Found","path":...}`.
#[must_use]
pub fn not_found(path: &str) -> http::Response<EdgesignResponseBody> {
    json_response(
        http::StatusCode::NOT_FOUND,
        &NotFoundOutput {
            error: "Not Found",
            path: path.to_owned(),
        },
    )
}

/// Empty 200 answer to a CORS preflight.
#[must_use]
pub fn preflight() -> http::Response<EdgesignResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .body(EdgesignResponseBody::empty())
        .expect("valid preflight response")
}

/// Add the CORS and request-id headers every response carries.
#[must_use]
pub fn add_common_headers(
    mut response: http::Response<EdgesignResponseBody>,
    request_id: &str,
) -> http::Response<EdgesignResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, hv);
    }

    headers.insert(
        "access-control-allow-origin",
        http::HeaderValue::from_static("*"),
    );
    headers.insert(
        "access-control-allow-methods",
        http::HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        "access-control-allow-headers",
        http::HeaderValue::from_static(ALLOW_HEADERS),
    );

    response
}
