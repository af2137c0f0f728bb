//! Cross-origin headers for browser clients
//!
//! The frontend is served from a different port, so every API response
//! (errors and preflights included) carries permissive CORS headers that
//! mirror the caller's origin and requested headers.

use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, ORIGIN, VARY,
        },
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::Response,
};

pub const ALLOWED_METHODS: &str = "POST, GET, OPTIONS";

/// Middleware adding CORS headers to the inner service's response
pub async fn apply_cors_headers(request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));
    let allow_headers = request
        .headers()
        .get(ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("Content-Type"));

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(VARY, HeaderValue::from_static("Origin"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    response
}

/// `OPTIONS` handler: empty 204, no business logic
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
