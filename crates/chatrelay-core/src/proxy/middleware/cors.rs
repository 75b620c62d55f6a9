// CORS middleware
use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization, Accept";

/// Stamp the CORS headers on every response and answer any `OPTIONS`
/// request with an empty 204 before it reaches the router.
///
/// Must answer `OPTIONS` even without `Origin`/`Access-Control-Request-Method`,
/// which `tower_http::cors::CorsLayer` passes through.
pub async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        tracing::trace!("Preflight: OPTIONS {}", request.uri().path());
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
}
