//! Cross-origin headers for the browser contact form.
//!
//! Requests from unknown origins are still processed, they just don't get an
//! `Access-Control-Allow-Origin` header.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use tracing::debug;

const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("POST, OPTIONS");
const ALLOW_HEADERS: HeaderValue = HeaderValue::from_static("Content-Type");
const VARY_ORIGIN: HeaderValue = HeaderValue::from_static("Origin");

pub fn add<S: Clone + Send + Sync + 'static>(
    router: Router<S>,
    allowed_origins: Arc<[String]>,
) -> Router<S> {
    router.layer(from_fn_with_state(allowed_origins, middleware))
}

async fn middleware(
    State(allowed_origins): State<Arc<[String]>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();
    let allowed_origin = origin.filter(|origin| {
        let allowed = allowed_origins
            .iter()
            .any(|x| x.as_bytes() == origin.as_bytes());
        if !allowed {
            debug!(?origin, "origin not allowed");
        }
        allowed
    });

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    if let Some(origin) = allowed_origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(header::VARY, VARY_ORIGIN);
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS);
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS);

    response
}
