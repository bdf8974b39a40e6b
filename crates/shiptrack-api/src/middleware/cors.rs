//! CORS policy for the shipment endpoints.
//!
//! Any origin may call. Every `OPTIONS` request is answered by the layer
//! itself with 200 and the preflight headers, before authentication runs.

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

/// Request headers a browser may send.
pub const ALLOWED_HEADERS: [HeaderName; 4] = [
    AUTHORIZATION,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
    CONTENT_TYPE,
];

/// Build the CORS layer for a route serving `method`. `OPTIONS` is always
/// allowed alongside it.
pub fn layer(method: Method) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(ALLOWED_HEADERS)
        .allow_methods([method, Method::OPTIONS])
}
