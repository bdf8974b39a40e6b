//! # shiptrack-api: Shipment Tracking HTTP Service
//!
//! Authenticated users create shipments, list their own, and look up any
//! shipment by tracking number. Identity comes from the managed platform's
//! identity provider; rows live behind the platform's REST endpoint, a direct
//! Postgres pool, or an in-memory map for development.
//!
//! ## API Surface
//!
//! | Path                              | Method      | Module                |
//! |-----------------------------------|-------------|-----------------------|
//! | `/functions/v1/create-shipment`   | POST        | [`routes::shipments`] |
//! | `/functions/v1/get-shipment`      | GET         | [`routes::shipments`] |
//! | `/functions/v1/track-shipment`    | POST        | [`routes::shipments`] |
//! | `/health/liveness`                | GET         | probes                |
//! | `/health/readiness`               | GET         | probes                |
//! | `/openapi.json`                   | GET         | [`openapi`]           |
//!
//! Every shipment path also answers `OPTIONS` with 200 and the CORS headers.
//!
//! ## Request Pipeline
//!
//! ```text
//! TraceLayer → CatchPanicLayer → CorsLayer → AuthenticatedUser → body → validation → store
//! ```

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod store;

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::shipments::router())
        .merge(openapi::router());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new()
        .merge(health)
        .merge(api)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A panicking handler answers 500 `Unexpected server error`. The per-route
/// CORS layer never sees this response, so the origin header is set here.
fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };
    let mut response = AppError::Internal(details).into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

/// Liveness probe. Always 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. 503 until platform credentials are configured.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.is_configured() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unconfigured")
    }
}
