//! # OpenAPI Document
//!
//! Assembles the utoipa-documented handlers into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// OpenAPI document for the shipment service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "shiptrack API",
        version = "0.1.0",
        description = "Create, list, and track shipments for authenticated users."
    ),
    paths(
        crate::routes::shipments::create_shipment,
        crate::routes::shipments::list_shipments,
        crate::routes::shipments::track_shipment,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::shipments::CreateShipmentRequest,
        crate::routes::shipments::TrackShipmentRequest,
        crate::routes::shipments::CreateShipmentResponse,
        crate::routes::shipments::ListShipmentsResponse,
        crate::routes::shipments::TrackShipmentResponse,
    )),
    modifiers(&BearerScheme),
    tags(
        (name = "shipments", description = "Shipment creation, listing, and tracking"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme the handlers reference.
struct BearerScheme;

impl Modify for BearerScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
