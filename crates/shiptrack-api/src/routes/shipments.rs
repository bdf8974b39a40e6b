//! # Shipment API
//!
//! Three handlers, each behind its own CORS policy:
//!
//! - `POST /functions/v1/create-shipment`: validate and persist a shipment
//!   owned by the caller.
//! - `GET /functions/v1/get-shipment`: the caller's shipments, newest first.
//! - `POST /functions/v1/track-shipment`: look up any shipment by its
//!   tracking number.
//!
//! The caller is verified by [`AuthenticatedUser`] before a handler body
//! runs; body parsing and field validation only happen afterwards.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use shiptrack_core::{
    NewShipment, ShipmentRecord, ShipmentSubmission, ShipmentSummary, TrackingNumber,
};
use utoipa::ToSchema;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::extractors::parse_json_body;
use crate::middleware::cors;
use crate::state::AppState;

/// Path of the create handler.
pub const CREATE_PATH: &str = "/functions/v1/create-shipment";
/// Path of the list handler.
pub const LIST_PATH: &str = "/functions/v1/get-shipment";
/// Path of the track handler.
pub const TRACK_PATH: &str = "/functions/v1/track-shipment";

// -- Request / response DTOs -------------------------------------------------

/// Create request body. Every field is required; `weight` may be a number or
/// a numeric string.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    pub shipper_name: String,
    pub receiver_name: String,
    pub shipper_address: String,
    pub receiver_address: String,
    pub pickup_date: String,
    pub delivery_date: String,
    #[schema(value_type = String, example = "2.3")]
    pub weight: Value,
    pub package: String,
    #[schema(example = "Air Freight")]
    pub shipment_mode: String,
    #[schema(example = "Local Shipment")]
    pub shipment_type: String,
    #[schema(example = "DHL")]
    pub carrier_mode: String,
}

/// Track request body.
#[derive(Debug, ToSchema)]
pub struct TrackShipmentRequest {
    #[schema(example = "AB12CD34")]
    pub tracking_number: String,
}

/// Create response.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateShipmentResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: ShipmentRecord,
    pub message: String,
}

/// List response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListShipmentsResponse {
    pub success: bool,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<ShipmentSummary>,
}

/// Track response. `data` is `null` when nothing matches.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackShipmentResponse {
    pub success: bool,
    #[schema(value_type = Option<Object>)]
    pub data: Option<ShipmentRecord>,
}

// -- Router ------------------------------------------------------------------

/// Build the shipments router.
pub fn router() -> Router<AppState> {
    let create = Router::new()
        .route(CREATE_PATH, post(create_shipment))
        .layer(cors::layer(Method::POST));
    let list = Router::new()
        .route(LIST_PATH, get(list_shipments))
        .layer(cors::layer(Method::GET));
    let track = Router::new()
        .route(TRACK_PATH, post(track_shipment))
        .layer(cors::layer(Method::POST));

    create.merge(list).merge(track)
}

// -- Handlers ----------------------------------------------------------------

/// POST /functions/v1/create-shipment
#[utoipa::path(
    post,
    path = "/functions/v1/create-shipment",
    request_body = CreateShipmentRequest,
    responses(
        (status = 200, description = "Shipment created", body = CreateShipmentResponse),
        (status = 400, description = "Invalid body or missing fields", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or rejected bearer token", body = crate::error::ErrorBody),
        (status = 500, description = "Configuration or store failure", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    body: Bytes,
) -> Result<Json<CreateShipmentResponse>, AppError> {
    let backend = state.backend()?;
    let value = parse_json_body(&body)?;
    let submission = ShipmentSubmission::from_json(&value)?;

    let row = NewShipment::from_submission(
        identity.user_id,
        submission,
        TrackingNumber::generate(),
        Utc::now(),
    );
    let record = backend
        .store
        .insert(row)
        .await
        .map_err(|e| AppError::store("Failed to create shipment", e))?;

    tracing::info!(
        user_id = %identity.user_id,
        tracking_number = %record.tracking_number,
        "shipment created"
    );

    Ok(Json(CreateShipmentResponse {
        success: true,
        data: record,
        message: "Shipment created successfully".into(),
    }))
}

/// GET /functions/v1/get-shipment
#[utoipa::path(
    get,
    path = "/functions/v1/get-shipment",
    responses(
        (status = 200, description = "Caller's shipments, newest first", body = ListShipmentsResponse),
        (status = 401, description = "Missing or rejected bearer token", body = crate::error::ErrorBody),
        (status = 500, description = "Configuration or store failure", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "shipments"
)]
pub async fn list_shipments(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<ListShipmentsResponse>, AppError> {
    let backend = state.backend()?;
    let data = backend
        .store
        .list_by_owner(identity.user_id)
        .await
        .map_err(|e| AppError::store("Failed to fetch shipments", e))?;

    tracing::debug!(user_id = %identity.user_id, count = data.len(), "shipments listed");

    Ok(Json(ListShipmentsResponse {
        success: true,
        data,
    }))
}

/// POST /functions/v1/track-shipment
#[utoipa::path(
    post,
    path = "/functions/v1/track-shipment",
    request_body = TrackShipmentRequest,
    responses(
        (status = 200, description = "Matching shipment, or null", body = TrackShipmentResponse),
        (status = 400, description = "Invalid body or missing tracking number", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or rejected bearer token", body = crate::error::ErrorBody),
        (status = 500, description = "Configuration or store failure", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "shipments"
)]
pub async fn track_shipment(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    body: Bytes,
) -> Result<Json<TrackShipmentResponse>, AppError> {
    let backend = state.backend()?;
    let value = parse_json_body(&body)?;
    let tracking_number = requested_tracking_number(&value)?;

    let data = backend
        .store
        .find_by_tracking(&tracking_number)
        .await
        .map_err(|e| AppError::store("Failed to track shipment", e))?;

    tracing::debug!(
        user_id = %identity.user_id,
        tracking_number = %tracking_number,
        found = data.is_some(),
        "shipment lookup"
    );

    Ok(Json(TrackShipmentResponse {
        success: true,
        data,
    }))
}

/// Read `tracking_number` from a track body. Numbers are taken as their
/// decimal text; anything blank or of another type counts as missing.
fn requested_tracking_number(body: &Value) -> Result<TrackingNumber, AppError> {
    let raw = match body.get("tracking_number") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    TrackingNumber::parse(&raw).map_err(|_| AppError::MissingFields(vec!["tracking_number"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tracking_number_is_trimmed() {
        let tn = requested_tracking_number(&json!({"tracking_number": "  AB12CD34 "})).unwrap();
        assert_eq!(tn.as_str(), "AB12CD34");
    }

    #[test]
    fn numeric_tracking_number_is_accepted() {
        let tn = requested_tracking_number(&json!({"tracking_number": 12345678})).unwrap();
        assert_eq!(tn.as_str(), "12345678");
    }

    #[test]
    fn blank_or_absent_tracking_number_is_missing() {
        for body in [
            json!({}),
            json!({"tracking_number": ""}),
            json!({"tracking_number": "   "}),
            json!({"tracking_number": null}),
            json!({"tracking_number": ["AB12CD34"]}),
        ] {
            match requested_tracking_number(&body).unwrap_err() {
                AppError::MissingFields(fields) => assert_eq!(fields, vec!["tracking_number"]),
                other => panic!("expected MissingFields, got {other:?}"),
            }
        }
    }
}
