//! Contract tests for RestClient against the PostgREST `shipment` table.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST   | `/rest/v1/shipment` | `insert_*` |
//! | GET    | `/rest/v1/shipment?user_id=eq.{id}` | `list_*` |
//! | GET    | `/rest/v1/shipment?tracking_number=eq.{tn}` | `find_*` |

use chrono::{TimeZone, Utc};
use shiptrack_core::{
    NewShipment, ShipmentStatus, ShipmentSubmission, TrackingNumber, UserId,
};
use shiptrack_supabase::{SupabaseClient, SupabaseConfig, SupabaseError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OWNER: &str = "550e8400-e29b-41d4-a716-446655440001";

fn test_client(mock_server: &MockServer) -> SupabaseClient {
    let config = SupabaseConfig::local_mock(&mock_server.uri(), "service-key", "anon-key").unwrap();
    SupabaseClient::new(config).unwrap()
}

fn new_shipment() -> NewShipment {
    let submission = ShipmentSubmission::from_json(&serde_json::json!({
        "shipperName": "A",
        "receiverName": "B",
        "shipperAddress": "X",
        "receiverAddress": "Y",
        "pickupDate": "2025-01-01",
        "deliveryDate": "2025-01-05",
        "weight": "2.3",
        "package": "Books",
        "shipmentMode": "Air Freight",
        "shipmentType": "Local Shipment",
        "carrierMode": "DHL"
    }))
    .unwrap();
    NewShipment::from_submission(
        OWNER.parse::<UserId>().unwrap(),
        submission,
        TrackingNumber::parse("AB12CD34").unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap(),
    )
}

fn stored_row() -> serde_json::Value {
    serde_json::json!({
        "id": "9b2f0c1e-0000-4000-8000-000000000001",
        "tracking_number": "AB12CD34",
        "user_id": OWNER,
        "shipper_name": "A",
        "receiver_name": "B",
        "shipper_address": "X",
        "receiver_address": "Y",
        "pickup_date": "2025-01-01",
        "delivery_date": "2025-01-05",
        "weight": 2.3,
        "package": "Books",
        "shipment_mode": "Air Freight",
        "shipment_type": "Local Shipment",
        "carrier_mode": "DHL",
        "status": "Shipment Created",
        "history": [{
            "status": "Shipment Created",
            "timestamp": "2025-01-01T09:30:00Z",
            "location": "Processing Center"
        }],
        "created_at": "2025-01-01T09:30:00+00:00"
    })
}

// ── POST /rest/v1/shipment ───────────────────────────────────────────

#[tokio::test]
async fn insert_sends_service_key_and_returns_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/shipment"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .and(header("prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([stored_row()])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let record = client.rest().insert_shipment(&new_shipment()).await.unwrap();
    assert_eq!(record.tracking_number.as_str(), "AB12CD34");
    assert_eq!(record.status, ShipmentStatus::Created);
    assert_eq!(record.history.len(), 1);

    let requests = mock_server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent.is_array());
    assert_eq!(sent[0]["user_id"], OWNER);
    assert_eq!(sent[0]["status"], "Shipment Created");
}

#[tokio::test]
async fn insert_unique_violation_keeps_postgrest_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/shipment"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "code": "23505",
            "details": "Key (tracking_number)=(AB12CD34) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"shipment_tracking_number_key\""
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.rest().insert_shipment(&new_shipment()).await.unwrap_err();
    match err {
        SupabaseError::Postgrest { status, error, .. } => {
            assert_eq!(status, 409);
            assert_eq!(error.code.as_deref(), Some("23505"));
            assert!(error.details.unwrap().contains("AB12CD34"));
        }
        other => panic!("expected Postgrest error, got {other:?}"),
    }
}

#[tokio::test]
async fn insert_empty_echo_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/shipment"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.rest().insert_shipment(&new_shipment()).await.unwrap_err();
    assert!(matches!(err, SupabaseError::EmptyResponse { .. }));
}

// ── GET /rest/v1/shipment (by owner) ─────────────────────────────────

#[tokio::test]
async fn list_filters_by_owner_and_orders_newest_first() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/shipment"))
        .and(query_param("user_id", format!("eq.{OWNER}").as_str()))
        .and(query_param("order", "created_at.desc"))
        .and(query_param(
            "select",
            "id,tracking_number,receiver_name,receiver_address,package,weight,carrier_mode,created_at",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": "9b2f0c1e-0000-4000-8000-000000000002",
                "tracking_number": "FFFF0000",
                "receiver_name": "C",
                "receiver_address": "Z",
                "package": "Shoes",
                "weight": 1,
                "carrier_mode": "USPS",
                "created_at": "2025-02-01T00:00:00+00:00"
            },
            {
                "id": "9b2f0c1e-0000-4000-8000-000000000001",
                "tracking_number": "AB12CD34",
                "receiver_name": "B",
                "receiver_address": "Y",
                "package": "Books",
                "weight": 2.3,
                "carrier_mode": "DHL",
                "created_at": "2025-01-01T09:30:00+00:00"
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let rows = client
        .rest()
        .list_shipments_for_owner(OWNER.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].tracking_number.as_str(), "FFFF0000");
    assert_eq!(rows[0].weight, 1.0);
}

#[tokio::test]
async fn list_empty_is_ok() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/shipment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let rows = client
        .rest()
        .list_shipments_for_owner(OWNER.parse().unwrap())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

// ── GET /rest/v1/shipment (by tracking number) ───────────────────────

#[tokio::test]
async fn find_by_tracking_returns_full_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/shipment"))
        .and(query_param("tracking_number", "eq.AB12CD34"))
        .and(query_param("select", "*"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([stored_row()])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let found = client
        .rest()
        .find_shipment_by_tracking(&TrackingNumber::parse("AB12CD34").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.receiver_name, "B");
    assert_eq!(found.history[0].location.as_deref(), Some("Processing Center"));
}

#[tokio::test]
async fn find_by_tracking_accepts_row_without_owner() {
    let mock_server = MockServer::start().await;

    let mut row = stored_row();
    row["user_id"] = serde_json::Value::Null;
    Mock::given(method("GET"))
        .and(path("/rest/v1/shipment"))
        .and(query_param("tracking_number", "eq.AB12CD34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([row])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let found = client
        .rest()
        .find_shipment_by_tracking(&TrackingNumber::parse("AB12CD34").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(found.user_id.is_none());
    assert_eq!(found.tracking_number.as_str(), "AB12CD34");
}

#[tokio::test]
async fn find_by_tracking_miss_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/shipment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let found = client
        .rest()
        .find_shipment_by_tracking(&TrackingNumber::parse("ZZZZZZZZ").unwrap())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn find_by_tracking_server_error_surfaces_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/shipment"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "code": "XX000",
            "message": "internal error",
            "hint": "check the logs"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .rest()
        .find_shipment_by_tracking(&TrackingNumber::parse("AB12CD34").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.message(), "internal error");
}
