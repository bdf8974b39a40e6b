//! Router tests against a mocked platform: identity provider outcomes and
//! store error passthrough over the REST endpoint.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shiptrack_api::auth::IdentityVerifier;
use shiptrack_api::state::{AppConfig, AppState, Backend};
use shiptrack_api::store::ShipmentStore;
use shiptrack_supabase::{SupabaseClient, SupabaseConfig};

const USER_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

fn platform_app(mock_server: &MockServer) -> axum::Router {
    let config =
        SupabaseConfig::local_mock(&mock_server.uri(), "service-key", "anon-key").unwrap();
    let client = SupabaseClient::new(config).unwrap();
    let backend = Backend {
        verifier: IdentityVerifier::Supabase(client.auth().clone()),
        store: ShipmentStore::Rest(client.rest().clone()),
    };
    shiptrack_api::app(AppState::new(AppConfig::default(), backend))
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn mount_user(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "email": "a@example.com"
        })))
        .mount(mock_server)
        .await;
}

fn authed(method: Method, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, "Bearer user-jwt")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn shipment_body() -> Value {
    json!({
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
    })
}

// -- Identity provider --------------------------------------------------------

#[tokio::test]
async fn missing_token_makes_no_provider_call() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .uri("/functions/v1/get-shipment")
        .body(Body::empty())
        .unwrap();
    let response = platform_app(&mock_server).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejected_token_is_401_with_provider_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "msg": "invalid JWT: token is expired"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = platform_app(&mock_server)
        .oneshot(authed(Method::GET, "/functions/v1/get-shipment", Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Authentication failed");
    assert_eq!(body["details"], "invalid JWT: token is expired");
}

#[tokio::test]
async fn user_without_id_is_401() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@example.com"})))
        .mount(&mock_server)
        .await;

    let response = platform_app(&mock_server)
        .oneshot(authed(Method::GET, "/functions/v1/get-shipment", Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Could not get authenticated user"
    );
}

#[tokio::test]
async fn each_request_verifies_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": USER_ID})))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/shipment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = platform_app(&mock_server);
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(authed(Method::GET, "/functions/v1/get-shipment", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

// -- Store over REST ----------------------------------------------------------

#[tokio::test]
async fn list_filters_on_verified_user() {
    let mock_server = MockServer::start().await;
    mount_user(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/shipment"))
        .and(query_param("user_id", format!("eq.{USER_ID}")))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = platform_app(&mock_server)
        .oneshot(authed(Method::GET, "/functions/v1/get-shipment", Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[tokio::test]
async fn unique_violation_passes_through_as_500() {
    let mock_server = MockServer::start().await;
    mount_user(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/shipment"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "details": "Key (tracking_number)=(AB12CD34) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"shipment_tracking_number_key\""
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = platform_app(&mock_server)
        .oneshot(authed(
            Method::POST,
            "/functions/v1/create-shipment",
            shipment_body().to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to create shipment");
    assert_eq!(body["code"], "23505");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .starts_with("duplicate key value"));
}

#[tokio::test]
async fn missing_fields_make_no_store_call() {
    let mock_server = MockServer::start().await;
    mount_user(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/shipment"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let response = platform_app(&mock_server)
        .oneshot(authed(
            Method::POST,
            "/functions/v1/create-shipment",
            json!({"shipperName": "A"}).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn track_store_failure_is_500() {
    let mock_server = MockServer::start().await;
    mount_user(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/shipment"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "connection refused"
        })))
        .mount(&mock_server)
        .await;

    let response = platform_app(&mock_server)
        .oneshot(authed(
            Method::POST,
            "/functions/v1/track-shipment",
            json!({"tracking_number": "AB12CD34"}).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to track shipment");
    assert_eq!(body["details"], "connection refused");
}
