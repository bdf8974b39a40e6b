//! # Shipment API Client
//!
//! Calls the three shipment handlers of `shiptrack-api` with the signed-in
//! user's access token. Success bodies are unwrapped from their
//! `{"success": true, "data": ...}` envelope; error bodies are decoded into
//! [`ApiError::Status`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use shiptrack_core::{ShipmentForm, ShipmentRecord, ShipmentSummary};
use thiserror::Error;
use url::Url;

/// Default base URL of the API.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Errors from the shipment API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx answer.
    #[error("{endpoint} returned {status}: {error}")]
    Status {
        endpoint: String,
        status: u16,
        error: String,
        details: Option<String>,
        missing_fields: Vec<String>,
    },

    /// 2xx answer with an unexpected body.
    #[error("failed to decode response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Base URL cannot be joined with an endpoint path.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the API rejected the access token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize, Default)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default, rename = "missingFields")]
    missing_fields: Vec<String>,
}

/// Client for the shipment endpoints.
#[derive(Debug, Clone)]
pub struct ShipmentApi {
    http: reqwest::Client,
    base_url: Url,
}

impl ShipmentApi {
    /// Build a client for the API at `base_url`.
    pub fn new(base_url: Url, timeout_secs: u64) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|source| ApiError::Http {
                endpoint: "client setup".into(),
                source,
            })?;
        Ok(Self { http, base_url })
    }

    /// POST /functions/v1/create-shipment
    pub async fn create(
        &self,
        access_token: &str,
        form: &ShipmentForm,
    ) -> Result<ShipmentRecord, ApiError> {
        let endpoint = "POST /functions/v1/create-shipment";
        let url = self.base_url.join("functions/v1/create-shipment")?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(form)
            .send()
            .await
            .map_err(|source| ApiError::Http {
                endpoint: endpoint.into(),
                source,
            })?;
        read_data(endpoint, resp).await
    }

    /// GET /functions/v1/get-shipment
    pub async fn list(&self, access_token: &str) -> Result<Vec<ShipmentSummary>, ApiError> {
        let endpoint = "GET /functions/v1/get-shipment";
        let url = self.base_url.join("functions/v1/get-shipment")?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|source| ApiError::Http {
                endpoint: endpoint.into(),
                source,
            })?;
        read_data(endpoint, resp).await
    }

    /// POST /functions/v1/track-shipment
    ///
    /// `Ok(None)` when no shipment carries `tracking_number`.
    pub async fn track(
        &self,
        access_token: &str,
        tracking_number: &str,
    ) -> Result<Option<ShipmentRecord>, ApiError> {
        let endpoint = "POST /functions/v1/track-shipment";
        let url = self.base_url.join("functions/v1/track-shipment")?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "tracking_number": tracking_number.trim() }))
            .send()
            .await
            .map_err(|source| ApiError::Http {
                endpoint: endpoint.into(),
                source,
            })?;
        read_data(endpoint, resp).await
    }
}

async fn read_data<T: DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let parsed: ErrorEnvelope = serde_json::from_str(&body).unwrap_or_default();
        tracing::debug!(endpoint, status = status.as_u16(), "API call rejected");
        return Err(ApiError::Status {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            error: parsed.error.unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("request failed").to_string()
            }),
            details: parsed.details,
            missing_fields: parsed.missing_fields,
        });
    }
    resp.json::<Envelope<T>>()
        .await
        .map(|envelope| envelope.data)
        .map_err(|source| ApiError::Deserialization {
            endpoint: endpoint.into(),
            source,
        })
}
