//! Typed client for the `shipment` table over PostgREST (`/rest/v1`).
//!
//! Requests carry the service-role key, which bypasses row-level security.
//! Owner scoping is therefore the caller's job: every owner-facing read takes
//! a [`UserId`] and filters on it.

use serde::de::DeserializeOwned;
use shiptrack_core::{NewShipment, ShipmentRecord, ShipmentSummary, TrackingNumber, UserId, SUMMARY_COLUMNS};
use url::Url;

use crate::error::{PostgrestError, SupabaseError};

/// Table holding shipments.
pub const SHIPMENT_TABLE: &str = "shipment";

/// Client for the table API.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{SHIPMENT_TABLE}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    /// Insert a shipment and return the stored row.
    ///
    /// Calls `POST {project_url}/rest/v1/shipment` with
    /// `Prefer: return=representation`.
    pub async fn insert_shipment(&self, row: &NewShipment) -> Result<ShipmentRecord, SupabaseError> {
        let endpoint = "POST /rest/v1/shipment";
        let resp = self
            .http
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(std::slice::from_ref(row))
            .send()
            .await
            .map_err(|e| SupabaseError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let rows: Vec<ShipmentRecord> = read_json(endpoint, resp).await?;
        rows.into_iter().next().ok_or(SupabaseError::EmptyResponse {
            endpoint: endpoint.into(),
        })
    }

    /// List the summaries of every shipment owned by `owner`, newest first.
    ///
    /// Calls `GET {project_url}/rest/v1/shipment?select=...&user_id=eq.{owner}&order=created_at.desc`.
    pub async fn list_shipments_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<ShipmentSummary>, SupabaseError> {
        let endpoint = "GET /rest/v1/shipment (by owner)";
        let select = SUMMARY_COLUMNS.join(",");
        let owner_filter = format!("eq.{owner}");

        let resp = self
            .http
            .get(self.table_url())
            .query(&[
                ("select", select.as_str()),
                ("user_id", owner_filter.as_str()),
                ("order", "created_at.desc"),
            ])
            .send()
            .await
            .map_err(|e| SupabaseError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        read_json(endpoint, resp).await
    }

    /// Find a shipment by exact tracking number, across all owners.
    ///
    /// Calls `GET {project_url}/rest/v1/shipment?select=*&tracking_number=eq.{tn}&limit=1`.
    pub async fn find_shipment_by_tracking(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<ShipmentRecord>, SupabaseError> {
        let endpoint = "GET /rest/v1/shipment (by tracking number)";
        let filter = format!("eq.{}", quote_filter_value(tracking_number.as_str()));

        let resp = self
            .http
            .get(self.table_url())
            .query(&[
                ("select", "*"),
                ("tracking_number", filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| SupabaseError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let rows: Vec<ShipmentRecord> = read_json(endpoint, resp).await?;
        Ok(rows.into_iter().next())
    }
}

/// PostgREST treats `,.:()` specially in filter values; double-quoting makes
/// the value literal. Plain codes are sent as-is.
fn quote_filter_value(value: &str) -> String {
    let reserved = |c: char| matches!(c, ',' | '.' | ':' | '(' | ')' | '"' | '\\') || c.is_whitespace();
    if !value.contains(reserved) {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

async fn read_json<T: DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<T, SupabaseError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(endpoint, status = status.as_u16(), "table API request failed");
        return Err(SupabaseError::Postgrest {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            error: PostgrestError::from_body(&body),
        });
    }

    resp.json().await.map_err(|e| SupabaseError::Deserialization {
        endpoint: endpoint.into(),
        source: e,
    })
}
