//! Shipment persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `shipment` table.
//! Owner scoping is part of every owner-facing query.

use chrono::{DateTime, Utc};
use shiptrack_core::{
    HistoryEntry, NewShipment, ShipmentRecord, ShipmentSummary, TrackingNumber, UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

const RECORD_COLUMNS: &str = "id, tracking_number, user_id, shipper_name, receiver_name, \
     shipper_address, receiver_address, pickup_date, delivery_date, weight, package, \
     shipment_mode, shipment_type, carrier_mode, status, history, created_at";

/// Insert a new shipment, returning the stored row.
pub async fn insert(pool: &PgPool, row: &NewShipment) -> Result<ShipmentRecord, sqlx::Error> {
    let history = serde_json::to_value(&row.history).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize shipment history");
        sqlx::Error::Encode(Box::new(e))
    })?;

    let stored = sqlx::query_as::<_, ShipmentRow>(&format!(
        "INSERT INTO shipment (tracking_number, user_id, shipper_name, receiver_name,
             shipper_address, receiver_address, pickup_date, delivery_date, weight, package,
             shipment_mode, shipment_type, carrier_mode, status, history, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
         RETURNING {RECORD_COLUMNS}"
    ))
    .bind(row.tracking_number.as_str())
    .bind(*row.user_id.as_uuid())
    .bind(&row.shipper_name)
    .bind(&row.receiver_name)
    .bind(&row.shipper_address)
    .bind(&row.receiver_address)
    .bind(&row.pickup_date)
    .bind(&row.delivery_date)
    .bind(row.weight)
    .bind(&row.package)
    .bind(row.shipment_mode.as_str())
    .bind(row.shipment_type.as_str())
    .bind(row.carrier_mode.as_str())
    .bind(row.status.as_str())
    .bind(&history)
    .bind(row.created_at)
    .fetch_one(pool)
    .await?;

    stored.into_record()
}

/// Summaries of `owner`'s shipments, newest first. Unbounded.
pub async fn list_by_owner(
    pool: &PgPool,
    owner: UserId,
) -> Result<Vec<ShipmentSummary>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SummaryRow>(
        "SELECT id, tracking_number, receiver_name, receiver_address, package, weight,
                carrier_mode, created_at
         FROM shipment WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(*owner.as_uuid())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(SummaryRow::into_summary).collect()
}

/// Fetch a shipment by exact tracking number, across all owners.
pub async fn find_by_tracking(
    pool: &PgPool,
    tracking_number: &TrackingNumber,
) -> Result<Option<ShipmentRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, ShipmentRow>(&format!(
        "SELECT {RECORD_COLUMNS} FROM shipment WHERE tracking_number = $1 LIMIT 1"
    ))
    .bind(tracking_number.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(ShipmentRow::into_record).transpose()
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ShipmentRow {
    id: Uuid,
    tracking_number: String,
    user_id: Option<Uuid>,
    shipper_name: String,
    receiver_name: String,
    shipper_address: String,
    receiver_address: String,
    pickup_date: String,
    delivery_date: String,
    weight: f64,
    package: String,
    shipment_mode: String,
    shipment_type: String,
    carrier_mode: String,
    status: String,
    history: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl ShipmentRow {
    fn into_record(self) -> Result<ShipmentRecord, sqlx::Error> {
        let history = decode_history(self.history).map_err(|e| {
            tracing::error!(
                id = %self.id,
                error = %e,
                "failed to deserialize shipment history"
            );
            sqlx::Error::Decode(Box::new(e))
        })?;

        Ok(ShipmentRecord {
            id: self.id,
            tracking_number: TrackingNumber::parse(&self.tracking_number)
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            user_id: self.user_id.map(UserId::from_uuid),
            shipper_name: self.shipper_name,
            receiver_name: self.receiver_name,
            shipper_address: self.shipper_address,
            receiver_address: self.receiver_address,
            pickup_date: self.pickup_date,
            delivery_date: self.delivery_date,
            weight: self.weight,
            package: self.package,
            shipment_mode: self.shipment_mode.into(),
            shipment_type: self.shipment_type.into(),
            carrier_mode: self.carrier_mode.into(),
            status: self.status.into(),
            history,
            created_at: self.created_at,
        })
    }
}

/// History is a JSON array; rows imported from older writers hold the array
/// encoded as a JSON string instead.
fn decode_history(value: serde_json::Value) -> Result<Vec<HistoryEntry>, serde_json::Error> {
    match value {
        serde_json::Value::String(text) => serde_json::from_str(&text),
        other => serde_json::from_value(other),
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    tracking_number: String,
    receiver_name: String,
    receiver_address: String,
    package: String,
    weight: f64,
    carrier_mode: String,
    created_at: DateTime<Utc>,
}

impl SummaryRow {
    fn into_summary(self) -> Result<ShipmentSummary, sqlx::Error> {
        Ok(ShipmentSummary {
            id: self.id,
            tracking_number: TrackingNumber::parse(&self.tracking_number)
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            receiver_name: self.receiver_name,
            receiver_address: self.receiver_address,
            package: self.package,
            weight: self.weight,
            carrier_mode: self.carrier_mode.into(),
            created_at: self.created_at,
        })
    }
}
