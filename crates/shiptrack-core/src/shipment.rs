//! # Shipment Rows
//!
//! Three views of the single persisted entity:
//!
//! - [`NewShipment`]: what the writer inserts. Built only from a validated
//!   [`ShipmentSubmission`], so a partial shipment cannot be represented.
//! - [`ShipmentRecord`]: the full row, including server-assigned `id`.
//! - [`ShipmentSummary`]: the fixed projection served to the list view.
//!   Owner, history, and status are deliberately absent.
//!
//! Field names serialize in `snake_case`, matching the table columns and
//! the shape the frontend reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::identity::{TrackingNumber, UserId};
use crate::labels::{CarrierMode, ShipmentMode, ShipmentStatus, ShipmentType};
use crate::submission::ShipmentSubmission;

/// Location recorded on the creation event.
pub const INITIAL_LOCATION: &str = "Processing Center";

/// One event in a shipment's append-only history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Status reached at this point.
    pub status: ShipmentStatus,
    /// When the event happened (ISO-8601, UTC).
    pub timestamp: DateTime<Utc>,
    /// Where it happened, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl HistoryEntry {
    /// The event every shipment starts with.
    pub fn created(at: DateTime<Utc>) -> Self {
        Self {
            status: ShipmentStatus::Created,
            timestamp: at,
            location: Some(INITIAL_LOCATION.to_string()),
        }
    }
}

/// A shipment ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewShipment {
    /// Generated tracking number.
    pub tracking_number: TrackingNumber,
    /// Owner; always the verified caller.
    pub user_id: UserId,
    /// Shipper name.
    pub shipper_name: String,
    /// Receiver name.
    pub receiver_name: String,
    /// Shipper address.
    pub shipper_address: String,
    /// Receiver address.
    pub receiver_address: String,
    /// Pickup date as submitted.
    pub pickup_date: String,
    /// Delivery date as submitted.
    pub delivery_date: String,
    /// Coerced weight; never negative.
    pub weight: f64,
    /// Package description.
    pub package: String,
    /// Shipment mode label.
    pub shipment_mode: ShipmentMode,
    /// Shipment type label.
    pub shipment_type: ShipmentType,
    /// Carrier label.
    pub carrier_mode: CarrierMode,
    /// Always [`ShipmentStatus::Created`] on insert.
    pub status: ShipmentStatus,
    /// Exactly one creation entry on insert.
    pub history: Vec<HistoryEntry>,
    /// Insert time.
    pub created_at: DateTime<Utc>,
}

impl NewShipment {
    /// Build the row for a validated submission owned by `owner`.
    ///
    /// Status starts at "Shipment Created" and history holds the single
    /// matching creation event stamped with `now`.
    pub fn from_submission(
        owner: UserId,
        submission: ShipmentSubmission,
        tracking_number: TrackingNumber,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            tracking_number,
            user_id: owner,
            shipper_name: submission.shipper_name,
            receiver_name: submission.receiver_name,
            shipper_address: submission.shipper_address,
            receiver_address: submission.receiver_address,
            pickup_date: submission.pickup_date,
            delivery_date: submission.delivery_date,
            weight: submission.weight,
            package: submission.package,
            shipment_mode: submission.shipment_mode,
            shipment_type: submission.shipment_type,
            carrier_mode: submission.carrier_mode,
            status: ShipmentStatus::Created,
            history: vec![HistoryEntry::created(now)],
            created_at: now,
        }
    }

    /// Attach a server-assigned id, yielding the stored row.
    pub fn into_record(self, id: Uuid) -> ShipmentRecord {
        ShipmentRecord {
            id,
            tracking_number: self.tracking_number,
            user_id: Some(self.user_id),
            shipper_name: self.shipper_name,
            receiver_name: self.receiver_name,
            shipper_address: self.shipper_address,
            receiver_address: self.receiver_address,
            pickup_date: self.pickup_date,
            delivery_date: self.delivery_date,
            weight: self.weight,
            package: self.package,
            shipment_mode: self.shipment_mode,
            shipment_type: self.shipment_type,
            carrier_mode: self.carrier_mode,
            status: self.status,
            history: self.history,
            created_at: self.created_at,
        }
    }
}

/// A stored shipment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Server-assigned row id.
    pub id: Uuid,
    /// Tracking number; immutable.
    pub tracking_number: TrackingNumber,
    /// Owner. Rows written by an earlier deployment may have none.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Shipper name.
    pub shipper_name: String,
    /// Receiver name.
    pub receiver_name: String,
    /// Shipper address.
    pub shipper_address: String,
    /// Receiver address.
    pub receiver_address: String,
    /// Pickup date.
    pub pickup_date: String,
    /// Delivery date.
    pub delivery_date: String,
    /// Weight.
    pub weight: f64,
    /// Package description.
    pub package: String,
    /// Shipment mode label.
    pub shipment_mode: ShipmentMode,
    /// Shipment type label.
    pub shipment_type: ShipmentType,
    /// Carrier label.
    pub carrier_mode: CarrierMode,
    /// Current status label.
    pub status: ShipmentStatus,
    /// Status history, oldest first.
    #[serde(deserialize_with = "deserialize_history")]
    pub history: Vec<HistoryEntry>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl ShipmentRecord {
    /// Project the list-view fields.
    pub fn summary(&self) -> ShipmentSummary {
        ShipmentSummary {
            id: self.id,
            tracking_number: self.tracking_number.clone(),
            receiver_name: self.receiver_name.clone(),
            receiver_address: self.receiver_address.clone(),
            package: self.package.clone(),
            weight: self.weight,
            carrier_mode: self.carrier_mode.clone(),
            created_at: self.created_at,
        }
    }
}

/// List-view projection of a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentSummary {
    /// Row id.
    pub id: Uuid,
    /// Tracking number.
    pub tracking_number: TrackingNumber,
    /// Receiver name.
    pub receiver_name: String,
    /// Receiver address.
    pub receiver_address: String,
    /// Package description.
    pub package: String,
    /// Weight.
    pub weight: f64,
    /// Carrier label.
    pub carrier_mode: CarrierMode,
    /// Creation time; the list is ordered on this, newest first.
    pub created_at: DateTime<Utc>,
}

/// Column names of the list projection, in wire order.
pub const SUMMARY_COLUMNS: &[&str] = &[
    "id",
    "tracking_number",
    "receiver_name",
    "receiver_address",
    "package",
    "weight",
    "carrier_mode",
    "created_at",
];

/// Rows written by older clients carry `history` as a JSON-encoded string
/// rather than an array. Accept both.
fn deserialize_history<'de, D>(deserializer: D) -> Result<Vec<HistoryEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<HistoryEntry>),
        Encoded(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::List(entries) => Ok(entries),
        Raw::Encoded(text) => serde_json::from_str(&text).map_err(serde::de::Error::custom),
    }
}
