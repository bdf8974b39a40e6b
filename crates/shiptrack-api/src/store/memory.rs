//! In-memory shipment store.
//!
//! All operations are synchronous (the RwLock is `parking_lot`, not
//! `tokio::sync`) because the lock is never held across `.await` points.
//! The tracking-number uniqueness check and the insert happen under one
//! write lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shiptrack_core::{NewShipment, ShipmentRecord, ShipmentSummary, TrackingNumber, UserId};
use uuid::Uuid;

use super::StoreError;

/// Postgres `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Thread-safe, cloneable shipment map keyed by row id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<HashMap<Uuid, ShipmentRecord>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, assigning a fresh id.
    ///
    /// Fails with code `23505` if the tracking number is already taken.
    pub fn insert(&self, row: NewShipment) -> Result<ShipmentRecord, StoreError> {
        let mut guard = self.rows.write();
        if guard
            .values()
            .any(|existing| existing.tracking_number == row.tracking_number)
        {
            return Err(StoreError {
                message: "duplicate key value violates unique constraint \"shipment_tracking_number_key\""
                    .into(),
                code: Some(UNIQUE_VIOLATION.into()),
                details: Some(format!(
                    "Key (tracking_number)=({}) already exists.",
                    row.tracking_number
                )),
                hint: None,
            });
        }

        let record = row.into_record(Uuid::new_v4());
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    /// Summaries of `owner`'s rows, newest first.
    pub fn list_by_owner(&self, owner: UserId) -> Vec<ShipmentSummary> {
        let mut owned: Vec<ShipmentRecord> = self
            .rows
            .read()
            .values()
            .filter(|r| r.user_id == Some(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned.iter().map(ShipmentRecord::summary).collect()
    }

    /// Exact-match lookup across all owners.
    pub fn find_by_tracking(&self, tracking_number: &TrackingNumber) -> Option<ShipmentRecord> {
        self.rows
            .read()
            .values()
            .find(|r| &r.tracking_number == tracking_number)
            .cloned()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}
