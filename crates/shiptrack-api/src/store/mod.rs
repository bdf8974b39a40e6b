//! # Shipment Store
//!
//! One persistence seam, three backends:
//!
//! | Backend | Selected when | Notes |
//! |---------|---------------|-------|
//! | [`ShipmentStore::Rest`] | platform configured | PostgREST with the service-role key |
//! | [`ShipmentStore::Postgres`] | `DATABASE_URL` set | direct pool, embedded migrations |
//! | [`ShipmentStore::Memory`] | dev tokens / tests | process-local, lost on restart |
//!
//! Every backend applies the same owner filter and ordering; none relies on
//! row-level policy for scoping.

pub mod memory;

use shiptrack_core::{NewShipment, ShipmentRecord, ShipmentSummary, TrackingNumber, UserId};
use shiptrack_supabase::{RestClient, SupabaseError};
use sqlx::postgres::PgDatabaseError;
use sqlx::PgPool;

pub use memory::MemoryStore;

/// Store failure, shaped after the Postgres error report so that message,
/// code, and hint can be passed through to the client verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    pub code: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl StoreError {
    /// An error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

impl From<SupabaseError> for StoreError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::Postgrest { error, .. } => Self {
                message: error.message,
                code: error.code,
                details: error.details,
                hint: error.hint,
            },
            other => Self::new(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => {
                let pg = db.try_downcast_ref::<PgDatabaseError>();
                Self {
                    message: db.message().to_string(),
                    code: db.code().map(|c| c.into_owned()),
                    details: pg.and_then(PgDatabaseError::detail).map(str::to_string),
                    hint: pg.and_then(PgDatabaseError::hint).map(str::to_string),
                }
            }
            _ => Self::new(err.to_string()),
        }
    }
}

/// Where shipments live.
#[derive(Debug, Clone)]
pub enum ShipmentStore {
    /// In-process map.
    Memory(MemoryStore),
    /// Managed table API.
    Rest(RestClient),
    /// Direct Postgres connection.
    Postgres(PgPool),
}

impl ShipmentStore {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Rest(_) => "rest",
            Self::Postgres(_) => "postgres",
        }
    }

    /// Persist a new shipment and return the stored row.
    pub async fn insert(&self, row: NewShipment) -> Result<ShipmentRecord, StoreError> {
        match self {
            Self::Memory(store) => store.insert(row),
            Self::Rest(client) => Ok(client.insert_shipment(&row).await?),
            Self::Postgres(pool) => Ok(crate::db::shipments::insert(pool, &row).await?),
        }
    }

    /// Summaries of `owner`'s shipments, newest first.
    pub async fn list_by_owner(&self, owner: UserId) -> Result<Vec<ShipmentSummary>, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.list_by_owner(owner)),
            Self::Rest(client) => Ok(client.list_shipments_for_owner(owner).await?),
            Self::Postgres(pool) => Ok(crate::db::shipments::list_by_owner(pool, owner).await?),
        }
    }

    /// Exact-match lookup across all owners.
    pub async fn find_by_tracking(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<ShipmentRecord>, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.find_by_tracking(tracking_number)),
            Self::Rest(client) => Ok(client.find_shipment_by_tracking(tracking_number).await?),
            Self::Postgres(pool) => {
                Ok(crate::db::shipments::find_by_tracking(pool, tracking_number).await?)
            }
        }
    }
}
