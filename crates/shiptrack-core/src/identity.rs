//! # Identifier Newtypes
//!
//! [`UserId`] names the owner of a shipment and is always valid by
//! construction. [`TrackingNumber`] is the short public code printed on a
//! shipment; it is generated server-side and never changes afterwards.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Opaque identifier of an authenticated end user, as issued by the
/// identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidUserId(s.to_string()))
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The verified caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable id used as the shipment owner key.
    pub user_id: UserId,
    /// Email address, when the provider reports one.
    pub email: Option<String>,
}

impl Identity {
    /// An identity without an email address.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
        }
    }
}

/// Short, human-shareable shipment code.
///
/// Generated codes are the first hyphen-delimited segment of a random v4
/// UUID, uppercased: eight characters from `0-9A-F`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Length of a generated tracking number.
    pub const LEN: usize = 8;

    /// Generate a fresh tracking number.
    ///
    /// Uniqueness is probabilistic (32 random bits); collisions are left to
    /// the store's unique constraint.
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4().to_string();
        let head = uuid.split('-').next().unwrap_or(&uuid);
        Self(head.to_uppercase())
    }

    /// Parse user input for a lookup. Surrounding whitespace is dropped;
    /// the remainder is matched exactly.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTrackingNumber);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the tracking number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
