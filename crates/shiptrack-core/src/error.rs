//! # Error Types
//!
//! Structured errors built with `thiserror`. Each variant carries the input
//! that was rejected so callers can report it without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Tracking number was empty after trimming whitespace.
    #[error("tracking number must not be empty")]
    EmptyTrackingNumber,

    /// User identifier is not a UUID.
    #[error("invalid user id: \"{0}\" (expected a UUID)")]
    InvalidUserId(String),
}

/// Rejection of a shipment submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// One or more required fields were absent or falsy. Lists every one of
    /// them, in the canonical [`REQUIRED_FIELDS`](crate::REQUIRED_FIELDS) order.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl SubmissionError {
    /// The names of the missing fields.
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields(fields) => fields,
        }
    }
}
