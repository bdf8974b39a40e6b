#![deny(missing_docs)]

//! # shiptrack-core: Domain Types for Shipment Tracking
//!
//! Every other crate in the workspace depends on this one. It performs no
//! I/O: the HTTP service, the platform client, and the CLI all share the
//! types and rules defined here.
//!
//! ## Contents
//!
//! - [`UserId`] / [`Identity`]: the authenticated caller, resolved from a
//!   bearer token by the identity provider.
//! - [`TrackingNumber`]: short, human-shareable shipment code generated at
//!   creation time.
//! - [`ShipmentSubmission`]: a validated create request. Validation reports
//!   every missing field at once, never just the first.
//! - [`NewShipment`] / [`ShipmentRecord`] / [`ShipmentSummary`]: the row as
//!   inserted, as stored, and as projected for the list view.
//! - Label types ([`ShipmentMode`], [`ShipmentType`], [`CarrierMode`],
//!   [`ShipmentStatus`]) that know the labels the frontend offers but keep
//!   anything else verbatim.

pub mod error;
pub mod identity;
pub mod labels;
pub mod shipment;
pub mod submission;

pub use error::{SubmissionError, ValidationError};
pub use identity::{Identity, TrackingNumber, UserId};
pub use labels::{CarrierMode, ShipmentMode, ShipmentStatus, ShipmentType};
pub use shipment::{
    HistoryEntry, NewShipment, ShipmentRecord, ShipmentSummary, INITIAL_LOCATION, SUMMARY_COLUMNS,
};
pub use submission::{coerce_weight, is_falsy, ShipmentForm, ShipmentSubmission, REQUIRED_FIELDS};
