//! # API Route Modules
//!
//! - `shipments`: create, list-own, and track, under `/functions/v1/*`.
//!   Paths match the platform's function URLs so existing browser clients
//!   only change their base URL.

pub mod shipments;
