//! # Middleware
//!
//! - [`cors`]: per-route CORS policy for browser clients.
//!
//! Request tracing uses `tower_http::trace::TraceLayer` directly in
//! [`crate::app`].

pub mod cors;
