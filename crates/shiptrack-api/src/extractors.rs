//! # Body Parsing
//!
//! Handlers take the raw body as [`Bytes`] and parse it here rather than
//! through `Json<T>`, so that a missing `Content-Type` is tolerated and
//! parse failures map onto the service's own 400 bodies.

use axum::body::Bytes;
use serde_json::Value;

use crate::error::AppError;

/// Parse a request body as JSON.
///
/// Unparsable bytes (including an empty body) answer 400 `Invalid JSON body`
/// with the parser message as details. A body that parses to a falsy value
/// (`null`, `false`, `0`, `""`) answers 400 `Empty request body`.
pub fn parse_json_body(body: &Bytes) -> Result<Value, AppError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| AppError::BadRequest {
        error: "Invalid JSON body".into(),
        details: Some(e.to_string()),
    })?;
    if shiptrack_core::is_falsy(&value) {
        return Err(AppError::bad_request("Empty request body"));
    }
    Ok(value)
}
