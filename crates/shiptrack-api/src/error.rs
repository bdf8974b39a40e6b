//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every failure a handler can meet is caught here and mapped to one of
//! three statuses: 400, 401, or 500.
//!
//! The body keeps the flat shape browser clients already read:
//! `{"error": <summary>, "details"?, "missingFields"?, "code"?, "hint"?}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use shiptrack_core::SubmissionError;

use crate::store::StoreError;

/// JSON error response body.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Short summary, e.g. "Missing required fields".
    pub error: String,
    /// Underlying message from the identity provider, store, or parser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Every required field that was absent or empty.
    #[serde(
        default,
        rename = "missingFields",
        skip_serializing_if = "Option::is_none"
    )]
    pub missing_fields: Option<Vec<String>>,
    /// Store error code, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Store hint, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Body missing or unparsable (400).
    #[error("{error}")]
    BadRequest {
        error: String,
        details: Option<String>,
    },

    /// Required fields absent or empty (400).
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Token absent, rejected, or not resolvable to a user (401).
    #[error("{error}")]
    Unauthorized {
        error: String,
        details: Option<String>,
    },

    /// Platform credentials not configured (500).
    #[error("server configuration error")]
    Configuration,

    /// Store read or write failed (500).
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: StoreError,
    },

    /// Anything else (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 400 with only a summary.
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            details: None,
        }
    }

    /// 401 with only a summary.
    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::Unauthorized {
            error: error.into(),
            details: None,
        }
    }

    /// 500 wrapping a store failure under a handler-specific summary.
    pub fn store(context: &'static str, source: StoreError) -> Self {
        Self::Store { context, source }
    }

    /// Return the HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } | Self::MissingFields(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Configuration | Self::Store { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::BadRequest { error, details } | Self::Unauthorized { error, details } => {
                ErrorBody {
                    error: error.clone(),
                    details: details.clone(),
                    ..ErrorBody::default()
                }
            }
            Self::MissingFields(fields) => ErrorBody {
                error: "Missing required fields".into(),
                missing_fields: Some(fields.iter().map(|f| f.to_string()).collect()),
                ..ErrorBody::default()
            },
            Self::Configuration => ErrorBody {
                error: "Server configuration error".into(),
                ..ErrorBody::default()
            },
            Self::Store { context, source } => ErrorBody {
                error: (*context).to_string(),
                details: Some(source.message.clone()),
                code: source.code.clone(),
                hint: source.hint.clone(),
                ..ErrorBody::default()
            },
            Self::Internal(message) => ErrorBody {
                error: "Unexpected server error".into(),
                details: Some(message.clone()),
                ..ErrorBody::default()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Configuration => tracing::error!("platform configuration missing"),
            Self::Store { .. } | Self::Internal(_) => {
                tracing::error!(error = %self, "request failed")
            }
            Self::Unauthorized { .. } => tracing::warn!(error = %self, "request unauthorized"),
            _ => tracing::debug!(error = %self, "request rejected"),
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::MissingFields(fields) => Self::MissingFields(fields),
        }
    }
}
