//! Platform client error types.

use serde::Deserialize;

/// Error body returned by the table API.
///
/// Every field is optional on the wire; `message` falls back to the raw body
/// when the response is not the usual JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostgrestError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl PostgrestError {
    pub(crate) fn from_body(body: &str) -> Self {
        match serde_json::from_str::<PostgrestError>(body) {
            Ok(err) if !err.message.is_empty() => err,
            _ => Self {
                message: body.to_string(),
                ..Self::default()
            },
        }
    }
}

/// Errors from platform calls.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Identity provider returned a non-2xx status.
    #[error("{endpoint} returned {status}: {message}")]
    Auth {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// Table API returned a non-2xx status.
    #[error("{endpoint} returned {status}: {}", .error.message)]
    Postgrest {
        endpoint: String,
        status: u16,
        error: PostgrestError,
    },
    /// A write that should echo the row came back empty.
    #[error("{endpoint} returned no rows")]
    EmptyResponse { endpoint: String },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl SupabaseError {
    /// Human-readable message as the platform reported it.
    pub fn message(&self) -> String {
        match self {
            Self::Auth { message, .. } => message.clone(),
            Self::Postgrest { error, .. } => error.message.clone(),
            other => other.to_string(),
        }
    }

    /// Sign-in was refused because the address has not been confirmed yet.
    pub fn is_email_not_confirmed(&self) -> bool {
        matches!(self, Self::Auth { message, .. } if message.to_ascii_lowercase().contains("email not confirmed"))
    }
}

/// Pull a message out of an identity-provider error body. The provider
/// uses several shapes depending on the endpoint.
pub(crate) fn auth_message(body: &str, status: reqwest::StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
        ["msg", "message", "error_description", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_string))
    });
    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
