//! # Credential Verification
//!
//! Every shipment endpoint resolves its caller through [`AuthenticatedUser`],
//! an Axum extractor that runs before the body is read. The checks happen in
//! a fixed order:
//!
//! 1. bearer token present, else 401 with no external call;
//! 2. platform configured, else 500;
//! 3. token resolved to a user by the [`IdentityVerifier`], else 401.
//!
//! ## Token Format
//!
//! ```text
//! Authorization: Bearer {access_token}
//! ```
//!
//! A value without the `Bearer ` prefix is forwarded as-is and left for the
//! identity provider to reject. One verification call per request; nothing is
//! cached.

use std::collections::HashMap;

use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use shiptrack_core::{Identity, UserId};
use shiptrack_supabase::AuthClient;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

/// Message for a request without a usable token.
pub const NO_TOKEN: &str = "Unauthorized - No JWT provided";

/// Pull the bearer token out of the `Authorization` header.
///
/// Returns `None` when the header is absent, not valid UTF-8, or empty after
/// stripping the prefix.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves tokens to identities.
#[derive(Debug, Clone)]
pub enum IdentityVerifier {
    /// Ask the platform's identity provider.
    Supabase(AuthClient),
    /// Fixed token table for local development and tests.
    Static(StaticTokens),
}

impl IdentityVerifier {
    /// Resolve `token` to the caller's identity.
    pub async fn verify(&self, token: &str) -> Result<Identity, AppError> {
        match self {
            Self::Supabase(client) => {
                let user = client.get_user(token).await.map_err(|e| AppError::Unauthorized {
                    error: "Authentication failed".into(),
                    details: Some(e.message()),
                })?;
                let user_id = user
                    .user_id()
                    .ok_or_else(|| AppError::unauthorized("Could not get authenticated user"))?;
                Ok(Identity {
                    user_id,
                    email: user.email,
                })
            }
            Self::Static(tokens) => tokens
                .lookup(token)
                .map(Identity::new)
                .ok_or_else(|| AppError::Unauthorized {
                    error: "Authentication failed".into(),
                    details: Some("invalid token".into()),
                }),
        }
    }
}

/// Static token table, parsed from `token=uuid,token=uuid`.
///
/// Custom `Debug` implementation redacts the tokens.
#[derive(Clone, Default)]
pub struct StaticTokens {
    entries: HashMap<String, UserId>,
}

impl std::fmt::Debug for StaticTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokens")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl StaticTokens {
    /// Parse a comma-separated `token=uuid` list.
    pub fn parse(list: &str) -> Result<Self, String> {
        let mut entries = HashMap::new();
        for pair in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (token, user) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected token=uuid, got {pair:?}"))?;
            let token = token.trim();
            if token.is_empty() {
                return Err("empty token in token list".into());
            }
            let user_id: UserId = user.parse().map_err(|e| format!("{e}"))?;
            entries.insert(token.to_string(), user_id);
        }
        if entries.is_empty() {
            return Err("token list is empty".into());
        }
        Ok(Self { entries })
    }

    /// Add one entry.
    pub fn with(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.entries.insert(token.into(), user_id);
        self
    }

    /// Find the user for `token`. Every entry is compared, in constant time.
    fn lookup(&self, token: &str) -> Option<UserId> {
        let mut found = None;
        for (candidate, user_id) in &self.entries {
            if constant_time_token_eq(token, candidate) {
                found = Some(*user_id);
            }
        }
        found
    }
}

/// Constant-time comparison of bearer tokens.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// The verified caller of a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| AppError::unauthorized(NO_TOKEN))?;
        let backend = state.backend()?;
        let identity = backend.verifier.verify(token).await?;
        tracing::debug!(user_id = %identity.user_id, "caller verified");
        Ok(Self(identity))
    }
}
