//! Typed client for the identity provider (`/auth/v1`).
//!
//! The service only needs [`AuthClient::get_user`] to resolve a bearer token
//! to a user. Sign-up, sign-in, and sign-out back the CLI.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shiptrack_core::UserId;
use url::Url;
use zeroize::Zeroizing;

use crate::error::{auth_message, SupabaseError};

// -- Types matching the provider's schemas ------------------------------------

/// User object returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthUser {
    /// The user id, if present and well-formed.
    pub fn user_id(&self) -> Option<UserId> {
        self.id.as_deref().and_then(|id| id.parse().ok())
    }
}

/// Tokens issued by a successful sign-in.
///
/// Custom `Debug` implementation redacts the tokens.
#[derive(Clone)]
pub struct AuthSession {
    pub access_token: Zeroizing<String>,
    pub refresh_token: Option<Zeroizing<String>>,
    pub expires_in: Option<u64>,
    pub user: Option<AuthUser>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish()
    }
}

/// Result of a sign-up.
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// Auto-confirm is on; the user is signed in.
    Session(AuthSession),
    /// A confirmation email was sent. No session yet.
    ConfirmationRequired(AuthUser),
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Both sign-up response shapes, flattened.
#[derive(Deserialize)]
struct RawAuthResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl RawAuthResponse {
    fn into_session(self) -> Option<AuthSession> {
        let access_token = self.access_token?;
        Some(AuthSession {
            access_token: Zeroizing::new(access_token),
            refresh_token: self.refresh_token.map(Zeroizing::new),
            expires_in: self.expires_in,
            user: self.user,
        })
    }
}

// -- Client -------------------------------------------------------------------

/// Client for the identity provider.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    /// Build a standalone client that sends `anon_key` as `apikey`.
    pub fn new(project_url: Url, anon_key: &str, timeout_secs: u64) -> Result<Self, SupabaseError> {
        let headers = crate::key_headers("ANON_KEY", anon_key, false)?;
        let http = crate::build_http(timeout_secs, headers)?;
        Ok(Self::with_http(http, project_url))
    }

    pub(crate) fn with_http(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Resolve an access token to its user.
    ///
    /// Calls `GET {project_url}/auth/v1/user`.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        let endpoint = "GET /auth/v1/user";
        let resp = self
            .http
            .get(self.url("user"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SupabaseError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        read_json(endpoint, resp).await
    }

    /// Register a new account.
    ///
    /// Calls `POST {project_url}/auth/v1/signup`.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, SupabaseError> {
        let endpoint = "POST /auth/v1/signup";
        let resp = self
            .http
            .post(self.url("signup"))
            .json(&Credentials { email, password })
            .send()
            .await
            .map_err(|e| SupabaseError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let raw: RawAuthResponse = read_json(endpoint, resp).await?;
        let fallback_user = AuthUser {
            id: raw.id.clone(),
            email: raw.email.clone(),
        };
        Ok(match raw.into_session() {
            Some(session) => SignUpOutcome::Session(session),
            None => SignUpOutcome::ConfirmationRequired(fallback_user),
        })
    }

    /// Exchange email and password for a session.
    ///
    /// Calls `POST {project_url}/auth/v1/token?grant_type=password`. An
    /// unconfirmed address fails with a message matched by
    /// [`SupabaseError::is_email_not_confirmed`].
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, SupabaseError> {
        let endpoint = "POST /auth/v1/token";
        let resp = self
            .http
            .post(self.url("token"))
            .query(&[("grant_type", "password")])
            .json(&Credentials { email, password })
            .send()
            .await
            .map_err(|e| SupabaseError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let raw: RawAuthResponse = read_json(endpoint, resp).await?;
        raw.into_session().ok_or(SupabaseError::EmptyResponse {
            endpoint: endpoint.into(),
        })
    }

    /// Revoke the session behind `access_token`.
    ///
    /// Calls `POST {project_url}/auth/v1/logout`.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let endpoint = "POST /auth/v1/logout";
        let resp = self
            .http
            .post(self.url("logout"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SupabaseError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::Auth {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                message: auth_message(&body, status),
            });
        }
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<T, SupabaseError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(endpoint, status = status.as_u16(), "identity provider rejected request");
        return Err(SupabaseError::Auth {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            message: auth_message(&body, status),
        });
    }

    resp.json().await.map_err(|e| SupabaseError::Deserialization {
        endpoint: endpoint.into(),
        source: e,
    })
}
