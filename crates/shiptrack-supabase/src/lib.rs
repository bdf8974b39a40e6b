//! # shiptrack-supabase: Typed client for the hosted platform
//!
//! Two services sit behind one project URL:
//! - **Identity provider** at `/auth/v1`: resolves bearer tokens to users and
//!   backs sign-up / sign-in for the CLI.
//! - **Table API** at `/rest/v1`: PostgREST over the `shipment` table.
//!
//! ## Keys
//!
//! The table client authenticates with the service-role key and so bypasses
//! row-level security; callers scope reads by owner themselves. The identity
//! client sends the public anon key.

pub mod auth;
pub mod config;
pub mod error;
pub mod rest;

pub use auth::{AuthClient, AuthSession, AuthUser, SignUpOutcome};
pub use config::{ConfigError, SupabaseConfig};
pub use error::{PostgrestError, SupabaseError};
pub use rest::RestClient;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

/// Top-level platform client. Holds one sub-client per service.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    auth: AuthClient,
    rest: RestClient,
}

impl SupabaseClient {
    /// Create a client from configuration.
    pub fn new(config: SupabaseConfig) -> Result<Self, SupabaseError> {
        let auth_http = build_http(
            config.timeout_secs,
            key_headers("ANON_KEY", &config.anon_key, false)?,
        )?;
        let rest_http = build_http(
            config.timeout_secs,
            key_headers("SERVICE_ROLE_KEY", &config.service_role_key, true)?,
        )?;

        Ok(Self {
            auth: AuthClient::with_http(auth_http, config.project_url.clone()),
            rest: RestClient::new(rest_http, config.project_url),
        })
    }

    /// Access the identity-provider client.
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Access the table client.
    pub fn rest(&self) -> &RestClient {
        &self.rest
    }
}

/// `apikey` header, plus a matching bearer when `as_bearer` is set.
pub(crate) fn key_headers(
    var: &'static str,
    key: &str,
    as_bearer: bool,
) -> Result<HeaderMap, SupabaseError> {
    let sensitive = |raw: &str| -> Result<HeaderValue, SupabaseError> {
        let mut value = HeaderValue::from_str(raw).map_err(|_| ConfigError::InvalidHeader(var))?;
        value.set_sensitive(true);
        Ok(value)
    };

    let mut headers = HeaderMap::new();
    headers.insert("apikey", sensitive(key)?);
    if as_bearer {
        headers.insert(AUTHORIZATION, sensitive(&format!("Bearer {key}"))?);
    }
    Ok(headers)
}

pub(crate) fn build_http(timeout_secs: u64, headers: HeaderMap) -> Result<reqwest::Client, SupabaseError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(headers)
        .build()
        .map_err(|e| SupabaseError::Http {
            endpoint: "client_init".into(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_headers_carry_bearer() {
        let headers = key_headers("SERVICE_ROLE_KEY", "svc", true).unwrap();
        assert_eq!(headers.get("apikey").unwrap(), "svc");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer svc");
        assert!(headers.get("apikey").unwrap().is_sensitive());
    }

    #[test]
    fn anon_headers_have_no_bearer() {
        let headers = key_headers("ANON_KEY", "anon", false).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn invalid_key_is_a_config_error() {
        let err = key_headers("ANON_KEY", "bad\nkey", false).unwrap_err();
        assert!(matches!(
            err,
            SupabaseError::Config(ConfigError::InvalidHeader("ANON_KEY"))
        ));
    }

    #[test]
    fn client_builds_from_mock_config() {
        let cfg = SupabaseConfig::local_mock("http://127.0.0.1:9000", "svc", "anon").unwrap();
        assert!(SupabaseClient::new(cfg).is_ok());
    }
}
