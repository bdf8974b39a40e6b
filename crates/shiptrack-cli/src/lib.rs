//! # shiptrack-cli: Command-Line Client
//!
//! Provides the `shiptrack` command: account management against the
//! identity provider, and shipment operations against `shiptrack-api`.
//!
//! ## Subcommands
//!
//! - `shiptrack signup` / `login` / `logout`: account and session file.
//! - `shiptrack create`: submit a shipment (all fields as flags).
//! - `shiptrack list`: the signed-in user's shipments, newest first.
//! - `shiptrack track`: look up any shipment by tracking number.
//!
//! ```bash
//! shiptrack login --email a@example.com --password '...'
//! shiptrack track AB12CD34
//! ```

pub mod account;
pub mod api;
pub mod session;
pub mod shipments;

use std::path::PathBuf;

use anyhow::{Context, Result};
use shiptrack_supabase::config::DEFAULT_TIMEOUT_SECS;
use shiptrack_supabase::AuthClient;
use url::Url;
use zeroize::Zeroizing;

use crate::api::ShipmentApi;
use crate::session::Session;

/// Settings shared by every subcommand.
#[derive(Clone)]
pub struct CliContext {
    /// Base URL of `shiptrack-api`.
    pub api_url: Url,
    /// Where the session is kept.
    pub session_path: PathBuf,
    /// Platform base URL, needed for account commands only.
    pub project_url: Option<String>,
    /// Platform anon key, needed for account commands only.
    pub anon_key: Option<Zeroizing<String>>,
    /// HTTP timeout.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for CliContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliContext")
            .field("api_url", &self.api_url.as_str())
            .field("session_path", &self.session_path)
            .field("project_url", &self.project_url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CliContext {
    /// Context for `api_url` with no platform credentials.
    pub fn new(api_url: Url, session_path: PathBuf) -> Self {
        Self {
            api_url,
            session_path,
            project_url: None,
            anon_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Identity provider client. Requires `PROJECT_URL` and `ANON_KEY`.
    pub fn auth_client(&self) -> Result<AuthClient> {
        let project_url = self
            .project_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .context("PROJECT_URL is not set (use --project-url or the PROJECT_URL env var)")?;
        let anon_key = self
            .anon_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .context("ANON_KEY is not set (use --anon-key or the ANON_KEY env var)")?;
        let url = Url::parse(project_url.trim())
            .with_context(|| format!("PROJECT_URL is not a valid URL: {project_url}"))?;
        AuthClient::new(url, anon_key, self.timeout_secs).context("failed to build identity client")
    }

    /// Shipment API client.
    pub fn shipment_api(&self) -> Result<ShipmentApi> {
        ShipmentApi::new(self.api_url.clone(), self.timeout_secs)
            .context("failed to build API client")
    }

    /// The saved session, or an error telling the user to log in.
    pub fn require_session(&self) -> Result<Session> {
        Session::load(&self.session_path)?
            .context("not logged in (run `shiptrack login` first)")
    }
}
