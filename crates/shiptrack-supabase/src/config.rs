//! Platform connection configuration.
//!
//! All three settings are required; there are no production defaults to fall
//! back on. A missing variable is reported by name so the operator knows
//! which one to set.

use url::Url;
use zeroize::Zeroizing;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the hosted platform.
///
/// Custom `Debug` implementation redacts both keys.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://abcd.supabase.co`.
    pub project_url: Url,
    /// Privileged key used for table access. Bypasses row-level security.
    pub service_role_key: Zeroizing<String>,
    /// Public key sent as `apikey` on identity-provider calls.
    pub anon_key: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("project_url", &self.project_url)
            .field("service_role_key", &"[REDACTED]")
            .field("anon_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SupabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PROJECT_URL` (required)
    /// - `SERVICE_ROLE_KEY` (required)
    /// - `ANON_KEY` (required)
    /// - `SUPABASE_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let raw_url = required("PROJECT_URL")?;
        let project_url = Url::parse(raw_url.trim())
            .map_err(|e| ConfigError::InvalidUrl("PROJECT_URL".to_string(), e.to_string()))?;

        Ok(Self {
            project_url,
            service_role_key: Zeroizing::new(required("SERVICE_ROLE_KEY")?),
            anon_key: Zeroizing::new(required("ANON_KEY")?),
            timeout_secs: lookup("SUPABASE_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Configuration pointing at a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base` cannot be parsed.
    pub fn local_mock(base: &str, service_role_key: &str, anon_key: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            project_url: Url::parse(base)
                .map_err(|e| ConfigError::InvalidUrl(base.to_string(), e.to_string()))?,
            service_role_key: Zeroizing::new(service_role_key.to_string()),
            anon_key: Zeroizing::new(anon_key.to_string()),
            timeout_secs: 5,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("{0} is not a valid header value")]
    InvalidHeader(&'static str),
}
