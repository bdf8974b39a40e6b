//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! Requests share no mutable state beyond what the store backend holds.
//! When the platform is not configured the state carries no [`Backend`] and
//! every shipment endpoint answers 500 once the bearer check has passed.

use crate::auth::{IdentityVerifier, StaticTokens};
use crate::error::AppError;
use crate::store::{MemoryStore, ShipmentStore};

/// Identity verification plus shipment persistence.
#[derive(Debug, Clone)]
pub struct Backend {
    pub verifier: IdentityVerifier,
    pub store: ShipmentStore,
}

impl Backend {
    /// Static tokens over an in-memory store.
    pub fn in_memory(tokens: StaticTokens) -> Self {
        Self {
            verifier: IdentityVerifier::Static(tokens),
            store: ShipmentStore::Memory(MemoryStore::new()),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl AppConfig {
    /// Read `PORT`, falling back to 8080.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(8080);
        Self { port }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    backend: Option<Backend>,
}

impl AppState {
    /// State with a working backend.
    pub fn new(config: AppConfig, backend: Backend) -> Self {
        Self {
            config,
            backend: Some(backend),
        }
    }

    /// State for a deployment whose platform credentials are missing.
    pub fn unconfigured(config: AppConfig) -> Self {
        Self {
            config,
            backend: None,
        }
    }

    /// The configured backend, or a 500 configuration error.
    pub fn backend(&self) -> Result<&Backend, AppError> {
        self.backend.as_ref().ok_or(AppError::Configuration)
    }

    /// Whether a backend is configured.
    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }
}
