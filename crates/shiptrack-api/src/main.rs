//! # shiptrack-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to `PORT` (default 8080).
//!
//! Backend selection:
//!
//! 1. `SHIPTRACK_DEV_TOKENS` set: static tokens over an in-memory store.
//! 2. Platform configured: identity provider plus the REST endpoint, or a
//!    direct Postgres pool when `DATABASE_URL` is set.
//! 3. Otherwise the server still starts, and shipment endpoints answer 500.

use shiptrack_api::auth::{IdentityVerifier, StaticTokens};
use shiptrack_api::state::{AppConfig, AppState, Backend};
use shiptrack_api::store::ShipmentStore;
use shiptrack_supabase::{SupabaseClient, SupabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env();
    let port = config.port;

    let state = match std::env::var("SHIPTRACK_DEV_TOKENS") {
        Ok(raw) if !raw.trim().is_empty() => {
            let tokens = StaticTokens::parse(&raw).map_err(|e| {
                tracing::error!("SHIPTRACK_DEV_TOKENS is invalid: {e}");
                e
            })?;
            tracing::warn!("Development mode: static tokens over an in-memory store");
            AppState::new(config, Backend::in_memory(tokens))
        }
        _ => platform_state(config).await?,
    };

    let app = shiptrack_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("shiptrack API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filter (default `info`); `LOG_FORMAT=json` for JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn platform_state(config: AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let supabase_config = match SupabaseConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(
                "Platform not configured: {e}. Shipment endpoints will return 500."
            );
            return Ok(AppState::unconfigured(config));
        }
    };

    let client = SupabaseClient::new(supabase_config).map_err(|e| {
        tracing::error!("Failed to create platform client: {e}");
        e
    })?;

    let db_pool = shiptrack_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    let store = match db_pool {
        Some(pool) => ShipmentStore::Postgres(pool),
        None => ShipmentStore::Rest(client.rest().clone()),
    };
    tracing::info!(store = store.kind(), "Platform client configured");

    let backend = Backend {
        verifier: IdentityVerifier::Supabase(client.auth().clone()),
        store,
    };
    Ok(AppState::new(config, backend))
}
