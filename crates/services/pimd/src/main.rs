//! PIM Service (pimd)
//!
//! Serves the PIM HTTP API: account registration and login, session-scoped
//! particle (note) management and an administrative password reset.
//!
//! All state lives in a SQLite database; migrations are applied at startup.

use pim_models::db::connection::DbConnection;
use pim_web::{auth::AuthService, mw_auth::AdminKey};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api::{router, setup_api},
    config::PimdConfig,
    prelude::*,
    state::AppState,
};

mod api;
mod config;
mod error;
mod prelude;
mod state;

/// Main entry point for the PIM service.
///
/// Initializes logging, opens and migrates the database, then serves the API
/// until a shutdown signal is received or the server fails.
///
/// # Examples
///
/// ```bash
/// export DATABASE_URL=/var/lib/pim/pim.db
/// export PIMD_ADMIN_KEY=change-me
/// pimd
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PimdConfig::from_env()?;
    tracing::info!("Starting with {config}");

    let db = DbConnection::new(&config.db)?.setup()?;
    if config.admin_key.is_none() {
        tracing::warn!("PIMD_ADMIN_KEY not set, password resets are disabled");
    }
    let state = AppState::new(
        AuthService::new(db).with_session_lifetime(config.session_lifetime),
        AdminKey::new(config.admin_key.as_deref()),
    );

    let api_handle = setup_api(router(state), config.bind_addr).await?;

    tokio::select! {
        result = api_handle => {
            tracing::error!("API server stopped: {:?}", result);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
