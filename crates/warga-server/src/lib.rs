//! HTTP server for Warga.
//!
//! Serves the JSON API from `warga-api` under `/api`, behind HTTP Basic
//! auth, over a [`SqliteStore`].

pub mod auth;
pub mod config;
pub mod error;

pub use config::ServerConfig;
pub use error::{Error, Result};

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use warga_core::{Registry, store::RegistryStore};
use warga_store_sqlite::SqliteStore;

use auth::{AuthConfig, require_auth};

/// Build the application router: `/api/**` requires authentication,
/// `/health` does not.
pub fn router<S>(registry: Arc<Registry<S>>, auth: Arc<AuthConfig>) -> Router
where
  S: RegistryStore + 'static,
{
  Router::new()
    .nest("/api", warga_api::api_router(registry))
    .layer(middleware::from_fn_with_state(auth, require_auth))
    .route("/health", get(|| async { "ok" }))
    .layer(TraceLayer::new_for_http())
}

/// Open the configured store and wrap it in a registry, granting the
/// configured administrators their role.
pub async fn open_registry(config: &ServerConfig) -> Result<Arc<Registry<SqliteStore>>> {
  let store_path = config.expanded_store_path();
  let store = SqliteStore::open(&store_path).await?;
  let registry =
    Registry::new(Arc::new(store)).with_import_batch(config.import_batch_size);
  bootstrap_admins(&registry, config).await?;
  Ok(Arc::new(registry))
}

/// Grant ADMIN to every configured administrator.
pub async fn bootstrap_admins<S: RegistryStore>(
  registry: &Registry<S>,
  config: &ServerConfig,
) -> Result<()> {
  if config.admins.is_empty() {
    warn!("no administrators configured; roles can only be assigned in the database");
  }
  for admin in &config.admins {
    if !config.accounts.iter().any(|a| &a.username == admin) {
      warn!(%admin, "administrator has no sign-in account");
    }
    registry.bootstrap_admin(admin).await?;
    info!(%admin, "administrator role ensured");
  }
  Ok(())
}
