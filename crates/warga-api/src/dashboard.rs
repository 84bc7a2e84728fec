//! Handler for `GET /dashboard`.

use std::sync::Arc;

use axum::{Json, extract::State};
use warga_core::{Registry, dashboard::DashboardStats, store::RegistryStore};

use crate::{error::ApiError, extract::CurrentActor};

/// `GET /dashboard`
pub async fn handler<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<DashboardStats>, ApiError> {
  Ok(Json(registry.dashboard(&actor).await?))
}
