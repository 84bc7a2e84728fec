//! Handlers for `/regions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/regions` | `?page&limit&search&dusun` |
//! | `POST`   | `/regions` | Body: [`NewRegion`]; returns 201 |
//! | `GET`    | `/regions/options` | Dropdown entries |
//! | `GET`    | `/regions/{id}` | 404 if not found |
//! | `PUT`    | `/regions/{id}` | Body: [`NewRegion`] |
//! | `DELETE` | `/regions/{id}` | 409 while family cards reference it |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use uuid::Uuid;
use warga_core::{
  Registry,
  page::Page,
  region::{NewRegion, Region, RegionFilter, RegionOption},
  store::RegistryStore,
};

use crate::{
  error::ApiError,
  extract::{CurrentActor, ListParams},
};

/// `GET /regions`
pub async fn list<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Query(params): Query<ListParams>,
  Query(filter): Query<RegionFilter>,
) -> Result<Json<Page<Region>>, ApiError> {
  Ok(Json(registry.list_regions(&actor, params.with(filter)).await?))
}

/// `POST /regions`
pub async fn create<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<NewRegion>,
) -> Result<impl IntoResponse, ApiError> {
  let region = registry.create_region(&actor, body).await?;
  Ok((StatusCode::CREATED, Json(region)))
}

/// `GET /regions/options`
pub async fn options<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<RegionOption>>, ApiError> {
  Ok(Json(registry.region_options(&actor).await?))
}

/// `GET /regions/{id}`
pub async fn get_one<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Region>, ApiError> {
  Ok(Json(registry.get_region(&actor, id).await?))
}

/// `PUT /regions/{id}`
pub async fn update<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(body): Json<NewRegion>,
) -> Result<Json<Region>, ApiError> {
  Ok(Json(registry.update_region(&actor, id, body).await?))
}

/// `DELETE /regions/{id}`
pub async fn delete<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  registry.delete_region(&actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
