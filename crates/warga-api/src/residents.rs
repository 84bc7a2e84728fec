//! Handlers for `/residents` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/residents` | `?page&limit&search&status&jenis_kelamin&kk_id&wilayah_id` |
//! | `POST`   | `/residents` | Body: [`NewResident`]; returns 201 |
//! | `GET`    | `/residents/options` | Living residents only |
//! | `GET`    | `/residents/{id}` | 404 if not found |
//! | `PUT`    | `/residents/{id}` | Body: [`NewResident`] |
//! | `DELETE` | `/residents/{id}` | Soft delete: status becomes `PINDAH` |

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
  resident::{NewResident, Resident, ResidentFilter, ResidentOption},
  store::RegistryStore,
};

use crate::{
  error::ApiError,
  extract::{CurrentActor, ListParams},
};

/// `GET /residents`
pub async fn list<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Query(params): Query<ListParams>,
  Query(filter): Query<ResidentFilter>,
) -> Result<Json<Page<Resident>>, ApiError> {
  Ok(Json(registry.list_residents(&actor, params.with(filter)).await?))
}

/// `POST /residents`
pub async fn create<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<NewResident>,
) -> Result<impl IntoResponse, ApiError> {
  let resident = registry.create_resident(&actor, body).await?;
  Ok((StatusCode::CREATED, Json(resident)))
}

/// `GET /residents/options`
pub async fn options<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<ResidentOption>>, ApiError> {
  Ok(Json(registry.resident_options(&actor).await?))
}

/// `GET /residents/{id}`
pub async fn get_one<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Resident>, ApiError> {
  Ok(Json(registry.get_resident(&actor, id).await?))
}

/// `PUT /residents/{id}`
pub async fn update<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(body): Json<NewResident>,
) -> Result<Json<Resident>, ApiError> {
  Ok(Json(registry.update_resident(&actor, id, body).await?))
}

/// `DELETE /residents/{id}`
pub async fn delete<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  registry.delete_resident(&actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
