//! Handlers for `/letters` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/letters` | `?page&limit&search&jenis_surat&penduduk_id` |
//! | `POST`   | `/letters` | Body: [`NewLetter`]; captures the resident snapshot |
//! | `GET`    | `/letters/{id}` | 404 if not found |
//! | `PUT`    | `/letters/{id}` | Body: [`NewLetter`] |
//! | `DELETE` | `/letters/{id}` | Hard delete |

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
  letter::{Letter, LetterFilter, NewLetter},
  page::Page,
  store::RegistryStore,
};

use crate::{
  error::ApiError,
  extract::{CurrentActor, ListParams},
};

/// `GET /letters`
pub async fn list<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Query(params): Query<ListParams>,
  Query(filter): Query<LetterFilter>,
) -> Result<Json<Page<Letter>>, ApiError> {
  Ok(Json(registry.list_letters(&actor, params.with(filter)).await?))
}

/// `POST /letters`
pub async fn create<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<NewLetter>,
) -> Result<impl IntoResponse, ApiError> {
  let letter = registry.create_letter(&actor, body).await?;
  Ok((StatusCode::CREATED, Json(letter)))
}

/// `GET /letters/{id}`
pub async fn get_one<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Letter>, ApiError> {
  Ok(Json(registry.get_letter(&actor, id).await?))
}

/// `PUT /letters/{id}`
pub async fn update<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(body): Json<NewLetter>,
) -> Result<Json<Letter>, ApiError> {
  Ok(Json(registry.update_letter(&actor, id, body).await?))
}

/// `DELETE /letters/{id}`
pub async fn delete<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  registry.delete_letter(&actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
