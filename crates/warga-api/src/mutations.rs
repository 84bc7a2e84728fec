//! Handlers for `/mutations` endpoints. Mutations are append-only: there is
//! no update or delete route.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/mutations` | `?page&limit&search&jenis&penduduk_id` |
//! | `POST` | `/mutations` | Body: [`NewMutation`]; also updates the resident's status |
//! | `GET`  | `/mutations/{id}` | 404 if not found |

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
  mutation::{Mutation, MutationFilter, NewMutation},
  page::Page,
  store::RegistryStore,
};

use crate::{
  error::ApiError,
  extract::{CurrentActor, ListParams},
};

/// `GET /mutations`
pub async fn list<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Query(params): Query<ListParams>,
  Query(filter): Query<MutationFilter>,
) -> Result<Json<Page<Mutation>>, ApiError> {
  Ok(Json(registry.list_mutations(&actor, params.with(filter)).await?))
}

/// `POST /mutations`
pub async fn create<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<NewMutation>,
) -> Result<impl IntoResponse, ApiError> {
  let mutation = registry.create_mutation(&actor, body).await?;
  Ok((StatusCode::CREATED, Json(mutation)))
}

/// `GET /mutations/{id}`
pub async fn get_one<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Mutation>, ApiError> {
  Ok(Json(registry.get_mutation(&actor, id).await?))
}
