//! Handlers for `/family-cards` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/family-cards` | `?page&limit&search&wilayah_id` |
//! | `POST`   | `/family-cards` | Body: [`NewFamilyCard`]; returns 201 |
//! | `GET`    | `/family-cards/options` | Dropdown entries with the head's name |
//! | `GET`    | `/family-cards/{id}` | 404 if not found |
//! | `PUT`    | `/family-cards/{id}` | Body: [`NewFamilyCard`] |
//! | `DELETE` | `/family-cards/{id}` | 409 while residents reference it |
//! | `GET`    | `/family-cards/{id}/members` | Every resident on the card |

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
  family_card::{FamilyCard, FamilyCardFilter, FamilyCardOption, NewFamilyCard},
  page::Page,
  resident::Resident,
  store::RegistryStore,
};

use crate::{
  error::ApiError,
  extract::{CurrentActor, ListParams},
};

/// `GET /family-cards`
pub async fn list<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Query(params): Query<ListParams>,
  Query(filter): Query<FamilyCardFilter>,
) -> Result<Json<Page<FamilyCard>>, ApiError> {
  Ok(Json(registry.list_family_cards(&actor, params.with(filter)).await?))
}

/// `POST /family-cards`
pub async fn create<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<NewFamilyCard>,
) -> Result<impl IntoResponse, ApiError> {
  let card = registry.create_family_card(&actor, body).await?;
  Ok((StatusCode::CREATED, Json(card)))
}

/// `GET /family-cards/options`
pub async fn options<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<FamilyCardOption>>, ApiError> {
  Ok(Json(registry.family_card_options(&actor).await?))
}

/// `GET /family-cards/{id}`
pub async fn get_one<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<FamilyCard>, ApiError> {
  Ok(Json(registry.get_family_card(&actor, id).await?))
}

/// `PUT /family-cards/{id}`
pub async fn update<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(body): Json<NewFamilyCard>,
) -> Result<Json<FamilyCard>, ApiError> {
  Ok(Json(registry.update_family_card(&actor, id, body).await?))
}

/// `DELETE /family-cards/{id}`
pub async fn delete<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  registry.delete_family_card(&actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /family-cards/{id}/members`
pub async fn members<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Resident>>, ApiError> {
  Ok(Json(registry.family_card_members(&actor, id).await?))
}
