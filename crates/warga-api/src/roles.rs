//! Handlers for `/roles` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/roles` | Every assigned role (admin only) |
//! | `GET`  | `/roles/me` | The caller's role and what it grants |
//! | `PUT`  | `/roles/{user_id}` | Body: `{"role":"OPERATOR"}` (admin only) |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use warga_core::{
  Registry,
  permission::{Action, Resource, grants},
  role::{Role, UserRole},
  store::RegistryStore,
};

use crate::{error::ApiError, extract::CurrentActor};

/// `GET /roles`
pub async fn list<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<UserRole>>, ApiError> {
  Ok(Json(registry.list_roles(&actor).await?))
}

#[derive(Debug, Serialize)]
pub struct Me {
  pub user_id:     String,
  pub role:        Role,
  pub permissions: Vec<(Resource, Action)>,
}

/// `GET /roles/me`
pub async fn me<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Me>, ApiError> {
  let role = registry.my_role(&actor).await?;
  Ok(Json(Me { user_id: actor.user_id, role, permissions: grants(role) }))
}

#[derive(Debug, Deserialize)]
pub struct SetRoleBody {
  pub role: Role,
}

/// `PUT /roles/{user_id}`
pub async fn set<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(user_id): Path<String>,
  Json(body): Json<SetRoleBody>,
) -> Result<Json<UserRole>, ApiError> {
  Ok(Json(registry.set_role(&actor, &user_id, body.role).await?))
}
