use chrono::Utc;
use tracing::info;

use super::{Registry, store_error};
use crate::{
  Error, Result,
  permission::{Action, Resource},
  role::{Actor, Role, UserRole},
  store::RegistryStore,
};

impl<S: RegistryStore> Registry<S> {
  /// The caller's own role. Any authenticated user may ask.
  pub async fn my_role(&self, actor: &Actor) -> Result<Role> { self.role_of(actor).await }

  pub async fn list_roles(&self, actor: &Actor) -> Result<Vec<UserRole>> {
    self.authorize(actor, Resource::Settings, Action::Read).await?;
    self.store.list_roles().await.map_err(store_error)
  }

  /// Assign `role` to `user_id`. Administrators may not demote themselves,
  /// so the registry always keeps at least the acting administrator.
  pub async fn set_role(&self, actor: &Actor, user_id: &str, role: Role) -> Result<UserRole> {
    self.authorize(actor, Resource::Settings, Action::Update).await?;

    let user_id = user_id.trim();
    if user_id.is_empty() {
      return Err(Error::field("user_id", "User wajib diisi"));
    }
    if user_id == actor.user_id && role != Role::Admin {
      return Err(Error::field("role", "Admin tidak dapat menurunkan perannya sendiri"));
    }

    let row = UserRole { user_id: user_id.to_owned(), role, updated_at: Utc::now() };
    self.store.put_role(row.clone()).await.map_err(store_error)?;

    info!(user = %actor.user_id, subject = %row.user_id, %role, "role assigned");
    Ok(row)
  }

  /// Grant [`Role::Admin`] to `user_id` without an acting user. Used once at
  /// startup for the accounts the server configuration names as admins.
  pub async fn bootstrap_admin(&self, user_id: &str) -> Result<()> {
    let current = self
      .store
      .get_role(user_id.to_owned())
      .await
      .map_err(store_error)?;
    if current.is_some_and(|r| r.role == Role::Admin) {
      return Ok(());
    }
    let row = UserRole { user_id: user_id.to_owned(), role: Role::Admin, updated_at: Utc::now() };
    self.store.put_role(row).await.map_err(store_error)?;
    info!(subject = %user_id, "bootstrap admin granted");
    Ok(())
  }
}
