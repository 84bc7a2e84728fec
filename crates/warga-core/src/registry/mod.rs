//! The registry service: every entity operation funnels through the same
//! authorize → validate → natural-key probe → write → error mapping sequence.
//!
//! The probe is only a fast path for a friendly message. Storage carries a
//! unique constraint for every natural key, and a constraint violation
//! reported by the store is mapped back to the same duplicate message.

mod backup;
mod dashboard;
mod family_card;
mod import;
mod letter;
mod mutation;
mod region;
mod resident;
mod role;

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::{
  Error, Result,
  permission::{self, Action, Resource},
  role::{Actor, Role},
  store::{Dependents, Keyed, RegistryStore, StoreError},
  validation,
};

/// Rows inserted per transaction during bulk import.
pub const DEFAULT_IMPORT_BATCH: usize = 100;

/// Entry point for all registry operations over a backend `S`.
///
/// Cloning is cheap; the store is shared.
pub struct Registry<S> {
  store:        Arc<S>,
  import_batch: usize,
}

impl<S> Clone for Registry<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), import_batch: self.import_batch }
  }
}

impl<S: RegistryStore> Registry<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, import_batch: DEFAULT_IMPORT_BATCH }
  }

  /// Override the bulk-import batch size (minimum 1).
  pub fn with_import_batch(mut self, size: usize) -> Self {
    self.import_batch = size.max(1);
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Shared steps ────────────────────────────────────────────────────────

  /// Resolve the actor's role; users without a role row are [`Role::User`].
  pub async fn role_of(&self, actor: &Actor) -> Result<Role> {
    let row = self
      .store
      .get_role(actor.user_id.clone())
      .await
      .map_err(store_error)?;
    Ok(row.map(|r| r.role).unwrap_or_default())
  }

  /// Check the static permission table for `actor`.
  pub(crate) async fn authorize(
    &self,
    actor: &Actor,
    resource: Resource,
    action: Action,
  ) -> Result<Role> {
    let role = self.role_of(actor).await?;
    if !permission::allows(role, resource, action) {
      warn!(user = %actor.user_id, %role, %resource, %action, "access denied");
      return Err(Error::Forbidden { role, resource, action });
    }
    Ok(role)
  }

  /// Authorize, validate, then make sure the input's natural key is free
  /// (ignoring the row being updated, if any).
  pub(crate) async fn prepare_write<I>(
    &self,
    actor: &Actor,
    resource: Resource,
    action: Action,
    input: &I,
    except: Option<Uuid>,
  ) -> Result<()>
  where
    I: Validate + Keyed,
  {
    self.authorize(actor, resource, action).await?;
    validation::check(input)?;

    let key = input.natural_key();
    let kind = key.kind();
    if self.store.key_taken(key, except).await.map_err(store_error)? {
      return Err(Error::Duplicate(kind.duplicate_message().to_owned()));
    }
    Ok(())
  }

  /// Refuse when any dependent row still references the target.
  pub(crate) async fn ensure_unreferenced(&self, of: Dependents) -> Result<()> {
    let count = self.store.count_dependents(of).await.map_err(store_error)?;
    if count > 0 {
      return Err(Error::InUse(of.in_use_message().to_owned()));
    }
    Ok(())
  }
}

/// Re-express a backend error for callers. Unique-constraint violations
/// become the matching duplicate message.
pub(crate) fn store_error<E: StoreError>(err: E) -> Error {
  if let Some(kind) = err.violated_key() {
    return Error::Duplicate(kind.duplicate_message().to_owned());
  }
  warn!(error = %err, "store error");
  Error::Store { message: err.to_string(), code: err.code() }
}
