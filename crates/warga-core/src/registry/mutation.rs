use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{Registry, store_error};
use crate::{
  Error, Result,
  mutation::{Mutation, MutationFilter, NewMutation},
  page::{ListQuery, Page},
  permission::{Action, Resource},
  role::Actor,
  store::RegistryStore,
  validation,
};

const ENTITY: &str = "Mutasi";

impl<S: RegistryStore> Registry<S> {
  /// Append a mutation and move the resident to the status it implies.
  ///
  /// The resident's current status is not consulted: any kind of event may
  /// be recorded for any resident.
  pub async fn create_mutation(&self, actor: &Actor, input: NewMutation) -> Result<Mutation> {
    self.authorize(actor, Resource::Mutation, Action::Create).await?;
    validation::check(&input)?;

    if self
      .store
      .get_resident(input.penduduk_id)
      .await
      .map_err(store_error)?
      .is_none()
    {
      return Err(Error::field("penduduk_id", "Penduduk tidak ditemukan"));
    }

    let mutation = Mutation {
      id:                Uuid::new_v4(),
      penduduk_id:       input.penduduk_id,
      jenis:             input.jenis,
      tanggal_peristiwa: input.tanggal_peristiwa,
      keterangan:        input.keterangan,
      created_by:        actor.user_id.clone(),
      created_at:        Utc::now(),
    };
    let resulting = mutation.jenis.resulting_status();
    self
      .store
      .record_mutation(mutation.clone(), resulting)
      .await
      .map_err(store_error)?;

    info!(
      user = %actor.user_id,
      id = %mutation.id,
      resident = %mutation.penduduk_id,
      jenis = %mutation.jenis,
      "mutation recorded"
    );
    Ok(mutation)
  }

  pub async fn get_mutation(&self, actor: &Actor, id: Uuid) -> Result<Mutation> {
    self.authorize(actor, Resource::Mutation, Action::Read).await?;
    self
      .store
      .get_mutation(id)
      .await
      .map_err(store_error)?
      .ok_or(Error::NotFound { entity: ENTITY, id })
  }

  pub async fn list_mutations(
    &self,
    actor: &Actor,
    query: ListQuery<MutationFilter>,
  ) -> Result<Page<Mutation>> {
    self.authorize(actor, Resource::Mutation, Action::Read).await?;
    let listing = query.into_listing();
    let window = listing.window;
    let (rows, total) = self
      .store
      .list_mutations(listing)
      .await
      .map_err(store_error)?;
    Ok(Page::new(rows, total, window))
  }
}
