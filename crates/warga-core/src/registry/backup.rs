use tracing::info;

use super::{Registry, store_error};
use crate::{
  Result,
  backup::Backup,
  family_card::FamilyCard,
  letter::Letter,
  mutation::Mutation,
  permission::{Action, Resource},
  region::Region,
  resident::Resident,
  role::Actor,
  store::RegistryStore,
};

impl<S: RegistryStore> Registry<S> {
  /// Dump every table. Administrators only.
  pub async fn backup(&self, actor: &Actor) -> Result<Backup> {
    self.authorize(actor, Resource::Backup, Action::Read).await?;

    let store = &self.store;
    let (regions, family_cards, residents, mutations, letters, user_roles) = futures::try_join!(
      store.all_regions(),
      store.all_family_cards(),
      store.all_residents(),
      store.all_mutations(),
      store.all_letters(),
      store.list_roles(),
    )
    .map_err(store_error)?;

    let backup = Backup::new(
      &actor.user_id,
      regions,
      family_cards,
      residents,
      mutations,
      letters,
      user_roles,
    );
    info!(user = %actor.user_id, counts = ?backup.metadata.counts, "backup exported");
    Ok(backup)
  }

  // ── Full reads for spreadsheet export ───────────────────────────────────

  pub async fn export_regions(&self, actor: &Actor) -> Result<Vec<Region>> {
    self.authorize(actor, Resource::Export, Action::Read).await?;
    self.store.all_regions().await.map_err(store_error)
  }

  pub async fn export_family_cards(&self, actor: &Actor) -> Result<Vec<FamilyCard>> {
    self.authorize(actor, Resource::Export, Action::Read).await?;
    self.store.all_family_cards().await.map_err(store_error)
  }

  pub async fn export_residents(&self, actor: &Actor) -> Result<Vec<Resident>> {
    self.authorize(actor, Resource::Export, Action::Read).await?;
    self.store.all_residents().await.map_err(store_error)
  }

  pub async fn export_mutations(&self, actor: &Actor) -> Result<Vec<Mutation>> {
    self.authorize(actor, Resource::Export, Action::Read).await?;
    self.store.all_mutations().await.map_err(store_error)
  }

  pub async fn export_letters(&self, actor: &Actor) -> Result<Vec<Letter>> {
    self.authorize(actor, Resource::Export, Action::Read).await?;
    self.store.all_letters().await.map_err(store_error)
  }
}
