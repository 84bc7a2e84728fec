use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{Registry, store_error};
use crate::{
  Error, Result,
  page::{ListQuery, Page},
  permission::{Action, Resource},
  region::{NewRegion, Region, RegionFilter, RegionOption},
  role::Actor,
  store::{Dependents, RegistryStore},
};

const ENTITY: &str = "Wilayah";

impl<S: RegistryStore> Registry<S> {
  pub async fn create_region(&self, actor: &Actor, input: NewRegion) -> Result<Region> {
    self
      .prepare_write(actor, Resource::Region, Action::Create, &input, None)
      .await?;

    let region = build_region(Uuid::new_v4(), input);
    self
      .store
      .insert_region(region.clone())
      .await
      .map_err(store_error)?;

    info!(user = %actor.user_id, id = %region.id, label = %region.label(), "region created");
    Ok(region)
  }

  pub async fn update_region(
    &self,
    actor: &Actor,
    id: Uuid,
    input: NewRegion,
  ) -> Result<Region> {
    self
      .prepare_write(actor, Resource::Region, Action::Update, &input, Some(id))
      .await?;

    let existing = self.get_region_row(id).await?;
    let input = input.normalized();
    let region = Region {
      dusun: input.dusun,
      rw: input.rw,
      rt: input.rt,
      desa: input.desa,
      kecamatan: input.kecamatan,
      kabupaten: input.kabupaten,
      provinsi: input.provinsi,
      updated_at: Utc::now(),
      ..existing
    };
    if !self
      .store
      .update_region(region.clone())
      .await
      .map_err(store_error)?
    {
      return Err(Error::NotFound { entity: ENTITY, id });
    }

    info!(user = %actor.user_id, %id, "region updated");
    Ok(region)
  }

  /// Hard delete; refused while any family card is registered in the region.
  pub async fn delete_region(&self, actor: &Actor, id: Uuid) -> Result<()> {
    self.authorize(actor, Resource::Region, Action::Delete).await?;
    self.ensure_unreferenced(Dependents::FamilyCardsIn(id)).await?;

    if !self.store.delete_region(id).await.map_err(store_error)? {
      return Err(Error::NotFound { entity: ENTITY, id });
    }
    info!(user = %actor.user_id, %id, "region deleted");
    Ok(())
  }

  pub async fn get_region(&self, actor: &Actor, id: Uuid) -> Result<Region> {
    self.authorize(actor, Resource::Region, Action::Read).await?;
    self.get_region_row(id).await
  }

  pub async fn list_regions(
    &self,
    actor: &Actor,
    query: ListQuery<RegionFilter>,
  ) -> Result<Page<Region>> {
    self.authorize(actor, Resource::Region, Action::Read).await?;
    let listing = query.into_listing();
    let window = listing.window;
    let (rows, total) = self.store.list_regions(listing).await.map_err(store_error)?;
    Ok(Page::new(rows, total, window))
  }

  pub async fn region_options(&self, actor: &Actor) -> Result<Vec<RegionOption>> {
    self.authorize(actor, Resource::Region, Action::Read).await?;
    let regions = self.store.all_regions().await.map_err(store_error)?;
    Ok(
      regions
        .into_iter()
        .map(|r| RegionOption { id: r.id, label: r.label() })
        .collect(),
    )
  }

  pub(crate) async fn get_region_row(&self, id: Uuid) -> Result<Region> {
    self
      .store
      .get_region(id)
      .await
      .map_err(store_error)?
      .ok_or(Error::NotFound { entity: ENTITY, id })
  }
}

/// Normalize a validated input into a new row stamped with the current time.
pub(crate) fn build_region(id: Uuid, input: NewRegion) -> Region {
  let input = input.normalized();
  let now = Utc::now();
  Region {
    id,
    dusun: input.dusun,
    rw: input.rw,
    rt: input.rt,
    desa: input.desa,
    kecamatan: input.kecamatan,
    kabupaten: input.kabupaten,
    provinsi: input.provinsi,
    created_at: now,
    updated_at: now,
  }
}
