use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{Registry, store_error};
use crate::{
  Error, Result,
  family_card::{FamilyCard, FamilyCardFilter, FamilyCardOption, NewFamilyCard},
  page::{ListQuery, Page},
  permission::{Action, Resource},
  resident::Resident,
  role::Actor,
  store::{Dependents, RegistryStore},
};

const ENTITY: &str = "Kartu Keluarga";

impl<S: RegistryStore> Registry<S> {
  pub async fn create_family_card(
    &self,
    actor: &Actor,
    input: NewFamilyCard,
  ) -> Result<FamilyCard> {
    self
      .prepare_write(actor, Resource::FamilyCard, Action::Create, &input, None)
      .await?;
    self.check_card_references(&input, None).await?;

    let card = build_family_card(Uuid::new_v4(), input);
    self
      .store
      .insert_family_card(card.clone())
      .await
      .map_err(store_error)?;

    info!(user = %actor.user_id, id = %card.id, "family card created");
    Ok(card)
  }

  pub async fn update_family_card(
    &self,
    actor: &Actor,
    id: Uuid,
    input: NewFamilyCard,
  ) -> Result<FamilyCard> {
    self
      .prepare_write(actor, Resource::FamilyCard, Action::Update, &input, Some(id))
      .await?;
    let existing = self.get_family_card_row(id).await?;
    self.check_card_references(&input, Some(id)).await?;

    let card = FamilyCard {
      nomor_kk: input.nomor_kk,
      wilayah_id: input.wilayah_id,
      kepala_keluarga_id: input.kepala_keluarga_id,
      alamat: input.alamat,
      scan_url: input.scan_url,
      updated_at: Utc::now(),
      ..existing
    };
    if !self
      .store
      .update_family_card(card.clone())
      .await
      .map_err(store_error)?
    {
      return Err(Error::NotFound { entity: ENTITY, id });
    }

    info!(user = %actor.user_id, %id, "family card updated");
    Ok(card)
  }

  /// Hard delete; refused while any resident still belongs to the card.
  pub async fn delete_family_card(&self, actor: &Actor, id: Uuid) -> Result<()> {
    self.authorize(actor, Resource::FamilyCard, Action::Delete).await?;
    self.ensure_unreferenced(Dependents::ResidentsOf(id)).await?;

    if !self.store.delete_family_card(id).await.map_err(store_error)? {
      return Err(Error::NotFound { entity: ENTITY, id });
    }
    info!(user = %actor.user_id, %id, "family card deleted");
    Ok(())
  }

  pub async fn get_family_card(&self, actor: &Actor, id: Uuid) -> Result<FamilyCard> {
    self.authorize(actor, Resource::FamilyCard, Action::Read).await?;
    self.get_family_card_row(id).await
  }

  pub async fn list_family_cards(
    &self,
    actor: &Actor,
    query: ListQuery<FamilyCardFilter>,
  ) -> Result<Page<FamilyCard>> {
    self.authorize(actor, Resource::FamilyCard, Action::Read).await?;
    let listing = query.into_listing();
    let window = listing.window;
    let (rows, total) = self
      .store
      .list_family_cards(listing)
      .await
      .map_err(store_error)?;
    Ok(Page::new(rows, total, window))
  }

  pub async fn family_card_options(&self, actor: &Actor) -> Result<Vec<FamilyCardOption>> {
    self.authorize(actor, Resource::FamilyCard, Action::Read).await?;
    self.store.family_card_options().await.map_err(store_error)
  }

  /// Every resident registered on the card, regardless of status.
  pub async fn family_card_members(&self, actor: &Actor, id: Uuid) -> Result<Vec<Resident>> {
    self.authorize(actor, Resource::Resident, Action::Read).await?;
    self.get_family_card_row(id).await?;

    self.store.family_members(id).await.map_err(store_error)
  }

  pub(crate) async fn get_family_card_row(&self, id: Uuid) -> Result<FamilyCard> {
    self
      .store
      .get_family_card(id)
      .await
      .map_err(store_error)?
      .ok_or(Error::NotFound { entity: ENTITY, id })
  }

  /// The region must exist; a named head of household must exist and, once
  /// the card exists, be one of its members.
  async fn check_card_references(
    &self,
    input: &NewFamilyCard,
    card_id: Option<Uuid>,
  ) -> Result<()> {
    if self
      .store
      .get_region(input.wilayah_id)
      .await
      .map_err(store_error)?
      .is_none()
    {
      return Err(Error::field("wilayah_id", "Wilayah tidak ditemukan"));
    }

    if let Some(head_id) = input.kepala_keluarga_id {
      let head = self
        .store
        .get_resident(head_id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| Error::field("kepala_keluarga_id", "Kepala keluarga tidak ditemukan"))?;
      if let Some(card_id) = card_id
        && head.kk_id != card_id
      {
        return Err(Error::field(
          "kepala_keluarga_id",
          "Kepala keluarga harus anggota Kartu Keluarga ini",
        ));
      }
    }
    Ok(())
  }
}

pub(crate) fn build_family_card(id: Uuid, input: NewFamilyCard) -> FamilyCard {
  let now = Utc::now();
  FamilyCard {
    id,
    nomor_kk: input.nomor_kk,
    wilayah_id: input.wilayah_id,
    kepala_keluarga_id: input.kepala_keluarga_id,
    alamat: input.alamat,
    scan_url: input.scan_url,
    created_at: now,
    updated_at: now,
  }
}
