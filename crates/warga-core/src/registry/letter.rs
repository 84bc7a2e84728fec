use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{Registry, store_error};
use crate::{
  Error, Result,
  letter::{Letter, LetterFilter, NewLetter, ResidentSnapshot},
  page::{ListQuery, Page},
  permission::{Action, Resource},
  role::Actor,
  store::RegistryStore,
};

const ENTITY: &str = "Surat";

impl<S: RegistryStore> Registry<S> {
  /// Issue a letter, capturing the resident's current data as its snapshot.
  pub async fn create_letter(&self, actor: &Actor, input: NewLetter) -> Result<Letter> {
    self
      .prepare_write(actor, Resource::Letter, Action::Create, &input, None)
      .await?;
    let snapshot = self.snapshot_of(input.penduduk_id).await?;

    let now = Utc::now();
    let letter = Letter {
      id:            Uuid::new_v4(),
      nomor_surat:   input.nomor_surat.trim().to_owned(),
      jenis_surat:   input.jenis_surat,
      penduduk_id:   input.penduduk_id,
      tanggal_cetak: input.tanggal_cetak,
      keperluan:     input.keperluan,
      snapshot,
      pdf_url:       input.pdf_url,
      created_by:    actor.user_id.clone(),
      created_at:    now,
      updated_at:    now,
    };
    self
      .store
      .insert_letter(letter.clone())
      .await
      .map_err(store_error)?;

    info!(user = %actor.user_id, id = %letter.id, nomor = %letter.nomor_surat, "letter issued");
    Ok(letter)
  }

  /// Edit letter metadata. The snapshot is retaken only when the letter is
  /// moved to a different resident.
  pub async fn update_letter(
    &self,
    actor: &Actor,
    id: Uuid,
    input: NewLetter,
  ) -> Result<Letter> {
    self
      .prepare_write(actor, Resource::Letter, Action::Update, &input, Some(id))
      .await?;
    let existing = self.get_letter_row(id).await?;

    let snapshot = if existing.penduduk_id == input.penduduk_id {
      existing.snapshot.clone()
    } else {
      self.snapshot_of(input.penduduk_id).await?
    };
    let letter = Letter {
      nomor_surat: input.nomor_surat.trim().to_owned(),
      jenis_surat: input.jenis_surat,
      penduduk_id: input.penduduk_id,
      tanggal_cetak: input.tanggal_cetak,
      keperluan: input.keperluan,
      snapshot,
      pdf_url: input.pdf_url,
      updated_at: Utc::now(),
      ..existing
    };
    if !self
      .store
      .update_letter(letter.clone())
      .await
      .map_err(store_error)?
    {
      return Err(Error::NotFound { entity: ENTITY, id });
    }

    info!(user = %actor.user_id, %id, "letter updated");
    Ok(letter)
  }

  pub async fn delete_letter(&self, actor: &Actor, id: Uuid) -> Result<()> {
    self.authorize(actor, Resource::Letter, Action::Delete).await?;
    if !self.store.delete_letter(id).await.map_err(store_error)? {
      return Err(Error::NotFound { entity: ENTITY, id });
    }
    info!(user = %actor.user_id, %id, "letter deleted");
    Ok(())
  }

  pub async fn get_letter(&self, actor: &Actor, id: Uuid) -> Result<Letter> {
    self.authorize(actor, Resource::Letter, Action::Read).await?;
    self.get_letter_row(id).await
  }

  pub async fn list_letters(
    &self,
    actor: &Actor,
    query: ListQuery<LetterFilter>,
  ) -> Result<Page<Letter>> {
    self.authorize(actor, Resource::Letter, Action::Read).await?;
    let listing = query.into_listing();
    let window = listing.window;
    let (rows, total) = self.store.list_letters(listing).await.map_err(store_error)?;
    Ok(Page::new(rows, total, window))
  }

  async fn get_letter_row(&self, id: Uuid) -> Result<Letter> {
    self
      .store
      .get_letter(id)
      .await
      .map_err(store_error)?
      .ok_or(Error::NotFound { entity: ENTITY, id })
  }

  async fn snapshot_of(&self, resident_id: Uuid) -> Result<ResidentSnapshot> {
    let resident = self
      .store
      .get_resident(resident_id)
      .await
      .map_err(store_error)?
      .ok_or_else(|| Error::field("penduduk_id", "Penduduk tidak ditemukan"))?;
    let card = self
      .store
      .get_family_card(resident.kk_id)
      .await
      .map_err(store_error)?;
    let region = match &card {
      Some(c) => self.store.get_region(c.wilayah_id).await.map_err(store_error)?,
      None => None,
    };
    Ok(ResidentSnapshot::capture(&resident, card.as_ref(), region.as_ref()))
  }
}
