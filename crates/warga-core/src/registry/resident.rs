use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{Registry, store_error};
use crate::{
  Error, Result,
  page::{ListQuery, Page},
  permission::{Action, Resource},
  resident::{NewResident, Resident, ResidentFilter, ResidentOption, ResidentStatus},
  role::Actor,
  store::RegistryStore,
};

const ENTITY: &str = "Penduduk";

impl<S: RegistryStore> Registry<S> {
  pub async fn create_resident(&self, actor: &Actor, input: NewResident) -> Result<Resident> {
    self
      .prepare_write(actor, Resource::Resident, Action::Create, &input, None)
      .await?;
    self.check_family_card_exists(input.kk_id).await?;

    let resident = build_resident(Uuid::new_v4(), input);
    self
      .store
      .insert_resident(resident.clone())
      .await
      .map_err(store_error)?;

    info!(user = %actor.user_id, id = %resident.id, "resident created");
    Ok(resident)
  }

  pub async fn update_resident(
    &self,
    actor: &Actor,
    id: Uuid,
    input: NewResident,
  ) -> Result<Resident> {
    self
      .prepare_write(actor, Resource::Resident, Action::Update, &input, Some(id))
      .await?;
    let existing = self.get_resident_row(id).await?;
    self.check_family_card_exists(input.kk_id).await?;

    let resident = Resident {
      created_at: existing.created_at,
      ..build_resident(id, input)
    };
    if !self
      .store
      .update_resident(resident.clone())
      .await
      .map_err(store_error)?
    {
      return Err(Error::NotFound { entity: ENTITY, id });
    }

    info!(user = %actor.user_id, %id, "resident updated");
    Ok(resident)
  }

  /// Soft delete: the row stays and its status becomes
  /// [`ResidentStatus::Pindah`].
  pub async fn delete_resident(&self, actor: &Actor, id: Uuid) -> Result<()> {
    self.authorize(actor, Resource::Resident, Action::Delete).await?;
    if !self
      .store
      .set_resident_status(id, ResidentStatus::Pindah)
      .await
      .map_err(store_error)?
    {
      return Err(Error::NotFound { entity: ENTITY, id });
    }
    info!(user = %actor.user_id, %id, "resident marked as moved");
    Ok(())
  }

  pub async fn get_resident(&self, actor: &Actor, id: Uuid) -> Result<Resident> {
    self.authorize(actor, Resource::Resident, Action::Read).await?;
    self.get_resident_row(id).await
  }

  pub async fn list_residents(
    &self,
    actor: &Actor,
    query: ListQuery<ResidentFilter>,
  ) -> Result<Page<Resident>> {
    self.authorize(actor, Resource::Resident, Action::Read).await?;
    let listing = query.into_listing();
    let window = listing.window;
    let (rows, total) = self
      .store
      .list_residents(listing)
      .await
      .map_err(store_error)?;
    Ok(Page::new(rows, total, window))
  }

  pub async fn resident_options(&self, actor: &Actor) -> Result<Vec<ResidentOption>> {
    self.authorize(actor, Resource::Resident, Action::Read).await?;
    self.store.resident_options().await.map_err(store_error)
  }

  pub(crate) async fn get_resident_row(&self, id: Uuid) -> Result<Resident> {
    self
      .store
      .get_resident(id)
      .await
      .map_err(store_error)?
      .ok_or(Error::NotFound { entity: ENTITY, id })
  }

  async fn check_family_card_exists(&self, kk_id: Uuid) -> Result<()> {
    match self.store.get_family_card(kk_id).await.map_err(store_error)? {
      Some(_) => Ok(()),
      None => Err(Error::field("kk_id", "Kartu Keluarga tidak ditemukan")),
    }
  }
}

/// Turn a validated input into a full row stamped with the current time.
pub(crate) fn build_resident(id: Uuid, input: NewResident) -> Resident {
  let now = Utc::now();
  Resident {
    id,
    nik: input.nik,
    kk_id: input.kk_id,
    nama: input.nama.trim().to_owned(),
    tempat_lahir: input.tempat_lahir.trim().to_owned(),
    tanggal_lahir: input.tanggal_lahir,
    jenis_kelamin: input.jenis_kelamin,
    golongan_darah: input.golongan_darah,
    agama: input.agama,
    status_perkawinan: input.status_perkawinan,
    hubungan_keluarga: input.hubungan_keluarga,
    pendidikan: input.pendidikan,
    pekerjaan: input.pekerjaan,
    nama_ayah: input.nama_ayah,
    nama_ibu: input.nama_ibu,
    status: input.status,
    created_at: now,
    updated_at: now,
  }
}
