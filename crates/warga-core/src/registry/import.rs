use std::{collections::HashSet, future::Future};

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{
  Registry, family_card::build_family_card, region::build_region, resident::build_resident,
  store_error,
};
use crate::{
  Result,
  family_card::NewFamilyCard,
  import::{Draft, ImportReport, ReferenceIndex, row_error},
  permission::{Action, Resource},
  region::NewRegion,
  resident::NewResident,
  role::Actor,
  store::{Keyed, NaturalKey, RegistryStore},
  validation,
};

impl<S: RegistryStore> Registry<S> {
  /// Reference lookups for mapping spreadsheet rows: regions in storage
  /// order and family cards by nomor KK.
  pub async fn import_context(&self, actor: &Actor) -> Result<ReferenceIndex> {
    self.authorize(actor, Resource::Import, Action::Create).await?;
    self.reference_index().await
  }

  pub async fn import_regions(
    &self,
    actor: &Actor,
    drafts: Vec<Draft<NewRegion>>,
  ) -> Result<ImportReport> {
    self.authorize(actor, Resource::Import, Action::Create).await?;
    self
      .run_import(
        "wilayah",
        drafts,
        |_| None,
        |input| build_region(Uuid::new_v4(), input),
        |rows| self.store.insert_regions(rows),
      )
      .await
  }

  pub async fn import_family_cards(
    &self,
    actor: &Actor,
    drafts: Vec<Draft<NewFamilyCard>>,
  ) -> Result<ImportReport> {
    self.authorize(actor, Resource::Import, Action::Create).await?;
    let index = self.reference_index().await?;
    self
      .run_import(
        "kartu_keluarga",
        drafts,
        |input| {
          if !index.knows_region(input.wilayah_id) {
            Some("Wilayah tidak ditemukan".to_owned())
          } else if input.kepala_keluarga_id.is_some() {
            Some("Kepala keluarga diisi setelah anggota keluarga terdaftar".to_owned())
          } else {
            None
          }
        },
        |input| build_family_card(Uuid::new_v4(), input),
        |rows| self.store.insert_family_cards(rows),
      )
      .await
  }

  pub async fn import_residents(
    &self,
    actor: &Actor,
    drafts: Vec<Draft<NewResident>>,
  ) -> Result<ImportReport> {
    self.authorize(actor, Resource::Import, Action::Create).await?;
    let index = self.reference_index().await?;
    self
      .run_import(
        "penduduk",
        drafts,
        |input| {
          (!index.knows_family_card(input.kk_id))
            .then(|| "Kartu Keluarga tidak ditemukan".to_owned())
        },
        |input| build_resident(Uuid::new_v4(), input),
        |rows| self.store.insert_residents(rows),
      )
      .await
  }

  async fn reference_index(&self) -> Result<ReferenceIndex> {
    let (regions, cards) =
      futures::try_join!(self.store.all_regions(), self.store.all_family_cards())
        .map_err(store_error)?;
    Ok(ReferenceIndex::new(regions, &cards))
  }

  /// Validate each draft, probe storage once for taken keys, drop in-file
  /// duplicates, then insert the survivors in batches.
  async fn run_import<I, R, F>(
    &self,
    entity: &'static str,
    drafts: Vec<Draft<I>>,
    check: impl Fn(&I) -> Option<String>,
    build: impl Fn(I) -> R,
    insert: impl Fn(Vec<R>) -> F,
  ) -> Result<ImportReport>
  where
    I: Validate + Keyed,
    F: Future<Output = Result<(), S::Error>>,
  {
    let total = drafts.len();
    let mut errors: Vec<(usize, String)> = Vec::new();
    let mut accepted: Vec<(usize, I)> = Vec::with_capacity(total);

    for draft in drafts {
      let input = match draft.input {
        Ok(input) => input,
        Err(message) => {
          errors.push((draft.index, message));
          continue;
        }
      };
      if let Err(err) = validation::check(&input) {
        errors.push((draft.index, err.messages().join("; ")));
        continue;
      }
      if let Some(message) = check(&input) {
        errors.push((draft.index, message));
        continue;
      }
      accepted.push((draft.index, input));
    }

    let keys: Vec<NaturalKey> = accepted.iter().map(|(_, input)| input.natural_key()).collect();
    let taken: HashSet<NaturalKey> = if keys.is_empty() {
      HashSet::new()
    } else {
      self
        .store
        .existing_keys(keys)
        .await
        .map_err(store_error)?
        .into_iter()
        .collect()
    };

    let mut seen = HashSet::new();
    let mut fresh: Vec<(usize, R)> = Vec::with_capacity(accepted.len());
    for (index, input) in accepted {
      let key = input.natural_key();
      let kind = key.kind();
      if taken.contains(&key) {
        errors.push((index, kind.duplicate_message().to_owned()));
      } else if !seen.insert(key) {
        errors.push((index, format!("{} duplikat dalam file", kind.label())));
      } else {
        fresh.push((index, build(input)));
      }
    }

    let mut success = 0;
    let mut rows = fresh.into_iter().peekable();
    while rows.peek().is_some() {
      let (indices, batch): (Vec<usize>, Vec<R>) =
        rows.by_ref().take(self.import_batch).unzip();
      match insert(batch).await {
        Ok(()) => success += indices.len(),
        Err(err) => {
          let message = store_error(err).to_string();
          errors.extend(indices.into_iter().map(|i| (i, message.clone())));
        }
      }
    }

    errors.sort_by_key(|(index, _)| *index);
    info!(entity, total, success, failed = errors.len(), "import finished");

    Ok(ImportReport {
      success,
      errors: errors
        .into_iter()
        .map(|(index, message)| row_error(index, &message))
        .collect(),
    })
  }
}
