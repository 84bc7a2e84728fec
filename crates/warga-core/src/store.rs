//! The `RegistryStore` trait and the key/guard types the registry uses to
//! talk to it.
//!
//! The trait is implemented by storage backends (e.g. `warga-store-sqlite`).
//! The [`Registry`](crate::Registry) service and the HTTP layer depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  family_card::{FamilyCard, FamilyCardFilter, FamilyCardOption},
  letter::{Letter, LetterFilter, LetterKind},
  mutation::{Mutation, MutationFilter, MutationKind},
  page::Listing,
  region::{Region, RegionFilter},
  resident::{JenisKelamin, Resident, ResidentFilter, ResidentOption, ResidentStatus},
  role::UserRole,
};

// ─── Natural keys ────────────────────────────────────────────────────────────

/// Which uniqueness rule a natural key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
  Region,
  NomorKk,
  Nik,
  NomorSurat,
}

impl KeyKind {
  /// Human-readable name of the key, used in import row errors.
  pub fn label(self) -> &'static str {
    match self {
      Self::Region => "Wilayah (Dusun/RW/RT)",
      Self::NomorKk => "Nomor KK",
      Self::Nik => "NIK",
      Self::NomorSurat => "Nomor surat",
    }
  }

  /// The message shown when a write collides with an existing row.
  pub fn duplicate_message(self) -> &'static str {
    match self {
      Self::Region => "Wilayah dengan Dusun, RW dan RT tersebut sudah terdaftar.",
      Self::NomorKk => "Nomor KK sudah terdaftar.",
      Self::Nik => "NIK sudah terdaftar.",
      Self::NomorSurat => "Nomor surat sudah terdaftar.",
    }
  }
}

/// A concrete natural-key value to probe for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NaturalKey {
  Region { dusun: String, rw: String, rt: String },
  NomorKk(String),
  Nik(String),
  NomorSurat(String),
}

impl NaturalKey {
  pub fn kind(&self) -> KeyKind {
    match self {
      Self::Region { .. } => KeyKind::Region,
      Self::NomorKk(_) => KeyKind::NomorKk,
      Self::Nik(_) => KeyKind::Nik,
      Self::NomorSurat(_) => KeyKind::NomorSurat,
    }
  }
}

/// Inputs that carry a natural key.
pub trait Keyed {
  fn natural_key(&self) -> NaturalKey;
}

// ─── Referential guards ──────────────────────────────────────────────────────

/// Rows that block deletion of their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependents {
  /// Family cards registered in a region.
  FamilyCardsIn(Uuid),
  /// Residents that belong to a family card.
  ResidentsOf(Uuid),
}

impl Dependents {
  pub fn in_use_message(self) -> &'static str {
    match self {
      Self::FamilyCardsIn(_) => {
        "Wilayah tidak dapat dihapus karena masih digunakan oleh Kartu Keluarga."
      }
      Self::ResidentsOf(_) => {
        "Kartu Keluarga tidak dapat dihapus karena masih memiliki anggota keluarga."
      }
    }
  }
}

// ─── Error classification ────────────────────────────────────────────────────

/// What the registry needs to know about a backend error.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The uniqueness rule this error violated, if it is a unique-constraint
  /// failure.
  fn violated_key(&self) -> Option<KeyKind>;

  /// Backend-specific error code passed through to callers.
  fn code(&self) -> Option<String> { None }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Warga registry backend.
///
/// Listing methods return the requested page window together with the exact
/// number of rows matching the listing's search and filter.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RegistryStore: Send + Sync {
  type Error: StoreError;

  // ── Keys and guards ─────────────────────────────────────────────────────

  /// Whether `key` is held by a row other than `except`.
  fn key_taken(
    &self,
    key: NaturalKey,
    except: Option<Uuid>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The subset of `keys` already present in storage. All keys share one
  /// [`KeyKind`].
  fn existing_keys(
    &self,
    keys: Vec<NaturalKey>,
  ) -> impl Future<Output = Result<Vec<NaturalKey>, Self::Error>> + Send + '_;

  fn count_dependents(
    &self,
    of: Dependents,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Regions ─────────────────────────────────────────────────────────────

  fn insert_region(
    &self,
    region: Region,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert all rows or none.
  fn insert_regions(
    &self,
    regions: Vec<Region>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Returns `false` when no row has `region.id`.
  fn update_region(
    &self,
    region: Region,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn delete_region(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_region(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Region>, Self::Error>> + Send + '_;

  fn list_regions(
    &self,
    listing: Listing<RegionFilter>,
  ) -> impl Future<Output = Result<(Vec<Region>, u64), Self::Error>> + Send + '_;

  /// Every region ordered by Dusun, RW, RT. Import references of the form
  /// `wilayah-<n>` index into this ordering.
  fn all_regions(
    &self,
  ) -> impl Future<Output = Result<Vec<Region>, Self::Error>> + Send + '_;

  // ── Family cards ────────────────────────────────────────────────────────

  fn insert_family_card(
    &self,
    card: FamilyCard,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_family_cards(
    &self,
    cards: Vec<FamilyCard>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_family_card(
    &self,
    card: FamilyCard,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn delete_family_card(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_family_card(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<FamilyCard>, Self::Error>> + Send + '_;

  fn list_family_cards(
    &self,
    listing: Listing<FamilyCardFilter>,
  ) -> impl Future<Output = Result<(Vec<FamilyCard>, u64), Self::Error>> + Send + '_;

  /// Every family card ordered by nomor KK.
  fn all_family_cards(
    &self,
  ) -> impl Future<Output = Result<Vec<FamilyCard>, Self::Error>> + Send + '_;

  fn family_card_options(
    &self,
  ) -> impl Future<Output = Result<Vec<FamilyCardOption>, Self::Error>> + Send + '_;

  // ── Residents ───────────────────────────────────────────────────────────

  fn insert_resident(
    &self,
    resident: Resident,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_residents(
    &self,
    residents: Vec<Resident>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_resident(
    &self,
    resident: Resident,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Overwrite only the lifecycle status. Returns `false` if not found.
  fn set_resident_status(
    &self,
    id: Uuid,
    status: ResidentStatus,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_resident(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Resident>, Self::Error>> + Send + '_;

  fn list_residents(
    &self,
    listing: Listing<ResidentFilter>,
  ) -> impl Future<Output = Result<(Vec<Resident>, u64), Self::Error>> + Send + '_;

  /// Every resident ordered by name.
  fn all_residents(
    &self,
  ) -> impl Future<Output = Result<Vec<Resident>, Self::Error>> + Send + '_;

  /// Every resident registered on `kk_id`, ordered by name.
  fn family_members(
    &self,
    kk_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Resident>, Self::Error>> + Send + '_;

  /// Living residents for dropdowns, ordered by name.
  fn resident_options(
    &self,
  ) -> impl Future<Output = Result<Vec<ResidentOption>, Self::Error>> + Send + '_;

  // ── Mutations ───────────────────────────────────────────────────────────

  /// Append `mutation` and set the resident's status to `resulting` in the
  /// same transaction.
  fn record_mutation(
    &self,
    mutation: Mutation,
    resulting: ResidentStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_mutation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Mutation>, Self::Error>> + Send + '_;

  fn list_mutations(
    &self,
    listing: Listing<MutationFilter>,
  ) -> impl Future<Output = Result<(Vec<Mutation>, u64), Self::Error>> + Send + '_;

  fn all_mutations(
    &self,
  ) -> impl Future<Output = Result<Vec<Mutation>, Self::Error>> + Send + '_;

  /// The `limit` most recently recorded mutations, newest first.
  fn recent_mutations(
    &self,
    limit: u64,
  ) -> impl Future<Output = Result<Vec<Mutation>, Self::Error>> + Send + '_;

  /// Mutation counts per kind with `tanggal_peristiwa >= since`.
  fn count_mutations_since(
    &self,
    since: NaiveDate,
  ) -> impl Future<Output = Result<Vec<(MutationKind, u64)>, Self::Error>> + Send + '_;

  // ── Letters ─────────────────────────────────────────────────────────────

  fn insert_letter(
    &self,
    letter: Letter,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_letter(
    &self,
    letter: Letter,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn delete_letter(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_letter(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Letter>, Self::Error>> + Send + '_;

  fn list_letters(
    &self,
    listing: Listing<LetterFilter>,
  ) -> impl Future<Output = Result<(Vec<Letter>, u64), Self::Error>> + Send + '_;

  fn all_letters(
    &self,
  ) -> impl Future<Output = Result<Vec<Letter>, Self::Error>> + Send + '_;

  fn recent_letters(
    &self,
    limit: u64,
  ) -> impl Future<Output = Result<Vec<Letter>, Self::Error>> + Send + '_;

  /// Letter counts per kind with `tanggal_cetak >= since`.
  fn count_letters_since(
    &self,
    since: NaiveDate,
  ) -> impl Future<Output = Result<Vec<(LetterKind, u64)>, Self::Error>> + Send + '_;

  // ── Statistics ──────────────────────────────────────────────────────────

  fn count_residents_by_status(
    &self,
  ) -> impl Future<Output = Result<Vec<(ResidentStatus, u64)>, Self::Error>> + Send + '_;

  /// Living residents per sex.
  fn count_living_by_sex(
    &self,
  ) -> impl Future<Output = Result<Vec<(JenisKelamin, u64)>, Self::Error>> + Send + '_;

  fn count_family_cards(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn count_regions(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Roles ───────────────────────────────────────────────────────────────

  fn get_role(
    &self,
    user_id: String,
  ) -> impl Future<Output = Result<Option<UserRole>, Self::Error>> + Send + '_;

  /// Insert or replace the role row for `role.user_id`.
  fn put_role(
    &self,
    role: UserRole,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_roles(
    &self,
  ) -> impl Future<Output = Result<Vec<UserRole>, Self::Error>> + Send + '_;
}
