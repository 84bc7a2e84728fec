//! Outbound letters (surat keluar).
//!
//! A letter keeps a copy of the resident's data as it was when the letter was
//! issued. Later edits to the resident never alter an issued letter.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

use crate::{
  family_card::FamilyCard,
  region::Region,
  resident::{Agama, JenisKelamin, Resident, StatusPerkawinan},
  store::{Keyed, NaturalKey},
  validation::{not_blank, not_in_future},
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum LetterKind {
  KeteranganDomisili,
  KeteranganTidakMampu,
  KeteranganUsaha,
  KeteranganKelahiran,
  KeteranganKematian,
  KeteranganPindah,
  Pengantar,
  Lainnya,
}

/// Point-in-time copy of the resident data printed on a letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentSnapshot {
  pub nik:               String,
  pub nama:              String,
  pub tempat_lahir:      String,
  pub tanggal_lahir:     NaiveDate,
  pub jenis_kelamin:     JenisKelamin,
  pub agama:             Agama,
  pub status_perkawinan: StatusPerkawinan,
  pub pekerjaan:         Option<String>,
  pub nomor_kk:          Option<String>,
  pub alamat:            Option<String>,
}

impl ResidentSnapshot {
  /// Capture `resident` together with the household and region it belongs to.
  pub fn capture(
    resident: &Resident,
    card: Option<&FamilyCard>,
    region: Option<&Region>,
  ) -> Self {
    let alamat = match (card.and_then(|c| c.alamat.clone()), region) {
      (Some(street), Some(r)) => Some(format!("{street}, {}", r.label())),
      (Some(street), None) => Some(street),
      (None, Some(r)) => Some(r.label()),
      (None, None) => None,
    };
    Self {
      nik: resident.nik.clone(),
      nama: resident.nama.clone(),
      tempat_lahir: resident.tempat_lahir.clone(),
      tanggal_lahir: resident.tanggal_lahir,
      jenis_kelamin: resident.jenis_kelamin,
      agama: resident.agama,
      status_perkawinan: resident.status_perkawinan,
      pekerjaan: resident.pekerjaan.clone(),
      nomor_kk: card.map(|c| c.nomor_kk.clone()),
      alamat,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
  pub id:            Uuid,
  /// Unique letter number, e.g. `470/012/DS/2024`.
  pub nomor_surat:   String,
  pub jenis_surat:   LetterKind,
  pub penduduk_id:   Uuid,
  pub tanggal_cetak: NaiveDate,
  pub keperluan:     Option<String>,
  pub snapshot:      ResidentSnapshot,
  pub pdf_url:       Option<String>,
  pub created_by:    String,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewLetter {
  #[validate(
    length(min = 1, max = 50, message = "Nomor surat wajib diisi (maksimal 50 karakter)"),
    custom(function = "not_blank", message = "Nomor surat wajib diisi (maksimal 50 karakter)")
  )]
  pub nomor_surat:   String,
  pub jenis_surat:   LetterKind,
  pub penduduk_id:   Uuid,
  #[validate(custom(function = "not_in_future"))]
  pub tanggal_cetak: NaiveDate,
  #[serde(default)]
  #[validate(length(max = 255, message = "Keperluan maksimal 255 karakter"))]
  pub keperluan:     Option<String>,
  #[serde(default)]
  #[validate(url(message = "URL PDF tidak valid"))]
  pub pdf_url:       Option<String>,
}

impl Keyed for NewLetter {
  fn natural_key(&self) -> NaturalKey {
    NaturalKey::NomorSurat(self.nomor_surat.trim().to_owned())
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LetterFilter {
  pub jenis_surat: Option<LetterKind>,
  pub penduduk_id: Option<Uuid>,
}
