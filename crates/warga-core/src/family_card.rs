//! Family card (Kartu Keluarga).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
  store::{Keyed, NaturalKey},
  validation::SIXTEEN_DIGITS,
};

/// A household registered under one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyCard {
  pub id:                 Uuid,
  /// Sixteen-digit unique number.
  pub nomor_kk:           String,
  pub wilayah_id:         Uuid,
  /// Resident recorded as head of household, if any.
  pub kepala_keluarga_id: Option<Uuid>,
  pub alamat:             Option<String>,
  /// Location of the scanned card document.
  pub scan_url:           Option<String>,
  pub created_at:         DateTime<Utc>,
  pub updated_at:         DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewFamilyCard {
  #[validate(regex(path = *SIXTEEN_DIGITS, message = "Nomor KK harus 16 digit"))]
  pub nomor_kk:           String,
  pub wilayah_id:         Uuid,
  #[serde(default)]
  pub kepala_keluarga_id: Option<Uuid>,
  #[serde(default)]
  #[validate(length(max = 255, message = "Alamat maksimal 255 karakter"))]
  pub alamat:             Option<String>,
  #[serde(default)]
  #[validate(url(message = "URL dokumen tidak valid"))]
  pub scan_url:           Option<String>,
}

impl NewFamilyCard {
  pub fn new(nomor_kk: &str, wilayah_id: Uuid) -> Self {
    Self {
      nomor_kk: nomor_kk.to_owned(),
      wilayah_id,
      kepala_keluarga_id: None,
      alamat: None,
      scan_url: None,
    }
  }
}

impl Keyed for NewFamilyCard {
  fn natural_key(&self) -> NaturalKey { NaturalKey::NomorKk(self.nomor_kk.clone()) }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FamilyCardFilter {
  pub wilayah_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyCardOption {
  pub id:       Uuid,
  pub nomor_kk: String,
  /// Name of the head of household when one is recorded.
  pub kepala:   Option<String>,
}
