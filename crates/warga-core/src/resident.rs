//! Resident (penduduk) and its demographic code tables.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
  store::{Keyed, NaturalKey},
  validation::{
    MIN_MARRIED_AGE, SIXTEEN_DIGITS, age_on, message, not_blank, not_in_future, today,
  },
};

// ─── Code tables ─────────────────────────────────────────────────────────────

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
#[strum(ascii_case_insensitive)]
pub enum JenisKelamin {
  #[serde(rename = "L")]
  #[strum(serialize = "L")]
  LakiLaki,
  #[serde(rename = "P")]
  #[strum(serialize = "P")]
  Perempuan,
}

/// Lifecycle status of a resident.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
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
pub enum ResidentStatus {
  #[default]
  Hidup,
  Meninggal,
  Pindah,
}

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
pub enum GolonganDarah {
  A,
  B,
  Ab,
  O,
  TidakTahu,
}

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
pub enum Agama {
  Islam,
  Kristen,
  Katolik,
  Hindu,
  Buddha,
  Konghucu,
  Lainnya,
}

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
pub enum StatusPerkawinan {
  BelumKawin,
  Kawin,
  CeraiHidup,
  CeraiMati,
}

/// Role of the resident within the household.
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
pub enum HubunganKeluarga {
  KepalaKeluarga,
  Suami,
  Istri,
  Anak,
  Menantu,
  Cucu,
  OrangTua,
  Mertua,
  FamiliLain,
  Lainnya,
}

// ─── Resident ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
  pub id:                Uuid,
  /// Sixteen-digit national identity number; unique.
  pub nik:               String,
  pub kk_id:             Uuid,
  pub nama:              String,
  pub tempat_lahir:      String,
  pub tanggal_lahir:     NaiveDate,
  pub jenis_kelamin:     JenisKelamin,
  pub golongan_darah:    Option<GolonganDarah>,
  pub agama:             Agama,
  pub status_perkawinan: StatusPerkawinan,
  pub hubungan_keluarga: HubunganKeluarga,
  pub pendidikan:        Option<String>,
  pub pekerjaan:         Option<String>,
  pub nama_ayah:         Option<String>,
  pub nama_ibu:          Option<String>,
  pub status:            ResidentStatus,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

/// Create/update input for a resident.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "marital_age"))]
pub struct NewResident {
  #[validate(regex(path = *SIXTEEN_DIGITS, message = "NIK harus 16 digit"))]
  pub nik:               String,
  pub kk_id:             Uuid,
  #[validate(
    length(min = 1, max = 100, message = "Nama wajib diisi (maksimal 100 karakter)"),
    custom(function = "not_blank", message = "Nama wajib diisi (maksimal 100 karakter)")
  )]
  pub nama:              String,
  #[validate(
    length(min = 1, max = 100, message = "Tempat lahir wajib diisi (maksimal 100 karakter)"),
    custom(function = "not_blank", message = "Tempat lahir wajib diisi (maksimal 100 karakter)")
  )]
  pub tempat_lahir:      String,
  #[validate(custom(function = "not_in_future"))]
  pub tanggal_lahir:     NaiveDate,
  pub jenis_kelamin:     JenisKelamin,
  #[serde(default)]
  pub golongan_darah:    Option<GolonganDarah>,
  pub agama:             Agama,
  pub status_perkawinan: StatusPerkawinan,
  pub hubungan_keluarga: HubunganKeluarga,
  #[serde(default)]
  #[validate(length(max = 50, message = "Pendidikan maksimal 50 karakter"))]
  pub pendidikan:        Option<String>,
  #[serde(default)]
  #[validate(length(max = 100, message = "Pekerjaan maksimal 100 karakter"))]
  pub pekerjaan:         Option<String>,
  #[serde(default)]
  #[validate(length(max = 100, message = "Nama ayah maksimal 100 karakter"))]
  pub nama_ayah:         Option<String>,
  #[serde(default)]
  #[validate(length(max = 100, message = "Nama ibu maksimal 100 karakter"))]
  pub nama_ibu:          Option<String>,
  /// Defaults to [`ResidentStatus::Hidup`] for new records.
  #[serde(default)]
  pub status:            ResidentStatus,
}

impl Keyed for NewResident {
  fn natural_key(&self) -> NaturalKey { NaturalKey::Nik(self.nik.clone()) }
}

fn marital_age(input: &NewResident) -> Result<(), ValidationError> {
  if input.status_perkawinan != StatusPerkawinan::BelumKawin
    && age_on(input.tanggal_lahir, today()) < MIN_MARRIED_AGE
  {
    return Err(message(
      "married_age",
      "Usia minimal 17 tahun untuk status perkawinan selain Belum Kawin",
    ));
  }
  Ok(())
}

/// Flat option for resident dropdowns; only living residents are offered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidentOption {
  pub id:   Uuid,
  pub nik:  String,
  pub nama: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResidentFilter {
  pub status:        Option<ResidentStatus>,
  pub jenis_kelamin: Option<JenisKelamin>,
  pub kk_id:         Option<Uuid>,
  pub wilayah_id:    Option<Uuid>,
}
