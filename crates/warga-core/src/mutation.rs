//! Population mutations (mutasi), append-only status-changing events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

use crate::{resident::ResidentStatus, validation::not_in_future};

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
pub enum MutationKind {
  Lahir,
  Meninggal,
  PindahMasuk,
  PindahKeluar,
}

impl MutationKind {
  /// The resident status this event implies.
  pub fn resulting_status(self) -> ResidentStatus {
    match self {
      Self::Lahir | Self::PindahMasuk => ResidentStatus::Hidup,
      Self::Meninggal => ResidentStatus::Meninggal,
      Self::PindahKeluar => ResidentStatus::Pindah,
    }
  }
}

/// An immutable record of one event. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
  pub id:                Uuid,
  pub penduduk_id:       Uuid,
  pub jenis:             MutationKind,
  /// When the event happened in the real world; never in the future.
  pub tanggal_peristiwa: NaiveDate,
  pub keterangan:        Option<String>,
  /// Operator who recorded the event.
  pub created_by:        String,
  pub created_at:        DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewMutation {
  pub penduduk_id:       Uuid,
  pub jenis:             MutationKind,
  #[validate(custom(function = "not_in_future"))]
  pub tanggal_peristiwa: NaiveDate,
  #[serde(default)]
  #[validate(length(max = 500, message = "Keterangan maksimal 500 karakter"))]
  pub keterangan:        Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationFilter {
  pub jenis:       Option<MutationKind>,
  pub penduduk_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn death_marks_resident_deceased() {
    assert_eq!(MutationKind::Meninggal.resulting_status(), ResidentStatus::Meninggal);
    assert_eq!(MutationKind::PindahKeluar.resulting_status(), ResidentStatus::Pindah);
    assert_eq!(MutationKind::PindahMasuk.resulting_status(), ResidentStatus::Hidup);
  }
}
