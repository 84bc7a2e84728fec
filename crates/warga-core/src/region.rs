//! Region (wilayah): an administrative unit keyed by Dusun, RW and RT.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
  store::{Keyed, NaturalKey},
  validation::{RW_RT, not_blank},
};

/// A Dusun/RW/RT unit. `rw` and `rt` are stored zero-padded to three digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
  pub id:         Uuid,
  pub dusun:      String,
  pub rw:         String,
  pub rt:         String,
  pub desa:       Option<String>,
  pub kecamatan:  Option<String>,
  pub kabupaten:  Option<String>,
  pub provinsi:   Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Region {
  /// Short label used in dropdowns and letter snapshots.
  pub fn label(&self) -> String {
    format!("Dusun {} RW {} RT {}", self.dusun, self.rw, self.rt)
  }
}

/// Create/update input for a region.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRegion {
  #[validate(
    length(min = 1, max = 100, message = "Dusun wajib diisi (maksimal 100 karakter)"),
    custom(function = "not_blank", message = "Dusun wajib diisi (maksimal 100 karakter)")
  )]
  pub dusun:     String,
  #[validate(regex(path = *RW_RT, message = "RW harus berupa 1-3 digit angka"))]
  pub rw:        String,
  #[validate(regex(path = *RW_RT, message = "RT harus berupa 1-3 digit angka"))]
  pub rt:        String,
  #[validate(length(max = 100, message = "Nama desa maksimal 100 karakter"))]
  pub desa:      Option<String>,
  #[validate(length(max = 100, message = "Nama kecamatan maksimal 100 karakter"))]
  pub kecamatan: Option<String>,
  #[validate(length(max = 100, message = "Nama kabupaten maksimal 100 karakter"))]
  pub kabupaten: Option<String>,
  #[validate(length(max = 100, message = "Nama provinsi maksimal 100 karakter"))]
  pub provinsi:  Option<String>,
}

impl NewRegion {
  pub fn new(dusun: &str, rw: &str, rt: &str) -> Self {
    Self {
      dusun:     dusun.to_owned(),
      rw:        rw.to_owned(),
      rt:        rt.to_owned(),
      desa:      None,
      kecamatan: None,
      kabupaten: None,
      provinsi:  None,
    }
  }

  /// Trim the Dusun name and zero-pad RW/RT. Applied after validation.
  pub fn normalized(mut self) -> Self {
    self.dusun = self.dusun.trim().to_owned();
    self.rw = pad3(&self.rw);
    self.rt = pad3(&self.rt);
    self
  }
}

impl Keyed for NewRegion {
  /// Dusun is folded to ASCII lowercase, matching the column's NOCASE
  /// collation.
  fn natural_key(&self) -> NaturalKey {
    NaturalKey::Region {
      dusun: self.dusun.trim().to_ascii_lowercase(),
      rw:    pad3(&self.rw),
      rt:    pad3(&self.rt),
    }
  }
}

/// Zero-pad a short digit string to three characters.
pub fn pad3(value: &str) -> String { format!("{:0>3}", value.trim()) }

/// Filters accepted by the region list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionFilter {
  pub dusun: Option<String>,
}

/// Flat option for region dropdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionOption {
  pub id:    Uuid,
  pub label: String,
}

#[cfg(test)]
mod tests {
  use validator::Validate as _;

  use super::*;

  #[test]
  fn normalization_pads_rw_rt() {
    let r = NewRegion::new(" Krajan ", "1", "12").normalized();
    assert_eq!((r.dusun.as_str(), r.rw.as_str(), r.rt.as_str()), ("Krajan", "001", "012"));
  }

  #[test]
  fn non_numeric_rt_is_rejected() {
    let err = NewRegion::new("Krajan", "1", "A").validate().unwrap_err();
    assert!(err.field_errors().contains_key("rt"));
  }
}
