//! Bulk-import types shared by the spreadsheet codec and the registry.
//!
//! A spreadsheet is mapped row by row into [`Draft`]s (see `warga-sheet`);
//! the registry then validates, de-duplicates and inserts them in batches
//! (see [`Registry::import_residents`](crate::Registry::import_residents)).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{family_card::FamilyCard, region::Region};

/// Data rows start on spreadsheet row 2, below the header.
pub const HEADER_OFFSET: usize = 2;

/// One spreadsheet row after column mapping.
#[derive(Debug, Clone)]
pub struct Draft<T> {
  /// 0-based position among the data rows.
  pub index: usize,
  /// The mapped input, or why the row could not be mapped.
  pub input: Result<T, String>,
}

impl<T> Draft<T> {
  pub fn ok(index: usize, input: T) -> Self { Self { index, input: Ok(input) } }

  pub fn err(index: usize, message: impl Into<String>) -> Self {
    Self { index, input: Err(message.into()) }
  }
}

/// Format a per-row error the way operators see it in the spreadsheet.
pub fn row_error(index: usize, message: &str) -> String {
  format!("Baris {}: {message}", index + HEADER_OFFSET)
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
  /// Rows actually inserted.
  pub success: usize,
  /// One message per rejected row, ordered by row number.
  pub errors:  Vec<String>,
}

/// Lookups used to resolve references written in spreadsheet cells.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
  /// Regions in storage order (Dusun, RW, RT).
  regions:  Vec<Region>,
  /// nomor KK → family card id.
  kk_by_no: HashMap<String, Uuid>,
}

impl ReferenceIndex {
  pub fn new(regions: Vec<Region>, cards: &[FamilyCard]) -> Self {
    let kk_by_no = cards.iter().map(|c| (c.nomor_kk.clone(), c.id)).collect();
    Self { regions, kk_by_no }
  }

  /// Resolve a region reference.
  ///
  /// `wilayah-<n>` is the n-th region (1-based) in storage order; anything
  /// else must be a syntactically valid UUID, which is accepted as is.
  pub fn resolve_region(&self, reference: &str) -> Option<Uuid> {
    let reference = reference.trim();
    let lower = reference.to_ascii_lowercase();
    if let Some(n) = lower.strip_prefix("wilayah-") {
      let position: usize = n.trim().parse().ok()?;
      return position
        .checked_sub(1)
        .and_then(|i| self.regions.get(i))
        .map(|r| r.id);
    }
    Uuid::parse_str(reference).ok()
  }

  /// Find a region by its Dusun/RW/RT triple (RW/RT already padded).
  pub fn find_region(&self, dusun: &str, rw: &str, rt: &str) -> Option<Uuid> {
    self
      .regions
      .iter()
      .find(|r| r.dusun.eq_ignore_ascii_case(dusun.trim()) && r.rw == rw && r.rt == rt)
      .map(|r| r.id)
  }

  pub fn knows_region(&self, id: Uuid) -> bool { self.regions.iter().any(|r| r.id == id) }

  pub fn knows_family_card(&self, id: Uuid) -> bool {
    self.kk_by_no.values().any(|&known| known == id)
  }

  pub fn family_card(&self, nomor_kk: &str) -> Option<Uuid> {
    self.kk_by_no.get(nomor_kk).copied()
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn region(dusun: &str) -> Region {
    Region {
      id:         Uuid::new_v4(),
      dusun:      dusun.into(),
      rw:         "001".into(),
      rt:         "001".into(),
      desa:       None,
      kecamatan:  None,
      kabupaten:  None,
      provinsi:   None,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn row_numbers_include_header_offset() {
    assert_eq!(row_error(0, "x"), "Baris 2: x");
    assert_eq!(row_error(1, "NIK harus 16 digit"), "Baris 3: NIK harus 16 digit");
  }

  #[test]
  fn positional_region_references() {
    let a = region("Krajan");
    let b = region("Sukamaju");
    let index = ReferenceIndex::new(vec![a.clone(), b.clone()], &[]);

    assert_eq!(index.resolve_region("wilayah-1"), Some(a.id));
    assert_eq!(index.resolve_region(" Wilayah-2 "), Some(b.id));
    assert_eq!(index.resolve_region("wilayah-0"), None);
    assert_eq!(index.resolve_region("wilayah-3"), None);
    assert_eq!(index.resolve_region("krajan"), None);
  }

  #[test]
  fn uuid_references_are_accepted_directly() {
    let index = ReferenceIndex::default();
    let id = Uuid::new_v4();
    assert_eq!(index.resolve_region(&id.to_string()), Some(id));
    assert!(!index.knows_region(id));
  }
}
