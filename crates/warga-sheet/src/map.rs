//! Mapping of spreadsheet rows onto registry inputs.
//!
//! Mapping only resolves columns, references and code tables. Field rules
//! (lengths, digit counts, dates in the future) are left to the registry's
//! validators, so a missing text cell maps to an empty string.

use std::str::FromStr;

use uuid::Uuid;
use warga_core::{
  family_card::NewFamilyCard,
  import::{Draft, ReferenceIndex},
  region::{NewRegion, pad3},
  resident::{
    Agama, GolonganDarah, HubunganKeluarga, JenisKelamin, NewResident, ResidentStatus,
    StatusPerkawinan,
  },
};

use crate::{
  alias::{self, Field},
  coerce,
  row::SheetRow,
};

const JENIS_KELAMIN_LABELS: &[(&str, JenisKelamin)] = &[
  ("Laki-laki", JenisKelamin::LakiLaki),
  ("Laki", JenisKelamin::LakiLaki),
  ("Pria", JenisKelamin::LakiLaki),
  ("Perempuan", JenisKelamin::Perempuan),
  ("Wanita", JenisKelamin::Perempuan),
];

const GOLONGAN_DARAH_LABELS: &[(&str, GolonganDarah)] = &[
  ("-", GolonganDarah::TidakTahu),
  ("Tidak Diketahui", GolonganDarah::TidakTahu),
];

const STATUS_PERKAWINAN_LABELS: &[(&str, StatusPerkawinan)] = &[
  ("Belum Menikah", StatusPerkawinan::BelumKawin),
  ("Menikah", StatusPerkawinan::Kawin),
  ("Cerai", StatusPerkawinan::CeraiHidup),
];

const HUBUNGAN_KELUARGA_LABELS: &[(&str, HubunganKeluarga)] = &[
  ("Kepala", HubunganKeluarga::KepalaKeluarga),
  ("KK", HubunganKeluarga::KepalaKeluarga),
  ("Famili", HubunganKeluarga::FamiliLain),
];

const AGAMA_LABELS: &[(&str, Agama)] = &[
  ("Budha", Agama::Buddha),
  ("Protestan", Agama::Kristen),
  ("Khonghucu", Agama::Konghucu),
];

const STATUS_LABELS: &[(&str, ResidentStatus)] = &[("Meninggal Dunia", ResidentStatus::Meninggal)];

/// Collects per-cell problems for one row.
#[derive(Default)]
struct Problems(Vec<String>);

impl Problems {
  fn push(&mut self, message: impl Into<String>) { self.0.push(message.into()); }

  fn finish<T>(self, index: usize, build: impl FnOnce() -> Option<T>) -> Draft<T> {
    if !self.0.is_empty() {
      return Draft::err(index, self.0.join("; "));
    }
    match build() {
      Some(input) => Draft::ok(index, input),
      None => Draft::err(index, "Baris tidak dapat dibaca"),
    }
  }
}

fn text(row: &SheetRow, field: &Field) -> String { row.get(field).unwrap_or_default().to_owned() }

fn optional(row: &SheetRow, field: &Field) -> Option<String> { row.get(field).map(str::to_owned) }

fn identifier(row: &SheetRow, field: &Field) -> String {
  row.get(field).map(coerce::identifier).unwrap_or_default()
}

/// A required code-table cell.
fn required_code<T: FromStr + Copy>(
  row: &SheetRow,
  field: &Field,
  label: &str,
  labels: &[(&str, T)],
  problems: &mut Problems,
) -> Option<T> {
  let Some(raw) = row.get(field) else {
    problems.push(format!("{label} wajib diisi"));
    return None;
  };
  let value = coerce::code(raw, labels);
  if value.is_none() {
    problems.push(format!("{label} tidak valid: {raw}"));
  }
  value
}

/// An optional code-table cell; absent cells map to `None`.
fn optional_code<T: FromStr + Copy>(
  row: &SheetRow,
  field: &Field,
  label: &str,
  labels: &[(&str, T)],
  problems: &mut Problems,
) -> Option<T> {
  let raw = row.get(field)?;
  let value = coerce::code(raw, labels);
  if value.is_none() {
    problems.push(format!("{label} tidak valid: {raw}"));
  }
  value
}

pub fn region_draft(index: usize, row: &SheetRow) -> Draft<NewRegion> {
  let input = NewRegion {
    dusun:     text(row, &alias::DUSUN),
    rw:        identifier(row, &alias::RW),
    rt:        identifier(row, &alias::RT),
    desa:      optional(row, &alias::DESA),
    kecamatan: optional(row, &alias::KECAMATAN),
    kabupaten: optional(row, &alias::KABUPATEN),
    provinsi:  optional(row, &alias::PROVINSI),
  };
  Draft::ok(index, input)
}

/// The region is taken from the `Wilayah` column (`wilayah-<n>` or a UUID)
/// or, failing that, looked up by the row's Dusun/RW/RT columns.
pub fn family_card_draft(
  index: usize,
  row: &SheetRow,
  refs: &ReferenceIndex,
) -> Draft<NewFamilyCard> {
  let mut problems = Problems::default();

  let wilayah_id = match row.get(&alias::WILAYAH) {
    Some(reference) => {
      let resolved = refs.resolve_region(reference);
      if resolved.is_none() {
        problems.push(format!("Wilayah tidak dikenali: {reference}"));
      }
      resolved
    }
    None => match (row.get(&alias::DUSUN), row.get(&alias::RW), row.get(&alias::RT)) {
      (Some(dusun), Some(rw), Some(rt)) => {
        let (rw, rt) = (pad3(&coerce::identifier(rw)), pad3(&coerce::identifier(rt)));
        let found = refs.find_region(dusun, &rw, &rt);
        if found.is_none() {
          problems.push(format!("Wilayah Dusun {dusun} RW {rw} RT {rt} tidak ditemukan"));
        }
        found
      }
      _ => {
        problems.push("Wilayah wajib diisi");
        None
      }
    },
  };

  problems.finish(index, || {
    Some(NewFamilyCard {
      nomor_kk: identifier(row, &alias::NOMOR_KK),
      wilayah_id: wilayah_id?,
      kepala_keluarga_id: None,
      alamat: optional(row, &alias::ALAMAT),
      scan_url: optional(row, &alias::SCAN_URL),
    })
  })
}

/// The household is taken from the `Nomor KK` column or, failing that, a
/// raw `kk_id` UUID.
pub fn resident_draft(index: usize, row: &SheetRow, refs: &ReferenceIndex) -> Draft<NewResident> {
  let mut problems = Problems::default();

  let kk_id = match (row.get(&alias::NOMOR_KK), row.get(&alias::KK_ID)) {
    (Some(nomor_kk), _) => {
      let nomor_kk = coerce::identifier(nomor_kk);
      let found = refs.family_card(&nomor_kk);
      if found.is_none() {
        problems.push(format!("Nomor KK {nomor_kk} tidak ditemukan"));
      }
      found
    }
    (None, Some(raw)) => {
      let parsed = Uuid::parse_str(raw).ok();
      if parsed.is_none() {
        problems.push(format!("ID KK tidak valid: {raw}"));
      }
      parsed
    }
    (None, None) => {
      problems.push("Nomor KK wajib diisi");
      None
    }
  };

  let tanggal_lahir = match row.get(&alias::TANGGAL_LAHIR) {
    Some(raw) => {
      let parsed = coerce::date(raw);
      if parsed.is_none() {
        problems.push(format!("Tanggal lahir tidak valid: {raw}"));
      }
      parsed
    }
    None => {
      problems.push("Tanggal lahir wajib diisi");
      None
    }
  };

  let jenis_kelamin = required_code(
    row,
    &alias::JENIS_KELAMIN,
    "Jenis kelamin",
    JENIS_KELAMIN_LABELS,
    &mut problems,
  );
  let agama = required_code(row, &alias::AGAMA, "Agama", AGAMA_LABELS, &mut problems);
  let status_perkawinan = required_code(
    row,
    &alias::STATUS_PERKAWINAN,
    "Status perkawinan",
    STATUS_PERKAWINAN_LABELS,
    &mut problems,
  );
  let hubungan_keluarga = required_code(
    row,
    &alias::HUBUNGAN_KELUARGA,
    "Hubungan keluarga",
    HUBUNGAN_KELUARGA_LABELS,
    &mut problems,
  );
  let golongan_darah = optional_code(
    row,
    &alias::GOLONGAN_DARAH,
    "Golongan darah",
    GOLONGAN_DARAH_LABELS,
    &mut problems,
  );
  let status = optional_code(row, &alias::STATUS, "Status", STATUS_LABELS, &mut problems);

  problems.finish(index, || {
    Some(NewResident {
      nik: identifier(row, &alias::NIK),
      kk_id: kk_id?,
      nama: text(row, &alias::NAMA),
      tempat_lahir: text(row, &alias::TEMPAT_LAHIR),
      tanggal_lahir: tanggal_lahir?,
      jenis_kelamin: jenis_kelamin?,
      golongan_darah,
      agama: agama?,
      status_perkawinan: status_perkawinan?,
      hubungan_keluarga: hubungan_keluarga?,
      pendidikan: optional(row, &alias::PENDIDIKAN),
      pekerjaan: optional(row, &alias::PEKERJAAN),
      nama_ayah: optional(row, &alias::NAMA_AYAH),
      nama_ibu: optional(row, &alias::NAMA_IBU),
      status: status.unwrap_or_default(),
    })
  })
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};
  use warga_core::{family_card::FamilyCard, region::Region};

  use super::*;

  fn row(cells: &[(&str, &str)]) -> SheetRow {
    SheetRow::new(cells.iter().map(|(h, v)| (h.to_string(), v.to_string())))
  }

  fn refs() -> (ReferenceIndex, Region, FamilyCard) {
    let region = Region {
      id:         Uuid::new_v4(),
      dusun:      "Krajan".into(),
      rw:         "001".into(),
      rt:         "002".into(),
      desa:       None,
      kecamatan:  None,
      kabupaten:  None,
      provinsi:   None,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    };
    let card = FamilyCard {
      id:                 Uuid::new_v4(),
      nomor_kk:           "3201010000000099".into(),
      wilayah_id:         region.id,
      kepala_keluarga_id: None,
      alamat:             None,
      scan_url:           None,
      created_at:         Utc::now(),
      updated_at:         Utc::now(),
    };
    (ReferenceIndex::new(vec![region.clone()], std::slice::from_ref(&card)), region, card)
  }

  #[test]
  fn region_rows_keep_raw_text_for_validation() {
    let draft = region_draft(0, &row(&[("Dusun", "Krajan"), ("RW", "1.0"), ("RT", "x")]));
    let input = draft.input.unwrap();
    assert_eq!((input.rw.as_str(), input.rt.as_str()), ("1", "x"));
    assert_eq!(input.desa, None);
  }

  #[test]
  fn family_card_region_by_position_or_triple() {
    let (refs, region, _) = refs();

    let by_ref = family_card_draft(
      0,
      &row(&[("Nomor KK", "3201010000000001"), ("Wilayah", "wilayah-1")]),
      &refs,
    );
    assert_eq!(by_ref.input.unwrap().wilayah_id, region.id);

    let by_triple = family_card_draft(
      1,
      &row(&[("No KK", "3201010000000002"), ("Dusun", "krajan"), ("RW", "1"), ("RT", "2")]),
      &refs,
    );
    assert_eq!(by_triple.input.unwrap().wilayah_id, region.id);

    let missing = family_card_draft(2, &row(&[("Nomor KK", "3201010000000003")]), &refs);
    assert_eq!(missing.input.unwrap_err(), "Wilayah wajib diisi");
  }

  #[test]
  fn resident_row_with_labels_and_serial_date() {
    let (refs, _, card) = refs();
    let draft = resident_draft(
      0,
      &row(&[
        ("NIK", "3.201010000000001E+15"),
        ("No. KK", "3201010000000099"),
        ("Nama Lengkap", "Budi"),
        ("Tempat Lahir", "Bandung"),
        ("Tgl Lahir", "32994"),
        ("JK", "Laki-laki"),
        ("Agama", "islam"),
        ("Status Perkawinan", "Belum Kawin"),
        ("SHDK", "Kepala Keluarga"),
      ]),
      &refs,
    );
    let input = draft.input.unwrap();
    assert_eq!(input.nik, "3201010000000001");
    assert_eq!(input.kk_id, card.id);
    assert_eq!(input.tanggal_lahir, NaiveDate::from_ymd_opt(1990, 5, 1).unwrap());
    assert_eq!(input.jenis_kelamin, JenisKelamin::LakiLaki);
    assert_eq!(input.hubungan_keluarga, HubunganKeluarga::KepalaKeluarga);
    assert_eq!(input.status, ResidentStatus::Hidup);
    assert_eq!(input.golongan_darah, None);
  }

  #[test]
  fn resident_problems_are_joined() {
    let (refs, ..) = refs();
    let draft = resident_draft(
      0,
      &row(&[
        ("NIK", "3201010000000001"),
        ("Nomor KK", "3201010000000000"),
        ("Tanggal Lahir", "1990-05-01"),
        ("Jenis Kelamin", "X"),
        ("Agama", "Islam"),
        ("Status Perkawinan", "Kawin"),
        ("Hubungan Keluarga", "Anak"),
      ]),
      &refs,
    );
    assert_eq!(
      draft.input.unwrap_err(),
      "Nomor KK 3201010000000000 tidak ditemukan; Jenis kelamin tidak valid: X"
    );
  }
}
