//! Export tables, one per entity, rendered as CSV or as an Excel workbook.
//!
//! Importable entities are written under the canonical header of each
//! field, with the record id in a leading `ID` column that import ignores.

use std::collections::HashMap;

use rust_xlsxwriter::{Format, Workbook};
use uuid::Uuid;
use warga_core::{
  family_card::FamilyCard, letter::Letter, mutation::Mutation, region::Region, resident::Resident,
};

use crate::{
  alias::{self, Field},
  error::Result,
};

/// Lets spreadsheet software detect UTF-8.
const BOM: &[u8] = b"\xEF\xBB\xBF";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A header row plus text cells, independent of the output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
  pub headers: Vec<&'static str>,
  pub rows:    Vec<Vec<String>>,
}

impl Table {
  fn build<T>(headers: Vec<&'static str>, items: &[T], record: impl Fn(&T) -> Vec<String>) -> Self {
    Self { headers, rows: items.iter().map(record).collect() }
  }

  /// UTF-8 CSV with a byte-order mark.
  pub fn to_csv(&self) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(BOM.to_vec());
    writer.write_record(&self.headers)?;
    for row in &self.rows {
      writer.write_record(row)?;
    }
    Ok(writer.into_inner()?)
  }

  /// A workbook with one worksheet named `title`. Every cell is written as
  /// text so identifiers keep their leading zeros and full precision.
  pub fn to_xlsx(&self, title: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(title)?;

    for (col, header) in (0u16..).zip(&self.headers) {
      worksheet.write_string_with_format(0, col, *header, &bold)?;
    }
    for (row, cells) in (1u32..).zip(&self.rows) {
      for (col, value) in (0u16..).zip(cells) {
        if !value.is_empty() {
          worksheet.write_string(row, col, value)?;
        }
      }
    }
    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
  }
}

fn with_id(fields: &[Field]) -> Vec<&'static str> {
  std::iter::once("ID").chain(fields.iter().map(Field::header)).collect()
}

fn opt(value: &Option<String>) -> String { value.clone().unwrap_or_default() }

pub fn regions_table(regions: &[Region]) -> Table {
  Table::build(with_id(alias::REGION), regions, |r| {
    vec![
      r.id.to_string(),
      r.dusun.clone(),
      r.rw.clone(),
      r.rt.clone(),
      opt(&r.desa),
      opt(&r.kecamatan),
      opt(&r.kabupaten),
      opt(&r.provinsi),
    ]
  })
}

/// The `Wilayah` column carries the region UUID.
pub fn family_cards_table(cards: &[FamilyCard]) -> Table {
  Table::build(with_id(alias::FAMILY_CARD), cards, |c| {
    vec![
      c.id.to_string(),
      c.nomor_kk.clone(),
      c.wilayah_id.to_string(),
      opt(&c.alamat),
      opt(&c.scan_url),
    ]
  })
}

/// Residents reference their household by nomor KK, resolved from `cards`.
pub fn residents_table(residents: &[Resident], cards: &[FamilyCard]) -> Table {
  let nomor_kk: HashMap<Uuid, &str> = cards.iter().map(|c| (c.id, c.nomor_kk.as_str())).collect();
  Table::build(with_id(alias::RESIDENT), residents, |r| {
    vec![
      r.id.to_string(),
      r.nik.clone(),
      nomor_kk.get(&r.kk_id).copied().unwrap_or_default().to_owned(),
      r.nama.clone(),
      r.tempat_lahir.clone(),
      r.tanggal_lahir.format(DATE_FORMAT).to_string(),
      r.jenis_kelamin.to_string(),
      r.golongan_darah.map(|g| g.to_string()).unwrap_or_default(),
      r.agama.to_string(),
      r.status_perkawinan.to_string(),
      r.hubungan_keluarga.to_string(),
      opt(&r.pendidikan),
      opt(&r.pekerjaan),
      opt(&r.nama_ayah),
      opt(&r.nama_ibu),
      r.status.to_string(),
    ]
  })
}

/// Mutations are listed with the NIK and name of the resident they concern.
pub fn mutations_table(mutations: &[Mutation], residents: &[Resident]) -> Table {
  let by_id: HashMap<Uuid, &Resident> = residents.iter().map(|r| (r.id, r)).collect();
  Table::build(
    vec![
      "ID",
      "Tanggal Peristiwa",
      "Jenis",
      "NIK",
      "Nama",
      "Keterangan",
      "Dicatat Oleh",
      "Dicatat Pada",
    ],
    mutations,
    |m| {
      let resident = by_id.get(&m.penduduk_id);
      vec![
        m.id.to_string(),
        m.tanggal_peristiwa.format(DATE_FORMAT).to_string(),
        m.jenis.to_string(),
        resident.map(|r| r.nik.clone()).unwrap_or_default(),
        resident.map(|r| r.nama.clone()).unwrap_or_default(),
        opt(&m.keterangan),
        m.created_by.clone(),
        m.created_at.to_rfc3339(),
      ]
    },
  )
}

/// Letters are listed with the resident data captured when they were issued.
pub fn letters_table(letters: &[Letter]) -> Table {
  Table::build(
    vec![
      "ID",
      "Nomor Surat",
      "Jenis Surat",
      "Tanggal Cetak",
      "NIK",
      "Nama",
      "Keperluan",
      "PDF URL",
      "Dicatat Oleh",
    ],
    letters,
    |l| {
      vec![
        l.id.to_string(),
        l.nomor_surat.clone(),
        l.jenis_surat.to_string(),
        l.tanggal_cetak.format(DATE_FORMAT).to_string(),
        l.snapshot.nik.clone(),
        l.snapshot.nama.clone(),
        opt(&l.keperluan),
        opt(&l.pdf_url),
        l.created_by.clone(),
      ]
    },
  )
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};
  use warga_core::{import::ReferenceIndex, resident::*};

  use super::*;
  use crate::{map, row::parse_csv};

  fn region() -> Region {
    Region {
      id:         Uuid::new_v4(),
      dusun:      "Krajan, Timur".into(),
      rw:         "001".into(),
      rt:         "002".into(),
      desa:       Some("Sukamaju".into()),
      kecamatan:  None,
      kabupaten:  None,
      provinsi:   None,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn region_export_reimports() {
    let region = region();
    let bytes = regions_table(std::slice::from_ref(&region)).to_csv().unwrap();
    assert!(bytes.starts_with(BOM));

    let rows = parse_csv(&bytes).unwrap();
    assert_eq!(rows.len(), 1);
    let input = map::region_draft(rows[0].0, &rows[0].1).input.unwrap();
    assert_eq!(input.dusun, "Krajan, Timur");
    assert_eq!((input.rw.as_str(), input.rt.as_str()), ("001", "002"));
    assert_eq!(input.desa.as_deref(), Some("Sukamaju"));
  }

  #[test]
  fn resident_export_reimports_against_its_household() {
    let region = region();
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
    let resident = Resident {
      id:                Uuid::new_v4(),
      nik:               "3201010000000001".into(),
      kk_id:             card.id,
      nama:              "Siti".into(),
      tempat_lahir:      "Garut".into(),
      tanggal_lahir:     NaiveDate::from_ymd_opt(1985, 2, 3).unwrap(),
      jenis_kelamin:     JenisKelamin::Perempuan,
      golongan_darah:    Some(GolonganDarah::Ab),
      agama:             Agama::Islam,
      status_perkawinan: StatusPerkawinan::Kawin,
      hubungan_keluarga: HubunganKeluarga::Istri,
      pendidikan:        None,
      pekerjaan:         Some("Guru".into()),
      nama_ayah:         None,
      nama_ibu:          None,
      status:            ResidentStatus::Hidup,
      created_at:        Utc::now(),
      updated_at:        Utc::now(),
    };

    let cards = [card];
    let bytes = residents_table(std::slice::from_ref(&resident), &cards).to_csv().unwrap();
    let rows = parse_csv(&bytes).unwrap();
    let refs = ReferenceIndex::new(vec![region], &cards);
    let input = map::resident_draft(0, &rows[0].1, &refs).input.unwrap();

    assert_eq!(input.nik, resident.nik);
    assert_eq!(input.kk_id, resident.kk_id);
    assert_eq!(input.tanggal_lahir, resident.tanggal_lahir);
    assert_eq!(input.golongan_darah, Some(GolonganDarah::Ab));
    assert_eq!(input.hubungan_keluarga, HubunganKeluarga::Istri);
    assert_eq!(input.pekerjaan.as_deref(), Some("Guru"));
  }
}
