//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings with fixed microsecond precision so that
//! they sort lexically. Calendar dates are `YYYY-MM-DD`. Code-table enums are
//! stored as their code (`HIDUP`, `L`, `PINDAH_MASUK`, ...). UUIDs are
//! hyphenated lowercase strings. A letter's resident snapshot is compact JSON.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;
use warga_core::{
  family_card::{FamilyCard, FamilyCardOption},
  letter::Letter,
  mutation::Mutation,
  region::Region,
  resident::{Resident, ResidentOption},
  role::UserRole,
};

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

/// Parse a code column through the enum's code table.
pub fn decode_code<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::UnknownCode { column, value: s.to_owned() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const REGION_COLUMNS: &str = "w.id, w.dusun, w.rw, w.rt, w.desa, w.kecamatan, w.kabupaten, \
                                  w.provinsi, w.created_at, w.updated_at";

/// Raw strings read directly from a `wilayah` row.
pub struct RawRegion {
  pub id:         String,
  pub dusun:      String,
  pub rw:         String,
  pub rt:         String,
  pub desa:       Option<String>,
  pub kecamatan:  Option<String>,
  pub kabupaten:  Option<String>,
  pub provinsi:   Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawRegion {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      dusun:      row.get(1)?,
      rw:         row.get(2)?,
      rt:         row.get(3)?,
      desa:       row.get(4)?,
      kecamatan:  row.get(5)?,
      kabupaten:  row.get(6)?,
      provinsi:   row.get(7)?,
      created_at: row.get(8)?,
      updated_at: row.get(9)?,
    })
  }

  pub fn into_region(self) -> Result<Region> {
    Ok(Region {
      id:         decode_uuid(&self.id)?,
      dusun:      self.dusun,
      rw:         self.rw,
      rt:         self.rt,
      desa:       self.desa,
      kecamatan:  self.kecamatan,
      kabupaten:  self.kabupaten,
      provinsi:   self.provinsi,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const FAMILY_CARD_COLUMNS: &str = "k.id, k.nomor_kk, k.wilayah_id, k.kepala_keluarga_id, \
                                       k.alamat, k.scan_url, k.created_at, k.updated_at";

/// Raw strings read directly from a `kartu_keluarga` row.
pub struct RawFamilyCard {
  pub id:                 String,
  pub nomor_kk:           String,
  pub wilayah_id:         String,
  pub kepala_keluarga_id: Option<String>,
  pub alamat:             Option<String>,
  pub scan_url:           Option<String>,
  pub created_at:         String,
  pub updated_at:         String,
}

impl RawFamilyCard {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      nomor_kk:           row.get(1)?,
      wilayah_id:         row.get(2)?,
      kepala_keluarga_id: row.get(3)?,
      alamat:             row.get(4)?,
      scan_url:           row.get(5)?,
      created_at:         row.get(6)?,
      updated_at:         row.get(7)?,
    })
  }

  pub fn into_family_card(self) -> Result<FamilyCard> {
    Ok(FamilyCard {
      id:                 decode_uuid(&self.id)?,
      nomor_kk:           self.nomor_kk,
      wilayah_id:         decode_uuid(&self.wilayah_id)?,
      kepala_keluarga_id: self.kepala_keluarga_id.as_deref().map(decode_uuid).transpose()?,
      alamat:             self.alamat,
      scan_url:           self.scan_url,
      created_at:         decode_dt(&self.created_at)?,
      updated_at:         decode_dt(&self.updated_at)?,
    })
  }
}

/// `kartu_keluarga` joined with the head of household's name.
pub struct RawFamilyCardOption {
  pub id:       String,
  pub nomor_kk: String,
  pub kepala:   Option<String>,
}

impl RawFamilyCardOption {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, nomor_kk: row.get(1)?, kepala: row.get(2)? })
  }

  pub fn into_option(self) -> Result<FamilyCardOption> {
    Ok(FamilyCardOption {
      id:       decode_uuid(&self.id)?,
      nomor_kk: self.nomor_kk,
      kepala:   self.kepala,
    })
  }
}

pub const RESIDENT_COLUMNS: &str = "p.id, p.nik, p.kk_id, p.nama, p.tempat_lahir, \
                                    p.tanggal_lahir, p.jenis_kelamin, p.golongan_darah, p.agama, \
                                    p.status_perkawinan, p.hubungan_keluarga, p.pendidikan, \
                                    p.pekerjaan, p.nama_ayah, p.nama_ibu, p.status, \
                                    p.created_at, p.updated_at";

/// Raw strings read directly from a `penduduk` row.
pub struct RawResident {
  pub id:                String,
  pub nik:               String,
  pub kk_id:             String,
  pub nama:              String,
  pub tempat_lahir:      String,
  pub tanggal_lahir:     String,
  pub jenis_kelamin:     String,
  pub golongan_darah:    Option<String>,
  pub agama:             String,
  pub status_perkawinan: String,
  pub hubungan_keluarga: String,
  pub pendidikan:        Option<String>,
  pub pekerjaan:         Option<String>,
  pub nama_ayah:         Option<String>,
  pub nama_ibu:          Option<String>,
  pub status:            String,
  pub created_at:        String,
  pub updated_at:        String,
}

impl RawResident {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      nik:               row.get(1)?,
      kk_id:             row.get(2)?,
      nama:              row.get(3)?,
      tempat_lahir:      row.get(4)?,
      tanggal_lahir:     row.get(5)?,
      jenis_kelamin:     row.get(6)?,
      golongan_darah:    row.get(7)?,
      agama:             row.get(8)?,
      status_perkawinan: row.get(9)?,
      hubungan_keluarga: row.get(10)?,
      pendidikan:        row.get(11)?,
      pekerjaan:         row.get(12)?,
      nama_ayah:         row.get(13)?,
      nama_ibu:          row.get(14)?,
      status:            row.get(15)?,
      created_at:        row.get(16)?,
      updated_at:        row.get(17)?,
    })
  }

  pub fn into_resident(self) -> Result<Resident> {
    Ok(Resident {
      id:                decode_uuid(&self.id)?,
      nik:               self.nik,
      kk_id:             decode_uuid(&self.kk_id)?,
      nama:              self.nama,
      tempat_lahir:      self.tempat_lahir,
      tanggal_lahir:     decode_date(&self.tanggal_lahir)?,
      jenis_kelamin:     decode_code("jenis_kelamin", &self.jenis_kelamin)?,
      golongan_darah:    self
        .golongan_darah
        .as_deref()
        .map(|s| decode_code("golongan_darah", s))
        .transpose()?,
      agama:             decode_code("agama", &self.agama)?,
      status_perkawinan: decode_code("status_perkawinan", &self.status_perkawinan)?,
      hubungan_keluarga: decode_code("hubungan_keluarga", &self.hubungan_keluarga)?,
      pendidikan:        self.pendidikan,
      pekerjaan:         self.pekerjaan,
      nama_ayah:         self.nama_ayah,
      nama_ibu:          self.nama_ibu,
      status:            decode_code("status", &self.status)?,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawResidentOption {
  pub id:   String,
  pub nik:  String,
  pub nama: String,
}

impl RawResidentOption {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, nik: row.get(1)?, nama: row.get(2)? })
  }

  pub fn into_option(self) -> Result<ResidentOption> {
    Ok(ResidentOption { id: decode_uuid(&self.id)?, nik: self.nik, nama: self.nama })
  }
}

pub const MUTATION_COLUMNS: &str = "m.id, m.penduduk_id, m.jenis, m.tanggal_peristiwa, \
                                    m.keterangan, m.created_by, m.created_at";

/// Raw strings read directly from a `mutasi_log` row.
pub struct RawMutation {
  pub id:                String,
  pub penduduk_id:       String,
  pub jenis:             String,
  pub tanggal_peristiwa: String,
  pub keterangan:        Option<String>,
  pub created_by:        String,
  pub created_at:        String,
}

impl RawMutation {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      penduduk_id:       row.get(1)?,
      jenis:             row.get(2)?,
      tanggal_peristiwa: row.get(3)?,
      keterangan:        row.get(4)?,
      created_by:        row.get(5)?,
      created_at:        row.get(6)?,
    })
  }

  pub fn into_mutation(self) -> Result<Mutation> {
    Ok(Mutation {
      id:                decode_uuid(&self.id)?,
      penduduk_id:       decode_uuid(&self.penduduk_id)?,
      jenis:             decode_code("jenis", &self.jenis)?,
      tanggal_peristiwa: decode_date(&self.tanggal_peristiwa)?,
      keterangan:        self.keterangan,
      created_by:        self.created_by,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

pub const LETTER_COLUMNS: &str = "s.id, s.nomor_surat, s.jenis_surat, s.penduduk_id, \
                                  s.tanggal_cetak, s.keperluan, s.snapshot_json, s.pdf_url, \
                                  s.created_by, s.created_at, s.updated_at";

/// Raw strings read directly from a `surat_keluar` row.
pub struct RawLetter {
  pub id:            String,
  pub nomor_surat:   String,
  pub jenis_surat:   String,
  pub penduduk_id:   String,
  pub tanggal_cetak: String,
  pub keperluan:     Option<String>,
  pub snapshot_json: String,
  pub pdf_url:       Option<String>,
  pub created_by:    String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawLetter {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      nomor_surat:   row.get(1)?,
      jenis_surat:   row.get(2)?,
      penduduk_id:   row.get(3)?,
      tanggal_cetak: row.get(4)?,
      keperluan:     row.get(5)?,
      snapshot_json: row.get(6)?,
      pdf_url:       row.get(7)?,
      created_by:    row.get(8)?,
      created_at:    row.get(9)?,
      updated_at:    row.get(10)?,
    })
  }

  pub fn into_letter(self) -> Result<Letter> {
    Ok(Letter {
      id:            decode_uuid(&self.id)?,
      nomor_surat:   self.nomor_surat,
      jenis_surat:   decode_code("jenis_surat", &self.jenis_surat)?,
      penduduk_id:   decode_uuid(&self.penduduk_id)?,
      tanggal_cetak: decode_date(&self.tanggal_cetak)?,
      keperluan:     self.keperluan,
      snapshot:      serde_json::from_str(&self.snapshot_json)?,
      pdf_url:       self.pdf_url,
      created_by:    self.created_by,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `user_roles` row.
pub struct RawUserRole {
  pub user_id:    String,
  pub role:       String,
  pub updated_at: String,
}

impl RawUserRole {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { user_id: row.get(0)?, role: row.get(1)?, updated_at: row.get(2)? })
  }

  pub fn into_user_role(self) -> Result<UserRole> {
    Ok(UserRole {
      user_id:    self.user_id,
      role:       decode_code("role", &self.role)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use warga_core::resident::{JenisKelamin, ResidentStatus};

  use super::*;

  #[test]
  fn codes_round_trip_through_strum() {
    let l: JenisKelamin = decode_code("jenis_kelamin", "L").unwrap();
    assert_eq!(l, JenisKelamin::LakiLaki);
    let s: ResidentStatus = decode_code("status", "PINDAH").unwrap();
    assert_eq!(s.as_ref(), "PINDAH");
    assert!(decode_code::<ResidentStatus>("status", "HILANG").is_err());
  }

  #[test]
  fn timestamps_have_fixed_width() {
    let a = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
    let b = a + chrono::Duration::milliseconds(450);
    assert_eq!(encode_dt(a).len(), encode_dt(b).len());
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }
}
