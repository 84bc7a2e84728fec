//! Declarative header alias tables, one entry per importable field.
//!
//! The first alias is the canonical header: CSV exports write it, so an
//! exported file can be imported again unchanged.

/// A field and the spreadsheet headers accepted for it.
#[derive(Debug, Clone, Copy)]
pub struct Field {
  pub name:    &'static str,
  pub aliases: &'static [&'static str],
}

impl Field {
  /// The header written on export.
  pub fn header(&self) -> &'static str { self.aliases[0] }
}

macro_rules! fields {
  ($($ident:ident = $name:literal [$($alias:literal),+ $(,)?];)+) => {
    $(pub const $ident: Field = Field { name: $name, aliases: &[$($alias),+] };)+
  };
}

fields! {
  // Region
  DUSUN = "dusun" ["Dusun", "dusun", "Nama Dusun"];
  RW = "rw" ["RW", "rw"];
  RT = "rt" ["RT", "rt"];
  DESA = "desa" ["Desa", "desa", "Kelurahan", "Desa/Kelurahan"];
  KECAMATAN = "kecamatan" ["Kecamatan", "kecamatan"];
  KABUPATEN = "kabupaten" ["Kabupaten", "kabupaten", "Kota", "Kabupaten/Kota"];
  PROVINSI = "provinsi" ["Provinsi", "provinsi"];

  // Family card
  NOMOR_KK = "nomor_kk" ["Nomor KK", "nomor_kk", "No KK", "No. KK", "Nomor Kartu Keluarga"];
  WILAYAH = "wilayah_id" ["Wilayah", "wilayah_id", "ID Wilayah"];
  ALAMAT = "alamat" ["Alamat", "alamat"];
  SCAN_URL = "scan_url" ["Scan URL", "scan_url", "Link Scan"];

  // Resident
  NIK = "nik" ["NIK", "nik", "No NIK"];
  KK_ID = "kk_id" ["kk_id", "ID KK"];
  NAMA = "nama" ["Nama", "nama", "Nama Lengkap"];
  TEMPAT_LAHIR = "tempat_lahir" ["Tempat Lahir", "tempat_lahir"];
  TANGGAL_LAHIR = "tanggal_lahir" ["Tanggal Lahir", "tanggal_lahir", "Tgl Lahir"];
  JENIS_KELAMIN = "jenis_kelamin" ["Jenis Kelamin", "jenis_kelamin", "JK", "L/P"];
  GOLONGAN_DARAH = "golongan_darah" ["Golongan Darah", "golongan_darah", "Gol Darah"];
  AGAMA = "agama" ["Agama", "agama"];
  STATUS_PERKAWINAN = "status_perkawinan" ["Status Perkawinan", "status_perkawinan", "Status Kawin"];
  HUBUNGAN_KELUARGA = "hubungan_keluarga" ["Hubungan Keluarga", "hubungan_keluarga", "SHDK", "Hubungan"];
  PENDIDIKAN = "pendidikan" ["Pendidikan", "pendidikan"];
  PEKERJAAN = "pekerjaan" ["Pekerjaan", "pekerjaan"];
  NAMA_AYAH = "nama_ayah" ["Nama Ayah", "nama_ayah"];
  NAMA_IBU = "nama_ibu" ["Nama Ibu", "nama_ibu"];
  STATUS = "status" ["Status", "status"];
}

pub const REGION: &[Field] = &[DUSUN, RW, RT, DESA, KECAMATAN, KABUPATEN, PROVINSI];

pub const FAMILY_CARD: &[Field] = &[NOMOR_KK, WILAYAH, ALAMAT, SCAN_URL];

pub const RESIDENT: &[Field] = &[
  NIK,
  NOMOR_KK,
  NAMA,
  TEMPAT_LAHIR,
  TANGGAL_LAHIR,
  JENIS_KELAMIN,
  GOLONGAN_DARAH,
  AGAMA,
  STATUS_PERKAWINAN,
  HUBUNGAN_KELUARGA,
  PENDIDIKAN,
  PEKERJAAN,
  NAMA_AYAH,
  NAMA_IBU,
  STATUS,
];

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn headers_are_unique_per_table() {
    for table in [REGION, FAMILY_CARD, RESIDENT] {
      let headers: HashSet<_> = table.iter().map(|f| f.header().to_ascii_lowercase()).collect();
      assert_eq!(headers.len(), table.len());
    }
  }

  #[test]
  fn no_alias_is_the_id_column() {
    for table in [REGION, FAMILY_CARD, RESIDENT] {
      for field in table {
        assert!(field.aliases.iter().all(|a| !a.eq_ignore_ascii_case("id")), "{}", field.name);
      }
    }
  }
}
