//! End-to-end import/export through the registry over an in-memory store.

use std::sync::Arc;

use warga_core::{
  Actor, Error as CoreError, Registry,
  page::ListQuery,
  resident::{JenisKelamin, ResidentFilter},
};
use warga_store_sqlite::SqliteStore;

use crate::{Error, FileFormat, Sheet, export, import, parse_csv, parse_workbook};

async fn registry() -> (Registry<SqliteStore>, Actor) {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  let registry = Registry::new(Arc::new(store));
  registry.bootstrap_admin("admin").await.unwrap();
  (registry, Actor::new("admin"))
}

const REGIONS: &str = "Dusun;RW;RT;Desa\nKrajan;1;1;Sukamaju\nKrajan;1;2;Sukamaju\n";

const CARDS: &str = "\
Nomor KK,Wilayah,Alamat
3201010000000001,wilayah-1,Jl. Mawar 1
3201010000000002,wilayah-2,
3201010000000003,wilayah-9,
";

const RESIDENTS: &str = "\
NIK,Nomor KK,Nama,Tempat Lahir,Tanggal Lahir,Jenis Kelamin,Agama,Status Perkawinan,Hubungan Keluarga
3201010000000101,3201010000000001,Budi,Bandung,01/05/1980,Laki-laki,Islam,Kawin,Kepala Keluarga
3201010000000102,3201010000000001,Siti,Garut,1982-03-04,Perempuan,Islam,Kawin,Istri
3201010000000102,3201010000000002,Ani,Garut,2010-01-01,P,Islam,Belum Kawin,Anak
32010100,3201010000000002,Dedi,Garut,2011-01-01,L,Islam,Belum Kawin,Anak
";

#[tokio::test]
async fn csv_files_import_in_dependency_order() {
  let (registry, admin) = registry().await;

  let regions = import(&registry, &admin, Sheet::Regions, parse_csv(REGIONS.as_bytes()).unwrap())
    .await
    .unwrap();
  assert_eq!(regions.success, 2);
  assert!(regions.errors.is_empty());

  let cards = import(&registry, &admin, Sheet::FamilyCards, parse_csv(CARDS.as_bytes()).unwrap())
    .await
    .unwrap();
  assert_eq!(cards.success, 2);
  assert_eq!(cards.errors, vec!["Baris 4: Wilayah tidak dikenali: wilayah-9".to_owned()]);

  let residents =
    import(&registry, &admin, Sheet::Residents, parse_csv(RESIDENTS.as_bytes()).unwrap())
      .await
      .unwrap();
  assert_eq!(residents.success, 2);
  assert_eq!(residents.errors.len(), 2);
  assert!(residents.errors[0].starts_with("Baris 4: "));
  assert_eq!(residents.errors[1], "Baris 5: NIK harus 16 digit");

  let page = registry
    .list_residents(&admin, ListQuery::new(ResidentFilter::default()))
    .await
    .unwrap();
  assert_eq!(page.total, 2);
  assert!(page.data.iter().any(|r| r.jenis_kelamin == JenisKelamin::Perempuan));
}

#[tokio::test]
async fn exported_regions_reimport_as_duplicates() {
  let (registry, admin) = registry().await;
  import(&registry, &admin, Sheet::Regions, parse_csv(REGIONS.as_bytes()).unwrap())
    .await
    .unwrap();

  let csv = export(&registry, &admin, Sheet::Regions, FileFormat::Csv).await.unwrap();
  let again = import(&registry, &admin, Sheet::Regions, parse_csv(&csv).unwrap())
    .await
    .unwrap();

  assert_eq!(again.success, 0);
  assert_eq!(again.errors.len(), 2);
}

#[tokio::test]
async fn workbook_export_reimports() {
  let (registry, admin) = registry().await;
  import(&registry, &admin, Sheet::Regions, parse_csv(REGIONS.as_bytes()).unwrap())
    .await
    .unwrap();
  import(&registry, &admin, Sheet::FamilyCards, parse_csv(CARDS.as_bytes()).unwrap())
    .await
    .unwrap();

  let xlsx = export(&registry, &admin, Sheet::FamilyCards, FileFormat::Xlsx)
    .await
    .unwrap();
  assert!(xlsx.starts_with(b"PK"));

  let rows = parse_workbook(&xlsx).unwrap();
  assert_eq!(rows.len(), 2);
  let again = import(&registry, &admin, Sheet::FamilyCards, rows).await.unwrap();
  assert_eq!(again.success, 0);
  assert_eq!(
    again.errors,
    vec![
      "Baris 2: Nomor KK sudah terdaftar.".to_owned(),
      "Baris 3: Nomor KK sudah terdaftar.".to_owned(),
    ]
  );
}

#[tokio::test]
async fn letters_are_export_only() {
  let (registry, admin) = registry().await;
  let err = import(&registry, &admin, Sheet::Letters, Vec::new()).await.unwrap_err();
  assert!(matches!(err, Error::NotImportable(Sheet::Letters)));
}

#[tokio::test]
async fn plain_users_cannot_export() {
  let (registry, _) = registry().await;
  let err = export(&registry, &Actor::new("warga"), Sheet::Residents, FileFormat::Xlsx)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Registry(CoreError::Forbidden { .. })));
}

#[test]
fn sheet_names_follow_urls() {
  assert_eq!(Sheet::FamilyCards.to_string(), "family-cards");
  assert_eq!("residents".parse::<Sheet>().unwrap(), Sheet::Residents);
  assert_eq!("xlsx".parse::<FileFormat>().unwrap(), FileFormat::Xlsx);
  assert!("pdf".parse::<FileFormat>().is_err());
}
