//! Integration tests for `SqliteStore` and the registry service against an
//! in-memory database.

use std::{collections::HashSet, sync::Arc};

use chrono::{Duration, NaiveDate};
use uuid::Uuid;
use warga_core::{
  Actor, Error, Registry,
  family_card::{FamilyCard, FamilyCardFilter, NewFamilyCard},
  import::Draft,
  letter::{LetterFilter, LetterKind, NewLetter},
  mutation::{MutationFilter, MutationKind, NewMutation},
  page::ListQuery,
  region::{NewRegion, Region, RegionFilter},
  resident::{
    Agama, HubunganKeluarga, JenisKelamin, NewResident, ResidentFilter, ResidentStatus,
    StatusPerkawinan,
  },
  role::Role,
  store::{KeyKind, RegistryStore, StoreError as _},
  validation::today,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// A registry with `admin` bootstrapped as administrator.
async fn registry() -> (Registry<SqliteStore>, Actor) {
  let registry = Registry::new(Arc::new(store().await));
  registry.bootstrap_admin("admin").await.unwrap();
  (registry, Actor::new("admin"))
}

fn nik(n: u64) -> String { (3201_0100_0000_0000 + n).to_string() }

fn kk(n: u64) -> String { (3201_0200_0000_0000 + n).to_string() }

fn resident(kk_id: Uuid, nik: &str, nama: &str) -> NewResident {
  NewResident {
    nik: nik.to_owned(),
    kk_id,
    nama: nama.to_owned(),
    tempat_lahir: "Bandung".into(),
    tanggal_lahir: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
    jenis_kelamin: JenisKelamin::LakiLaki,
    golongan_darah: None,
    agama: Agama::Islam,
    status_perkawinan: StatusPerkawinan::BelumKawin,
    hubungan_keluarga: HubunganKeluarga::Anak,
    pendidikan: None,
    pekerjaan: Some("Petani".into()),
    nama_ayah: None,
    nama_ibu: None,
    status: ResidentStatus::Hidup,
  }
}

/// One region with one family card.
async fn household(registry: &Registry<SqliteStore>, admin: &Actor) -> (Region, FamilyCard) {
  let region = registry
    .create_region(admin, NewRegion::new("Krajan", "1", "2"))
    .await
    .unwrap();
  let card = registry
    .create_family_card(admin, NewFamilyCard::new(&kk(1), region.id))
    .await
    .unwrap();
  (region, card)
}

fn letter(nomor_surat: &str, penduduk_id: Uuid) -> NewLetter {
  NewLetter {
    nomor_surat: nomor_surat.into(),
    jenis_surat: LetterKind::KeteranganDomisili,
    penduduk_id,
    tanggal_cetak: today(),
    keperluan: Some("Melamar kerja".into()),
    pdf_url: None,
  }
}

fn is_duplicate(err: &Error, message: &str) -> bool {
  matches!(err, Error::Duplicate(m) if m == message)
}

// ─── Regions ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn region_is_padded_and_unique() {
  let (registry, admin) = registry().await;

  let region = registry
    .create_region(&admin, NewRegion::new(" Krajan ", "1", "2"))
    .await
    .unwrap();
  assert_eq!(region.dusun, "Krajan");
  assert_eq!((region.rw.as_str(), region.rt.as_str()), ("001", "002"));

  let err = registry
    .create_region(&admin, NewRegion::new("krajan", "001", "02"))
    .await
    .unwrap_err();
  assert!(is_duplicate(&err, "Wilayah dengan Dusun, RW dan RT tersebut sudah terdaftar."));

  // Updating a region onto its own key is not a collision.
  let updated = registry
    .update_region(&admin, region.id, NewRegion::new("Krajan", "001", "002"))
    .await
    .unwrap();
  assert_eq!(updated.created_at, region.created_at);
}

#[tokio::test]
async fn blank_dusun_is_rejected() {
  let (registry, admin) = registry().await;
  let err = registry
    .create_region(&admin, NewRegion::new("   ", "1", "1"))
    .await
    .unwrap_err();
  match err {
    Error::Validation(fields) => assert_eq!(
      fields["dusun"],
      vec!["Dusun wajib diisi (maksimal 100 karakter)".to_owned()]
    ),
    other => panic!("expected validation error, got {other:?}"),
  }
  let page = registry
    .list_regions(&admin, ListQuery::new(RegionFilter::default()))
    .await
    .unwrap();
  assert_eq!(page.total, 0);
}

#[tokio::test]
async fn region_in_use_is_not_deleted() {
  let (registry, admin) = registry().await;
  let (region, _) = household(&registry, &admin).await;

  let err = registry.delete_region(&admin, region.id).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InUse(ref m) if m == "Wilayah tidak dapat dihapus karena masih digunakan oleh Kartu Keluarga."
  ));
  assert!(registry.get_region(&admin, region.id).await.is_ok());
}

#[tokio::test]
async fn unused_region_is_deleted() {
  let (registry, admin) = registry().await;
  let region = registry
    .create_region(&admin, NewRegion::new("Sukamaju", "3", "4"))
    .await
    .unwrap();

  registry.delete_region(&admin, region.id).await.unwrap();
  assert!(matches!(
    registry.get_region(&admin, region.id).await,
    Err(Error::NotFound { .. })
  ));
}

// ─── Family cards ────────────────────────────────────────────────────────────

#[tokio::test]
async fn family_card_requires_existing_region() {
  let (registry, admin) = registry().await;
  let err = registry
    .create_family_card(&admin, NewFamilyCard::new(&kk(1), Uuid::new_v4()))
    .await
    .unwrap_err();
  match err {
    Error::Validation(fields) => {
      assert_eq!(fields["wilayah_id"], vec!["Wilayah tidak ditemukan".to_owned()]);
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[tokio::test]
async fn second_family_card_with_same_nomor_kk_is_rejected() {
  let (registry, admin) = registry().await;
  let (region, card) = household(&registry, &admin).await;

  let err = registry
    .create_family_card(&admin, NewFamilyCard::new(&card.nomor_kk, region.id))
    .await
    .unwrap_err();
  assert!(is_duplicate(&err, "Nomor KK sudah terdaftar."));

  let page = registry
    .list_family_cards(&admin, ListQuery::new(FamilyCardFilter::default()))
    .await
    .unwrap();
  assert_eq!(page.total, 1);
}

#[tokio::test]
async fn large_household_lists_every_member() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  for i in 0..120 {
    registry
      .create_resident(&admin, resident(card.id, &nik(i), &format!("Warga {i:03}")))
      .await
      .unwrap();
  }

  let members = registry.family_card_members(&admin, card.id).await.unwrap();
  assert_eq!(members.len(), 120);
  assert_eq!(members[0].nama, "Warga 000");
}

#[tokio::test]
async fn family_card_with_members_is_not_deleted() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi"))
    .await
    .unwrap();

  let err = registry.delete_family_card(&admin, card.id).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InUse(ref m) if m == "Kartu Keluarga tidak dapat dihapus karena masih memiliki anggota keluarga."
  ));
  assert!(registry.get_family_card(&admin, card.id).await.is_ok());

  let members = registry.family_card_members(&admin, card.id).await.unwrap();
  assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn head_of_household_must_be_a_member() {
  let (registry, admin) = registry().await;
  let (region, card) = household(&registry, &admin).await;
  let other = registry
    .create_family_card(&admin, NewFamilyCard::new(&kk(2), region.id))
    .await
    .unwrap();
  let outsider = registry
    .create_resident(&admin, resident(other.id, &nik(1), "Siti"))
    .await
    .unwrap();

  let mut input = NewFamilyCard::new(&card.nomor_kk, region.id);
  input.kepala_keluarga_id = Some(outsider.id);
  assert!(matches!(
    registry.update_family_card(&admin, card.id, input).await,
    Err(Error::Validation(_))
  ));

  let options = registry.family_card_options(&admin).await.unwrap();
  assert_eq!(options.len(), 2);
  assert!(options.iter().all(|o| o.kepala.is_none()));
}

// ─── Residents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_resident_with_same_nik_is_rejected() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;

  registry
    .create_resident(&admin, resident(card.id, &nik(7), "Budi"))
    .await
    .unwrap();
  let err = registry
    .create_resident(&admin, resident(card.id, &nik(7), "Budi Lain"))
    .await
    .unwrap_err();
  assert!(is_duplicate(&err, "NIK sudah terdaftar."));
}

#[tokio::test]
async fn unique_constraint_is_classified() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  let first = registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi"))
    .await
    .unwrap();

  // Bypass the registry pre-check and hit the constraint directly.
  let clash = warga_core::resident::Resident { id: Uuid::new_v4(), ..first };
  let err = registry.store().insert_resident(clash).await.unwrap_err();
  assert_eq!(err.violated_key(), Some(KeyKind::Nik));
  assert!(err.code().is_some());
}

#[tokio::test]
async fn future_birth_date_never_reaches_storage() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;

  let mut input = resident(card.id, &nik(1), "Budi");
  input.tanggal_lahir = today() + Duration::days(2);
  let err = registry.create_resident(&admin, input).await.unwrap_err();
  assert!(err.messages().contains(&"Tanggal tidak boleh di masa depan".to_owned()));

  let page = registry
    .list_residents(&admin, ListQuery::new(ResidentFilter::default()))
    .await
    .unwrap();
  assert_eq!(page.total, 0);
}

#[tokio::test]
async fn blank_name_is_rejected() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;

  let err = registry
    .create_resident(&admin, resident(card.id, &nik(1), "  "))
    .await
    .unwrap_err();
  assert!(err.messages().contains(&"Nama wajib diisi (maksimal 100 karakter)".to_owned()));
}

#[tokio::test]
async fn underage_marriage_is_rejected() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;

  let mut input = resident(card.id, &nik(1), "Budi");
  input.tanggal_lahir = today() - Duration::days(365 * 10);
  input.status_perkawinan = StatusPerkawinan::Kawin;
  assert!(matches!(
    registry.create_resident(&admin, input).await,
    Err(Error::Validation(_))
  ));
}

#[tokio::test]
async fn delete_resident_marks_moved() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  let budi = registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi"))
    .await
    .unwrap();

  registry.delete_resident(&admin, budi.id).await.unwrap();

  let after = registry.get_resident(&admin, budi.id).await.unwrap();
  assert_eq!(after.status, ResidentStatus::Pindah);
  assert!(registry.resident_options(&admin).await.unwrap().is_empty());
}

#[tokio::test]
async fn pages_cover_every_row_once() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  for i in 0..25 {
    registry
      .create_resident(&admin, resident(card.id, &nik(i), &format!("Warga {i:02}")))
      .await
      .unwrap();
  }

  let mut seen = HashSet::new();
  for (page, expected) in [(1, 10), (2, 10), (3, 5)] {
    let result = registry
      .list_residents(&admin, ListQuery::new(ResidentFilter::default()).page(page, 10))
      .await
      .unwrap();
    assert_eq!(result.data.len(), expected);
    assert_eq!(result.total, 25);
    assert_eq!(result.total_pages, 3);
    seen.extend(result.data.into_iter().map(|r| r.id));
  }
  assert_eq!(seen.len(), 25);

  let beyond = registry
    .list_residents(&admin, ListQuery::new(ResidentFilter::default()).page(4, 10))
    .await
    .unwrap();
  assert!(beyond.data.is_empty());
  assert_eq!(beyond.total, 25);

  let far = registry
    .list_residents(&admin, ListQuery::new(ResidentFilter::default()).page(u64::MAX, 10))
    .await
    .unwrap();
  assert!(far.data.is_empty());
  assert_eq!(far.total, 25);
  assert_eq!(far.page, u64::MAX);
}

#[tokio::test]
async fn search_and_filters_narrow_the_total() {
  let (registry, admin) = registry().await;
  let (region, card) = household(&registry, &admin).await;
  registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi Santoso"))
    .await
    .unwrap();
  let mut siti = resident(card.id, &nik(2), "Siti Aminah");
  siti.jenis_kelamin = JenisKelamin::Perempuan;
  registry.create_resident(&admin, siti).await.unwrap();

  let by_name = registry
    .list_residents(&admin, ListQuery::new(ResidentFilter::default()).search("santoso"))
    .await
    .unwrap();
  assert_eq!(by_name.total, 1);

  let by_region = registry
    .list_residents(
      &admin,
      ListQuery::new(ResidentFilter {
        wilayah_id: Some(region.id),
        jenis_kelamin: Some(JenisKelamin::Perempuan),
        ..Default::default()
      }),
    )
    .await
    .unwrap();
  assert_eq!(by_region.total, 1);
  assert_eq!(by_region.data[0].nama, "Siti Aminah");
}

// ─── Mutations and letters ───────────────────────────────────────────────────

#[tokio::test]
async fn death_mutation_updates_status() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  let budi = registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi"))
    .await
    .unwrap();

  let mutation = registry
    .create_mutation(
      &admin,
      NewMutation {
        penduduk_id:       budi.id,
        jenis:             MutationKind::Meninggal,
        tanggal_peristiwa: today(),
        keterangan:        Some("Sakit".into()),
      },
    )
    .await
    .unwrap();
  assert_eq!(mutation.created_by, "admin");

  let after = registry.get_resident(&admin, budi.id).await.unwrap();
  assert_eq!(after.status, ResidentStatus::Meninggal);

  let stats = registry.dashboard(&admin).await.unwrap();
  assert_eq!(stats.total_penduduk, 0);
  assert_eq!(stats.status.meninggal, 1);
  assert_eq!(stats.mutasi_bulan_ini["MENINGGAL"], 1);
  assert_eq!(stats.mutasi_terbaru.len(), 1);
}

#[tokio::test]
async fn future_mutation_date_is_rejected() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  let budi = registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi"))
    .await
    .unwrap();

  let err = registry
    .create_mutation(
      &admin,
      NewMutation {
        penduduk_id:       budi.id,
        jenis:             MutationKind::Meninggal,
        tanggal_peristiwa: today() + Duration::days(1),
        keterangan:        None,
      },
    )
    .await
    .unwrap_err();
  assert!(err.messages().contains(&"Tanggal tidak boleh di masa depan".to_owned()));

  let page = registry
    .list_mutations(&admin, ListQuery::new(MutationFilter::default()))
    .await
    .unwrap();
  assert_eq!(page.total, 0);
  let after = registry.get_resident(&admin, budi.id).await.unwrap();
  assert_eq!(after.status, ResidentStatus::Hidup);
}

#[tokio::test]
async fn future_letter_date_is_rejected() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  let budi = registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi"))
    .await
    .unwrap();

  let mut input = letter("470/009/DS/2024", budi.id);
  input.tanggal_cetak = today() + Duration::days(3);
  let err = registry.create_letter(&admin, input).await.unwrap_err();
  assert!(err.messages().contains(&"Tanggal tidak boleh di masa depan".to_owned()));

  let page = registry
    .list_letters(&admin, ListQuery::new(LetterFilter::default()))
    .await
    .unwrap();
  assert_eq!(page.total, 0);
}

#[tokio::test]
async fn letter_search_reads_the_snapshot() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  let budi = registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi"))
    .await
    .unwrap();
  registry
    .create_letter(&admin, letter("470/001/DS/2024", budi.id))
    .await
    .unwrap();
  registry
    .update_resident(&admin, budi.id, resident(card.id, &nik(1), "Ahmad"))
    .await
    .unwrap();

  let search = |text: &str| ListQuery::new(LetterFilter::default()).search(text);
  let by_old_name = registry.list_letters(&admin, search("budi")).await.unwrap();
  assert_eq!(by_old_name.total, 1);
  let by_new_name = registry.list_letters(&admin, search("ahmad")).await.unwrap();
  assert_eq!(by_new_name.total, 0);
  let by_nik = registry.list_letters(&admin, search(&nik(1))).await.unwrap();
  assert_eq!(by_nik.total, 1);
  let by_number = registry.list_letters(&admin, search("470/001")).await.unwrap();
  assert_eq!(by_number.total, 1);
}

#[tokio::test]
async fn letter_keeps_resident_snapshot() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  let budi = registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi"))
    .await
    .unwrap();

  let input = NewLetter {
    nomor_surat:   "470/001/DS/2024".into(),
    jenis_surat:   LetterKind::KeteranganDomisili,
    penduduk_id:   budi.id,
    tanggal_cetak: today(),
    keperluan:     Some("Melamar kerja".into()),
    pdf_url:       None,
  };
  let letter = registry.create_letter(&admin, input.clone()).await.unwrap();
  assert_eq!(letter.snapshot.nomor_kk.as_deref(), Some(card.nomor_kk.as_str()));

  registry
    .update_resident(&admin, budi.id, resident(card.id, &nik(1), "Budi Baru"))
    .await
    .unwrap();
  let stored = registry.get_letter(&admin, letter.id).await.unwrap();
  assert_eq!(stored.snapshot.nama, "Budi");

  let err = registry.create_letter(&admin, input).await.unwrap_err();
  assert!(is_duplicate(&err, "Nomor surat sudah terdaftar."));
}

// ─── Roles ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn users_without_role_are_read_only() {
  let (registry, admin) = registry().await;
  household(&registry, &admin).await;
  let guest = Actor::new("tamu");

  assert_eq!(registry.my_role(&guest).await.unwrap(), Role::User);
  assert!(registry.list_regions(&guest, ListQuery::new(Default::default())).await.is_ok());
  assert!(matches!(
    registry.create_region(&guest, NewRegion::new("Baru", "9", "9")).await,
    Err(Error::Forbidden { .. })
  ));
}

#[tokio::test]
async fn operator_cannot_back_up_or_manage_roles() {
  let (registry, admin) = registry().await;
  registry.set_role(&admin, "siti", Role::Operator).await.unwrap();
  let siti = Actor::new("siti");

  assert!(matches!(registry.backup(&siti).await, Err(Error::Forbidden { .. })));
  assert!(matches!(
    registry.set_role(&siti, "siti", Role::Admin).await,
    Err(Error::Forbidden { .. })
  ));
  assert!(registry.create_region(&siti, NewRegion::new("Baru", "9", "9")).await.is_ok());
}

#[tokio::test]
async fn admin_cannot_demote_self() {
  let (registry, admin) = registry().await;
  assert!(matches!(
    registry.set_role(&admin, "admin", Role::User).await,
    Err(Error::Validation(_))
  ));
  assert_eq!(registry.my_role(&admin).await.unwrap(), Role::Admin);
}

#[tokio::test]
async fn backup_counts_every_table() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi"))
    .await
    .unwrap();

  let backup = registry.backup(&admin).await.unwrap();
  assert_eq!(backup.metadata.exported_by, "admin");
  assert_eq!(backup.metadata.counts.regions, 1);
  assert_eq!(backup.metadata.counts.family_cards, 1);
  assert_eq!(backup.metadata.counts.residents, 1);
  assert_eq!(backup.metadata.counts.user_roles, 1);
}

// ─── Bulk import ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn import_reports_bad_rows_and_keeps_good_ones() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;

  let drafts = vec![
    Draft::ok(0, resident(card.id, &nik(1), "Budi")),
    Draft::ok(1, resident(card.id, "320101000000001", "Pendek")),
    Draft::ok(2, resident(card.id, &nik(3), "Siti")),
  ];
  let report = registry.import_residents(&admin, drafts).await.unwrap();

  assert_eq!(report.success, 2);
  assert_eq!(report.errors, vec!["Baris 3: NIK harus 16 digit".to_owned()]);
  let page = registry
    .list_residents(&admin, ListQuery::new(ResidentFilter::default()))
    .await
    .unwrap();
  assert_eq!(page.total, 2);
}

#[tokio::test]
async fn import_rejects_storage_and_in_file_duplicates() {
  let (registry, admin) = registry().await;
  let (_, card) = household(&registry, &admin).await;
  registry
    .create_resident(&admin, resident(card.id, &nik(1), "Budi"))
    .await
    .unwrap();

  let drafts = vec![
    Draft::ok(0, resident(card.id, &nik(1), "Budi Lagi")),
    Draft::ok(1, resident(card.id, &nik(2), "Siti")),
    Draft::ok(2, resident(card.id, &nik(2), "Siti Lagi")),
    Draft::ok(3, resident(Uuid::new_v4(), &nik(4), "Tanpa KK")),
    Draft::err(4, "Tanggal lahir tidak valid"),
  ];
  let report = registry.import_residents(&admin, drafts).await.unwrap();

  assert_eq!(report.success, 1);
  assert_eq!(
    report.errors,
    vec![
      "Baris 2: NIK sudah terdaftar.".to_owned(),
      "Baris 4: NIK duplikat dalam file".to_owned(),
      "Baris 5: Kartu Keluarga tidak ditemukan".to_owned(),
      "Baris 6: Tanggal lahir tidak valid".to_owned(),
    ]
  );
}

#[tokio::test]
async fn import_inserts_across_batches() {
  let store = Arc::new(store().await);
  let registry = Registry::new(store).with_import_batch(2);
  registry.bootstrap_admin("admin").await.unwrap();
  let admin = Actor::new("admin");

  let drafts = (1..=5)
    .map(|i| Draft::ok(i as usize - 1, NewRegion::new("Krajan", "1", &i.to_string())))
    .collect();
  let report = registry.import_regions(&admin, drafts).await.unwrap();
  assert_eq!(report.success, 5);
  assert!(report.errors.is_empty());

  let index = registry.import_context(&admin).await.unwrap();
  let first = index.resolve_region("wilayah-1").unwrap();
  assert_eq!(registry.get_region(&admin, first).await.unwrap().rt, "001");
}

#[tokio::test]
async fn import_treats_dusun_case_as_one_region() {
  let (registry, admin) = registry().await;

  let drafts = vec![
    Draft::ok(0, NewRegion::new("Krajan", "1", "1")),
    Draft::ok(1, NewRegion::new("krajan", "1", "1")),
    Draft::ok(2, NewRegion::new("Sukamaju", "1", "1")),
  ];
  let report = registry.import_regions(&admin, drafts).await.unwrap();

  assert_eq!(report.success, 2);
  assert_eq!(
    report.errors,
    vec!["Baris 3: Wilayah (Dusun/RW/RT) duplikat dalam file".to_owned()]
  );

  let again = registry
    .import_regions(&admin, vec![Draft::ok(0, NewRegion::new("KRAJAN", "001", "001"))])
    .await
    .unwrap();
  assert_eq!(again.success, 0);
  assert_eq!(
    again.errors,
    vec!["Baris 2: Wilayah dengan Dusun, RW dan RT tersebut sudah terdaftar.".to_owned()]
  );
}

#[tokio::test]
async fn family_card_import_checks_region() {
  let (registry, admin) = registry().await;
  let region = registry
    .create_region(&admin, NewRegion::new("Krajan", "1", "1"))
    .await
    .unwrap();

  let drafts = vec![
    Draft::ok(0, NewFamilyCard::new(&kk(1), region.id)),
    Draft::ok(1, NewFamilyCard::new(&kk(2), Uuid::new_v4())),
  ];
  let report = registry.import_family_cards(&admin, drafts).await.unwrap();
  assert_eq!(report.success, 1);
  assert_eq!(report.errors, vec!["Baris 3: Wilayah tidak ditemukan".to_owned()]);
}

#[tokio::test]
async fn user_cannot_import() {
  let (registry, _) = registry().await;
  let guest = Actor::new("tamu");
  assert!(matches!(
    registry.import_regions(&guest, vec![]).await,
    Err(Error::Forbidden { .. })
  ));
}
