//! [`SqliteStore`], the SQLite implementation of [`RegistryStore`].

use std::{
  collections::{HashMap, HashSet},
  path::Path,
};

use chrono::NaiveDate;
use rusqlite::{OptionalExtension as _, Row, params, params_from_iter, types::Value};
use tracing::debug;
use uuid::Uuid;
use warga_core::{
  family_card::{FamilyCard, FamilyCardFilter, FamilyCardOption},
  letter::{Letter, LetterFilter, LetterKind},
  mutation::{Mutation, MutationFilter, MutationKind},
  page::{Listing, Window},
  region::{Region, RegionFilter},
  resident::{JenisKelamin, Resident, ResidentFilter, ResidentOption, ResidentStatus},
  role::UserRole,
  store::{Dependents, NaturalKey, RegistryStore},
};

use crate::{
  Result,
  encode::{
    FAMILY_CARD_COLUMNS, LETTER_COLUMNS, MUTATION_COLUMNS, RESIDENT_COLUMNS, REGION_COLUMNS,
    RawFamilyCard, RawFamilyCardOption, RawLetter, RawMutation, RawRegion, RawResident,
    RawResidentOption, RawUserRole, decode_code, encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

/// Upper bound on `IN (...)` list length per statement.
const IN_CHUNK: usize = 500;

const REGION_FROM: &str = "wilayah w";
const FAMILY_CARD_FROM: &str =
  "kartu_keluarga k LEFT JOIN penduduk h ON h.id = k.kepala_keluarga_id";
const RESIDENT_FROM: &str = "penduduk p JOIN kartu_keluarga k ON k.id = p.kk_id";
const MUTATION_FROM: &str = "mutasi_log m JOIN penduduk p ON p.id = m.penduduk_id";
const LETTER_FROM: &str = "surat_keluar s JOIN penduduk p ON p.id = s.penduduk_id";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Warga registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    debug!(path = %path.as_ref().display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `sql` and decode every row.
  async fn select<Raw, T>(
    &self,
    sql: String,
    params: Vec<Value>,
    read: fn(&Row<'_>) -> rusqlite::Result<Raw>,
    decode: fn(Raw) -> Result<T>,
  ) -> Result<Vec<T>>
  where
    Raw: Send + 'static,
  {
    let raws: Vec<Raw> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(params.iter()), read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(decode).collect()
  }

  /// One page of `columns FROM from` plus the number of rows matching
  /// `clause`, read in a single connection call.
  #[allow(clippy::too_many_arguments)]
  async fn select_page<Raw, T>(
    &self,
    columns: &'static str,
    from: &'static str,
    clause: Clause,
    order: &'static str,
    window: Window,
    read: fn(&Row<'_>) -> rusqlite::Result<Raw>,
    decode: fn(Raw) -> Result<T>,
  ) -> Result<(Vec<T>, u64)>
  where
    Raw: Send + 'static,
  {
    let where_sql = clause.sql();
    let count_sql = format!("SELECT COUNT(*) FROM {from} {where_sql}");
    let page_sql =
      format!("SELECT {columns} FROM {from} {where_sql} ORDER BY {order} LIMIT ? OFFSET ?");
    let mut params = clause.params;

    let (raws, total): (Vec<Raw>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 =
          conn.query_row(&count_sql, params_from_iter(params.iter()), |r| r.get(0))?;

        params.push(Value::Integer(i64::try_from(window.limit).unwrap_or(i64::MAX)));
        params.push(Value::Integer(i64::try_from(window.offset).unwrap_or(i64::MAX)));
        let mut stmt = conn.prepare(&page_sql)?;
        let rows = stmt
          .query_map(params_from_iter(params.iter()), read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((rows, total))
      })
      .await?;

    let items = raws.into_iter().map(decode).collect::<Result<_>>()?;
    Ok((items, total as u64))
  }

  /// Run a `SELECT code, COUNT(*) ... GROUP BY code` query.
  async fn count_by<T: std::str::FromStr>(
    &self,
    column: &'static str,
    sql: &'static str,
    params: Vec<Value>,
  ) -> Result<Vec<(T, u64)>> {
    let raws: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(params_from_iter(params.iter()), |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws
      .into_iter()
      .map(|(value, n)| Ok((decode_code(column, &value)?, n as u64)))
      .collect()
  }

  async fn count(&self, sql: &'static str, params: Vec<Value>) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(sql, params_from_iter(params.iter()), |r| r.get(0))?))
      .await?;
    Ok(n as u64)
  }

  /// Execute a single write and report whether it touched any row.
  async fn execute(&self, sql: &'static str, params: Vec<Value>) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, params_from_iter(params.iter()))?))
      .await?;
    Ok(changed > 0)
  }

  /// Insert `rows` with `write` inside one transaction.
  async fn insert_all<T>(
    &self,
    rows: Vec<T>,
    write: fn(&rusqlite::Connection, &T) -> rusqlite::Result<usize>,
  ) -> Result<()>
  where
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for row in &rows {
          write(&tx, row)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Query building ──────────────────────────────────────────────────────────

/// `WHERE` conditions and their positional parameters, in order.
#[derive(Default)]
struct Clause {
  conds:  Vec<&'static str>,
  params: Vec<Value>,
}

impl Clause {
  fn and(&mut self, cond: &'static str, value: Value) -> &mut Self {
    self.conds.push(cond);
    self.params.push(value);
    self
  }

  fn and_opt(&mut self, cond: &'static str, value: Option<String>) -> &mut Self {
    if let Some(v) = value {
      self.and(cond, Value::Text(v));
    }
    self
  }

  /// `cond` holds one `?` per searched column; all bind the same pattern.
  fn search(&mut self, text: Option<String>, cond: &'static str) -> &mut Self {
    if let Some(text) = text {
      let pattern = format!("%{text}%");
      let slots = cond.matches('?').count();
      self.conds.push(cond);
      self
        .params
        .extend(std::iter::repeat_n(Value::Text(pattern), slots));
    }
    self
  }

  fn sql(&self) -> String {
    if self.conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.conds.join(" AND "))
    }
  }
}

fn text(s: impl Into<String>) -> Value { Value::Text(s.into()) }

fn id(id: Uuid) -> Value { Value::Text(encode_uuid(id)) }

fn opt_id(id: Option<Uuid>) -> Option<String> { id.map(encode_uuid) }

fn code(value: impl AsRef<str>) -> Value { Value::Text(value.as_ref().to_owned()) }

// ─── Row writers ─────────────────────────────────────────────────────────────

fn write_region(conn: &rusqlite::Connection, r: &Region) -> rusqlite::Result<usize> {
  conn.execute(
    "INSERT INTO wilayah (
       id, dusun, rw, rt, desa, kecamatan, kabupaten, provinsi, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    params![
      encode_uuid(r.id),
      r.dusun,
      r.rw,
      r.rt,
      r.desa,
      r.kecamatan,
      r.kabupaten,
      r.provinsi,
      encode_dt(r.created_at),
      encode_dt(r.updated_at),
    ],
  )
}

fn write_family_card(conn: &rusqlite::Connection, k: &FamilyCard) -> rusqlite::Result<usize> {
  conn.execute(
    "INSERT INTO kartu_keluarga (
       id, nomor_kk, wilayah_id, kepala_keluarga_id, alamat, scan_url, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    params![
      encode_uuid(k.id),
      k.nomor_kk,
      encode_uuid(k.wilayah_id),
      opt_id(k.kepala_keluarga_id),
      k.alamat,
      k.scan_url,
      encode_dt(k.created_at),
      encode_dt(k.updated_at),
    ],
  )
}

fn write_resident(conn: &rusqlite::Connection, p: &Resident) -> rusqlite::Result<usize> {
  conn.execute(
    "INSERT INTO penduduk (
       id, nik, kk_id, nama, tempat_lahir, tanggal_lahir, jenis_kelamin, golongan_darah,
       agama, status_perkawinan, hubungan_keluarga, pendidikan, pekerjaan, nama_ayah,
       nama_ibu, status, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
    params![
      encode_uuid(p.id),
      p.nik,
      encode_uuid(p.kk_id),
      p.nama,
      p.tempat_lahir,
      encode_date(p.tanggal_lahir),
      p.jenis_kelamin.as_ref(),
      p.golongan_darah.map(|g| g.to_string()),
      p.agama.as_ref(),
      p.status_perkawinan.as_ref(),
      p.hubungan_keluarga.as_ref(),
      p.pendidikan,
      p.pekerjaan,
      p.nama_ayah,
      p.nama_ibu,
      p.status.as_ref(),
      encode_dt(p.created_at),
      encode_dt(p.updated_at),
    ],
  )
}

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = crate::Error;

  // ── Keys and guards ───────────────────────────────────────────────────────

  async fn key_taken(&self, key: NaturalKey, except: Option<Uuid>) -> Result<bool> {
    let except = opt_id(except).map_or(Value::Null, Value::Text);
    let (sql, mut params) = match key {
      NaturalKey::Region { dusun, rw, rt } => (
        "SELECT 1 FROM wilayah WHERE dusun = ? AND rw = ? AND rt = ? AND id IS NOT ?",
        vec![text(dusun), text(rw), text(rt)],
      ),
      NaturalKey::NomorKk(n) => {
        ("SELECT 1 FROM kartu_keluarga WHERE nomor_kk = ? AND id IS NOT ?", vec![text(n)])
      }
      NaturalKey::Nik(n) => ("SELECT 1 FROM penduduk WHERE nik = ? AND id IS NOT ?", vec![text(n)]),
      NaturalKey::NomorSurat(n) => {
        ("SELECT 1 FROM surat_keluar WHERE nomor_surat = ? AND id IS NOT ?", vec![text(n)])
      }
    };
    params.push(except);

    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, params_from_iter(params.iter()), |_| Ok(()))
            .optional()?,
        )
      })
      .await?;
    Ok(found.is_some())
  }

  async fn existing_keys(&self, keys: Vec<NaturalKey>) -> Result<Vec<NaturalKey>> {
    let taken = self
      .conn
      .call(move |conn| {
        // Region keys compare case-insensitively on Dusun, like the column.
        let mut regions: Option<HashSet<(String, String, String)>> = None;
        if keys.iter().any(|k| matches!(k, NaturalKey::Region { .. })) {
          let mut stmt = conn.prepare("SELECT dusun, rw, rt FROM wilayah")?;
          let rows: HashSet<(String, String, String)> = stmt
            .query_map([], |r| {
              Ok((r.get::<_, String>(0)?.to_ascii_lowercase(), r.get(1)?, r.get(2)?))
            })?
            .collect::<rusqlite::Result<_>>()?;
          regions = Some(rows);
        }

        let mut wanted: HashMap<&'static str, Vec<String>> = HashMap::new();
        for key in &keys {
          if let Some((sql, value)) = scalar_probe(key) {
            wanted.entry(sql).or_default().push(value.to_owned());
          }
        }
        let mut found: HashSet<(&'static str, String)> = HashSet::new();
        for (sql, values) in wanted {
          for chunk in values.chunks(IN_CHUNK) {
            let slots = vec!["?"; chunk.len()].join(", ");
            let mut stmt = conn.prepare(&format!("{sql} ({slots})"))?;
            let rows = stmt
              .query_map(params_from_iter(chunk.iter()), |r| r.get::<_, String>(0))?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            found.extend(rows.into_iter().map(|v| (sql, v)));
          }
        }

        Ok(
          keys
            .into_iter()
            .filter(|key| match key {
              NaturalKey::Region { dusun, rw, rt } => regions.as_ref().is_some_and(|set| {
                set.contains(&(dusun.to_ascii_lowercase(), rw.clone(), rt.clone()))
              }),
              other => scalar_probe(other)
                .is_some_and(|(sql, value)| found.contains(&(sql, value.to_owned()))),
            })
            .collect::<Vec<_>>(),
        )
      })
      .await?;
    Ok(taken)
  }

  async fn count_dependents(&self, of: Dependents) -> Result<u64> {
    match of {
      Dependents::FamilyCardsIn(region) => {
        self
          .count("SELECT COUNT(*) FROM kartu_keluarga WHERE wilayah_id = ?1", vec![id(region)])
          .await
      }
      Dependents::ResidentsOf(card) => {
        self
          .count("SELECT COUNT(*) FROM penduduk WHERE kk_id = ?1", vec![id(card)])
          .await
      }
    }
  }

  // ── Regions ───────────────────────────────────────────────────────────────

  async fn insert_region(&self, region: Region) -> Result<()> {
    self.insert_all(vec![region], write_region).await
  }

  async fn insert_regions(&self, regions: Vec<Region>) -> Result<()> {
    self.insert_all(regions, write_region).await
  }

  async fn update_region(&self, r: Region) -> Result<bool> {
    self
      .execute(
        "UPDATE wilayah SET dusun = ?2, rw = ?3, rt = ?4, desa = ?5, kecamatan = ?6,
           kabupaten = ?7, provinsi = ?8, updated_at = ?9
         WHERE id = ?1",
        vec![
          id(r.id),
          text(r.dusun),
          text(r.rw),
          text(r.rt),
          r.desa.into(),
          r.kecamatan.into(),
          r.kabupaten.into(),
          r.provinsi.into(),
          text(encode_dt(r.updated_at)),
        ],
      )
      .await
  }

  async fn delete_region(&self, region: Uuid) -> Result<bool> {
    self
      .execute("DELETE FROM wilayah WHERE id = ?1", vec![id(region)])
      .await
  }

  async fn get_region(&self, region: Uuid) -> Result<Option<Region>> {
    let rows = self
      .select(
        format!("SELECT {REGION_COLUMNS} FROM {REGION_FROM} WHERE w.id = ?1"),
        vec![id(region)],
        RawRegion::from_row,
        RawRegion::into_region,
      )
      .await?;
    Ok(rows.into_iter().next())
  }

  async fn list_regions(&self, listing: Listing<RegionFilter>) -> Result<(Vec<Region>, u64)> {
    let mut clause = Clause::default();
    clause
      .search(
        listing.search,
        "(w.dusun LIKE ? OR w.rw LIKE ? OR w.rt LIKE ? OR IFNULL(w.desa, '') LIKE ?)",
      )
      .and_opt("w.dusun = ?", listing.filter.dusun);

    self
      .select_page(
        REGION_COLUMNS,
        REGION_FROM,
        clause,
        "w.dusun, w.rw, w.rt",
        listing.window,
        RawRegion::from_row,
        RawRegion::into_region,
      )
      .await
  }

  async fn all_regions(&self) -> Result<Vec<Region>> {
    self
      .select(
        format!("SELECT {REGION_COLUMNS} FROM {REGION_FROM} ORDER BY w.dusun, w.rw, w.rt"),
        vec![],
        RawRegion::from_row,
        RawRegion::into_region,
      )
      .await
  }

  // ── Family cards ──────────────────────────────────────────────────────────

  async fn insert_family_card(&self, card: FamilyCard) -> Result<()> {
    self.insert_all(vec![card], write_family_card).await
  }

  async fn insert_family_cards(&self, cards: Vec<FamilyCard>) -> Result<()> {
    self.insert_all(cards, write_family_card).await
  }

  async fn update_family_card(&self, k: FamilyCard) -> Result<bool> {
    self
      .execute(
        "UPDATE kartu_keluarga SET nomor_kk = ?2, wilayah_id = ?3, kepala_keluarga_id = ?4,
           alamat = ?5, scan_url = ?6, updated_at = ?7
         WHERE id = ?1",
        vec![
          id(k.id),
          text(k.nomor_kk),
          id(k.wilayah_id),
          opt_id(k.kepala_keluarga_id).into(),
          k.alamat.into(),
          k.scan_url.into(),
          text(encode_dt(k.updated_at)),
        ],
      )
      .await
  }

  async fn delete_family_card(&self, card: Uuid) -> Result<bool> {
    self
      .execute("DELETE FROM kartu_keluarga WHERE id = ?1", vec![id(card)])
      .await
  }

  async fn get_family_card(&self, card: Uuid) -> Result<Option<FamilyCard>> {
    let rows = self
      .select(
        format!("SELECT {FAMILY_CARD_COLUMNS} FROM {FAMILY_CARD_FROM} WHERE k.id = ?1"),
        vec![id(card)],
        RawFamilyCard::from_row,
        RawFamilyCard::into_family_card,
      )
      .await?;
    Ok(rows.into_iter().next())
  }

  async fn list_family_cards(
    &self,
    listing: Listing<FamilyCardFilter>,
  ) -> Result<(Vec<FamilyCard>, u64)> {
    let mut clause = Clause::default();
    clause
      .search(
        listing.search,
        "(k.nomor_kk LIKE ? OR IFNULL(k.alamat, '') LIKE ? OR IFNULL(h.nama, '') LIKE ?)",
      )
      .and_opt("k.wilayah_id = ?", opt_id(listing.filter.wilayah_id));

    self
      .select_page(
        FAMILY_CARD_COLUMNS,
        FAMILY_CARD_FROM,
        clause,
        "k.nomor_kk",
        listing.window,
        RawFamilyCard::from_row,
        RawFamilyCard::into_family_card,
      )
      .await
  }

  async fn all_family_cards(&self) -> Result<Vec<FamilyCard>> {
    self
      .select(
        format!("SELECT {FAMILY_CARD_COLUMNS} FROM {FAMILY_CARD_FROM} ORDER BY k.nomor_kk"),
        vec![],
        RawFamilyCard::from_row,
        RawFamilyCard::into_family_card,
      )
      .await
  }

  async fn family_card_options(&self) -> Result<Vec<FamilyCardOption>> {
    self
      .select(
        format!("SELECT k.id, k.nomor_kk, h.nama FROM {FAMILY_CARD_FROM} ORDER BY k.nomor_kk"),
        vec![],
        RawFamilyCardOption::from_row,
        RawFamilyCardOption::into_option,
      )
      .await
  }

  // ── Residents ─────────────────────────────────────────────────────────────

  async fn insert_resident(&self, resident: Resident) -> Result<()> {
    self.insert_all(vec![resident], write_resident).await
  }

  async fn insert_residents(&self, residents: Vec<Resident>) -> Result<()> {
    self.insert_all(residents, write_resident).await
  }

  async fn update_resident(&self, p: Resident) -> Result<bool> {
    self
      .execute(
        "UPDATE penduduk SET nik = ?2, kk_id = ?3, nama = ?4, tempat_lahir = ?5,
           tanggal_lahir = ?6, jenis_kelamin = ?7, golongan_darah = ?8, agama = ?9,
           status_perkawinan = ?10, hubungan_keluarga = ?11, pendidikan = ?12,
           pekerjaan = ?13, nama_ayah = ?14, nama_ibu = ?15, status = ?16, updated_at = ?17
         WHERE id = ?1",
        vec![
          id(p.id),
          text(p.nik),
          id(p.kk_id),
          text(p.nama),
          text(p.tempat_lahir),
          text(encode_date(p.tanggal_lahir)),
          code(p.jenis_kelamin),
          p.golongan_darah.map(|g| g.to_string()).into(),
          code(p.agama),
          code(p.status_perkawinan),
          code(p.hubungan_keluarga),
          p.pendidikan.into(),
          p.pekerjaan.into(),
          p.nama_ayah.into(),
          p.nama_ibu.into(),
          code(p.status),
          text(encode_dt(p.updated_at)),
        ],
      )
      .await
  }

  async fn set_resident_status(&self, resident: Uuid, status: ResidentStatus) -> Result<bool> {
    self
      .execute(
        "UPDATE penduduk SET status = ?2, updated_at = ?3 WHERE id = ?1",
        vec![id(resident), code(status), text(encode_dt(chrono::Utc::now()))],
      )
      .await
  }

  async fn get_resident(&self, resident: Uuid) -> Result<Option<Resident>> {
    let rows = self
      .select(
        format!("SELECT {RESIDENT_COLUMNS} FROM {RESIDENT_FROM} WHERE p.id = ?1"),
        vec![id(resident)],
        RawResident::from_row,
        RawResident::into_resident,
      )
      .await?;
    Ok(rows.into_iter().next())
  }

  async fn list_residents(
    &self,
    listing: Listing<ResidentFilter>,
  ) -> Result<(Vec<Resident>, u64)> {
    let filter = listing.filter;
    let mut clause = Clause::default();
    clause
      .search(listing.search, "(p.nik LIKE ? OR p.nama LIKE ?)")
      .and_opt("p.status = ?", filter.status.map(|s| s.to_string()))
      .and_opt("p.jenis_kelamin = ?", filter.jenis_kelamin.map(|s| s.to_string()))
      .and_opt("p.kk_id = ?", opt_id(filter.kk_id))
      .and_opt("k.wilayah_id = ?", opt_id(filter.wilayah_id));

    self
      .select_page(
        RESIDENT_COLUMNS,
        RESIDENT_FROM,
        clause,
        "p.nama, p.nik",
        listing.window,
        RawResident::from_row,
        RawResident::into_resident,
      )
      .await
  }

  async fn all_residents(&self) -> Result<Vec<Resident>> {
    self
      .select(
        format!("SELECT {RESIDENT_COLUMNS} FROM {RESIDENT_FROM} ORDER BY p.nama, p.nik"),
        vec![],
        RawResident::from_row,
        RawResident::into_resident,
      )
      .await
  }

  async fn family_members(&self, kk_id: Uuid) -> Result<Vec<Resident>> {
    self
      .select(
        format!(
          "SELECT {RESIDENT_COLUMNS} FROM {RESIDENT_FROM} WHERE p.kk_id = ?1 ORDER BY p.nama, p.nik"
        ),
        vec![id(kk_id)],
        RawResident::from_row,
        RawResident::into_resident,
      )
      .await
  }

  async fn resident_options(&self) -> Result<Vec<ResidentOption>> {
    self
      .select(
        "SELECT id, nik, nama FROM penduduk WHERE status = ?1 ORDER BY nama, nik".to_owned(),
        vec![code(ResidentStatus::Hidup)],
        RawResidentOption::from_row,
        RawResidentOption::into_option,
      )
      .await
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn record_mutation(&self, m: Mutation, resulting: ResidentStatus) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO mutasi_log (
             id, penduduk_id, jenis, tanggal_peristiwa, keterangan, created_by, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            encode_uuid(m.id),
            encode_uuid(m.penduduk_id),
            m.jenis.as_ref(),
            encode_date(m.tanggal_peristiwa),
            m.keterangan,
            m.created_by,
            encode_dt(m.created_at),
          ],
        )?;
        tx.execute(
          "UPDATE penduduk SET status = ?2, updated_at = ?3 WHERE id = ?1",
          params![encode_uuid(m.penduduk_id), resulting.as_ref(), encode_dt(m.created_at)],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_mutation(&self, mutation: Uuid) -> Result<Option<Mutation>> {
    let rows = self
      .select(
        format!("SELECT {MUTATION_COLUMNS} FROM {MUTATION_FROM} WHERE m.id = ?1"),
        vec![id(mutation)],
        RawMutation::from_row,
        RawMutation::into_mutation,
      )
      .await?;
    Ok(rows.into_iter().next())
  }

  async fn list_mutations(
    &self,
    listing: Listing<MutationFilter>,
  ) -> Result<(Vec<Mutation>, u64)> {
    let mut clause = Clause::default();
    clause
      .search(
        listing.search,
        "(p.nama LIKE ? OR p.nik LIKE ? OR IFNULL(m.keterangan, '') LIKE ?)",
      )
      .and_opt("m.jenis = ?", listing.filter.jenis.map(|j| j.to_string()))
      .and_opt("m.penduduk_id = ?", opt_id(listing.filter.penduduk_id));

    self
      .select_page(
        MUTATION_COLUMNS,
        MUTATION_FROM,
        clause,
        "m.tanggal_peristiwa DESC, m.created_at DESC",
        listing.window,
        RawMutation::from_row,
        RawMutation::into_mutation,
      )
      .await
  }

  async fn all_mutations(&self) -> Result<Vec<Mutation>> {
    self
      .select(
        format!("SELECT {MUTATION_COLUMNS} FROM {MUTATION_FROM} ORDER BY m.created_at"),
        vec![],
        RawMutation::from_row,
        RawMutation::into_mutation,
      )
      .await
  }

  async fn recent_mutations(&self, limit: u64) -> Result<Vec<Mutation>> {
    self
      .select(
        format!(
          "SELECT {MUTATION_COLUMNS} FROM {MUTATION_FROM}
           ORDER BY m.created_at DESC, m.rowid DESC LIMIT ?1"
        ),
        vec![Value::Integer(limit as i64)],
        RawMutation::from_row,
        RawMutation::into_mutation,
      )
      .await
  }

  async fn count_mutations_since(&self, since: NaiveDate) -> Result<Vec<(MutationKind, u64)>> {
    self
      .count_by(
        "jenis",
        "SELECT jenis, COUNT(*) FROM mutasi_log WHERE tanggal_peristiwa >= ?1 GROUP BY jenis",
        vec![text(encode_date(since))],
      )
      .await
  }

  // ── Letters ───────────────────────────────────────────────────────────────

  async fn insert_letter(&self, s: Letter) -> Result<()> {
    let snapshot = serde_json::to_string(&s.snapshot)?;
    self
      .execute(
        "INSERT INTO surat_keluar (
           id, nomor_surat, jenis_surat, penduduk_id, tanggal_cetak, keperluan,
           snapshot_json, pdf_url, created_by, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        vec![
          id(s.id),
          text(s.nomor_surat),
          code(s.jenis_surat),
          id(s.penduduk_id),
          text(encode_date(s.tanggal_cetak)),
          s.keperluan.into(),
          text(snapshot),
          s.pdf_url.into(),
          text(s.created_by),
          text(encode_dt(s.created_at)),
          text(encode_dt(s.updated_at)),
        ],
      )
      .await?;
    Ok(())
  }

  async fn update_letter(&self, s: Letter) -> Result<bool> {
    let snapshot = serde_json::to_string(&s.snapshot)?;
    self
      .execute(
        "UPDATE surat_keluar SET nomor_surat = ?2, jenis_surat = ?3, penduduk_id = ?4,
           tanggal_cetak = ?5, keperluan = ?6, snapshot_json = ?7, pdf_url = ?8,
           updated_at = ?9
         WHERE id = ?1",
        vec![
          id(s.id),
          text(s.nomor_surat),
          code(s.jenis_surat),
          id(s.penduduk_id),
          text(encode_date(s.tanggal_cetak)),
          s.keperluan.into(),
          text(snapshot),
          s.pdf_url.into(),
          text(encode_dt(s.updated_at)),
        ],
      )
      .await
  }

  async fn delete_letter(&self, letter: Uuid) -> Result<bool> {
    self
      .execute("DELETE FROM surat_keluar WHERE id = ?1", vec![id(letter)])
      .await
  }

  async fn get_letter(&self, letter: Uuid) -> Result<Option<Letter>> {
    let rows = self
      .select(
        format!("SELECT {LETTER_COLUMNS} FROM {LETTER_FROM} WHERE s.id = ?1"),
        vec![id(letter)],
        RawLetter::from_row,
        RawLetter::into_letter,
      )
      .await?;
    Ok(rows.into_iter().next())
  }

  async fn list_letters(&self, listing: Listing<LetterFilter>) -> Result<(Vec<Letter>, u64)> {
    let mut clause = Clause::default();
    clause
      .search(
        listing.search,
        "(s.nomor_surat LIKE ? OR json_extract(s.snapshot_json, '$.nama') LIKE ? \
          OR json_extract(s.snapshot_json, '$.nik') LIKE ?)",
      )
      .and_opt("s.jenis_surat = ?", listing.filter.jenis_surat.map(|j| j.to_string()))
      .and_opt("s.penduduk_id = ?", opt_id(listing.filter.penduduk_id));

    self
      .select_page(
        LETTER_COLUMNS,
        LETTER_FROM,
        clause,
        "s.tanggal_cetak DESC, s.created_at DESC",
        listing.window,
        RawLetter::from_row,
        RawLetter::into_letter,
      )
      .await
  }

  async fn all_letters(&self) -> Result<Vec<Letter>> {
    self
      .select(
        format!("SELECT {LETTER_COLUMNS} FROM {LETTER_FROM} ORDER BY s.created_at"),
        vec![],
        RawLetter::from_row,
        RawLetter::into_letter,
      )
      .await
  }

  async fn recent_letters(&self, limit: u64) -> Result<Vec<Letter>> {
    self
      .select(
        format!(
          "SELECT {LETTER_COLUMNS} FROM {LETTER_FROM}
           ORDER BY s.created_at DESC, s.rowid DESC LIMIT ?1"
        ),
        vec![Value::Integer(limit as i64)],
        RawLetter::from_row,
        RawLetter::into_letter,
      )
      .await
  }

  async fn count_letters_since(&self, since: NaiveDate) -> Result<Vec<(LetterKind, u64)>> {
    self
      .count_by(
        "jenis_surat",
        "SELECT jenis_surat, COUNT(*) FROM surat_keluar
         WHERE tanggal_cetak >= ?1 GROUP BY jenis_surat",
        vec![text(encode_date(since))],
      )
      .await
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn count_residents_by_status(&self) -> Result<Vec<(ResidentStatus, u64)>> {
    self
      .count_by(
        "status",
        "SELECT status, COUNT(*) FROM penduduk GROUP BY status",
        vec![],
      )
      .await
  }

  async fn count_living_by_sex(&self) -> Result<Vec<(JenisKelamin, u64)>> {
    self
      .count_by(
        "jenis_kelamin",
        "SELECT jenis_kelamin, COUNT(*) FROM penduduk WHERE status = ?1 GROUP BY jenis_kelamin",
        vec![code(ResidentStatus::Hidup)],
      )
      .await
  }

  async fn count_family_cards(&self) -> Result<u64> {
    self.count("SELECT COUNT(*) FROM kartu_keluarga", vec![]).await
  }

  async fn count_regions(&self) -> Result<u64> {
    self.count("SELECT COUNT(*) FROM wilayah", vec![]).await
  }

  // ── Roles ─────────────────────────────────────────────────────────────────

  async fn get_role(&self, user_id: String) -> Result<Option<UserRole>> {
    let rows = self
      .select(
        "SELECT user_id, role, updated_at FROM user_roles WHERE user_id = ?1".to_owned(),
        vec![text(user_id)],
        RawUserRole::from_row,
        RawUserRole::into_user_role,
      )
      .await?;
    Ok(rows.into_iter().next())
  }

  async fn put_role(&self, role: UserRole) -> Result<()> {
    self
      .execute(
        "INSERT INTO user_roles (user_id, role, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT (user_id) DO UPDATE SET role = excluded.role, updated_at = excluded.updated_at",
        vec![text(role.user_id), code(role.role), text(encode_dt(role.updated_at))],
      )
      .await?;
    Ok(())
  }

  async fn list_roles(&self) -> Result<Vec<UserRole>> {
    self
      .select(
        "SELECT user_id, role, updated_at FROM user_roles ORDER BY user_id".to_owned(),
        vec![],
        RawUserRole::from_row,
        RawUserRole::into_user_role,
      )
      .await
  }
}

/// The `SELECT <col> FROM <table> WHERE <col> IN` prefix and probed value
/// for single-column natural keys.
fn scalar_probe(key: &NaturalKey) -> Option<(&'static str, &str)> {
  match key {
    NaturalKey::Region { .. } => None,
    NaturalKey::NomorKk(n) => Some(("SELECT nomor_kk FROM kartu_keluarga WHERE nomor_kk IN", n)),
    NaturalKey::Nik(n) => Some(("SELECT nik FROM penduduk WHERE nik IN", n)),
    NaturalKey::NomorSurat(n) => {
      Some(("SELECT nomor_surat FROM surat_keluar WHERE nomor_surat IN", n))
    }
  }
}
