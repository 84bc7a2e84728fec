//! SQL schema for the Warga SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every natural key has a UNIQUE constraint so that concurrent writers that
/// both pass the registry's pre-check still cannot create a duplicate.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS wilayah (
    id          TEXT PRIMARY KEY,
    dusun       TEXT NOT NULL COLLATE NOCASE,
    rw          TEXT NOT NULL,                -- zero-padded to 3 digits
    rt          TEXT NOT NULL,                -- zero-padded to 3 digits
    desa        TEXT,
    kecamatan   TEXT,
    kabupaten   TEXT,
    provinsi    TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    UNIQUE (dusun, rw, rt)
);

CREATE TABLE IF NOT EXISTS kartu_keluarga (
    id                  TEXT PRIMARY KEY,
    nomor_kk            TEXT NOT NULL UNIQUE,
    wilayah_id          TEXT NOT NULL REFERENCES wilayah(id) ON DELETE RESTRICT,
    kepala_keluarga_id  TEXT REFERENCES penduduk(id) ON DELETE SET NULL,
    alamat              TEXT,
    scan_url            TEXT,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS penduduk (
    id                 TEXT PRIMARY KEY,
    nik                TEXT NOT NULL UNIQUE,
    kk_id              TEXT NOT NULL REFERENCES kartu_keluarga(id) ON DELETE RESTRICT,
    nama               TEXT NOT NULL,
    tempat_lahir       TEXT NOT NULL,
    tanggal_lahir      TEXT NOT NULL,     -- YYYY-MM-DD
    jenis_kelamin      TEXT NOT NULL,     -- 'L' | 'P'
    golongan_darah     TEXT,
    agama              TEXT NOT NULL,
    status_perkawinan  TEXT NOT NULL,
    hubungan_keluarga  TEXT NOT NULL,
    pendidikan         TEXT,
    pekerjaan          TEXT,
    nama_ayah          TEXT,
    nama_ibu           TEXT,
    status             TEXT NOT NULL DEFAULT 'HIDUP',
    created_at         TEXT NOT NULL,
    updated_at         TEXT NOT NULL
);

-- Append-only: no UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS mutasi_log (
    id                 TEXT PRIMARY KEY,
    penduduk_id        TEXT NOT NULL REFERENCES penduduk(id),
    jenis              TEXT NOT NULL,
    tanggal_peristiwa  TEXT NOT NULL,
    keterangan         TEXT,
    created_by         TEXT NOT NULL,
    created_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS surat_keluar (
    id             TEXT PRIMARY KEY,
    nomor_surat    TEXT NOT NULL UNIQUE,
    jenis_surat    TEXT NOT NULL,
    penduduk_id    TEXT NOT NULL REFERENCES penduduk(id),
    tanggal_cetak  TEXT NOT NULL,
    keperluan      TEXT,
    snapshot_json  TEXT NOT NULL,   -- resident data frozen at issue time
    pdf_url        TEXT,
    created_by     TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_roles (
    user_id     TEXT PRIMARY KEY,
    role        TEXT NOT NULL DEFAULT 'USER',
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS kartu_keluarga_wilayah_idx ON kartu_keluarga(wilayah_id);
CREATE INDEX IF NOT EXISTS penduduk_kk_idx            ON penduduk(kk_id);
CREATE INDEX IF NOT EXISTS penduduk_status_idx        ON penduduk(status);
CREATE INDEX IF NOT EXISTS penduduk_nama_idx          ON penduduk(nama);
CREATE INDEX IF NOT EXISTS mutasi_penduduk_idx        ON mutasi_log(penduduk_id);
CREATE INDEX IF NOT EXISTS mutasi_tanggal_idx         ON mutasi_log(tanggal_peristiwa);
CREATE INDEX IF NOT EXISTS surat_penduduk_idx         ON surat_keluar(penduduk_id);
CREATE INDEX IF NOT EXISTS surat_tanggal_idx          ON surat_keluar(tanggal_cetak);

PRAGMA user_version = 1;
";
