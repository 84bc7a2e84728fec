//! Error type for `warga-store-sqlite`.

use rusqlite::ffi;
use thiserror::Error;
use warga_core::store::{KeyKind, StoreError};

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A code column held a value outside its code table.
  #[error("unknown {column} code: {value:?}")]
  UnknownCode { column: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  fn sqlite_failure(&self) -> Option<(&ffi::Error, Option<&str>)> {
    match self {
      Self::Database(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
        err,
        message,
      ))) => Some((err, message.as_deref())),
      _ => None,
    }
  }
}

impl StoreError for Error {
  fn violated_key(&self) -> Option<KeyKind> {
    let (err, message) = self.sqlite_failure()?;
    if err.extended_code != ffi::SQLITE_CONSTRAINT_UNIQUE {
      return None;
    }
    unique_key_of(message?)
  }

  fn code(&self) -> Option<String> {
    self
      .sqlite_failure()
      .map(|(err, _)| format!("SQLITE_{}", err.extended_code))
  }
}

/// Map SQLite's `UNIQUE constraint failed: <table>.<column>[, ...]` message
/// onto the natural key it guards.
fn unique_key_of(message: &str) -> Option<KeyKind> {
  let columns = message.strip_prefix("UNIQUE constraint failed: ")?;
  let first = columns.split(',').next()?.trim();
  match first {
    "wilayah.dusun" => Some(KeyKind::Region),
    "kartu_keluarga.nomor_kk" => Some(KeyKind::NomorKk),
    "penduduk.nik" => Some(KeyKind::Nik),
    "surat_keluar.nomor_surat" => Some(KeyKind::NomorSurat),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unique_messages_map_to_keys() {
    assert_eq!(unique_key_of("UNIQUE constraint failed: penduduk.nik"), Some(KeyKind::Nik));
    assert_eq!(
      unique_key_of("UNIQUE constraint failed: wilayah.dusun, wilayah.rw, wilayah.rt"),
      Some(KeyKind::Region)
    );
    assert_eq!(unique_key_of("UNIQUE constraint failed: user_roles.user_id"), None);
    assert_eq!(unique_key_of("FOREIGN KEY constraint failed"), None);
  }
}
