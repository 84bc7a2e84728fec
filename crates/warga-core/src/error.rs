//! Error types for `warga-core`.
//!
//! Every registry operation returns one of these as a value; nothing in the
//! service layer panics or retries.

use std::collections::BTreeMap;

use thiserror::Error;
use uuid::Uuid;

use crate::{
  permission::{Action, Resource},
  role::Role,
};

/// Field name → human-readable messages, ordered by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum Error {
  /// No authenticated identity accompanied the call.
  #[error("Unauthorized")]
  Unauthorized,

  #[error("role {role} may not {action} {resource}")]
  Forbidden {
    role:     Role,
    resource: Resource,
    action:   Action,
  },

  #[error("{}", summarize(.0))]
  Validation(FieldErrors),

  /// A natural key (NIK, nomor KK, Dusun/RW/RT, nomor surat) is taken.
  #[error("{0}")]
  Duplicate(String),

  /// Deletion refused because dependent rows still reference the target.
  #[error("{0}")]
  InUse(String),

  #[error("{entity} {id} tidak ditemukan")]
  NotFound { entity: &'static str, id: Uuid },

  #[error("{message}")]
  Store {
    message: String,
    code:    Option<String>,
  },
}

impl Error {
  /// Build a validation error carrying a single field message.
  pub fn field(field: &str, message: impl Into<String>) -> Self {
    let mut fields = FieldErrors::new();
    fields.insert(field.to_owned(), vec![message.into()]);
    Self::Validation(fields)
  }

  /// All messages of a validation error flattened in field order; other
  /// variants yield their display string.
  pub fn messages(&self) -> Vec<String> {
    match self {
      Self::Validation(fields) => fields.values().flatten().cloned().collect(),
      other => vec![other.to_string()],
    }
  }
}

fn summarize(fields: &FieldErrors) -> String {
  fields
    .values()
    .flatten()
    .cloned()
    .collect::<Vec<_>>()
    .join("; ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validation_display_joins_messages_in_field_order() {
    let mut fields = FieldErrors::new();
    fields.insert("nik".into(), vec!["NIK harus 16 digit".into()]);
    fields.insert("nama".into(), vec!["Nama wajib diisi".into()]);
    let err = Error::Validation(fields);
    assert_eq!(err.to_string(), "Nama wajib diisi; NIK harus 16 digit");
  }

  #[test]
  fn field_helper_builds_single_entry() {
    let err = Error::field("kk_id", "Kartu Keluarga tidak ditemukan");
    assert_eq!(err.messages(), vec!["Kartu Keluarga tidak ditemukan"]);
  }
}
