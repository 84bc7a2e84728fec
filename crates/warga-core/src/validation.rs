//! Shared validation rules used by the per-entity input schemas.
//!
//! The schemas themselves live next to their entity (see
//! [`crate::resident::NewResident`] and friends) and derive
//! [`validator::Validate`]; this module holds the patterns and custom checks
//! they reference, plus the conversion into [`FieldErrors`].

use std::{borrow::Cow, sync::LazyLock};

use chrono::{Local, NaiveDate};
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{Error, FieldErrors, Result};

/// Exactly sixteen ASCII digits (NIK and nomor KK).
pub static SIXTEEN_DIGITS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d{16}$").expect("static pattern"));

/// One to three ASCII digits (RW and RT before padding).
pub static RW_RT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d{1,3}$").expect("static pattern"));

/// Residents whose marital status is anything but "belum kawin" must have
/// reached this age.
pub const MIN_MARRIED_AGE: u32 = 17;

/// The registry's notion of "today": the local calendar date.
pub fn today() -> NaiveDate { Local::now().date_naive() }

/// Rejects dates after [`today`].
pub fn not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
  if *date > today() {
    return Err(message("future_date", "Tanggal tidak boleh di masa depan"));
  }
  Ok(())
}

/// Rejects text made only of whitespace. Empty text is left to the
/// field's length rule so it is reported once.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
  if !value.is_empty() && value.trim().is_empty() {
    return Err(message("blank", "Tidak boleh hanya berisi spasi"));
  }
  Ok(())
}

/// Build a [`ValidationError`] with a fixed human-readable message.
pub fn message(code: &'static str, text: &'static str) -> ValidationError {
  ValidationError::new(code).with_message(Cow::Borrowed(text))
}

/// Whole years between `born` and `on`; zero when `born` is after `on`.
pub fn age_on(born: NaiveDate, on: NaiveDate) -> u32 {
  on.years_since(born).unwrap_or(0)
}

/// Flatten [`ValidationErrors`] into field → messages, sorted by field.
///
/// Struct-level checks are reported under the `__all__` key by `validator`.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
  let mut out = FieldErrors::new();
  for (field, list) in errors.field_errors() {
    let messages = list
      .iter()
      .map(|e| {
        e.message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| format!("{field} tidak valid ({})", e.code))
      })
      .collect();
    out.insert(field.to_string(), messages);
  }
  out
}

/// Run the schema on `input`, mapping failures to [`Error::Validation`].
pub fn check<T: Validate>(input: &T) -> Result<()> {
  input
    .validate()
    .map_err(|e| Error::Validation(field_errors(&e)))
}
