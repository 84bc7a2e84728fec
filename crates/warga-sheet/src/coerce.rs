//! Cell value coercion: identifiers, dates and code-table labels as they
//! come out of spreadsheet software.

use std::str::FromStr;

use chrono::{Days, NaiveDate};

/// Day zero of spreadsheet date serials (the 1900 system, leap-bug adjusted).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Longest identifier a scientific-notation cell may expand to.
const MAX_EXPANDED_DIGITS: usize = 20;

/// Serials beyond 9999-12-31 are not dates.
const MAX_SERIAL: f64 = 2_958_465.0;

/// Clean up a numeric identifier (NIK, nomor KK, RW, RT).
///
/// Spaces and quotes are removed, scientific notation is expanded and a
/// trailing `.0` left by a numeric cell is dropped.
pub fn identifier(raw: &str) -> String {
  let cleaned: String = raw
    .chars()
    .filter(|c| !c.is_whitespace() && !matches!(c, '\'' | '"' | '`'))
    .collect();
  let expanded = expand_scientific(&cleaned).unwrap_or(cleaned);
  match expanded.strip_suffix(".0") {
    Some(head) if !head.is_empty() && head.bytes().all(|b| b.is_ascii_digit()) => head.to_owned(),
    _ => expanded,
  }
}

/// `3.2010101E+15` → `3201010100000000`. Only expansions that land on a
/// whole number are accepted.
fn expand_scientific(s: &str) -> Option<String> {
  let (mantissa, exponent) = s.split_once(['e', 'E'])?;
  let exponent: usize = exponent.strip_prefix('+').unwrap_or(exponent).parse().ok()?;
  let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
  if whole.is_empty()
    || !whole.bytes().all(|b| b.is_ascii_digit())
    || !fraction.bytes().all(|b| b.is_ascii_digit())
    || fraction.len() > exponent
    || exponent > MAX_EXPANDED_DIGITS
    || whole.len() + exponent > MAX_EXPANDED_DIGITS
  {
    return None;
  }
  let digits = format!("{whole}{fraction}{}", "0".repeat(exponent - fraction.len()));
  let digits = digits.trim_start_matches('0');
  Some(if digits.is_empty() { "0".to_owned() } else { digits.to_owned() })
}

/// Parse a date cell: `YYYY-MM-DD` (optionally followed by a time),
/// `DD/MM/YYYY`, `DD-MM-YYYY`, or a spreadsheet serial day number.
pub fn date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
  for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"] {
    if let Ok(d) = NaiveDate::parse_from_str(date_part, format) {
      return Some(d);
    }
  }
  serial(raw)
}

fn serial(raw: &str) -> Option<NaiveDate> {
  let value: f64 = raw.parse().ok()?;
  if !(1.0..=MAX_SERIAL).contains(&value) {
    return None;
  }
  let (y, m, d) = SERIAL_EPOCH;
  NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(value.floor() as u64))
}

/// Parse a code-table cell.
///
/// The cell is tried as a code first (`BELUM_KAWIN`, `Belum Kawin` and
/// `belum-kawin` all qualify), then against `labels` case-insensitively.
pub fn code<T: FromStr + Copy>(raw: &str, labels: &[(&str, T)]) -> Option<T> {
  let normalized: String = raw
    .trim()
    .chars()
    .map(|c| if c == ' ' || c == '-' { '_' } else { c })
    .collect();
  normalized.parse().ok().or_else(|| {
    labels
      .iter()
      .find(|(label, _)| label.eq_ignore_ascii_case(raw.trim()))
      .map(|&(_, value)| value)
  })
}

#[cfg(test)]
mod tests {
  use warga_core::resident::{JenisKelamin, StatusPerkawinan};

  use super::*;

  #[test]
  fn identifiers_lose_spreadsheet_artifacts() {
    assert_eq!(identifier(" 3201 0100 0000 0001 "), "3201010000000001");
    assert_eq!(identifier("'3201010000000001"), "3201010000000001");
    assert_eq!(identifier("7.0"), "7");
    assert_eq!(identifier("3.2010101E+15"), "3201010100000000");
    assert_eq!(identifier("3.201010000000001e15"), "3201010000000001");
    assert_eq!(identifier("12a"), "12a");
  }

  #[test]
  fn oversized_exponents_are_left_alone() {
    assert_eq!(identifier("1E999999999999"), "1E999999999999");
    assert_eq!(identifier("1e25"), "1e25");
    assert_eq!(identifier("1E18446744073709551615"), "1E18446744073709551615");
    assert_eq!(identifier("9e19"), "90000000000000000000");
  }

  #[test]
  fn dates_in_several_notations() {
    let expected = NaiveDate::from_ymd_opt(1990, 5, 1);
    assert_eq!(date("1990-05-01"), expected);
    assert_eq!(date("1990-05-01T00:00:00.000Z"), expected);
    assert_eq!(date("01/05/1990"), expected);
    assert_eq!(date("01-05-1990"), expected);
    assert_eq!(date("32994"), expected);
    assert_eq!(date("32994.5"), expected);
    assert_eq!(date("kemarin"), None);
    assert_eq!(date("0"), None);
  }

  #[test]
  fn codes_and_labels() {
    let labels = [("Laki-laki", JenisKelamin::LakiLaki), ("Perempuan", JenisKelamin::Perempuan)];
    assert_eq!(code("l", &labels), Some(JenisKelamin::LakiLaki));
    assert_eq!(code("LAKI-LAKI", &labels), Some(JenisKelamin::LakiLaki));
    assert_eq!(code("perempuan", &labels), Some(JenisKelamin::Perempuan));
    assert_eq!(code::<StatusPerkawinan>("Belum Kawin", &[]), Some(StatusPerkawinan::BelumKawin));
    assert_eq!(code::<StatusPerkawinan>("cerai-mati", &[]), Some(StatusPerkawinan::CeraiMati));
    assert_eq!(code::<StatusPerkawinan>("duda", &[]), None);
  }
}
