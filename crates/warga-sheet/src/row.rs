//! Loosely-typed spreadsheet rows and header lookup.

use serde_json::{Map, Value};

use crate::{
  alias::Field,
  error::{Error, Result},
};

/// One data row: header → raw cell text, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
  cells: Vec<(String, String)>,
}

impl SheetRow {
  pub fn new(cells: impl IntoIterator<Item = (String, String)>) -> Self {
    Self { cells: cells.into_iter().collect() }
  }

  /// Build a row from a JSON object as sent by a browser-side spreadsheet
  /// reader. Numbers keep their JSON spelling (which may be scientific);
  /// `null` cells are dropped.
  pub fn from_json(object: Map<String, Value>) -> Self {
    let cells = object.into_iter().filter_map(|(header, value)| {
      let text = match value {
        Value::Null => return None,
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
      };
      Some((header, text))
    });
    Self::new(cells)
  }

  /// The trimmed, non-empty cell for `field`.
  ///
  /// Headers are matched exactly against the field's aliases first, then
  /// case-insensitively after trimming. A column headed `id` is never read.
  pub fn get(&self, field: &Field) -> Option<&str> {
    let candidates = || self.cells.iter().filter(|(h, _)| !h.trim().eq_ignore_ascii_case("id"));

    let exact = field
      .aliases
      .iter()
      .find_map(|alias| candidates().find(|(h, _)| h.as_str() == *alias));
    let loose = || {
      field.aliases.iter().find_map(|alias| {
        candidates().find(|(h, _)| h.trim().eq_ignore_ascii_case(alias.trim()))
      })
    };

    exact
      .or_else(loose)
      .map(|(_, v)| v.trim())
      .filter(|v| !v.is_empty())
  }

  pub(crate) fn is_blank(&self) -> bool { self.cells.iter().all(|(_, v)| v.trim().is_empty()) }
}

/// Parse a CSV document into rows, paired with their 0-based data-row index.
///
/// The first record is the header row. A UTF-8 byte-order mark is ignored,
/// and the delimiter is `;` when the header uses it instead of `,`.
/// Rows with only empty cells are skipped; the others keep their position so
/// that row errors point at the right spreadsheet line.
pub fn parse_csv(input: &[u8]) -> Result<Vec<(usize, SheetRow)>> {
  let input = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);
  let first_line = input.split(|&b| b == b'\n').next().unwrap_or_default();
  let delimiter = if !first_line.contains(&b',') && first_line.contains(&b';') {
    b';'
  } else {
    b','
  };

  let mut reader = csv::ReaderBuilder::new()
    .delimiter(delimiter)
    .flexible(true)
    .from_reader(input);

  let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
  if headers.iter().all(|h| h.trim().is_empty()) {
    return Err(Error::MissingHeader);
  }

  let mut rows = Vec::new();
  for (index, record) in reader.records().enumerate() {
    let record = record?;
    let row = SheetRow::new(
      headers
        .iter()
        .cloned()
        .zip(record.iter().map(str::to_owned)),
    );
    if !row.is_blank() {
      rows.push((index, row));
    }
  }
  Ok(rows)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alias;

  fn row(cells: &[(&str, &str)]) -> SheetRow {
    SheetRow::new(cells.iter().map(|(h, v)| (h.to_string(), v.to_string())))
  }

  #[test]
  fn exact_alias_wins_over_loose_match() {
    let r = row(&[("nama", "loose"), ("Nama", "exact")]);
    assert_eq!(r.get(&alias::NAMA), Some("exact"));
  }

  #[test]
  fn loose_match_ignores_case_and_padding() {
    let r = row(&[("  TEMPAT LAHIR ", " Bandung ")]);
    assert_eq!(r.get(&alias::TEMPAT_LAHIR), Some("Bandung"));
  }

  #[test]
  fn id_column_is_never_read() {
    let r = row(&[("ID", "123"), ("Nomor KK", "")]);
    assert_eq!(r.get(&alias::NOMOR_KK), None);
  }

  #[test]
  fn csv_with_semicolons_and_bom() {
    let input = "\u{feff}NIK;Nama\n3201010000000001;Budi\n;\n3201010000000002;Siti\n";
    let rows = parse_csv(input.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, 0);
    assert_eq!(rows[1].0, 2);
    assert_eq!(rows[1].1.get(&alias::NAMA), Some("Siti"));
  }

  #[test]
  fn json_cells_become_text() {
    let value = serde_json::json!({ "RT": 7, "Nama": "Budi", "x": null });
    let Value::Object(map) = value else { unreachable!() };
    let r = SheetRow::from_json(map);
    assert_eq!(r.get(&alias::RT), Some("7"));
    assert_eq!(r.cells.len(), 2);
  }
}
