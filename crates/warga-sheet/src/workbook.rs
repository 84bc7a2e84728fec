//! Excel and OpenDocument uploads (`.xlsx`, `.xls`, `.xlsb`, `.ods`).
//!
//! Only the first worksheet is read. Its first row is the header row.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::{
  error::{Error, Result},
  row::SheetRow,
};

/// Parse the first worksheet of a workbook into rows, paired with their
/// 0-based data-row index. Blank rows are skipped but keep their position.
pub fn parse_workbook(input: &[u8]) -> Result<Vec<(usize, SheetRow)>> {
  let mut workbook = open_workbook_auto_from_rs(Cursor::new(input.to_vec()))?;
  let range = workbook.worksheet_range_at(0).ok_or(Error::MissingHeader)??;

  let mut lines = range.rows();
  let headers: Vec<String> = lines
    .next()
    .ok_or(Error::MissingHeader)?
    .iter()
    .map(cell_text)
    .collect();
  if headers.iter().all(|h| h.trim().is_empty()) {
    return Err(Error::MissingHeader);
  }

  Ok(
    lines
      .enumerate()
      .map(|(index, cells)| {
        let row = SheetRow::new(headers.iter().cloned().zip(cells.iter().map(cell_text)));
        (index, row)
      })
      .filter(|(_, row)| !row.is_blank())
      .collect(),
  )
}

/// Cell text as the coercion layer expects it. Date cells become their
/// serial day number.
fn cell_text(cell: &Data) -> String {
  match cell {
    Data::Empty | Data::Error(_) => String::new(),
    Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    Data::Int(i) => i.to_string(),
    Data::Float(f) => f.to_string(),
    Data::Bool(b) => b.to_string(),
    Data::DateTime(dt) => dt.as_f64().to_string(),
  }
}
