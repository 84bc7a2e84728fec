//! Error types for the warga-sheet codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("CSV writer error: {0}")]
  CsvWrite(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),

  #[error("workbook error: {0}")]
  Workbook(#[from] calamine::Error),

  #[error("workbook writer error: {0}")]
  WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

  #[error("file has no header row")]
  MissingHeader,

  #[error("{0} cannot be imported")]
  NotImportable(crate::Sheet),

  #[error(transparent)]
  Registry(#[from] warga_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
