//! Handler for `POST /import/{entity}`.
//!
//! The body is a CSV file (`Content-Type: text/csv`), an Excel workbook
//! (`.xlsx` or `.xls` content types, or `application/octet-stream`) or a
//! JSON array of row objects keyed by header, as produced by browser-side
//! spreadsheet readers. `entity` is `regions`, `family-cards` or `residents`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, header},
};
use bytes::Bytes;
use serde_json::{Map, Value};
use warga_core::{Registry, import::ImportReport, store::RegistryStore};
use warga_sheet::{Sheet, SheetRow, parse_csv, parse_workbook};

use crate::{error::ApiError, extract::CurrentActor};

const WORKBOOK_TYPES: &[&str] = &[
  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
  "application/vnd.ms-excel",
  "application/vnd.oasis.opendocument.spreadsheet",
  "application/octet-stream",
];

enum Upload {
  Csv,
  Workbook,
  Json,
}

fn upload_kind(headers: &HeaderMap) -> Upload {
  let content_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default();
  if content_type.starts_with("text/csv") || content_type.starts_with("text/plain") {
    Upload::Csv
  } else if WORKBOOK_TYPES.iter().any(|t| content_type.starts_with(t)) {
    Upload::Workbook
  } else {
    Upload::Json
  }
}

fn json_rows(body: &[u8]) -> Result<Vec<(usize, SheetRow)>, ApiError> {
  let objects: Vec<Map<String, Value>> =
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  Ok(objects.into_iter().map(SheetRow::from_json).enumerate().collect())
}

/// `POST /import/{entity}`
pub async fn handler<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(entity): Path<String>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<ImportReport>, ApiError> {
  let sheet: Sheet = entity
    .parse()
    .map_err(|_| ApiError::NotFound(format!("no such sheet: {entity}")))?;
  let rows = match upload_kind(&headers) {
    Upload::Csv => parse_csv(&body)?,
    Upload::Workbook => parse_workbook(&body)?,
    Upload::Json => json_rows(&body)?,
  };
  Ok(Json(warga_sheet::import(&*registry, &actor, sheet, rows).await?))
}
