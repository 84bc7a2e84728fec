//! Handlers for `GET /export/{entity}.{csv,xlsx}` and `GET /backup`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::header,
  response::IntoResponse,
};
use chrono::Utc;
use warga_core::{Registry, store::RegistryStore};
use warga_sheet::{FileFormat, Sheet};

use crate::{error::ApiError, extract::CurrentActor};

fn attachment(name: &str) -> String { format!("attachment; filename=\"{name}\"") }

/// `regions.xlsx` → (`Regions`, `Xlsx`).
fn parse_file_name(file: &str) -> Option<(Sheet, FileFormat)> {
  let (name, extension) = file.rsplit_once('.')?;
  Some((name.parse().ok()?, extension.parse().ok()?))
}

/// `GET /export/{entity}.csv` or `GET /export/{entity}.xlsx`
pub async fn file<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
  Path(file): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  let (sheet, format) = parse_file_name(&file)
    .ok_or_else(|| ApiError::NotFound(format!("no such export: {file}")))?;
  let body = warga_sheet::export(&*registry, &actor, sheet, format).await?;
  let name = format!("{sheet}-{}.{format}", Utc::now().format("%Y-%m-%d"));
  Ok((
    [
      (header::CONTENT_TYPE, format.content_type().to_owned()),
      (header::CONTENT_DISPOSITION, attachment(&name)),
    ],
    body,
  ))
}

/// `GET /backup`: the whole registry as one JSON document.
pub async fn backup<S: RegistryStore>(
  State(registry): State<Arc<Registry<S>>>,
  CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, ApiError> {
  let backup = registry.backup(&actor).await?;
  let name = format!("warga-backup-{}.json", backup.metadata.exported_at.format("%Y-%m-%d"));
  Ok(([(header::CONTENT_DISPOSITION, attachment(&name))], Json(backup)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn export_file_names() {
    assert_eq!(
      parse_file_name("family-cards.xlsx"),
      Some((Sheet::FamilyCards, FileFormat::Xlsx))
    );
    assert_eq!(parse_file_name("letters.csv"), Some((Sheet::Letters, FileFormat::Csv)));
    assert_eq!(parse_file_name("letters.pdf"), None);
    assert_eq!(parse_file_name("people.csv"), None);
    assert_eq!(parse_file_name("regions"), None);
  }
}
