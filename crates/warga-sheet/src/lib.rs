//! Spreadsheet codec for Warga.
//!
//! Turns CSV files, Excel workbooks (or rows already parsed by a
//! browser-side spreadsheet reader) into registry inputs, and registry
//! contents back into CSV or Excel.

pub mod alias;
pub mod coerce;
pub mod error;
pub mod export;
pub mod map;
pub mod row;
pub mod workbook;

#[cfg(test)]
mod tests;

use strum::{Display, EnumString};
use tracing::debug;
use warga_core::{Actor, Registry, import::ImportReport, store::RegistryStore};

pub use self::{
  error::{Error, Result},
  row::{SheetRow, parse_csv},
  workbook::parse_workbook,
};

/// The entity a sheet holds, as named in URLs (`family-cards`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Sheet {
  Regions,
  FamilyCards,
  Residents,
  Mutations,
  Letters,
}

impl Sheet {
  /// Worksheet name used in exported workbooks.
  pub fn title(self) -> &'static str {
    match self {
      Self::Regions => "Wilayah",
      Self::FamilyCards => "Kartu Keluarga",
      Self::Residents => "Penduduk",
      Self::Mutations => "Mutasi",
      Self::Letters => "Surat Keluar",
    }
  }
}

/// Export file format, named by its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FileFormat {
  Csv,
  Xlsx,
}

impl FileFormat {
  pub fn content_type(self) -> &'static str {
    match self {
      Self::Csv => "text/csv; charset=utf-8",
      Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    }
  }
}

/// Map `rows` onto `sheet`'s create input and import them.
///
/// Rows carry their 0-based data-row index so that errors name the
/// spreadsheet line. Mutations and letters are export-only.
pub async fn import<S: RegistryStore>(
  registry: &Registry<S>,
  actor: &Actor,
  sheet: Sheet,
  rows: Vec<(usize, SheetRow)>,
) -> Result<ImportReport> {
  debug!(%sheet, rows = rows.len(), "mapping sheet rows");
  let report = match sheet {
    Sheet::Regions => {
      let drafts = rows.iter().map(|(i, row)| map::region_draft(*i, row)).collect();
      registry.import_regions(actor, drafts).await?
    }
    Sheet::FamilyCards => {
      let refs = registry.import_context(actor).await?;
      let drafts = rows
        .iter()
        .map(|(i, row)| map::family_card_draft(*i, row, &refs))
        .collect();
      registry.import_family_cards(actor, drafts).await?
    }
    Sheet::Residents => {
      let refs = registry.import_context(actor).await?;
      let drafts = rows
        .iter()
        .map(|(i, row)| map::resident_draft(*i, row, &refs))
        .collect();
      registry.import_residents(actor, drafts).await?
    }
    other => return Err(Error::NotImportable(other)),
  };
  Ok(report)
}

/// Render every record of `sheet` in `format`.
pub async fn export<S: RegistryStore>(
  registry: &Registry<S>,
  actor: &Actor,
  sheet: Sheet,
  format: FileFormat,
) -> Result<Vec<u8>> {
  let table = match sheet {
    Sheet::Regions => export::regions_table(&registry.export_regions(actor).await?),
    Sheet::FamilyCards => export::family_cards_table(&registry.export_family_cards(actor).await?),
    Sheet::Residents => {
      let (residents, cards) = futures::try_join!(
        registry.export_residents(actor),
        registry.export_family_cards(actor)
      )?;
      export::residents_table(&residents, &cards)
    }
    Sheet::Mutations => {
      let (mutations, residents) = futures::try_join!(
        registry.export_mutations(actor),
        registry.export_residents(actor)
      )?;
      export::mutations_table(&mutations, &residents)
    }
    Sheet::Letters => export::letters_table(&registry.export_letters(actor).await?),
  };
  debug!(%sheet, %format, rows = table.rows.len(), "rendering export");
  match format {
    FileFormat::Csv => table.to_csv(),
    FileFormat::Xlsx => table.to_xlsx(sheet.title()),
  }
}
