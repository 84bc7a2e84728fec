//! Dashboard statistics, folded from independent count queries.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;

use crate::{
  letter::{Letter, LetterKind},
  mutation::{Mutation, MutationKind},
  resident::{JenisKelamin, ResidentStatus},
};

/// How many recent mutations and letters the dashboard shows.
pub const RECENT_LIMIT: u64 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
  pub hidup:     u64,
  pub meninggal: u64,
  pub pindah:    u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexBreakdown {
  pub laki_laki: u64,
  pub perempuan: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
  /// Living residents.
  pub total_penduduk:   u64,
  pub total_kk:         u64,
  pub total_wilayah:    u64,
  pub status:           StatusBreakdown,
  /// Living residents per sex.
  pub jenis_kelamin:    SexBreakdown,
  /// First day of the month the monthly counters cover.
  pub periode_mulai:    NaiveDate,
  /// Mutations this month, keyed by kind code; every kind is present.
  pub mutasi_bulan_ini: BTreeMap<String, u64>,
  /// Letters printed this month, keyed by kind code; every kind is present.
  pub surat_bulan_ini:  BTreeMap<String, u64>,
  pub mutasi_terbaru:   Vec<Mutation>,
  pub surat_terbaru:    Vec<Letter>,
}

/// Raw query results the dashboard is folded from.
pub struct DashboardInputs {
  pub by_status:        Vec<(ResidentStatus, u64)>,
  pub by_sex:           Vec<(JenisKelamin, u64)>,
  pub family_cards:     u64,
  pub regions:          u64,
  pub mutations:        Vec<(MutationKind, u64)>,
  pub letters:          Vec<(LetterKind, u64)>,
  pub recent_mutations: Vec<Mutation>,
  pub recent_letters:   Vec<Letter>,
}

impl DashboardStats {
  pub fn fold(inputs: DashboardInputs, periode_mulai: NaiveDate) -> Self {
    let mut status = StatusBreakdown::default();
    for (s, n) in inputs.by_status {
      match s {
        ResidentStatus::Hidup => status.hidup += n,
        ResidentStatus::Meninggal => status.meninggal += n,
        ResidentStatus::Pindah => status.pindah += n,
      }
    }

    let mut sex = SexBreakdown::default();
    for (s, n) in inputs.by_sex {
      match s {
        JenisKelamin::LakiLaki => sex.laki_laki += n,
        JenisKelamin::Perempuan => sex.perempuan += n,
      }
    }

    let mut mutasi: BTreeMap<String, u64> =
      MutationKind::iter().map(|k| (k.as_ref().to_owned(), 0)).collect();
    for (k, n) in inputs.mutations {
      *mutasi.entry(k.as_ref().to_owned()).or_default() += n;
    }

    let mut surat: BTreeMap<String, u64> =
      LetterKind::iter().map(|k| (k.as_ref().to_owned(), 0)).collect();
    for (k, n) in inputs.letters {
      *surat.entry(k.as_ref().to_owned()).or_default() += n;
    }

    Self {
      total_penduduk: status.hidup,
      total_kk: inputs.family_cards,
      total_wilayah: inputs.regions,
      status,
      jenis_kelamin: sex,
      periode_mulai,
      mutasi_bulan_ini: mutasi,
      surat_bulan_ini: surat,
      mutasi_terbaru: inputs.recent_mutations,
      surat_terbaru: inputs.recent_letters,
    }
  }
}

/// The first day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fold_fills_every_kind_and_sums_status() {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let stats = DashboardStats::fold(
      DashboardInputs {
        by_status:        vec![(ResidentStatus::Hidup, 7), (ResidentStatus::Pindah, 2)],
        by_sex:           vec![(JenisKelamin::LakiLaki, 4), (JenisKelamin::Perempuan, 3)],
        family_cards:     3,
        regions:          2,
        mutations:        vec![(MutationKind::Lahir, 1)],
        letters:          vec![],
        recent_mutations: vec![],
        recent_letters:   vec![],
      },
      start,
    );
    assert_eq!(stats.total_penduduk, 7);
    assert_eq!(stats.status.pindah, 2);
    assert_eq!(stats.jenis_kelamin.perempuan, 3);
    assert_eq!(stats.mutasi_bulan_ini["LAHIR"], 1);
    assert_eq!(stats.mutasi_bulan_ini["MENINGGAL"], 0);
    assert_eq!(stats.surat_bulan_ini.len(), LetterKind::iter().count());
  }

  #[test]
  fn month_start_is_first_day() {
    let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(month_start(d), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
  }
}
