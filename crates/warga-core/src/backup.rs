//! The full-registry backup document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  family_card::FamilyCard, letter::Letter, mutation::Mutation, region::Region,
  resident::Resident, role::UserRole,
};

/// Row counts per table, recorded alongside the data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupCounts {
  pub regions:      usize,
  pub family_cards: usize,
  pub residents:    usize,
  pub mutations:    usize,
  pub letters:      usize,
  pub user_roles:   usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupMetadata {
  pub exported_at: DateTime<Utc>,
  pub exported_by: String,
  pub counts:      BackupCounts,
}

/// Every table of the registry in one JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
  pub metadata:     BackupMetadata,
  pub regions:      Vec<Region>,
  pub family_cards: Vec<FamilyCard>,
  pub residents:    Vec<Resident>,
  pub mutations:    Vec<Mutation>,
  pub letters:      Vec<Letter>,
  pub user_roles:   Vec<UserRole>,
}

impl Backup {
  pub fn new(
    exported_by: &str,
    regions: Vec<Region>,
    family_cards: Vec<FamilyCard>,
    residents: Vec<Resident>,
    mutations: Vec<Mutation>,
    letters: Vec<Letter>,
    user_roles: Vec<UserRole>,
  ) -> Self {
    let counts = BackupCounts {
      regions:      regions.len(),
      family_cards: family_cards.len(),
      residents:    residents.len(),
      mutations:    mutations.len(),
      letters:      letters.len(),
      user_roles:   user_roles.len(),
    };
    Self {
      metadata: BackupMetadata {
        exported_at: Utc::now(),
        exported_by: exported_by.to_owned(),
        counts,
      },
      regions,
      family_cards,
      residents,
      mutations,
      letters,
      user_roles,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::role::Role;

  #[test]
  fn counts_follow_the_tables() {
    let roles = vec![UserRole {
      user_id:    "siti".into(),
      role:       Role::Operator,
      updated_at: Utc::now(),
    }];
    let backup = Backup::new("admin", vec![], vec![], vec![], vec![], vec![], roles);

    assert_eq!(backup.metadata.counts.user_roles, 1);
    assert_eq!(backup.metadata.counts.residents, 0);

    let json = serde_json::to_value(&backup).unwrap();
    assert_eq!(json["metadata"]["exported_by"], "admin");
    assert_eq!(json["user_roles"][0]["role"], "OPERATOR");
  }
}
