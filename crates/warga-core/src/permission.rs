//! Static permission table keyed by (role, resource, action).

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use crate::role::Role;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
  Region,
  FamilyCard,
  Resident,
  Mutation,
  Letter,
  Dashboard,
  Import,
  Export,
  Backup,
  Settings,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
  Read,
  Create,
  Update,
  Delete,
}

/// Whether `role` may perform `action` on `resource`.
pub fn allows(role: Role, resource: Resource, action: Action) -> bool {
  use Action::*;
  use Resource::*;

  match role {
    Role::Admin => true,
    Role::Operator => match resource {
      Region | FamilyCard | Mutation => matches!(action, Read | Create | Update),
      Resident | Letter => true,
      Dashboard | Export => action == Read,
      Import => action == Create,
      Backup | Settings => false,
    },
    Role::User => {
      action == Read
        && matches!(
          resource,
          Region | FamilyCard | Resident | Mutation | Letter | Dashboard
        )
    }
  }
}

/// Everything `role` may do, for the settings screen.
pub fn grants(role: Role) -> Vec<(Resource, Action)> {
  use strum::IntoEnumIterator as _;

  Resource::iter()
    .flat_map(|r| Action::iter().map(move |a| (r, a)))
    .filter(|&(r, a)| allows(role, r, a))
    .collect()
}
