//! User roles and the acting identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Access level assigned to a user.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
  Admin,
  Operator,
  /// Read-only; also the role of any user without a `user_roles` row.
  #[default]
  User,
}

/// A row of the `user_roles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
  pub user_id:    String,
  pub role:       Role,
  pub updated_at: DateTime<Utc>,
}

/// The authenticated identity on whose behalf an operation runs.
///
/// Produced by the session boundary (HTTP auth in `warga-server`); the
/// registry never authenticates on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub user_id: String,
}

impl Actor {
  pub fn new(user_id: impl Into<String>) -> Self {
    Self { user_id: user_id.into() }
  }
}
