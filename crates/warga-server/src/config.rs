//! Runtime configuration: a TOML file layered with `WARGA_*` environment
//! variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use warga_core::registry::DEFAULT_IMPORT_BATCH;

use crate::{auth::Account, error::Result};

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Accounts allowed to sign in with HTTP Basic auth.
  #[serde(default)]
  pub accounts:          Vec<Account>,
  /// Usernames granted the ADMIN role at startup.
  #[serde(default)]
  pub admins:            Vec<String>,
  #[serde(default = "default_import_batch")]
  pub import_batch_size: usize,
}

fn default_import_batch() -> usize { DEFAULT_IMPORT_BATCH }

impl ServerConfig {
  /// Read `path` (optional) and the environment. `WARGA_PORT=9000`
  /// overrides `port`.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("WARGA"))
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The store path with a leading `~` expanded to the home directory.
  pub fn expanded_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
