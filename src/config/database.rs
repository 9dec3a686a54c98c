use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::{Validate, ValidateError};

use crate::util::Sensitive;

/// Configuration for connecting to the SQLite database
#[derive(Debug, Deserialize)]
pub struct Database {
  /// Connection URL of the database.
  ///
  /// **Environment variables**:
  /// - `YATUBE_DB_URL` or `DATABASE_URL`
  pub url: Sensitive<String>,
  /// Minimum idle database connections kept open.
  ///
  /// **Environment variables**:
  /// - `YATUBE_DB_MIN_IDLE`
  pub min_idle: Option<NonZeroU32>,
  /// Maximum amount of pool size that database can handle
  ///
  /// **Environment variables**:
  /// - `YATUBE_DB_POOL_SIZE`
  #[serde(default = "Database::default_pool_size")]
  pub pool_size: NonZeroU32,
  /// How long this server can wait for a connection to be
  /// acquired from the pool.
  ///
  /// **Environment variables**:
  /// - `YATUBE_DB_TIMEOUT_SECS`
  #[serde(default = "Database::default_timeout_secs")]
  pub timeout_secs: NonZeroU64,
  /// Apply pending migrations when the server starts.
  ///
  /// **Environment variables**:
  /// - `YATUBE_DB_RUN_MIGRATIONS`
  #[serde(default = "Database::default_run_migrations")]
  pub run_migrations: bool,
}

impl Validate for Database {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if !validator::extras::validate_url(self.url.as_str()) {
      fields.push_message("url", "Invalid database connection URL");
    }
    fields.build().into_result()
  }
}

impl Database {
  const DEFAULT_POOL_SIZE: u32 = 5;
  const DEFAULT_TIMEOUT_SECS: u64 = 5;

  // Required by serde
  const fn default_pool_size() -> NonZeroU32 {
    match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
      Some(n) => n,
      None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
    }
  }

  const fn default_timeout_secs() -> NonZeroU64 {
    match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
      Some(n) => n,
      None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
    }
  }

  const fn default_run_migrations() -> bool {
    true
  }
}
