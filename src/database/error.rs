use error_stack::Report;
use thiserror::Error;

/// Database related errors
#[derive(Debug, Error)]
pub enum Error {
  /// The configured connection url cannot be understood by the driver.
  #[error("invalid connection url")]
  InvalidUrl,
  /// An error caused by an [`sqlx`] error.
  #[error("received a pool error: {0}")]
  Internal(sqlx::Error),
  /// Pending migrations could not be applied.
  #[error("could not apply migrations")]
  Migration,
  /// The database file is opened read-only and should not
  /// perform any writes.
  #[error("database is currently in read mode")]
  Readonly,
  /// The pool does not have a reliable connection to the database.
  #[error("unhealthy database pool")]
  UnhealthyPool,
}

/// Converts from a generic [sqlx] result into a [database compatible error](Error).
pub trait ErrorExt<T> {
  fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
  fn into_db_error(self) -> Result<T> {
    self.map_err(|e| match &e {
      sqlx::Error::Database(err) if err.message().contains("readonly database") => {
        Report::new(e).change_context(Error::Readonly)
      }
      sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
        Report::new(e).change_context(Error::UnhealthyPool)
      }
      _ => Report::new(Error::Internal(e)),
    })
  }
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a database error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

/// Looking into `Report<Error>` for a specific variant is
/// annoying without this:
///
/// ```rust,ignore
/// let is_unhealthy = report.downcast_ref::<database::Error>()
///   .map(|v| matches!(v, database::Error::UnhealthyPool))
///   .unwrap_or_default();
/// ```
pub trait ErrorExt2 {
  fn is_unhealthy(&self) -> bool;
  fn is_readonly(&self) -> bool;
}

impl ErrorExt2 for error_stack::Report<Error> {
  fn is_unhealthy(&self) -> bool {
    self
      .downcast_ref::<Error>()
      .map(|v| matches!(v, Error::UnhealthyPool))
      .unwrap_or_default()
  }

  fn is_readonly(&self) -> bool {
    self
      .downcast_ref::<Error>()
      .map(|v| matches!(v, Error::Readonly))
      .unwrap_or_default()
  }
}
