use error_stack::{Report, ResultExt};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};

use crate::config;

pub mod error;
pub use error::*;

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Sqlite>;
pub type Connection = sqlx::SqliteConnection;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct Pool {
  pool: sqlx::SqlitePool,
}

impl Pool {
  #[tracing::instrument(name = "db.pool.new", skip_all)]
  pub async fn new(cfg: &config::Database) -> Result<Self> {
    let mut pool_opts = SqlitePoolOptions::new()
      .acquire_timeout(Duration::from_secs(cfg.timeout_secs.get()))
      .max_connections(cfg.pool_size.get());

    if let Some(min_idle) = cfg.min_idle {
      pool_opts = pool_opts.min_connections(min_idle.get());
    }

    let connect_opts = SqliteConnectOptions::from_str(cfg.url.as_str())
      .change_context(Error::InvalidUrl)?
      .create_if_missing(true)
      .foreign_keys(true)
      .busy_timeout(Duration::from_secs(cfg.timeout_secs.get()));

    let pool = Self {
      pool: pool_opts.connect_lazy_with(connect_opts),
    };

    match pool.wait_until_healthy().await {
      Ok(..) => {}
      Err(err) if err.is_unhealthy() => {
        tracing::warn!("database is not reachable yet, continuing anyway");
      }
      Err(err) => return Err(err),
    }

    if cfg.run_migrations {
      pool.migrate().await?;
    }

    Ok(pool)
  }

  /// Single-connection in-memory database with every migration
  /// applied. The connection never expires, otherwise the data would
  /// vanish with it.
  #[cfg(test)]
  pub async fn in_memory() -> Result<Self> {
    let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")
      .change_context(Error::InvalidUrl)?
      .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .min_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .acquire_timeout(Duration::from_secs(5))
      .connect_with(connect_opts)
      .await
      .into_db_error()?;

    let pool = Self { pool };
    pool.migrate().await?;
    Ok(pool)
  }
}

impl std::fmt::Debug for Pool {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.pool.fmt(f)
  }
}

impl Pool {
  #[tracing::instrument(name = "db.migrate", skip(self))]
  pub async fn migrate(&self) -> Result<()> {
    MIGRATOR
      .run(&self.pool)
      .await
      .change_context(Error::Migration)
  }

  #[tracing::instrument(name = "db.connect", skip(self))]
  pub async fn get(&self) -> Result<PoolConnection> {
    if let Some(inner) = self.pool.try_acquire() {
      Ok(inner)
    } else {
      self.pool.acquire().await.into_db_error()
    }
  }

  #[tracing::instrument(skip(self))]
  pub async fn wait_until_healthy(&self) -> Result<()> {
    match self.pool.acquire().await {
      Ok(..) => Ok(()),
      Err(e @ (sqlx::Error::PoolTimedOut | sqlx::Error::Io(..))) => {
        Err(Report::new(e).change_context(Error::UnhealthyPool))
      }
      Err(err) => Err(Report::new(Error::Internal(err))),
    }
  }
}
