use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{cache::PageCache, config, database, feed::Paginator};

#[derive(Debug, Clone)]
pub struct App {
  pub config: Arc<config::Server>,
  pub db: database::Pool,
  pub feed_cache: PageCache,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
  #[tracing::instrument]
  pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
    let db = database::Pool::new(&cfg.db)
      .await
      .change_context(AppError)?;

    Ok(Self::with_pool(cfg, db))
  }

  #[must_use]
  pub fn with_pool(cfg: config::Server, db: database::Pool) -> Self {
    let feed_cache = PageCache::new(cfg.feed.cache_ttl());
    Self {
      config: Arc::new(cfg),
      db,
      feed_cache,
    }
  }
}

impl App {
  #[tracing::instrument(skip_all)]
  pub async fn db(&self) -> Result<database::PoolConnection, database::Error> {
    self.db.get().await
  }

  #[must_use]
  pub fn paginator(&self) -> Paginator {
    Paginator::new(self.config.feed.page_size)
  }

  /// Explicit cache reset. Nothing in the request path calls this.
  pub fn clear_feed_cache(&self) {
    self.feed_cache.clear();
  }
}
