use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::{Logging, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

pub fn init(config: &Logging) -> Result<(), TracingInitError> {
  let targets = if config.targets.is_empty() {
    std::env::var("RUST_LOG").unwrap_or_default()
  } else {
    if std::env::var("RUST_LOG").is_ok() {
      eprintln!("`RUST_LOG` is ignored because `YATUBE_LOGGING_TARGETS` is set");
    }
    config.targets.clone()
  };

  let fmt = tracing_subscriber::fmt::layer();
  let fmt = match config.style {
    LoggingStyle::Compact => fmt.compact().boxed(),
    LoggingStyle::Full => fmt.boxed(),
    LoggingStyle::Pretty => fmt.pretty().boxed(),
  };

  let registry = tracing_subscriber::Registry::default()
    .with(fmt.with_filter(make_env_filter(&targets)))
    .with(tracing_error::ErrorLayer::default());

  tracing::subscriber::set_global_default(registry)
    .change_context(TracingInitError)
    .attach_printable("already initialized tracing")
}

fn make_env_filter(targets: &str) -> EnvFilter {
  let default_level = if cfg!(debug_assertions) {
    LevelFilter::DEBUG
  } else {
    LevelFilter::INFO
  };

  EnvFilter::builder()
    .with_default_directive(default_level.into())
    .parse_lossy(targets)
}
