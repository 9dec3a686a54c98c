use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use validator::{Validate, ValidateError};

use super::ParseError;
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

#[derive(Debug, Deserialize)]
pub struct Server {
  /// **Environment variables**:
  /// - `YATUBE_HOST`
  #[serde(default = "Server::default_host")]
  pub host: IpAddr,
  /// **Environment variables**:
  /// - `YATUBE_PORT`
  #[serde(default = "Server::default_port")]
  pub port: u16,
  /// Amount of HTTP workers. Defaults to the amount of
  /// physical CPU cores.
  ///
  /// **Environment variables**:
  /// - `YATUBE_WORKERS`
  pub workers: Option<NonZeroUsize>,
  /// Largest urlencoded form body accepted, in bytes. Post text has
  /// no length limit of its own, so this caps it.
  ///
  /// **Environment variables**:
  /// - `YATUBE_MAX_FORM_BYTES`
  #[serde(default = "Server::default_max_form_bytes")]
  pub max_form_bytes: NonZeroUsize,
  pub db: super::Database,
  pub auth: super::Auth,
  #[serde(default)]
  pub feed: super::Feed,
  #[serde(default)]
  pub logging: super::Logging,
}

impl Validate for Server {
  fn validate(&self) -> std::result::Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if let Err(error) = self.db.validate() {
      fields.insert("db", error);
    }
    if let Err(error) = self.auth.validate() {
      fields.insert("auth", error);
    }
    fields.build().into_result()
  }
}

impl Server {
  pub fn load() -> Result<Self, ParseError> {
    dotenvy::dotenv().ok();
    Self::from_figment(&Self::figment())
  }

  pub(crate) fn from_figment(figment: &figment::Figment) -> Result<Self, ParseError> {
    let config = figment
      .extract::<Self>()
      .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

    config
      .validate()
      .into_validator_report()
      .change_context(ParseError)?;

    Ok(config)
  }
}

impl Server {
  const DEFAULT_CONFIG_FILE: &'static str = "yatube.toml";
  const DEFAULT_PORT: u16 = 8000;
  const DEFAULT_MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

  fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
  }

  const fn default_port() -> u16 {
    Self::DEFAULT_PORT
  }

  const fn default_max_form_bytes() -> NonZeroUsize {
    match NonZeroUsize::new(Self::DEFAULT_MAX_FORM_BYTES) {
      Some(n) => n,
      None => panic!("DEFAULT_MAX_FORM_BYTES is accidentally set to 0"),
    }
  }

  /// Creates a default [`Figment`] object to load server
  /// configuration from the config file and the environment.
  ///
  /// [`Figment`]: figment::Figment
  pub(crate) fn figment() -> figment::Figment {
    use figment::{
      providers::{Env, Format, Toml},
      Figment,
    };

    Figment::new()
      .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
      // Section names never contain underscores but field names do,
      // so only the first underscore separates the section.
      .merge(Env::prefixed("YATUBE_").map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        match key.split_once('_') {
          Some((section @ ("db" | "auth" | "feed" | "logging"), field)) => {
            format!("{section}.{field}").into()
          }
          _ => key.into(),
        }
      }))
      // Environment variable aliases
      .merge(
        Env::raw()
          .only(&["DATABASE_URL"])
          .map(|_| "db.url".into()),
      )
  }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::LoggingStyle;
  use figment::Jail;
  use std::num::{NonZeroU32, NonZeroU64};

  #[test]
  fn env_aliases() {
    Jail::expect_with(|jail| {
      jail.set_env("DATABASE_URL", "sqlite://alias.db");
      jail.set_env("YATUBE_AUTH_JWT_SECRET", "a-very-long-secret");

      jail.set_env("YATUBE_DB_MIN_IDLE", "2");
      jail.set_env("YATUBE_DB_POOL_SIZE", "100");
      jail.set_env("YATUBE_DB_TIMEOUT_SECS", "3030");
      jail.set_env("YATUBE_DB_RUN_MIGRATIONS", "false");

      jail.set_env("YATUBE_FEED_PAGE_SIZE", "25");
      jail.set_env("YATUBE_FEED_CACHE_TTL_SECS", "60");
      jail.set_env("YATUBE_LOGGING_STYLE", "pretty");
      jail.set_env("YATUBE_PORT", "9000");
      jail.set_env("YATUBE_MAX_FORM_BYTES", "4096");

      let config: Server = Server::figment().extract()?;
      assert_eq!(config.db.url.as_str(), "sqlite://alias.db");
      assert_eq!(config.db.min_idle, NonZeroU32::new(2));
      assert_eq!(config.db.pool_size, NonZeroU32::new(100).unwrap());
      assert_eq!(config.db.timeout_secs, NonZeroU64::new(3030).unwrap());
      assert!(!config.db.run_migrations);

      assert_eq!(config.auth.jwt_secret.as_str(), "a-very-long-secret");
      assert_eq!(config.auth.login_url, "/auth/login/");

      assert_eq!(config.feed.page_size, NonZeroU32::new(25).unwrap());
      assert_eq!(config.feed.cache_ttl_secs, NonZeroU64::new(60).unwrap());
      assert_eq!(config.logging.style, LoggingStyle::Pretty);
      assert_eq!(config.port, 9000);
      assert_eq!(config.max_form_bytes.get(), 4096);

      Ok(())
    });
  }

  #[test]
  fn defaults_from_file() {
    Jail::expect_with(|jail| {
      jail.create_file(
        "yatube.toml",
        r#"
          [db]
          url = "sqlite://yatube.db?mode=rwc"

          [auth]
          jwt_secret = "file-provided-secret"
        "#,
      )?;

      let config = Server::from_figment(&Server::figment()).unwrap();
      assert_eq!(config.host, Server::default_host());
      assert_eq!(config.port, 8000);
      assert!(config.workers.is_none());
      assert_eq!(config.max_form_bytes.get(), 2 * 1024 * 1024);
      assert!(config.db.run_migrations);
      assert_eq!(config.db.pool_size.get(), 5);
      assert_eq!(config.feed.page_size.get(), 10);
      assert_eq!(config.feed.cache_ttl_secs.get(), 20);
      assert_eq!(config.logging.style, LoggingStyle::Full);

      Ok(())
    });
  }

  #[test]
  fn rejects_short_jwt_secret() {
    Jail::expect_with(|jail| {
      jail.set_env("DATABASE_URL", "sqlite://yatube.db");
      jail.set_env("YATUBE_AUTH_JWT_SECRET", "short");

      let report = Server::from_figment(&Server::figment()).unwrap_err();
      assert!(format!("{report:?}").contains("auth.jwt_secret"));
      Ok(())
    });
  }
}
