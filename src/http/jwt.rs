use chrono::{NaiveDateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{types::id::UserId, App};

/// Session token issued by the identity layer. Only `user_id` is
/// trusted; tokens never expire on their own, a deleted user makes
/// them useless.
#[derive(Debug, Deserialize, Serialize)]
pub struct Jwt {
  pub created_at: NaiveDateTime,
  pub issuer: String,
  pub user_id: UserId,
}

impl Jwt {
  const ISSUER: &'static str = "yatube";

  #[must_use]
  pub fn new(user_id: UserId) -> Self {
    Self {
      created_at: Utc::now().naive_utc(),
      issuer: Self::ISSUER.into(),
      user_id,
    }
  }

  fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS512);
    validation.validate_exp = false;
    validation.required_spec_claims = Default::default();
    validation
  }

  #[tracing::instrument(skip_all)]
  pub fn decode(token: &str, app: &App) -> jsonwebtoken::errors::Result<Self> {
    let key = DecodingKey::from_secret(app.config.auth.jwt_secret.as_bytes());
    jsonwebtoken::decode::<Self>(token, &key, &Self::validation()).map(|v| v.claims)
  }

  #[tracing::instrument(skip_all, fields(user_id = %self.user_id))]
  pub fn encode(&self, app: &App) -> jsonwebtoken::errors::Result<String> {
    let header = Header::new(Algorithm::HS512);
    let key = EncodingKey::from_secret(app.config.auth.jwt_secret.as_bytes());
    jsonwebtoken::encode(&header, self, &key)
  }
}
