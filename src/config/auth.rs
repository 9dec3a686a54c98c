use serde::Deserialize;
use validator::{Validate, ValidateError};

use crate::util::Sensitive;

#[derive(Debug, Deserialize)]
pub struct Auth {
  /// Shared secret used to verify session tokens issued by the
  /// identity layer.
  ///
  /// **Environment variables**:
  /// - `YATUBE_AUTH_JWT_SECRET`
  pub jwt_secret: Sensitive<String>,
  /// Where anonymous users are sent when they open a page that
  /// needs a login. `?next=<path>` is appended to it.
  ///
  /// **Environment variables**:
  /// - `YATUBE_AUTH_LOGIN_URL`
  #[serde(default = "Auth::default_login_url")]
  pub login_url: String,
}

impl Auth {
  const JWT_SECRET_MIN: usize = 12;
  const JWT_SECRET_MAX: usize = 1024;

  fn default_login_url() -> String {
    "/auth/login/".into()
  }
}

impl Validate for Auth {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    let secret_len = self.jwt_secret.len();
    if !(Self::JWT_SECRET_MIN..=Self::JWT_SECRET_MAX).contains(&secret_len) {
      fields.push_message("jwt_secret", "Invalid JWT secret key");
    }
    if self.login_url.trim().is_empty() {
      fields.push_message("login_url", "Login URL must not be empty");
    }
    fields.build().into_result()
  }
}
