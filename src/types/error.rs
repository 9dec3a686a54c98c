use serde::Serialize;
use std::fmt::Display;

/// Public kind of a failed request. The HTTP layer picks the response
/// status (or redirect) from this.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Error {
  Internal,
  /// The operation needs an acting user. `location` is the login entry
  /// point, already carrying the `next` path to come back to.
  LoginRequired {
    location: String,
  },
  NotFound,
  ReadonlyMode,
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Error::Internal => f.write_str("Failed to perform request"),
      Error::LoginRequired { .. } => f.write_str("Login is required to perform request"),
      Error::NotFound => f.write_str("Requested resource is not found"),
      Error::ReadonlyMode => f.write_str("Attempt to write read-only database"),
    }
  }
}
