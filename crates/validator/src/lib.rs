#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;

pub use error::*;
pub mod extras;

/// Checks whether the value is acceptable, collecting every problem
/// found instead of stopping at the first one.
pub trait Validate {
  fn validate(&self) -> Result<(), ValidateError>;
}
