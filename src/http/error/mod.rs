use crate::types;
use error_stack::{Context, Report};
use thiserror::Error;
use tracing_error::SpanTrace;

mod impls;

pub type Result<T> = std::result::Result<T, Error>;

/// Every report carried by [`Error`] ends with this context so
/// reports of different origins share one type.
#[derive(Debug, Error)]
#[error("Failed to handle request")]
pub struct RequestFailed;

/// A failed request: the public [kind](types::Error) that decides the
/// response, plus the internal report and span trace for the logs.
pub struct Error {
  error_type: types::Error,
  report: Report<RequestFailed>,
  trace: SpanTrace,
}

impl Error {
  #[must_use]
  pub fn from_context(error_type: types::Error, context: impl Context) -> Self {
    Self::from_report(error_type, Report::new(context))
  }

  #[must_use]
  pub fn from_report(error_type: types::Error, report: Report<impl Context>) -> Self {
    Self {
      error_type,
      report: report.change_context(RequestFailed),
      trace: SpanTrace::capture(),
    }
  }

  /// Sends the user to the login entry point, coming back to `next`
  /// afterwards.
  #[must_use]
  pub fn login_required(login_url: &str, next: &str) -> Self {
    #[derive(Debug, Error)]
    #[error("Attempt to access user-only route")]
    struct Anonymous;

    let location = super::util::login_location(login_url, next);
    Self::from_context(types::Error::LoginRequired { location }, Anonymous)
  }

  #[must_use]
  pub fn not_found(context: impl Context) -> Self {
    Self::from_context(types::Error::NotFound, context)
  }
}

impl Error {
  #[must_use]
  pub fn as_type(&self) -> &types::Error {
    &self.error_type
  }

  #[must_use]
  pub fn downcast_ref<F: Context>(&self) -> Option<&F> {
    self.report.downcast_ref::<F>()
  }
}

impl std::fmt::Debug for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Error")
      .field("type", &self.error_type)
      .field("report", &self.report)
      .field("trace", &self.trace)
      .finish()
  }
}

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: ", &self.error_type)?;
    writeln!(f, "{:?}", self.report)?;
    std::fmt::Display::fmt(&self.trace, f)
  }
}
