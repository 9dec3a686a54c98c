use actix_web::{body::BoxBody, http::header, http::StatusCode, HttpResponse};
use error_stack::Report;

use super::Error;
use crate::{database, types::Error as ErrorType};

impl actix_web::ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self.error_type {
      ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      ErrorType::NotFound => StatusCode::NOT_FOUND,
      ErrorType::ReadonlyMode => StatusCode::SERVICE_UNAVAILABLE,
      ErrorType::LoginRequired { .. } => StatusCode::FOUND,
    }
  }

  fn error_response(&self) -> HttpResponse<BoxBody> {
    match &self.error_type {
      ErrorType::Internal | ErrorType::ReadonlyMode => {
        tracing::error!(error = %self, "Request failed");
      }
      _ => tracing::debug!(error = %self.error_type, "Request rejected"),
    }

    if let ErrorType::LoginRequired { location } = &self.error_type {
      return HttpResponse::Found()
        .insert_header((header::LOCATION, location.as_str()))
        .finish();
    }

    HttpResponse::build(self.status_code()).json(&self.error_type)
  }
}

/// Writes refused by a read-only store surface as 503, everything else
/// the store reports is a 500.
impl From<Report<database::Error>> for Error {
  fn from(report: Report<database::Error>) -> Self {
    let kind = if matches!(report.current_context(), database::Error::Readonly) {
      ErrorType::ReadonlyMode
    } else {
      ErrorType::Internal
    };
    Error::from_report(kind, report)
  }
}
