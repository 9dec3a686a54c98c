use actix_web::{
  body::MessageBody,
  dev::{ServiceRequest, ServiceResponse},
  http::header,
  HttpRequest, HttpResponse,
};
use serde::Deserialize;
use tracing::Span;
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder};

use crate::feed::PageNumber;

/// `?page=` of a feed. Kept as a string so a garbage value falls
/// back to the first page instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
  page: Option<String>,
}

impl PageQuery {
  #[must_use]
  pub fn number(&self) -> PageNumber {
    PageNumber::from_query(self.page.as_deref())
  }
}

#[must_use]
pub fn redirect(location: &str) -> HttpResponse {
  HttpResponse::Found()
    .insert_header((header::LOCATION, location))
    .finish()
}

/// Path and query of the request, which is where a user lands
/// after logging in.
#[must_use]
pub fn return_path(req: &HttpRequest) -> String {
  req
    .uri()
    .path_and_query()
    .map_or_else(|| req.path().to_string(), ToString::to_string)
}

#[must_use]
pub fn login_location(login_url: &str, next: &str) -> String {
  let query = url::form_urlencoded::Serializer::new(String::new())
    .append_pair("next", next)
    .finish();

  let separator = if login_url.contains('?') { '&' } else { '?' };
  format!("{login_url}{separator}{query}")
}

/// Request spans at `DEBUG` so a busy feed does not flood the
/// default `INFO` output.
pub struct QuieterRootSpanBuilder;

impl RootSpanBuilder for QuieterRootSpanBuilder {
  fn on_request_start(request: &ServiceRequest) -> Span {
    tracing_actix_web::root_span!(level = tracing::Level::DEBUG, request)
  }

  fn on_request_end<B: MessageBody>(
    span: Span,
    outcome: &Result<ServiceResponse<B>, actix_web::Error>,
  ) {
    DefaultRootSpanBuilder::on_request_end(span, outcome);
  }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn test_login_location() {
    assert_eq!(
      login_location("/auth/login/", "/create/"),
      "/auth/login/?next=%2Fcreate%2F"
    );
    assert_eq!(
      login_location("/login?lang=en", "/follow/?page=2"),
      "/login?lang=en&next=%2Ffollow%2F%3Fpage%3D2"
    );
  }

  #[test]
  fn test_return_path_keeps_query() {
    let req = TestRequest::with_uri("/follow/?page=3").to_http_request();
    assert_eq!(return_path(&req), "/follow/?page=3");

    let req = TestRequest::with_uri("/create/").to_http_request();
    assert_eq!(return_path(&req), "/create/");
  }

  #[test]
  fn test_page_query() {
    let query = PageQuery {
      page: Some("x".into()),
    };
    assert_eq!(query.number(), PageNumber::FIRST);

    let query = PageQuery {
      page: Some("4".into()),
    };
    assert_eq!(query.number().get(), 4);
    assert_eq!(PageQuery::default().number(), PageNumber::FIRST);
  }
}
