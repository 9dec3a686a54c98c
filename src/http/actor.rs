use actix_web::{http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, LocalBoxFuture};
use thiserror::Error;

use crate::{schema::User, types::id::UserId, App};

use super::{util::return_path, Error, Jwt};

/// Whoever performs the request. A missing, malformed or stale token
/// is an anonymous visitor, never an error.
#[derive(Debug)]
pub enum Actor {
  Anonymous,
  User(User),
}

impl Actor {
  #[must_use]
  pub fn user_id(&self) -> Option<UserId> {
    match self {
      Self::User(user) => Some(user.id),
      Self::Anonymous => None,
    }
  }
}

fn app_data(req: &HttpRequest) -> Result<web::Data<App>, Error> {
  #[derive(Debug, Error)]
  #[error("The web app has no available configuration")]
  struct NoConfig;

  req
    .app_data::<web::Data<App>>()
    .cloned()
    .ok_or_else(|| Error::from_context(crate::types::Error::Internal, NoConfig))
}

impl FromRequest for Actor {
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let token = req
      .headers()
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
      return Box::pin(ready(Ok(Actor::Anonymous)));
    };

    let app = match app_data(req) {
      Ok(app) => app,
      Err(error) => return Box::pin(ready(Err(error))),
    };

    let jwt = match Jwt::decode(token, &app) {
      Ok(jwt) => jwt,
      Err(error) => {
        tracing::debug!(%error, "ignoring invalid session token");
        return Box::pin(ready(Ok(Actor::Anonymous)));
      }
    };

    Box::pin(async move {
      let mut conn = app.db().await?;
      match User::by_id(&mut conn, jwt.user_id).await? {
        Some(user) => Ok(Actor::User(user)),
        None => Ok(Actor::Anonymous),
      }
    })
  }
}

/// [`Actor`] for routes that need a user. Anonymous visitors are
/// redirected to the login page with the current path as `next`.
#[derive(Debug)]
pub struct LoggedIn(pub User);

impl FromRequest for LoggedIn {
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, payload: &mut actix_web::dev::Payload) -> Self::Future {
    let actor = Actor::from_request(req, payload);
    let login = app_data(req).map(|app| {
      let next = return_path(req);
      (app.config.auth.login_url.clone(), next)
    });

    Box::pin(async move {
      match actor.await? {
        Actor::User(user) => Ok(LoggedIn(user)),
        Actor::Anonymous => {
          let (login_url, next) = login?;
          Err(Error::login_required(&login_url, &next))
        }
      }
    })
  }
}

impl std::ops::Deref for LoggedIn {
  type Target = User;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}
