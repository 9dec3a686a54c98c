use actix_web::http::header::{self, HeaderName};
use figment::{providers::Serialized, Figment};

use crate::{
  config,
  database::Pool,
  http::Jwt,
  schema::{Group, InsertGroup, InsertPost, Post, User},
  types::id::GroupId,
  App,
};

pub const JWT_SECRET: &str = "yatube-test-secret";

pub fn config() -> config::Server {
  let figment = Figment::new()
    .merge(Serialized::default("db.url", "sqlite::memory:"))
    .merge(Serialized::default("auth.jwt_secret", JWT_SECRET));

  config::Server::from_figment(&figment).unwrap()
}

pub async fn pool() -> Pool {
  Pool::in_memory().await.unwrap()
}

pub async fn app() -> App {
  App::with_pool(config(), pool().await)
}

pub fn bearer(app: &App, user: &User) -> (HeaderName, String) {
  let token = Jwt::new(user.id).encode(app).unwrap();
  (header::AUTHORIZATION, format!("Bearer {token}"))
}

pub async fn user(app: &App, username: &str) -> User {
  let mut conn = app.db().await.unwrap();
  User::insert(&mut conn, username).await.unwrap()
}

pub async fn group(app: &App, slug: &str) -> Group {
  let mut conn = app.db().await.unwrap();
  InsertGroup {
    title: slug,
    slug,
    description: "",
  }
  .insert(&mut conn)
  .await
  .unwrap()
}

pub async fn post(app: &App, author: &User, text: &str, group_id: Option<GroupId>) -> Post {
  let mut conn = app.db().await.unwrap();
  InsertPost {
    author_id: author.id,
    text,
    group_id,
    image: None,
  }
  .insert(&mut conn)
  .await
  .unwrap()
}

/// Test service with every route and the not-found fallback.
macro_rules! init_service {
  ($app:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($app.clone()))
        .app_data(crate::http::controllers::form_config(&$app))
        .configure(crate::http::controllers::configure)
        .default_service(actix_web::web::to(crate::http::controllers::not_found)),
    )
    .await
  };
}

pub(crate) use init_service;
