use actix_web::{web, HttpResponse};

use super::{feed::find_author, profile_path};
use crate::{
  http::{util::redirect, Error, LoggedIn},
  schema::Follow,
  App,
};

/// Following yourself is silently ignored, following twice keeps a
/// single edge.
#[tracing::instrument(skip(app))]
pub async fn profile_follow(
  app: web::Data<App>,
  path: web::Path<String>,
  user: LoggedIn,
) -> Result<HttpResponse, Error> {
  let mut conn = app.db().await?;
  let author = find_author(&mut conn, path.as_str()).await?;
  if Follow::follow(&mut conn, user.id, author.id).await? {
    tracing::info!(user = %user.username, author = %author.username, "followed author");
  }
  Ok(redirect(&profile_path(&author.username)))
}

#[tracing::instrument(skip(app))]
pub async fn profile_unfollow(
  app: web::Data<App>,
  path: web::Path<String>,
  user: LoggedIn,
) -> Result<HttpResponse, Error> {
  let mut conn = app.db().await?;
  let author = find_author(&mut conn, path.as_str()).await?;
  if Follow::unfollow(&mut conn, user.id, author.id).await? {
    tracing::info!(user = %user.username, author = %author.username, "unfollowed author");
  }
  Ok(redirect(&profile_path(&author.username)))
}
