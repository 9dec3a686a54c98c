use actix_web::{http::header::ContentType, web, HttpResponse};
use serde_json::json;
use thiserror::Error;

use crate::{
  feed::FeedScope,
  http::{util::PageQuery, Actor, Error, LoggedIn},
  schema::{Follow, Group, User},
  types, App,
};

/// Global feed. Rendered pages are served from the page cache, so a
/// new or removed post shows up here only after the entry expires.
#[tracing::instrument(skip(app))]
pub async fn index(app: web::Data<App>, query: web::Query<PageQuery>) -> Result<HttpResponse, Error> {
  let number = query.number();
  if let Some(body) = app.feed_cache.get(number).await {
    tracing::debug!(page = %number, "serving cached feed page");
    return Ok(
      HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body),
    );
  }

  let mut conn = app.db().await?;
  let page = FeedScope::Global
    .page(&mut conn, &app.paginator(), number)
    .await?;
  drop(conn);

  let body = serde_json::to_vec(&json!({ "page": page }))
    .map_err(|e| Error::from_context(types::Error::Internal, e))?;

  let body = web::Bytes::from(body);
  app.feed_cache.insert(number, body.clone()).await;

  Ok(
    HttpResponse::Ok()
      .content_type(ContentType::json())
      .body(body),
  )
}

#[tracing::instrument(skip(app))]
pub async fn group_posts(
  app: web::Data<App>,
  path: web::Path<String>,
  query: web::Query<PageQuery>,
) -> Result<HttpResponse, Error> {
  #[derive(Debug, Error)]
  #[error("Group not found")]
  struct GroupNotFound;

  let mut conn = app.db().await?;
  let Some(group) = Group::by_slug(&mut conn, path.as_str()).await? else {
    return Err(Error::not_found(GroupNotFound));
  };

  let page = FeedScope::Group(group.id)
    .page(&mut conn, &app.paginator(), query.number())
    .await?;

  Ok(HttpResponse::Ok().json(json!({
    "group": group.to_view(),
    "page": page,
  })))
}

#[tracing::instrument(skip(app))]
pub async fn profile(
  app: web::Data<App>,
  path: web::Path<String>,
  query: web::Query<PageQuery>,
  actor: Actor,
) -> Result<HttpResponse, Error> {
  let mut conn = app.db().await?;
  let author = find_author(&mut conn, path.as_str()).await?;

  let page = FeedScope::Profile(author.id)
    .page(&mut conn, &app.paginator(), query.number())
    .await?;
  let following = Follow::is_following(&mut conn, actor.user_id(), author.id).await?;

  Ok(HttpResponse::Ok().json(json!({
    "author": author.to_author(),
    "post_count": page.total_items,
    "following": following,
    "page": page,
  })))
}

/// Posts of everyone the user follows.
#[tracing::instrument(skip(app))]
pub async fn follow_index(
  app: web::Data<App>,
  query: web::Query<PageQuery>,
  user: LoggedIn,
) -> Result<HttpResponse, Error> {
  let mut conn = app.db().await?;
  let page = FeedScope::Following(user.id)
    .page(&mut conn, &app.paginator(), query.number())
    .await?;

  Ok(HttpResponse::Ok().json(json!({ "page": page })))
}

pub(super) async fn find_author(
  conn: &mut crate::database::Connection,
  username: &str,
) -> Result<User, Error> {
  #[derive(Debug, Error)]
  #[error("User not found")]
  struct UserNotFound;

  User::by_name(conn, username)
    .await?
    .ok_or_else(|| Error::not_found(UserNotFound))
}
