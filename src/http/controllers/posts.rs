use actix_web::{web, HttpResponse};
use serde_json::json;
use thiserror::Error;
use validator::ValidateError;

use super::{post_path, profile_path};
use crate::{
  database::Connection,
  feed::FeedScope,
  http::{util::redirect, Actor, Error, LoggedIn},
  schema::{Comment, EditPost, Group, InsertComment, InsertPost, Post},
  types::{
    form::{CleanPost, CommentForm, PostForm, INVALID_CHOICE},
    id::PostId,
  },
  App,
};

#[derive(Debug, Error)]
#[error("Post not found")]
struct PostNotFound;

fn parse_post_id(raw: &str) -> Result<PostId, Error> {
  raw.parse::<PostId>().map_err(Error::not_found)
}

async fn find_post(conn: &mut Connection, raw_id: &str) -> Result<Post, Error> {
  let id = parse_post_id(raw_id)?;
  Post::by_id(conn, id)
    .await?
    .ok_or_else(|| Error::not_found(PostNotFound))
}

/// Context of the create/edit form. Every group is offered as a
/// choice; a failed submission comes back with its values and errors.
async fn form_context(
  conn: &mut Connection,
  form: &PostForm,
  errors: Option<&ValidateError>,
  post_id: Option<PostId>,
) -> Result<serde_json::Value, Error> {
  let groups = Group::all(conn)
    .await?
    .iter()
    .map(Group::to_summary)
    .collect::<Vec<_>>();

  Ok(json!({
    "form": form,
    "errors": errors,
    "groups": groups,
    "is_edit": post_id.is_some(),
    "post_id": post_id,
  }))
}

/// Runs the form checks that need the store on top of
/// [`PostForm::clean`].
async fn clean_post(
  conn: &mut Connection,
  form: &PostForm,
) -> Result<Result<CleanPost, ValidateError>, Error> {
  let post = match form.clean() {
    Ok(post) => post,
    Err(error) => return Ok(Err(error)),
  };

  if let Some(group_id) = post.group_id {
    if Group::by_id(conn, group_id).await?.is_none() {
      return Ok(Err(ValidateError::single("group", INVALID_CHOICE)));
    }
  }

  Ok(Ok(post))
}

#[tracing::instrument(skip(app))]
pub async fn detail(
  app: web::Data<App>,
  path: web::Path<String>,
  actor: Actor,
) -> Result<HttpResponse, Error> {
  let id = parse_post_id(path.as_str())?;

  let mut conn = app.db().await?;
  let Some(post) = Post::view_by_id(&mut conn, id).await? else {
    return Err(Error::not_found(PostNotFound));
  };

  let comments = Comment::views_for_post(&mut conn, id).await?;
  let author_post_count = FeedScope::Profile(post.author.id).count(&mut conn).await?;
  let is_edit = actor.user_id() == Some(post.author.id);

  Ok(HttpResponse::Ok().json(json!({
    "post": post,
    "author_post_count": author_post_count,
    "is_edit": is_edit,
    "form": CommentForm::default(),
    "comments": comments,
  })))
}

#[tracing::instrument(skip(app))]
pub async fn create_form(app: web::Data<App>, _user: LoggedIn) -> Result<HttpResponse, Error> {
  let mut conn = app.db().await?;
  let context = form_context(&mut conn, &PostForm::default(), None, None).await?;
  Ok(HttpResponse::Ok().json(context))
}

#[tracing::instrument(skip(app))]
pub async fn create(
  app: web::Data<App>,
  user: LoggedIn,
  form: web::Form<PostForm>,
) -> Result<HttpResponse, Error> {
  let mut conn = app.db().await?;
  let post = match clean_post(&mut conn, &form).await? {
    Ok(post) => post,
    Err(errors) => {
      let context = form_context(&mut conn, &form, Some(&errors), None).await?;
      return Ok(HttpResponse::BadRequest().json(context));
    }
  };

  let post = InsertPost {
    author_id: user.id,
    text: &post.text,
    group_id: post.group_id,
    image: post.image.as_deref(),
  }
  .insert(&mut conn)
  .await?;

  tracing::info!(id = %post.id, author = %user.username, "created post");
  Ok(redirect(&profile_path(&user.username)))
}

#[tracing::instrument(skip(app))]
pub async fn edit_form(
  app: web::Data<App>,
  path: web::Path<String>,
  user: LoggedIn,
) -> Result<HttpResponse, Error> {
  let mut conn = app.db().await?;
  let post = find_post(&mut conn, path.as_str()).await?;
  if !post.is_authored_by(user.id) {
    return Ok(redirect(&post_path(post.id)));
  }

  let form = PostForm {
    text: post.text.clone(),
    group: post.group_id.map(|id| id.to_string()),
    image: post.image.clone(),
  };

  let context = form_context(&mut conn, &form, None, Some(post.id)).await?;
  Ok(HttpResponse::Ok().json(context))
}

/// Only the author may edit. Anyone else is sent back to the post
/// and nothing is written.
#[tracing::instrument(skip(app))]
pub async fn edit(
  app: web::Data<App>,
  path: web::Path<String>,
  user: LoggedIn,
  form: web::Form<PostForm>,
) -> Result<HttpResponse, Error> {
  let mut conn = app.db().await?;
  let post = find_post(&mut conn, path.as_str()).await?;
  if !post.is_authored_by(user.id) {
    tracing::debug!(id = %post.id, "edit attempt by non-author");
    return Ok(redirect(&post_path(post.id)));
  }

  let clean = match clean_post(&mut conn, &form).await? {
    Ok(clean) => clean,
    Err(errors) => {
      let context = form_context(&mut conn, &form, Some(&errors), Some(post.id)).await?;
      return Ok(HttpResponse::BadRequest().json(context));
    }
  };

  EditPost {
    id: post.id,
    author_id: user.id,
    text: &clean.text,
    group_id: clean.group_id,
    // no new upload keeps the stored image
    image: clean.image.as_deref().or(post.image.as_deref()),
  }
  .apply(&mut conn)
  .await?;

  Ok(redirect(&post_path(post.id)))
}

/// Invalid comments are dropped; the user lands on the post either
/// way.
#[tracing::instrument(skip(app))]
pub async fn add_comment(
  app: web::Data<App>,
  path: web::Path<String>,
  user: LoggedIn,
  form: web::Form<CommentForm>,
) -> Result<HttpResponse, Error> {
  let mut conn = app.db().await?;
  let post = find_post(&mut conn, path.as_str()).await?;

  match form.clean() {
    Ok(text) => {
      InsertComment {
        post_id: post.id,
        author_id: user.id,
        text: &text,
      }
      .insert(&mut conn)
      .await?;
    }
    Err(error) => tracing::debug!(%error, "ignoring invalid comment"),
  }

  Ok(redirect(&post_path(post.id)))
}
