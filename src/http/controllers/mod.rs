use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::{types::id::PostId, App};

pub mod feed;
pub mod follow;
pub mod posts;

pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(feed::index))
    .route("/group/{slug}/", web::get().to(feed::group_posts))
    .route("/follow/", web::get().to(feed::follow_index))
    .route("/profile/{username}/", web::get().to(feed::profile))
    .service(
      web::resource("/profile/{username}/follow/")
        .route(web::get().to(follow::profile_follow))
        .route(web::post().to(follow::profile_follow)),
    )
    .service(
      web::resource("/profile/{username}/unfollow/")
        .route(web::get().to(follow::profile_unfollow))
        .route(web::post().to(follow::profile_unfollow)),
    )
    .service(
      web::resource("/create/")
        .route(web::get().to(posts::create_form))
        .route(web::post().to(posts::create)),
    )
    .route("/posts/{post_id}/", web::get().to(posts::detail))
    .service(
      web::resource("/posts/{post_id}/edit/")
        .route(web::get().to(posts::edit_form))
        .route(web::post().to(posts::edit)),
    )
    .route("/posts/{post_id}/comment/", web::post().to(posts::add_comment));
}

/// Body limit for the post and comment forms.
#[must_use]
pub fn form_config(app: &App) -> web::FormConfig {
  web::FormConfig::default().limit(app.config.max_form_bytes.get())
}

/// Fallback for every path no route matches.
#[tracing::instrument(skip_all, fields(path = %req.path()))]
pub async fn not_found(req: HttpRequest) -> HttpResponse {
  HttpResponse::NotFound().json(json!({
    "type": "not_found",
    "path": req.path(),
  }))
}

pub(crate) fn profile_path(username: &str) -> String {
  format!("/profile/{username}/")
}

pub(crate) fn post_path(id: PostId) -> String {
  format!("/posts/{id}/")
}
