//! Post feeds: which posts a reader sees for a given scope, newest
//! first, one page at a time.

use sqlx::{QueryBuilder, Sqlite};

use crate::{
  database::{error::ErrorExt, Connection, Result},
  schema::post::{PostViewRow, POST_VIEW_ORDER, POST_VIEW_SELECT},
  types::{
    id::{GroupId, UserId},
    view::PostView,
  },
};

mod page;
pub use page::{Page, PageNumber, Paginator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
  /// Every post.
  Global,
  /// Posts assigned to the group.
  Group(GroupId),
  /// Posts written by the user.
  Profile(UserId),
  /// Posts written by anyone the user follows.
  Following(UserId),
}

impl FeedScope {
  fn push_filter(self, query: &mut QueryBuilder<'_, Sqlite>) {
    match self {
      Self::Global => {}
      Self::Group(id) => {
        query.push(" WHERE p.group_id = ").push_bind(id);
      }
      Self::Profile(id) => {
        query.push(" WHERE p.author_id = ").push_bind(id);
      }
      Self::Following(id) => {
        query
          .push(" WHERE p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ")
          .push_bind(id)
          .push(")");
      }
    }
  }

  #[tracing::instrument(skip(conn), name = "db.feed.count")]
  pub async fn count(self, conn: &mut Connection) -> Result<u64> {
    let mut query = QueryBuilder::new("SELECT COUNT(*) FROM posts p");
    self.push_filter(&mut query);

    let total = query
      .build_query_scalar::<i64>()
      .fetch_one(conn)
      .await
      .into_db_error()?;

    Ok(u64::try_from(total).unwrap_or_default())
  }

  /// Assembles one page of the feed. Pages past the last one are
  /// empty rather than an error.
  #[tracing::instrument(skip(conn, paginator), name = "db.feed.page")]
  pub async fn page(
    self,
    conn: &mut Connection,
    paginator: &Paginator,
    number: PageNumber,
  ) -> Result<Page<PostView>> {
    // count and rows come from the same snapshot
    let mut tx = sqlx::Connection::begin(&mut *conn).await.into_db_error()?;
    let total_items = self.count(&mut tx).await?;
    let (limit, offset) = paginator.window(number);

    let mut query = QueryBuilder::new(POST_VIEW_SELECT);
    self.push_filter(&mut query);
    query
      .push(POST_VIEW_ORDER)
      .push(" LIMIT ")
      .push_bind(limit)
      .push(" OFFSET ")
      .push_bind(offset);

    let rows = query
      .build_query_as::<PostViewRow>()
      .fetch_all(&mut *tx)
      .await
      .into_db_error()?;
    tx.commit().await.into_db_error()?;

    let items = rows.into_iter().map(PostView::from).collect();
    Ok(paginator.page(number, total_items, items))
  }
}
