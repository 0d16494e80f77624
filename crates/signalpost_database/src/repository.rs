//! Repository implementation over a diesel connection pool.

use crate::connection::PgPool;
use crate::models::{
    NewPostRow, NewWinBatchRow, NewWinMessageRow, NewWinPercentRow, PostRow, UpdatePostRow,
    WinBatchRow, WinMessageRow, WinPercentRow,
};
use crate::schema::{posts, win_batches, win_messages, win_percents};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use signalpost_core::{
    FileRef, NewPost, NewWinMessage, NewWinPercent, Post, WinBatch, WinMessage, WinPercent,
};
use signalpost_error::{DatabaseError, DatabaseErrorKind, SignalpostResult};
use signalpost_interface::Repository;

/// PostgreSQL-backed repository.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run `query` on a pooled connection off the async runtime.
    async fn with_conn<T, F>(&self, query: F) -> SignalpostResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, DatabaseError> + Send + 'static,
    {
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            query(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())))?;
        Ok(result?)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    #[tracing::instrument(skip(self, post))]
    async fn create_post(&self, post: NewPost) -> SignalpostResult<Post> {
        let row = NewPostRow::from(post);
        self.with_conn(move |conn| {
            let stored: PostRow = diesel::insert_into(posts::table)
                .values(&row)
                .returning(PostRow::as_returning())
                .get_result(conn)?;
            Ok(stored.into())
        })
        .await
    }

    async fn get_post(&self, id: i32) -> SignalpostResult<Option<Post>> {
        self.with_conn(move |conn| {
            let row = posts::table
                .find(id)
                .select(PostRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(Post::from))
        })
        .await
    }

    #[tracing::instrument(skip(self, post), fields(post_id = post.id))]
    async fn update_post(&self, post: &Post) -> SignalpostResult<()> {
        let id = post.id;
        let changes = UpdatePostRow::from(post);
        self.with_conn(move |conn| {
            let updated = diesel::update(posts::table.find(id))
                .set(&changes)
                .execute(conn)?;
            if updated == 0 {
                return Err(DatabaseError::new(DatabaseErrorKind::NotFound));
            }
            Ok(())
        })
        .await
    }

    async fn delete_post(&self, id: i32) -> SignalpostResult<()> {
        self.with_conn(move |conn| {
            diesel::delete(posts::table.find(id)).execute(conn)?;
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self, win_photos), fields(count = win_photos.len()))]
    async fn create_win_batch(&self, win_photos: Vec<FileRef>) -> SignalpostResult<WinBatch> {
        let row = NewWinBatchRow {
            win_photo_ids: win_photos.into_iter().map(|photo| photo.0).collect(),
        };
        self.with_conn(move |conn| {
            let stored: WinBatchRow = diesel::insert_into(win_batches::table)
                .values(&row)
                .returning(WinBatchRow::as_returning())
                .get_result(conn)?;
            Ok(stored.into())
        })
        .await
    }

    async fn get_win_batch(&self, id: i32) -> SignalpostResult<Option<WinBatch>> {
        self.with_conn(move |conn| {
            let row = win_batches::table
                .find(id)
                .select(WinBatchRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(WinBatch::from))
        })
        .await
    }

    async fn update_win_batch(&self, batch: &WinBatch) -> SignalpostResult<()> {
        let id = batch.id;
        let is_published = batch.is_published;
        self.with_conn(move |conn| {
            let updated = diesel::update(win_batches::table.find(id))
                .set(win_batches::is_published.eq(is_published))
                .execute(conn)?;
            if updated == 0 {
                return Err(DatabaseError::new(DatabaseErrorKind::NotFound));
            }
            Ok(())
        })
        .await
    }

    async fn delete_win_batch(&self, id: i32) -> SignalpostResult<()> {
        self.with_conn(move |conn| {
            diesel::delete(win_batches::table.find(id)).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn record_win_percent(&self, sample: NewWinPercent) -> SignalpostResult<WinPercent> {
        let row = NewWinPercentRow::from(sample);
        self.with_conn(move |conn| {
            let stored: WinPercentRow = diesel::insert_into(win_percents::table)
                .values(&row)
                .returning(WinPercentRow::as_returning())
                .get_result(conn)?;
            Ok(stored.into())
        })
        .await
    }

    async fn best_win_percent_since(
        &self,
        since: DateTime<Utc>,
    ) -> SignalpostResult<Option<WinPercent>> {
        self.with_conn(move |conn| {
            let row = win_percents::table
                .filter(win_percents::created_at.ge(since))
                .order((win_percents::win_percent.desc(), win_percents::id.asc()))
                .select(WinPercentRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(WinPercent::from))
        })
        .await
    }

    async fn record_win_message(&self, message: NewWinMessage) -> SignalpostResult<WinMessage> {
        let row = NewWinMessageRow::from(message);
        self.with_conn(move |conn| {
            let stored: WinMessageRow = diesel::insert_into(win_messages::table)
                .values(&row)
                .returning(WinMessageRow::as_returning())
                .get_result(conn)?;
            Ok(stored.into())
        })
        .await
    }

    async fn win_messages_for(&self, win_photo: &FileRef) -> SignalpostResult<Vec<WinMessage>> {
        let photo = win_photo.0.clone();
        self.with_conn(move |conn| {
            let rows = win_messages::table
                .filter(win_messages::win_photo_id.eq(photo))
                .order(win_messages::id.asc())
                .select(WinMessageRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(WinMessage::from).collect())
        })
        .await
    }
}
