// ABOUTME: SQLite gallery store built on sqlx
// ABOUTME: Likes live in a (target, user) set table and are toggled inside one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::GalleryStore;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{
    CommentRecord, FinalizedPainting, LikeOutcome, LikeSet, LikeTarget, NewComment,
    PaintingRecord, PaintingStatus,
};

const PAINTING_KIND: &str = "painting";
const COMMENT_KIND: &str = "comment";

/// Fixed-width RFC 3339 so text ordering matches time ordering
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp '{raw}': {e}")))
}

fn limit_param(limit: Option<u32>) -> i64 {
    // SQLite treats a negative LIMIT as "no limit"
    limit.map_or(-1, i64::from)
}

/// `SQLite`-backed [`GalleryStore`]
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url` and run migrations
    ///
    /// File databases (and their parent directory) are created when missing.
    /// `sqlite::memory:` uses a single pooled connection so every query sees
    /// the same database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the URL is invalid, the connection fails,
    /// or a migration fails.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let is_memory = database_url.contains(":memory:");
        if !is_memory {
            if let Some(parent) = Path::new(options.get_filename()).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }

        let pool_options = if is_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to SQLite: {e}")))?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        info!(url = %database_url, "SQLite gallery store ready");
        Ok(store)
    }

    /// Wrap an existing pool without running migrations
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS paintings (
                id TEXT PRIMARY KEY,
                image_url TEXT,
                thumbnail_url TEXT,
                owner_id TEXT,
                price INTEGER,
                detail TEXT,
                status TEXT NOT NULL CHECK (status IN ('PENDING', 'READY')),
                created_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS comments (
                id TEXT PRIMARY KEY,
                painting_id TEXT NOT NULL,
                author_email TEXT NOT NULL,
                comment_text TEXT NOT NULL,
                reply_text TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS likes (
                target_kind TEXT NOT NULL CHECK (target_kind IN ('painting', 'comment')),
                target_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (target_kind, target_id, user_id)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_paintings_status_created ON paintings(status, created_at)",
            "CREATE INDEX IF NOT EXISTS idx_comments_painting ON comments(painting_id, created_at)",
            "CREATE INDEX IF NOT EXISTS idx_comments_author ON comments(author_email COLLATE NOCASE)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        debug!("Gallery schema migrated");
        Ok(())
    }

    async fn load_likes(&self, kind: &str, target_id: &str) -> AppResult<LikeSet> {
        let rows = sqlx::query(
            "SELECT user_id FROM likes WHERE target_kind = $1 AND target_id = $2",
        )
        .bind(kind)
        .bind(target_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load likes: {e}")))?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("user_id").map_err(AppError::from))
            .collect()
    }

    fn row_to_painting(row: &SqliteRow, liked_by: LikeSet) -> AppResult<PaintingRecord> {
        let status: String = row.try_get("status")?;
        let created_at: String = row.try_get("created_at")?;
        let record = PaintingRecord {
            id: row.try_get("id")?,
            image_url: row.try_get("image_url")?,
            thumbnail_url: row.try_get("thumbnail_url")?,
            owner_id: row.try_get("owner_id")?,
            liked_by: LikeSet::new(),
            like_count: 0,
            price: row.try_get("price")?,
            detail: row.try_get("detail")?,
            status: status.parse::<PaintingStatus>()?,
            created_at: parse_timestamp(&created_at)?,
        };
        Ok(record.with_likes(liked_by))
    }

    fn row_to_comment(row: &SqliteRow, liked_by: LikeSet) -> AppResult<CommentRecord> {
        let created_at: String = row.try_get("created_at")?;
        let record = CommentRecord {
            id: row.try_get("id")?,
            painting_id: row.try_get("painting_id")?,
            author_email: row.try_get("author_email")?,
            comment_text: row.try_get("comment_text")?,
            reply_text: row.try_get("reply_text")?,
            liked_by: LikeSet::new(),
            like_count: 0,
            created_at: parse_timestamp(&created_at)?,
        };
        Ok(record.with_likes(liked_by))
    }

    async fn hydrate_paintings(&self, rows: &[SqliteRow]) -> AppResult<Vec<PaintingRecord>> {
        let mut paintings = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let likes = self.load_likes(PAINTING_KIND, &id).await?;
            paintings.push(Self::row_to_painting(row, likes)?);
        }
        Ok(paintings)
    }

    async fn hydrate_comments(&self, rows: &[SqliteRow]) -> AppResult<Vec<CommentRecord>> {
        let mut comments = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let likes = self.load_likes(COMMENT_KIND, &id).await?;
            comments.push(Self::row_to_comment(row, likes)?);
        }
        Ok(comments)
    }
}

#[async_trait]
impl GalleryStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn insert_pending_painting(&self) -> AppResult<PaintingRecord> {
        let started = Instant::now();
        let record = PaintingRecord::pending(Uuid::new_v4().to_string(), Utc::now());

        sqlx::query("INSERT INTO paintings (id, status, created_at) VALUES ($1, $2, $3)")
            .bind(&record.id)
            .bind(record.status.as_str())
            .bind(format_timestamp(&record.created_at))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert painting: {e}")))?;

        AppLogger::log_database_operation(
            "insert",
            "paintings",
            true,
            started.elapsed().as_millis() as u64,
        );
        Ok(record)
    }

    async fn finalize_painting(&self, id: &str, finalized: &FinalizedPainting) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let updated = sqlx::query(
            r"
            UPDATE paintings
            SET image_url = $1, thumbnail_url = $2, owner_id = $3, price = $4, detail = $5,
                status = $6
            WHERE id = $7 AND status = $8
            ",
        )
        .bind(&finalized.image_url)
        .bind(&finalized.thumbnail_url)
        .bind(&finalized.owner_id)
        .bind(finalized.price)
        .bind(&finalized.detail)
        .bind(PaintingStatus::Ready.as_str())
        .bind(id)
        .bind(PaintingStatus::Pending.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to finalize painting: {e}")))?
        .rows_affected();

        if updated == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM likes WHERE target_kind = $1 AND target_id = $2")
            .bind(PAINTING_KIND)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to reset likes: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit finalize: {e}")))?;
        Ok(true)
    }

    async fn delete_painting(&self, id: &str) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let deleted = sqlx::query("DELETE FROM paintings WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete painting: {e}")))?
            .rows_affected();

        sqlx::query("DELETE FROM likes WHERE target_kind = $1 AND target_id = $2")
            .bind(PAINTING_KIND)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete painting likes: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit delete: {e}")))?;
        Ok(deleted > 0)
    }

    async fn get_painting(&self, id: &str) -> AppResult<Option<PaintingRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, image_url, thumbnail_url, owner_id, price, detail, status, created_at
            FROM paintings
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get painting: {e}")))?;

        match row {
            Some(row) => {
                let likes = self.load_likes(PAINTING_KIND, id).await?;
                Self::row_to_painting(&row, likes).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn list_paintings(&self, limit: Option<u32>) -> AppResult<Vec<PaintingRecord>> {
        let rows = sqlx::query(
            r"
            SELECT p.id, p.image_url, p.thumbnail_url, p.owner_id, p.price, p.detail, p.status,
                   p.created_at,
                   (SELECT COUNT(*) FROM likes l
                    WHERE l.target_kind = 'painting' AND l.target_id = p.id) AS like_count
            FROM paintings p
            WHERE p.status = $1
            ORDER BY p.created_at DESC, like_count DESC, p.rowid DESC
            LIMIT $2
            ",
        )
        .bind(PaintingStatus::Ready.as_str())
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list paintings: {e}")))?;

        self.hydrate_paintings(&rows).await
    }

    async fn toggle_like(&self, target: &LikeTarget, user_id: &str) -> AppResult<LikeOutcome> {
        let user_id = LikeSet::normalize(user_id);
        let kind = target.kind();
        let target_id = target.id();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        // Write first so the transaction takes the write lock before reading
        let removed = sqlx::query(
            "DELETE FROM likes WHERE target_kind = $1 AND target_id = $2 AND user_id = $3",
        )
        .bind(kind)
        .bind(target_id)
        .bind(&user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to remove like: {e}")))?
        .rows_affected();

        let liked = if removed > 0 {
            false
        } else {
            let exists_sql = match target {
                LikeTarget::Painting(_) => "SELECT 1 FROM paintings WHERE id = $1",
                LikeTarget::Comment(_) => "SELECT 1 FROM comments WHERE id = $1",
            };
            let exists = sqlx::query(exists_sql)
                .bind(target_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to look up {kind}: {e}")))?
                .is_some();
            if !exists {
                return Err(AppError::not_found(format!("{kind} {target_id}"))
                    .with_resource_id(target_id));
            }

            sqlx::query(
                r"
                INSERT OR IGNORE INTO likes (target_kind, target_id, user_id, created_at)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(kind)
            .bind(target_id)
            .bind(&user_id)
            .bind(format_timestamp(&Utc::now()))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to add like: {e}")))?;
            true
        };

        let like_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM likes WHERE target_kind = $1 AND target_id = $2",
        )
        .bind(kind)
        .bind(target_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to count likes: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit like toggle: {e}")))?;

        Ok(LikeOutcome {
            liked,
            like_count: usize::try_from(like_count).unwrap_or_default(),
        })
    }

    async fn insert_comment(&self, comment: NewComment) -> AppResult<CommentRecord> {
        let started = Instant::now();
        let record = CommentRecord::from_new(Uuid::new_v4().to_string(), comment);

        sqlx::query(
            r"
            INSERT INTO comments (id, painting_id, author_email, comment_text, reply_text, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&record.id)
        .bind(&record.painting_id)
        .bind(&record.author_email)
        .bind(&record.comment_text)
        .bind(&record.reply_text)
        .bind(format_timestamp(&record.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert comment: {e}")))?;

        AppLogger::log_database_operation(
            "insert",
            "comments",
            true,
            started.elapsed().as_millis() as u64,
        );
        Ok(record)
    }

    async fn get_comment(&self, id: &str) -> AppResult<Option<CommentRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, painting_id, author_email, comment_text, reply_text, created_at
            FROM comments
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get comment: {e}")))?;

        match row {
            Some(row) => {
                let likes = self.load_likes(COMMENT_KIND, id).await?;
                Self::row_to_comment(&row, likes).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn update_comment_text(
        &self,
        id: &str,
        comment_text: &str,
        reply_text: &str,
    ) -> AppResult<Option<CommentRecord>> {
        let updated = sqlx::query(
            "UPDATE comments SET comment_text = $1, reply_text = $2 WHERE id = $3",
        )
        .bind(comment_text)
        .bind(reply_text)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update comment: {e}")))?
        .rows_affected();

        if updated == 0 {
            return Ok(None);
        }
        self.get_comment(id).await
    }

    async fn delete_comment(&self, id: &str) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete comment: {e}")))?
            .rows_affected();

        sqlx::query("DELETE FROM likes WHERE target_kind = $1 AND target_id = $2")
            .bind(COMMENT_KIND)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete comment likes: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit delete: {e}")))?;
        Ok(deleted > 0)
    }

    async fn list_comments_for_painting(
        &self,
        painting_id: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<CommentRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, painting_id, author_email, comment_text, reply_text, created_at
            FROM comments
            WHERE painting_id = $1
            ORDER BY created_at DESC, rowid DESC
            LIMIT $2
            ",
        )
        .bind(painting_id)
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list comments: {e}")))?;

        self.hydrate_comments(&rows).await
    }

    async fn list_comments_by_author(
        &self,
        author_email: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<CommentRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, painting_id, author_email, comment_text, reply_text, created_at
            FROM comments
            WHERE author_email = $1 COLLATE NOCASE
            ORDER BY created_at DESC, rowid DESC
            LIMIT $2
            ",
        )
        .bind(author_email.trim())
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list comments: {e}")))?;

        self.hydrate_comments(&rows).await
    }
}
