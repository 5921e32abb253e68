//! Persistent store of collected image URLs using SQLite.
//!
//! One flat table keyed by source URL. The `src` UNIQUE constraint is the
//! sole deduplication mechanism: the same image re-observed across scroll
//! passes (or across keywords) collapses to a single row. Records are never
//! deleted; the only mutation after insert is the one-way `downloaded` and
//! `processed` flag transitions driven by a downstream consumer.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};

/// SQL schema for the image store (idempotent, run on every open)
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    keyword TEXT NOT NULL,
    src TEXT NOT NULL UNIQUE,
    alt TEXT,
    downloaded INTEGER DEFAULT 0,
    processed INTEGER DEFAULT 0,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
"#;

/// One collected image URL with its lifecycle flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: i64,
    /// Search term that produced this record
    pub keyword: String,
    /// Image resource locator, unique across all records
    pub src: String,
    /// Descriptive text from the source element, if any
    pub alt: Option<String>,
    pub downloaded: bool,
    pub processed: bool,
    /// Assigned by SQLite at insertion time
    pub created_at: String,
}

/// Predicate counts over the full record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub total: i64,
    pub downloaded: i64,
    pub processed: i64,
}

/// Handle to the image store.
///
/// Cheap to clone (wraps a `SqlitePool`). Held explicitly by the driver and
/// passed down to the collector; there is no process-global connection state.
#[derive(Clone)]
pub struct ImageStore {
    pool: SqlitePool,
}

impl ImageStore {
    /// Open the store at `db_path`, creating the database file and schema
    /// if they do not exist. Safe to call on every startup.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .context("Failed to open SQLite database")?;

        sqlx::query(SCHEMA_SQL)
            .execute(&pool)
            .await
            .context("Failed to initialize image store schema")?;

        Ok(Self { pool })
    }

    /// Insert a candidate unless its `src` is already present.
    ///
    /// Returns `true` iff a new row was created. Duplicates are an expected,
    /// frequent condition (repeated scrolls re-observe the same images) and
    /// are absorbed silently rather than surfaced as errors.
    pub async fn insert(&self, keyword: &str, src: &str, alt: Option<&str>) -> Result<bool> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO images (keyword, src, alt) VALUES (?, ?, ?)")
                .bind(keyword)
                .bind(src)
                .bind(alt)
                .execute(&self.pool)
                .await
                .context("Failed to insert image record")?;

        Ok(result.rows_affected() > 0)
    }

    /// Up to `limit` records that have not been downloaded yet, in insertion
    /// order. Consumed by an external downloader, not by the collector.
    pub async fn list_pending(&self, limit: i64) -> Result<Vec<ImageRecord>> {
        type Row = (i64, String, String, Option<String>, i64, i64, String);

        let rows: Vec<Row> = sqlx::query_as(
            r#"
            SELECT id, keyword, src, alt, downloaded, processed, created_at
            FROM images WHERE downloaded = 0
            ORDER BY id LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query pending images")?;

        Ok(rows
            .into_iter()
            .map(
                |(id, keyword, src, alt, downloaded, processed, created_at)| ImageRecord {
                    id,
                    keyword,
                    src,
                    alt,
                    downloaded: downloaded != 0,
                    processed: processed != 0,
                    created_at,
                },
            )
            .collect())
    }

    /// Mark a record as downloaded. No-op if the id is absent or the flag is
    /// already set; the transition is one-way.
    pub async fn mark_downloaded(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE images SET downloaded = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to mark image as downloaded")?;
        Ok(())
    }

    /// Mark a record as processed. Same no-op semantics as
    /// [`mark_downloaded`](Self::mark_downloaded). Nothing ties this flag to
    /// `downloaded` at the schema level.
    pub async fn mark_processed(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE images SET processed = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to mark image as processed")?;
        Ok(())
    }

    /// Total/downloaded/processed counts over the full record set.
    pub async fn stats(&self) -> Result<StoreStats> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM images")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count images")?;

        let (downloaded,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM images WHERE downloaded = 1")
                .fetch_one(&self.pool)
                .await
                .context("Failed to count downloaded images")?;

        let (processed,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM images WHERE processed = 1")
                .fetch_one(&self.pool)
                .await
                .context("Failed to count processed images")?;

        Ok(StoreStats {
            total,
            downloaded,
            processed,
        })
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
