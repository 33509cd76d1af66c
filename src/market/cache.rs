use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::model::price::Series;

pub const DEFAULT_TTL_MS: i64 = 12 * 60 * 60 * 1000;

/// Fetched series keyed by ticker, each stamped with its fetch time.
pub struct SeriesCache {
    conn: Connection,
    ttl_ms: i64,
}

impl SeriesCache {
    pub fn open(path: &Path, ttl_ms: i64) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Self::with_connection(conn, ttl_ms)
    }

    pub fn open_in_memory(ttl_ms: i64) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, ttl_ms)
    }

    fn with_connection(conn: Connection, ttl_ms: i64) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS series_cache (
                ticker TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                fetched_at_ms INTEGER NOT NULL
            );
            "#,
        )
        .context("failed to create series_cache table")?;
        Ok(Self { conn, ttl_ms })
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Stored series for `ticker` if it was fetched less than the TTL ago.
    pub fn get(&self, ticker: &str, now_ms: i64) -> Result<Option<Series>> {
        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT payload, fetched_at_ms FROM series_cache WHERE ticker = ?1",
                params![ticker],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("failed to query series_cache")?;

        let Some((payload, fetched_at_ms)) = row else {
            return Ok(None);
        };
        if now_ms.saturating_sub(fetched_at_ms) >= self.ttl_ms {
            tracing::debug!(ticker = %ticker, fetched_at_ms, "cached series is stale");
            return Ok(None);
        }
        let series: Series =
            serde_json::from_str(&payload).context("failed to parse cached series json")?;
        Ok(Some(series))
    }

    pub fn put(&self, ticker: &str, series: &Series, now_ms: i64) -> Result<()> {
        let payload = serde_json::to_string(series).context("failed to serialize series")?;
        self.conn
            .execute(
                r#"
                INSERT INTO series_cache (ticker, payload, fetched_at_ms)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(ticker) DO UPDATE SET
                    payload = excluded.payload,
                    fetched_at_ms = excluded.fetched_at_ms
                "#,
                params![ticker, payload, now_ms],
            )
            .context("failed to upsert series_cache row")?;
        Ok(())
    }
}
