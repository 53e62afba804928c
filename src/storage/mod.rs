//! Persistence layer.
//!
//! Stores generated parlays in SQLite. The table is created on connect
//! if missing; there are no migrations. Records are only ever inserted
//! here. Moving a parlay from `pending` to `won`/`lost` is left to
//! whatever grades results.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, info};

use crate::types::{ParlayRecord, ParlayResult, ParlayStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS parlays (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    platform TEXT NOT NULL,
    bets TEXT NOT NULL,
    odds REAL NOT NULL,
    hit_rate REAL NOT NULL,
    outcome TEXT NOT NULL
)";

/// SQLite-backed parlay store.
#[derive(Clone)]
pub struct ParlayStore {
    pool: SqlitePool,
}

impl ParlayStore {
    /// Open (creating if needed) the database at `url`, e.g. `sqlite://parlays.db`.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database url: {url}"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {url}"))?;

        let store = Self { pool };
        store.init().await?;
        info!(url, "Parlay store ready");
        Ok(store)
    }

    /// Private in-memory database (single connection so it persists).
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database url")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .context("Failed to create parlays table")?;
        Ok(())
    }

    /// Insert a record and return its row id.
    pub async fn insert(&self, record: &ParlayRecord) -> Result<i64> {
        let bets = serde_json::to_string(&record.result.bets).context("Failed to serialise bets")?;

        let result = sqlx::query(
            "INSERT INTO parlays (date, platform, bets, odds, hit_rate, outcome) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(record.date.format(DATE_FORMAT).to_string())
        .bind(&record.result.platform)
        .bind(bets)
        .bind(record.result.american_odds)
        .bind(record.result.hit_rate)
        .bind(record.status.as_str())
        .execute(&self.pool)
        .await
        .context("Failed to insert parlay")?;

        let id = result.last_insert_rowid();
        debug!(id, platform = %record.result.platform, date = %record.date, "Parlay saved");
        Ok(id)
    }

    /// The `limit` most recent records, newest date first (newest row first within a day).
    pub async fn recent(&self, limit: u32) -> Result<Vec<ParlayRecord>> {
        let rows = sqlx::query(
            "SELECT id, date, platform, bets, odds, hit_rate, outcome FROM parlays
             ORDER BY date DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .context("Failed to query parlay history")?;

        rows.iter().map(row_to_record).collect()
    }

    pub async fn count(&self) -> Result<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parlays")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count parlays")?;
        Ok(n)
    }
}

fn row_to_record(row: &SqliteRow) -> Result<ParlayRecord> {
    let id: i64 = row.try_get("id")?;
    let date: String = row.try_get("date")?;
    let bets: String = row.try_get("bets")?;
    let outcome: String = row.try_get("outcome")?;

    Ok(ParlayRecord {
        id: Some(id),
        date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .with_context(|| format!("Bad date '{date}' in parlay {id}"))?,
        result: ParlayResult {
            platform: row.try_get("platform")?,
            bets: serde_json::from_str(&bets)
                .with_context(|| format!("Bad bets column in parlay {id}"))?,
            american_odds: row.try_get("odds")?,
            hit_rate: row.try_get("hit_rate")?,
        },
        status: ParlayStatus::from_str(&outcome)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
