//! SQLite-backed retail store

use crate::store::{
    DebateRecord, MarketSignal, Product, RetailStore, StoreError, UndercutSignal,
};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// SQLite retail store
pub struct SqliteRetailStore {
    pool: SqlitePool,
}

impl SqliteRetailStore {
    /// Open (or create) a store at the given path
    ///
    /// The pool is pinned to one connection: access is sequential in this
    /// pipeline, and an in-memory database must not be split across
    /// connections.
    pub async fn new(db_path: &str) -> Result<Self> {
        let url = if db_path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", db_path)
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .context("Failed to connect to retail database")?;

        let store = Self { pool };
        store.init().await?;

        Ok(store)
    }

    /// Open the store at the default platform data path
    pub async fn with_default_path() -> Result<Self> {
        let data_dir = dirs::data_local_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
        let db_dir = data_dir.join("council");
        std::fs::create_dir_all(&db_dir)?;

        let db_path = db_dir.join("retail.db");
        Self::new(db_path.to_str().context("Non-UTF-8 database path")?).await
    }

    /// Initialize the schema
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                product_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                cost_price REAL NOT NULL,
                current_stock INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS market_signals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id TEXT NOT NULL,
                competitor_name TEXT NOT NULL,
                detected_price REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS council_debates (
                id TEXT PRIMARY KEY,
                undercut_signals TEXT NOT NULL,
                cmo_proposal TEXT NOT NULL,
                cfo_rebuttal TEXT NOT NULL,
                ops_input TEXT NOT NULL,
                ceo_decision TEXT NOT NULL,
                decided_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_signals_product ON market_signals(product_id);
            CREATE INDEX IF NOT EXISTS idx_debates_decided_at ON council_debates(decided_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or replace a product row
    pub async fn upsert_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO products (product_id, name, cost_price, current_stock)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&product.product_id)
        .bind(&product.name)
        .bind(product.cost_price)
        .bind(product.current_stock)
        .execute(&self.pool)
        .await
        .context("Failed to upsert product")?;

        Ok(())
    }

    /// Record a competitor price observation
    pub async fn add_signal(&self, signal: &MarketSignal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO market_signals (product_id, competitor_name, detected_price)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&signal.product_id)
        .bind(&signal.competitor_name)
        .bind(signal.detected_price)
        .execute(&self.pool)
        .await
        .context("Failed to add market signal")?;

        Ok(())
    }

    fn to_naive(dt: DateTime<Utc>) -> NaiveDateTime {
        dt.naive_utc()
    }

    fn from_naive(dt: NaiveDateTime) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(dt, Utc)
    }

    fn unavailable(err: sqlx::Error) -> StoreError {
        StoreError::Unavailable(err.to_string())
    }

    fn debate_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<DebateRecord, StoreError> {
        let parse = |column: &str| -> Result<serde_json::Value, StoreError> {
            serde_json::from_str(&row.get::<String, _>(column))
                .map_err(|e| StoreError::Unavailable(format!("corrupt {} column: {}", column, e)))
        };

        Ok(DebateRecord {
            undercut_signals: parse("undercut_signals")?,
            cmo_proposal: row.get("cmo_proposal"),
            cfo_rebuttal: row.get("cfo_rebuttal"),
            ops_input: row.get("ops_input"),
            ceo_decision: parse("ceo_decision")?,
            decided_at: Self::from_naive(row.get("decided_at")),
        })
    }
}

#[async_trait::async_trait]
impl RetailStore for SqliteRetailStore {
    async fn undercut_signals(&self) -> Result<Vec<UndercutSignal>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT p.product_id, p.name, p.cost_price, s.competitor_name, s.detected_price
            FROM products p
            JOIN market_signals s ON s.product_id = p.product_id
            WHERE s.detected_price < p.cost_price
            ORDER BY p.product_id, s.detected_price
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::unavailable)?;

        Ok(rows
            .iter()
            .map(|row| UndercutSignal {
                product_id: row.get("product_id"),
                name: row.get("name"),
                cost_price: row.get("cost_price"),
                competitor_name: row.get("competitor_name"),
                detected_price: row.get("detected_price"),
            })
            .collect())
    }

    async fn stock_level(&self, product_id: &str) -> Result<Option<i64>, StoreError> {
        let row = sqlx::query("SELECT current_stock FROM products WHERE product_id = ?1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::unavailable)?;

        Ok(row.map(|r| r.get::<i64, _>("current_stock")))
    }

    async fn recent_debates(&self, limit: usize) -> Result<Vec<DebateRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT undercut_signals, cmo_proposal, cfo_rebuttal, ops_input, ceo_decision, decided_at
            FROM council_debates
            ORDER BY decided_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::unavailable)?;

        rows.iter().map(Self::debate_from_row).collect()
    }

    async fn log_debate(&self, record: &DebateRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO council_debates
            (id, undercut_signals, cmo_proposal, cfo_rebuttal, ops_input, ceo_decision, decided_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(record.undercut_signals.to_string())
        .bind(&record.cmo_proposal)
        .bind(&record.cfo_rebuttal)
        .bind(&record.ops_input)
        .bind(record.ceo_decision.to_string())
        .bind(Self::to_naive(record.decided_at))
        .execute(&self.pool)
        .await
        .map_err(Self::unavailable)?;

        Ok(())
    }
}
