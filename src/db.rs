use sqlx::{sqlite::{SqlitePoolOptions, SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous}, Pool, Sqlite, ConnectOptions, Row};
use chrono::{Utc, DateTime};
use std::str::FromStr;
use log::info;

use crate::error::StoreError;
use crate::models::Deck;
use crate::persist::{self, SCHEMA_VERSION};

/// Key-value store of whole decks, one row per deck key.
///
/// Each row holds the exported JSON envelope; the engine never sees the database.
#[derive(Clone)]
pub struct DeckStore {
    pool: Pool<Sqlite>,
}

impl DeckStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .log_statements(log::LevelFilter::Trace);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = DeckStore { pool };
        store.migrate().await?;
        info!("deck store ready at {}", url);

        Ok(store)
    }

    /// Private in-memory database. A single connection, since every SQLite
    /// memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .log_statements(log::LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = DeckStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub(crate) async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS decks (
                deck_key TEXT PRIMARY KEY,
                payload TEXT NOT NULL
            );
            "#
        )
        .execute(&self.pool)
        .await?;

        // Columns added after the first release
        self.add_column("ALTER TABLE decks ADD COLUMN schema_version INTEGER DEFAULT 1").await?;
        self.add_column("ALTER TABLE decks ADD COLUMN updated_at DATETIME").await?;

        Ok(())
    }

    /// Runs an `ADD COLUMN` migration; a column that already exists is not an error.
    async fn add_column(&self, sql: &str) -> Result<(), StoreError> {
        match sqlx::query(sql).execute(&self.pool).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.message().contains("duplicate column name") => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn load(&self, deck_key: &str) -> Result<Option<Deck>, StoreError> {
        let row = sqlx::query("SELECT payload FROM decks WHERE deck_key = ?")
            .bind(deck_key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let payload: String = row.try_get("payload")?;
                Ok(Some(persist::import_json(&payload)?))
            }
            None => Ok(None),
        }
    }

    /// Replaces the stored deck in one transaction, so a reader never sees a partial write.
    pub async fn save(&self, deck_key: &str, deck: &Deck, now: DateTime<Utc>) -> Result<(), StoreError> {
        let payload = persist::export_json(deck, now)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO decks (deck_key, payload, schema_version, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(deck_key) DO UPDATE SET
                payload = excluded.payload,
                schema_version = excluded.schema_version,
                updated_at = excluded.updated_at
            "#
        )
        .bind(deck_key)
        .bind(payload)
        .bind(i64::from(SCHEMA_VERSION))
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT deck_key FROM decks ORDER BY deck_key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }

    /// Returns whether a deck was actually removed.
    pub async fn delete(&self, deck_key: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM decks WHERE deck_key = ?")
            .bind(deck_key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn updated_at(&self, deck_key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        let updated: Option<Option<DateTime<Utc>>> =
            sqlx::query_scalar("SELECT updated_at FROM decks WHERE deck_key = ?")
                .bind(deck_key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(updated.flatten())
    }
}
