//! Persistence for the session-unlocked API key (file key source).

use anyhow::Result;
use sqlx::Row;

use super::db::ScanDb;
use super::types::TempApiKey;

impl ScanDb {
    /// Cache a key unlocked from a file, stamped with the unlock time.
    pub async fn store_temp_key(&self, api_key: &str, stored_at_ms: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO temp_api_key (id, api_key, stored_at_ms)
            VALUES (1, ?1, ?2)
            "#,
        )
        .bind(api_key)
        .bind(stored_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Load the cached key, if any. Freshness is the caller's concern.
    pub async fn load_temp_key(&self) -> Result<Option<TempApiKey>> {
        let row = sqlx::query(
            r#"
            SELECT api_key, stored_at_ms
            FROM temp_api_key
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| TempApiKey {
            api_key: row.get("api_key"),
            stored_at_ms: row.get("stored_at_ms"),
        }))
    }

    /// Drop the cached key (expiry or explicit lock).
    pub async fn clear_temp_key(&self) -> Result<()> {
        sqlx::query("DELETE FROM temp_api_key WHERE id = 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
