//! Persistence for the single-row usage counters.

use anyhow::{Context, Result};
use sqlx::Row;

use super::db::ScanDb;
use super::types::UsageState;

impl ScanDb {
    /// Load the usage counters. `Ok(None)` when nothing has been recorded
    /// yet; a malformed window column is an error (callers fall back to the
    /// fresh state and log).
    pub async fn load_usage(&self) -> Result<Option<UsageState>> {
        let row = sqlx::query(
            r#"
            SELECT requests_json, daily_count, monthly_count,
                   last_reset_day, last_reset_month
            FROM api_usage
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let requests_json: String = row.get("requests_json");
        let requests: Vec<i64> =
            serde_json::from_str(&requests_json).context("parse usage request window")?;

        Ok(Some(UsageState {
            requests,
            daily_count: row.get::<i64, _>("daily_count") as u32,
            monthly_count: row.get::<i64, _>("monthly_count") as u32,
            last_reset_day: row.get("last_reset_day"),
            last_reset_month: row.get("last_reset_month"),
        }))
    }

    /// Persist the usage counters (upsert of the single row).
    pub async fn save_usage(&self, state: &UsageState) -> Result<()> {
        let requests_json = serde_json::to_string(&state.requests)?;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO api_usage (
                id, requests_json, daily_count, monthly_count,
                last_reset_day, last_reset_month
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(requests_json)
        .bind(state.daily_count as i64)
        .bind(state.monthly_count as i64)
        .bind(&state.last_reset_day)
        .bind(&state.last_reset_month)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
