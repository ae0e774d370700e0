//! Scan record write operations: insert, flag updates, removal, sweep.

use anyhow::Result;

use super::super::db::ScanDb;
use super::super::types::ScanRecord;

impl ScanDb {
    /// Insert a scan record under `key`. A same-key insert replaces the
    /// existing row (last write wins).
    pub async fn insert_scan(&self, key: &str, record: &ScanRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO scans (
                key, filename, url, scan_id, permalink, timestamp,
                auto_download, show_download_button, show_disregard_button
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(key)
        .bind(&record.filename)
        .bind(&record.url)
        .bind(&record.scan_id)
        .bind(&record.permalink)
        .bind(&record.timestamp)
        .bind(record.auto_download as i64)
        .bind(record.show_download_button as i64)
        .bind(record.show_disregard_button as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Flag a record so the report view starts the download when opened.
    pub async fn mark_auto_download(&self, key: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE scans
            SET auto_download = 1
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Flag a record for manual review: download allowed, disregard offered.
    pub async fn mark_review_buttons(&self, key: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE scans
            SET show_download_button = 1,
                show_disregard_button = 1
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete a scan record. Returns whether a row existed; removing an
    /// absent key is not an error (stable under repeats).
    pub async fn remove_scan(&self, key: &str) -> Result<bool> {
        let r = sqlx::query(
            r#"
            DELETE FROM scans
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected() > 0)
    }

    /// Delete all scan records older than `cutoff` (RFC 3339 UTC,
    /// millisecond precision; the stored text order is chronological).
    /// Returns the number of records removed.
    pub async fn remove_scans_older_than(&self, cutoff: &str) -> Result<u64> {
        let r = sqlx::query(
            r#"
            DELETE FROM scans
            WHERE timestamp < ?1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected())
    }
}
