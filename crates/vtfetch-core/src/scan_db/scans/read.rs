//! Scan record read operations: get and list.

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::super::db::ScanDb;
use super::super::types::{ScanEntry, ScanRecord};

fn record_from_row(row: &SqliteRow) -> ScanRecord {
    ScanRecord {
        filename: row.get("filename"),
        url: row.get("url"),
        scan_id: row.get("scan_id"),
        permalink: row.get("permalink"),
        timestamp: row.get("timestamp"),
        auto_download: row.get::<i64, _>("auto_download") != 0,
        show_download_button: row.get::<i64, _>("show_download_button") != 0,
        show_disregard_button: row.get::<i64, _>("show_disregard_button") != 0,
    }
}

impl ScanDb {
    /// Fetch a single scan record by its store key.
    pub async fn get_scan(&self, key: &str) -> Result<Option<ScanRecord>> {
        let row = sqlx::query(
            r#"
            SELECT filename, url, scan_id, permalink, timestamp,
                   auto_download, show_download_button, show_disregard_button
            FROM scans
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    /// List all scan records, newest first.
    pub async fn list_scans(&self) -> Result<Vec<ScanEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT key, filename, url, scan_id, permalink, timestamp,
                   auto_download, show_download_button, show_disregard_button
            FROM scans
            ORDER BY timestamp DESC, key DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(ScanEntry {
                key: row.get("key"),
                record: record_from_row(&row),
            });
        }

        Ok(out)
    }
}
