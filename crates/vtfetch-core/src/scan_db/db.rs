//! SQLite-backed scan database implementation.
//!
//! Handles connection and migrations. Record CRUD lives in `scans`,
//! counter persistence in `usage`, the unlocked key in `temp_key`.

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the SQLite-backed scan database.
///
/// The database file is stored under the XDG state directory:
/// `~/.local/state/vtfetch/scans.db` on Debian.
#[derive(Clone)]
pub struct ScanDb {
    pub(crate) pool: Pool<Sqlite>,
}

impl ScanDb {
    /// Open (or create) the default scan database and run migrations.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("vtfetch")?;
        let state_dir = xdg_dirs.get_state_home();
        let db_path = state_dir.join("scans.db");

        // Ensure parent directory exists.
        tokio::fs::create_dir_all(&state_dir).await?;

        let uri = path_to_sqlite_uri(&db_path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect(&uri)
            .await?;

        let db = ScanDb { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    /// Intended for tests so the DB can be placed in a temp directory.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect(&uri)
            .await?;
        let db = ScanDb { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        // One statement per table: sqlx prepares each query individually.
        //
        // - `scans.key` is the `scan_<epoch-ms>` identifier; re-inserting a
        //   key replaces the row (last write wins).
        // - `api_usage` and `temp_api_key` are single-row tables (id = 1).
        // - `requests_json` holds the sliding-window timestamps as JSON.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS scans (
                key TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                url TEXT NOT NULL,
                scan_id TEXT NOT NULL,
                permalink TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                auto_download INTEGER NOT NULL DEFAULT 0,
                show_download_button INTEGER NOT NULL DEFAULT 0,
                show_disregard_button INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS api_usage (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                requests_json TEXT NOT NULL,
                daily_count INTEGER NOT NULL,
                monthly_count INTEGER NOT NULL,
                last_reset_day TEXT NOT NULL,
                last_reset_month TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS temp_api_key (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                api_key TEXT NOT NULL,
                stored_at_ms INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
impl ScanDb {
    /// Open an in-memory database for tests (no disk I/O).
    ///
    /// Pool timers are disabled (no acquire-time ping, no idle/lifetime
    /// reaper): under a paused tokio clock, any pending timer auto-advances
    /// and fires while the SQLite worker thread is still replying.
    pub(crate) async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .test_before_acquire(false)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let db = ScanDb { pool };
        db.migrate().await?;
        Ok(db)
    }
}
