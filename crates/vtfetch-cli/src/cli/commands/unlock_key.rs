//! `vtfetch unlock-key <path>` – cache the API key from a key file.

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use vtfetch_core::api_key::{self, TEMP_KEY_TTL_MS};
use vtfetch_core::scan_db::ScanDb;

pub async fn run_unlock_key(db: &ScanDb, path: &Path) -> Result<()> {
    let fingerprint = api_key::unlock_key(db, path, Local::now()).await?;
    println!(
        "API key unlocked for {} minutes (SHA-256 {fingerprint}).",
        TEMP_KEY_TTL_MS / 60_000
    );
    Ok(())
}
