//! `vtfetch remove <scan-key>` – delete a scan record.

use anyhow::Result;
use vtfetch_core::scan_db::ScanDb;

/// Removing an absent key is not an error; the end state is the same.
pub async fn run_remove(db: &ScanDb, scan_key: &str) -> Result<()> {
    if db.remove_scan(scan_key).await? {
        println!("Removed {scan_key}");
    } else {
        println!("No scan record for {scan_key} (nothing removed).");
    }
    Ok(())
}
