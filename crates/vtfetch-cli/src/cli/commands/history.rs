//! `vtfetch history` – list recorded scans, newest first.

use anyhow::Result;
use vtfetch_core::scan_db::{ScanDb, ScanRecord};

fn flags_label(record: &ScanRecord) -> &'static str {
    if record.auto_download {
        "auto"
    } else if record.show_download_button || record.show_disregard_button {
        "review"
    } else {
        "-"
    }
}

pub async fn run_history(db: &ScanDb) -> Result<()> {
    let entries = db.list_scans().await?;
    if entries.is_empty() {
        println!("No scans recorded.");
        return Ok(());
    }

    println!(
        "{:<20} {:<24} {:<26} {:<8} {}",
        "KEY", "FILENAME", "SUBMITTED", "FLAGS", "URL"
    );
    for entry in entries {
        let r = &entry.record;
        println!(
            "{:<20} {:<24} {:<26} {:<8} {}",
            entry.key,
            r.filename,
            r.timestamp,
            flags_label(r),
            r.url
        );
    }
    Ok(())
}
