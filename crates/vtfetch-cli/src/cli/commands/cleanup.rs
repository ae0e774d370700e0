//! `vtfetch cleanup` – sweep old scan records, once or hourly.

use anyhow::Result;
use chrono::Local;
use vtfetch_core::cleanup;
use vtfetch_core::config::VtfetchConfig;
use vtfetch_core::scan_db::ScanDb;

pub async fn run_cleanup(db: &ScanDb, cfg: &VtfetchConfig, watch: bool) -> Result<()> {
    if watch {
        match cfg.auto_remove_after_days() {
            Some(days) => println!(
                "Sweeping scans older than {days} days every hour (Ctrl-C to stop)."
            ),
            None => println!(
                "auto_remove_days is \"{}\"; watching anyway, sweeps will be no-ops.",
                cfg.auto_remove_days
            ),
        }
        cleanup::run_cleanup_watch(db, cfg).await;
        return Ok(());
    }

    let removed = cleanup::cleanup_old_scans(db, cfg, Local::now()).await?;
    match cfg.auto_remove_after_days() {
        Some(days) => println!("Removed {removed} scan records older than {days} days."),
        None => println!(
            "Auto-removal is disabled (auto_remove_days = \"{}\").",
            cfg.auto_remove_days
        ),
    }
    Ok(())
}
