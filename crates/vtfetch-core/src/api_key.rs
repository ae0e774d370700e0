//! Resolving the VirusTotal API key from its configured source.
//!
//! `config` keys live in the TOML file. `file` keys are unlocked once per
//! session (`vtfetch unlock-key <path>`) and cached in the store with a
//! short time-to-live, so the key itself never lands in the config.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{KeySource, VtfetchConfig};
use crate::scan_db::ScanDb;

/// How long a file-unlocked key stays usable.
pub const TEMP_KEY_TTL_MS: i64 = 5 * 60 * 1000;

/// User-facing reasons an API key could not be produced.
///
/// Every variant is a configuration problem the user can fix without
/// touching the store, so callers surface the message verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Please set your VirusTotal API key in the configuration file.")]
    NotConfigured,
    #[error("No unlocked API key. Run vtfetch unlock-key <key-file> first.")]
    NotUnlocked,
    #[error("Unlocked API key has expired. Run vtfetch unlock-key <key-file> again.")]
    UnlockExpired,
}

/// Produce the key for an outgoing request, honoring `key_source`.
///
/// A store that cannot be read behaves like one with no cached key; the
/// unlock path will rewrite it.
pub async fn resolve_api_key(
    db: &ScanDb,
    config: &VtfetchConfig,
    now: DateTime<Local>,
) -> Result<String, KeyError> {
    match config.key_source {
        KeySource::Config => config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or(KeyError::NotConfigured),
        KeySource::File => {
            let cached = match db.load_temp_key().await {
                Ok(cached) => cached,
                Err(err) => {
                    warn!("failed to load unlocked key: {err:#}");
                    None
                }
            };
            let Some(cached) = cached else {
                return Err(KeyError::NotUnlocked);
            };
            if now.timestamp_millis() - cached.stored_at_ms >= TEMP_KEY_TTL_MS {
                debug!("unlocked key expired, clearing it");
                if let Err(err) = db.clear_temp_key().await {
                    warn!("failed to clear expired key: {err:#}");
                }
                return Err(KeyError::UnlockExpired);
            }
            Ok(cached.api_key)
        }
    }
}

/// Read a key file, cache its trimmed content, and return a short
/// SHA-256 fingerprint so the user can tell which key was unlocked.
pub async fn unlock_key(db: &ScanDb, path: &Path, now: DateTime<Local>) -> Result<String> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read key file {}", path.display()))?;
    let key = raw.trim();
    if key.is_empty() {
        bail!("key file {} is empty", path.display());
    }
    db.store_temp_key(key, now.timestamp_millis()).await?;
    Ok(key_fingerprint(key))
}

/// First 16 hex chars of the key's SHA-256, for display only.
pub fn key_fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let mut fingerprint = hex::encode(digest);
    fingerprint.truncate(16);
    fingerprint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessLevel;
    use chrono::TimeZone;
    use std::io::Write;

    fn config_with(key: Option<&str>, source: KeySource) -> VtfetchConfig {
        VtfetchConfig {
            api_key: key.map(str::to_string),
            key_source: source,
            access_level: AccessLevel::Free,
            download_automatically: false,
            always_show_report: false,
            auto_remove_days: "never".to_string(),
            download_dir: None,
        }
    }

    fn at_ms(ms: i64) -> DateTime<Local> {
        Local.timestamp_millis_opt(ms).unwrap()
    }

    #[tokio::test]
    async fn config_source_returns_trimmed_key() {
        let db = ScanDb::open_memory().await.unwrap();
        let config = config_with(Some("  abc123  "), KeySource::Config);
        let key = resolve_api_key(&db, &config, Local::now()).await.unwrap();
        assert_eq!(key, "abc123");
    }

    #[tokio::test]
    async fn config_source_rejects_blank_key() {
        let db = ScanDb::open_memory().await.unwrap();
        let config = config_with(Some("   "), KeySource::Config);
        let err = resolve_api_key(&db, &config, Local::now())
            .await
            .unwrap_err();
        assert_eq!(err, KeyError::NotConfigured);
    }

    #[tokio::test]
    async fn file_source_needs_an_unlock() {
        let db = ScanDb::open_memory().await.unwrap();
        let config = config_with(None, KeySource::File);
        let err = resolve_api_key(&db, &config, Local::now())
            .await
            .unwrap_err();
        assert_eq!(err, KeyError::NotUnlocked);
    }

    #[tokio::test]
    async fn file_source_returns_fresh_unlocked_key() {
        let db = ScanDb::open_memory().await.unwrap();
        let config = config_with(None, KeySource::File);
        db.store_temp_key("unlocked", at_ms(1_000_000).timestamp_millis())
            .await
            .unwrap();

        let key = resolve_api_key(&db, &config, at_ms(1_000_000 + TEMP_KEY_TTL_MS - 1))
            .await
            .unwrap();
        assert_eq!(key, "unlocked");
    }

    #[tokio::test]
    async fn expired_unlock_fails_and_clears_the_cache() {
        let db = ScanDb::open_memory().await.unwrap();
        let config = config_with(None, KeySource::File);
        db.store_temp_key("stale", 1_000_000).await.unwrap();

        let err = resolve_api_key(&db, &config, at_ms(1_000_000 + TEMP_KEY_TTL_MS))
            .await
            .unwrap_err();
        assert_eq!(err, KeyError::UnlockExpired);
        assert!(db.load_temp_key().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unlock_key_trims_and_caches_the_file_content() {
        let db = ScanDb::open_memory().await.unwrap();
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"  secret-key\n").unwrap();
        f.flush().unwrap();

        let fingerprint = unlock_key(&db, f.path(), at_ms(5_000)).await.unwrap();
        assert_eq!(fingerprint.len(), 16);

        let cached = db.load_temp_key().await.unwrap().unwrap();
        assert_eq!(cached.api_key, "secret-key");
        assert_eq!(cached.stored_at_ms, 5_000);
    }

    #[tokio::test]
    async fn unlock_key_rejects_empty_files() {
        let db = ScanDb::open_memory().await.unwrap();
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"\n  \n").unwrap();
        f.flush().unwrap();

        assert!(unlock_key(&db, f.path(), Local::now()).await.is_err());
    }

    #[test]
    fn fingerprint_matches_known_digest() {
        assert_eq!(key_fingerprint("hello\n"), "5891b5b522d5df08");
    }
}
