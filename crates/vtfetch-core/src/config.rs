use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Where the VirusTotal API key comes from.
///
/// `Config` reads it from this file; `File` requires a per-session unlock
/// from a key file (`vtfetch unlock-key`), cached for five minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    #[default]
    Config,
    File,
}

/// VirusTotal account tier. `Premium` bypasses all local rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    Free,
    Premium,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Free => "free",
            AccessLevel::Premium => "premium",
        }
    }
}

/// Global configuration loaded from `~/.config/vtfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VtfetchConfig {
    /// VirusTotal API key; consulted when `key_source = "config"`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// API key source: "config" (default) or "file" (per-session unlock).
    #[serde(default)]
    pub key_source: KeySource,
    /// Account tier: "free" (default) or "premium".
    #[serde(default)]
    pub access_level: AccessLevel,
    /// Start the download automatically after a successful scan submission.
    #[serde(default)]
    pub download_automatically: bool,
    /// Open the scan report after a successful submission.
    #[serde(default)]
    pub always_show_report: bool,
    /// Days after which scan records are swept, or "never" (default).
    #[serde(default = "default_auto_remove_days")]
    pub auto_remove_days: String,
    /// Where the download service writes files (default: ~/Downloads).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

fn default_auto_remove_days() -> String {
    "never".to_string()
}

impl Default for VtfetchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            key_source: KeySource::Config,
            access_level: AccessLevel::Free,
            download_automatically: false,
            always_show_report: false,
            auto_remove_days: default_auto_remove_days(),
            download_dir: None,
        }
    }
}

impl VtfetchConfig {
    /// Parsed `auto_remove_days`: `None` means never sweep.
    ///
    /// "never" and anything non-numeric disable the sweep.
    pub fn auto_remove_after_days(&self) -> Option<u32> {
        let raw = self.auto_remove_days.trim();
        if raw.eq_ignore_ascii_case("never") {
            return None;
        }
        raw.parse::<u32>().ok()
    }

    /// Directory the download service writes into.
    ///
    /// Falls back to `$HOME/Downloads`, then the current directory.
    pub fn resolve_download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join("Downloads"),
            None => PathBuf::from("."),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vtfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VtfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VtfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: VtfetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = VtfetchConfig::default();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.key_source, KeySource::Config);
        assert_eq!(cfg.access_level, AccessLevel::Free);
        assert!(!cfg.download_automatically);
        assert!(!cfg.always_show_report);
        assert_eq!(cfg.auto_remove_days, "never");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = VtfetchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: VtfetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.key_source, cfg.key_source);
        assert_eq!(parsed.access_level, cfg.access_level);
        assert_eq!(parsed.download_automatically, cfg.download_automatically);
        assert_eq!(parsed.always_show_report, cfg.always_show_report);
        assert_eq!(parsed.auto_remove_days, cfg.auto_remove_days);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            api_key = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
            key_source = "file"
            access_level = "premium"
            download_automatically = true
            always_show_report = false
            auto_remove_days = "30"
            download_dir = "/tmp/fetches"
        "#;
        let cfg: VtfetchConfig = toml::from_str(toml).unwrap();
        assert!(cfg.api_key.as_deref().unwrap().starts_with("0123"));
        assert_eq!(cfg.key_source, KeySource::File);
        assert_eq!(cfg.access_level, AccessLevel::Premium);
        assert!(cfg.download_automatically);
        assert!(!cfg.always_show_report);
        assert_eq!(cfg.auto_remove_after_days(), Some(30));
        assert_eq!(cfg.resolve_download_dir(), PathBuf::from("/tmp/fetches"));
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"
            download_automatically = true
        "#;
        let cfg: VtfetchConfig = toml::from_str(toml).unwrap();
        assert!(cfg.download_automatically);
        assert!(!cfg.always_show_report);
        assert_eq!(cfg.auto_remove_days, "never");
        assert_eq!(cfg.key_source, KeySource::Config);
    }

    #[test]
    fn auto_remove_parsing() {
        let mut cfg = VtfetchConfig::default();
        assert_eq!(cfg.auto_remove_after_days(), None);
        cfg.auto_remove_days = "Never".to_string();
        assert_eq!(cfg.auto_remove_after_days(), None);
        cfg.auto_remove_days = "30".to_string();
        assert_eq!(cfg.auto_remove_after_days(), Some(30));
        cfg.auto_remove_days = " 7 ".to_string();
        assert_eq!(cfg.auto_remove_after_days(), Some(7));
        cfg.auto_remove_days = "every tuesday".to_string();
        assert_eq!(cfg.auto_remove_after_days(), None);
    }
}
