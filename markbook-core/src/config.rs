//! Configuration management
//!
//! Settings live in `<data_dir>/settings.json`:
//! ```json
//! {
//!   "app": { "hashPasswords": false },
//!   "backups": { "maxBackups": 10 }
//! }
//! ```
//! Fields this crate does not manage are kept untouched on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings filename inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Environment variable overriding `app.hashPasswords`
pub const HASH_PASSWORDS_ENV: &str = "MARKBOOK_HASH_PASSWORDS";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    backups: BackupSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    hash_passwords: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackupSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_backups: Option<usize>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Markbook configuration (simplified view of settings)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Store new passwords as Argon2 hashes instead of plaintext
    pub hash_passwords: bool,
    /// Retention applied after creating a backup
    pub max_backups: Option<usize>,
}

impl Config {
    /// Load config from the data directory
    ///
    /// Password hashing can be switched on via:
    /// 1. Settings file (`mb config hashing on`)
    /// 2. Environment variable MARKBOOK_HASH_PASSWORDS
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;

        let hash_passwords = parse_flag(std::env::var(HASH_PASSWORDS_ENV).ok().as_deref())
            .unwrap_or(raw.app.hash_passwords);

        Ok(Self {
            hash_passwords,
            max_backups: raw.backups.max_backups,
        })
    }

    /// Load only what settings.json says, ignoring environment overrides
    ///
    /// Use this before changing and saving settings so an override never
    /// gets written back to the file.
    pub fn load_stored(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        Ok(Self {
            hash_passwords: raw.app.hash_passwords,
            max_backups: raw.backups.max_backups,
        })
    }

    /// Save config to the data directory, preserving unmanaged settings
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;

        settings.app.hash_passwords = self.hash_passwords;
        settings.backups.max_backups = self.max_backups;

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = std::fs::read_to_string(&settings_path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings file: {}", settings_path.display()))
}

/// Interpret a boolean-ish environment value
fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let raw = read_settings(dir.path()).unwrap();
        assert!(!raw.app.hash_passwords);
        assert!(raw.backups.max_backups.is_none());
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"app": {"theme": "dark"}, "ui": {"sidebar": true}}"#,
        )
        .unwrap();

        let config = Config {
            hash_passwords: true,
            max_backups: Some(3),
        };
        config.save(dir.path()).unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["app"]["theme"], "dark");
        assert_eq!(raw["app"]["hashPasswords"], true);
        assert_eq!(raw["backups"]["maxBackups"], 3);
        assert_eq!(raw["ui"]["sidebar"], true);

        let reread = read_settings(dir.path()).unwrap();
        assert!(reread.app.hash_passwords);
        assert_eq!(reread.backups.max_backups, Some(3));
    }

    #[test]
    fn test_invalid_settings_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "not json").unwrap();
        assert!(read_settings(dir.path()).is_err());
    }

    #[test]
    fn test_load_stored_round_trip() {
        let dir = tempdir().unwrap();
        assert_eq!(Config::load_stored(dir.path()).unwrap(), Config::default());

        let config = Config {
            hash_passwords: true,
            max_backups: None,
        };
        config.save(dir.path()).unwrap();
        assert_eq!(Config::load_stored(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(Some("1")), Some(true));
        assert_eq!(parse_flag(Some("NO")), Some(false));
        assert_eq!(parse_flag(Some("maybe")), None);
        assert_eq!(parse_flag(None), None);
    }
}
