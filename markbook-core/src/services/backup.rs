//! Backup service - data directory backup management
//!
//! Creates ZIP archives containing the account registry, the settings file
//! and every user's marks table.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::adapters::{ACCOUNTS_FILE, MARKS_FILE, USERS_DIR};
use crate::config::SETTINGS_FILE;
use crate::domain::BackupMetadata;

const BACKUP_PREFIX: &str = "markbook-";

/// Backup service for the data directory
pub struct BackupService {
    data_dir: PathBuf,
}

impl BackupService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn backups_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    /// Files to archive, as paths relative to the data directory
    fn collect_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for name in [ACCOUNTS_FILE, SETTINGS_FILE] {
            if self.data_dir.join(name).is_file() {
                files.push(name.to_string());
            }
        }

        let users_dir = self.data_dir.join(USERS_DIR);
        if users_dir.is_dir() {
            let mut user_files = Vec::new();
            for entry in fs::read_dir(&users_dir)? {
                let entry = entry?;
                if !entry.file_type()?.is_dir() {
                    continue;
                }
                let Some(user) = entry.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                // empty folders still record that the namespace exists
                user_files.push(format!("{}/{}/", USERS_DIR, user));
                if entry.path().join(MARKS_FILE).is_file() {
                    user_files.push(format!("{}/{}/{}", USERS_DIR, user, MARKS_FILE));
                }
            }
            user_files.sort();
            files.extend(user_files);
        }

        Ok(files)
    }

    fn write_archive(&self, path: &Path, files: &[String]) -> Result<()> {
        let file = File::create(path).context("Failed to create backup file")?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut buffer = Vec::new();
        for name in files {
            if name.ends_with('/') {
                zip.add_directory(name.as_str(), options)?;
                continue;
            }
            zip.start_file(name.as_str(), options)?;
            buffer.clear();
            File::open(self.data_dir.join(name))?.read_to_end(&mut buffer)?;
            zip.write_all(&buffer)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn timestamped_name(tag: &str) -> String {
        let now = Utc::now();
        format!(
            "{}{}{}-{:06}.zip",
            BACKUP_PREFIX,
            tag,
            now.format("%Y-%m-%dT%H-%M-%S"),
            now.timestamp_subsec_micros()
        )
    }

    /// Create a backup of the data directory as a ZIP archive
    pub fn create(&self, max_backups: Option<usize>) -> Result<BackupMetadata> {
        let backups_dir = self.backups_dir();
        fs::create_dir_all(&backups_dir)?;

        let files = self.collect_files()?;
        if files.is_empty() {
            anyhow::bail!("Nothing to back up in {}", self.data_dir.display());
        }

        let backup_name = Self::timestamped_name("");
        let backup_path = backups_dir.join(&backup_name);
        self.write_archive(&backup_path, &files)?;

        let size_bytes = fs::metadata(&backup_path)?.len();

        // 0 means unlimited, as in settings.json
        if let Some(max) = max_backups.filter(|&max| max > 0) {
            self.apply_retention(max)?;
        }

        Ok(BackupMetadata::new(backup_name, Utc::now(), size_bytes, files.len()))
    }

    /// List all backups, newest first
    pub fn list(&self) -> Result<Vec<BackupMetadata>> {
        let backups_dir = self.backups_dir();
        if !backups_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("zip") {
                continue;
            }

            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();
            if !name.starts_with(BACKUP_PREFIX) {
                continue;
            }

            let size_bytes = fs::metadata(&path)?.len();
            let entries = ZipArchive::new(File::open(&path)?)
                .map(|archive| archive.len())
                .unwrap_or(0);
            let created_at = Self::parse_backup_time(&name);

            backups.push(BackupMetadata::new(name, created_at, size_bytes, entries));
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Parse creation time from a backup filename
    fn parse_backup_time(backup_name: &str) -> chrono::DateTime<Utc> {
        // "markbook-[pre-restore-]TIMESTAMP-MICROS.zip"
        let ts = backup_name
            .strip_prefix(BACKUP_PREFIX)
            .map(|s| s.strip_prefix("pre-restore-").unwrap_or(s))
            .and_then(|s| s.strip_suffix(".zip"));

        ts.and_then(|ts| {
            chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H-%M-%S-%f")
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H-%M-%S"))
                .ok()
        })
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
    }

    /// Restore the data directory from a backup
    ///
    /// Current data is archived first as a `pre-restore` backup, then the
    /// account registry and every user folder are replaced by the archive's.
    pub fn restore(&self, backup_name: &str) -> Result<()> {
        if backup_name.contains(['/', '\\']) {
            anyhow::bail!("Invalid backup name: {}", backup_name);
        }
        let backup_path = self.backups_dir().join(backup_name);
        if !backup_path.exists() {
            anyhow::bail!("Backup not found: {}", backup_name);
        }

        let mut archive =
            ZipArchive::new(File::open(&backup_path)?).context("Backup is not a valid archive")?;

        // Reject bad archives while the current data is still in place
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive
                .by_index(i)
                .with_context(|| format!("Backup entry {} is unreadable", i))?;
            let Some(relative) = entry.enclosed_name() else {
                anyhow::bail!("Backup entry escapes the data directory: {}", entry.name());
            };
            if !Self::is_restorable(&relative) {
                anyhow::bail!("Unexpected backup entry: {}", entry.name());
            }
            entries.push((i, relative, entry.is_dir()));
        }

        let current = self.collect_files()?;
        if !current.is_empty() {
            let pre_restore = self.backups_dir().join(Self::timestamped_name("pre-restore-"));
            self.write_archive(&pre_restore, &current)?;
        }

        let accounts_path = self.data_dir.join(ACCOUNTS_FILE);
        if accounts_path.exists() {
            fs::remove_file(&accounts_path)?;
        }
        let users_dir = self.data_dir.join(USERS_DIR);
        if users_dir.exists() {
            fs::remove_dir_all(&users_dir)?;
        }

        for (i, relative, is_dir) in entries {
            let target = self.data_dir.join(relative);
            if is_dir {
                fs::create_dir_all(&target)?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut entry = archive.by_index(i)?;
            let mut outfile = File::create(&target)?;
            std::io::copy(&mut entry, &mut outfile)?;
        }

        Ok(())
    }

    /// Only the files `create` writes may come back out of an archive
    fn is_restorable(relative: &Path) -> bool {
        match relative.components().next() {
            Some(Component::Normal(first)) => {
                first == ACCOUNTS_FILE || first == SETTINGS_FILE || first == USERS_DIR
            }
            _ => false,
        }
    }

    /// Delete every backup
    pub fn clear(&self) -> Result<ClearResult> {
        let backups = self.list()?;
        let count = backups.len() as i64;

        for backup in &backups {
            fs::remove_file(self.backups_dir().join(&backup.name))?;
        }

        Ok(ClearResult { deleted: count })
    }

    fn apply_retention(&self, max_backups: usize) -> Result<()> {
        let mut backups = self.list()?;

        while backups.len() > max_backups {
            if let Some(oldest) = backups.pop() {
                fs::remove_file(self.backups_dir().join(&oldest.name))?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ClearResult {
    pub deleted: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seed(dir: &Path) {
        fs::write(dir.join(ACCOUNTS_FILE), r#"{"a@x.com": {}}"#).unwrap();
        fs::create_dir_all(dir.join(USERS_DIR).join("a@x.com")).unwrap();
        fs::write(
            dir.join(USERS_DIR).join("a@x.com").join(MARKS_FILE),
            "Subject,Marks\n",
        )
        .unwrap();
        fs::create_dir_all(dir.join(USERS_DIR).join("b@x.com")).unwrap();
    }

    #[test]
    fn test_create_and_list() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let service = BackupService::new(dir.path().to_path_buf());

        let created = service.create(None).unwrap();
        assert!(created.name.starts_with("markbook-"));
        assert_eq!(created.entries, 4);

        let listed = service.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, created.name);
        assert_eq!(listed[0].entries, 4);
    }

    #[test]
    fn test_create_with_nothing_to_back_up() {
        let dir = tempdir().unwrap();
        let service = BackupService::new(dir.path().to_path_buf());
        assert!(service.create(None).is_err());
    }

    #[test]
    fn test_restore_replaces_data() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let service = BackupService::new(dir.path().to_path_buf());
        let backup = service.create(None).unwrap();

        fs::write(dir.path().join(ACCOUNTS_FILE), "{}").unwrap();
        fs::create_dir_all(dir.path().join(USERS_DIR).join("late@x.com")).unwrap();

        service.restore(&backup.name).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join(ACCOUNTS_FILE)).unwrap(),
            r#"{"a@x.com": {}}"#
        );
        assert!(dir.path().join(USERS_DIR).join("a@x.com").join(MARKS_FILE).exists());
        assert!(dir.path().join(USERS_DIR).join("b@x.com").is_dir());
        assert!(!dir.path().join(USERS_DIR).join("late@x.com").exists());

        // the pre-restore snapshot is listed too
        assert_eq!(service.list().unwrap().len(), 2);
    }

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_restore_rejects_escaping_entry_before_touching_data() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let service = BackupService::new(dir.path().to_path_buf());
        fs::create_dir_all(service.backups_dir()).unwrap();
        write_zip(
            &service.backups_dir().join("markbook-evil.zip"),
            &[(ACCOUNTS_FILE, "{}"), ("../escape.txt", "x")],
        );

        let err = service.restore("markbook-evil.zip").unwrap_err();
        assert!(err.to_string().contains("escapes"));

        assert_eq!(
            fs::read_to_string(dir.path().join(ACCOUNTS_FILE)).unwrap(),
            r#"{"a@x.com": {}}"#
        );
        assert!(dir.path().join(USERS_DIR).join("a@x.com").join(MARKS_FILE).exists());
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
        // nothing was replaced, so no pre-restore snapshot either
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_restore_rejects_foreign_entry() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let service = BackupService::new(dir.path().to_path_buf());
        fs::create_dir_all(service.backups_dir()).unwrap();
        write_zip(
            &service.backups_dir().join("markbook-odd.zip"),
            &[("session.json", "{}")],
        );

        assert!(service.restore("markbook-odd.zip").is_err());
        assert!(dir.path().join(ACCOUNTS_FILE).exists());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_restore_missing_backup() {
        let dir = tempdir().unwrap();
        let service = BackupService::new(dir.path().to_path_buf());
        assert!(service.restore("markbook-nope.zip").is_err());
        assert!(service.restore("../users.json").is_err());
    }

    #[test]
    fn test_retention_and_clear() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let service = BackupService::new(dir.path().to_path_buf());

        for _ in 0..3 {
            service.create(Some(2)).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(service.list().unwrap().len(), 2);

        assert_eq!(service.clear().unwrap().deleted, 2);
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_zero_retention_keeps_everything() {
        let dir = tempdir().unwrap();
        seed(dir.path());
        let service = BackupService::new(dir.path().to_path_buf());

        service.create(None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let latest = service.create(Some(0)).unwrap();

        assert!(service.backups_dir().join(&latest.name).exists());
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_backup_time() {
        let ts = BackupService::parse_backup_time("markbook-2025-01-15T10-30-00-000123.zip");
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-01-15 10:30:00");

        let ts = BackupService::parse_backup_time("markbook-pre-restore-2025-01-15T10-30-00-000001.zip");
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2025-01-15");
    }
}
