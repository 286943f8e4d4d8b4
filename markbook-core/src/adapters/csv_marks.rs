//! CSV file marks store
//!
//! Layout: `<data_dir>/users/<email>/marks.csv` with a `Subject,Marks`
//! header followed by the seven subject rows.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::lock::{write_atomic, FileLock};
use super::{MARKS_FILE, USERS_DIR};
use crate::domain::result::{Error, Result};
use crate::domain::{validate_user_key, Mark, MarkRow, MarksTable, Subject};
use crate::ports::MarksStore;

/// Per-namespace lock file, next to marks.csv
const MARKS_LOCK_FILE: &str = ".marks.lock";

/// One CSV row as written to disk
#[derive(Debug, Serialize, Deserialize)]
struct MarkRecord {
    #[serde(rename = "Subject")]
    subject: String,
    #[serde(rename = "Marks")]
    marks: i64,
}

/// Marks store backed by one CSV file per user
#[derive(Debug, Clone)]
pub struct CsvMarksStore {
    users_dir: PathBuf,
}

impl CsvMarksStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            users_dir: data_dir.join(USERS_DIR),
        }
    }

    pub fn users_dir(&self) -> &Path {
        &self.users_dir
    }

    /// Folder for a user; rejects keys that are not a single path segment
    pub fn user_dir(&self, user_key: &str) -> Result<PathBuf> {
        validate_user_key(user_key)?;
        Ok(self.users_dir.join(user_key))
    }

    pub fn marks_path(&self, user_key: &str) -> Result<PathBuf> {
        Ok(self.user_dir(user_key)?.join(MARKS_FILE))
    }

    fn read_table(path: &Path) -> Result<MarksTable> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();

        for record in reader.deserialize::<MarkRecord>() {
            let record = record.map_err(|e| Error::corrupt(path, e))?;
            let subject: Subject = record
                .subject
                .parse()
                .map_err(|e: Error| Error::corrupt(path, e))?;
            let marks = Mark::try_from(record.marks).map_err(|e| Error::corrupt(path, e))?;
            rows.push(MarkRow { subject, marks });
        }

        MarksTable::from_rows(rows).map_err(|e| Error::corrupt(path, e))
    }

    fn encode_table(table: &MarksTable) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in table.rows() {
            writer.serialize(MarkRecord {
                subject: row.subject.name().to_string(),
                marks: i64::from(row.marks.value()),
            })?;
        }
        writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

impl MarksStore for CsvMarksStore {
    fn provision(&self, user_key: &str) -> Result<()> {
        fs::create_dir_all(self.user_dir(user_key)?)?;
        Ok(())
    }

    fn load_table(&self, user_key: &str) -> Result<MarksTable> {
        let dir = self.user_dir(user_key)?;
        let path = dir.join(MARKS_FILE);
        if !path.exists() {
            return Ok(MarksTable::empty());
        }

        let _lock = FileLock::shared(&dir.join(MARKS_LOCK_FILE))?;
        Self::read_table(&path)
    }

    fn save_table(&self, user_key: &str, table: &MarksTable) -> Result<()> {
        if table.is_empty() {
            return Err(Error::validation(format!(
                "A marks table needs all {} subjects",
                Subject::ALL.len()
            )));
        }

        let dir = self.user_dir(user_key)?;
        let content = Self::encode_table(table)?;

        let _lock = FileLock::exclusive(&dir.join(MARKS_LOCK_FILE))?;
        write_atomic(&dir.join(MARKS_FILE), &content)?;
        Ok(())
    }

    fn has_table(&self, user_key: &str) -> Result<bool> {
        Ok(self.marks_path(user_key)?.exists())
    }

    fn namespaces(&self) -> Result<Vec<String>> {
        if !self.users_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.users_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
