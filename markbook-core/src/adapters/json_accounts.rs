//! JSON file account store
//!
//! The whole registry lives in one `users.json` object keyed by email. Every
//! read parses the full file and every write replaces it, which is fine for a
//! few thousand users and nothing more.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::lock::{lock_path_for, write_atomic, FileLock};
use super::ACCOUNTS_FILE;
use crate::domain::result::{Error, Result};
use crate::domain::AccountBook;
use crate::ports::AccountStore;

/// Account store backed by `<data_dir>/users.json`
#[derive(Debug, Clone)]
pub struct JsonAccountStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonAccountStore {
    pub fn new(data_dir: &Path) -> Self {
        let path = data_dir.join(ACCOUNTS_FILE);
        let lock_path = lock_path_for(&path);
        Self { path, lock_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the registry file without taking a lock
    fn read_book(&self) -> Result<AccountBook> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AccountBook::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| Error::corrupt(&self.path, e))
    }

    fn write_book(&self, book: &AccountBook) -> Result<()> {
        let content = serde_json::to_string_pretty(book)?;
        write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }
}

impl AccountStore for JsonAccountStore {
    fn load(&self) -> Result<AccountBook> {
        if !self.path.exists() {
            return Ok(AccountBook::new());
        }
        let _lock = FileLock::shared(&self.lock_path)?;
        self.read_book()
    }

    fn save(&self, book: &AccountBook) -> Result<()> {
        let _lock = FileLock::exclusive(&self.lock_path)?;
        self.write_book(book)
    }

    fn update(&self, apply: &mut dyn FnMut(&mut AccountBook) -> Result<()>) -> Result<()> {
        let _lock = FileLock::exclusive(&self.lock_path)?;
        let mut book = self.read_book()?;
        apply(&mut book)?;
        self.write_book(&book)
    }
}
