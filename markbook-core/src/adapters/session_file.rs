//! Session persistence for front ends that outlive a single process
//!
//! The CLI runs one process per command, so the session context is kept in
//! `<data_dir>/session.json` between invocations.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::lock::{lock_path_for, write_atomic, FileLock};
use super::SESSION_FILE;
use crate::domain::result::{Error, Result};
use crate::domain::Session;

#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hold this across a load, change and save so concurrent runs do not
    /// overwrite each other's login or sign-out
    pub fn lock(&self) -> Result<FileLock> {
        Ok(FileLock::exclusive(&lock_path_for(&self.path))?)
    }

    /// Load the saved session, or a fresh one if none was saved
    pub fn load(&self) -> Result<Session> {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| Error::corrupt(&self.path, e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Session::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let content = serde_json::to_string_pretty(session)?;
        write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }

    /// Forget the saved session
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
