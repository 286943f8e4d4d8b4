//! In-memory stores for service tests

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::domain::{validate_user_key, AccountBook, MarksTable};
use crate::ports::{AccountStore, MarksStore};

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    book: Mutex<AccountBook>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryAccountStore {
    fn load(&self) -> Result<AccountBook> {
        Ok(self.book.lock().unwrap().clone())
    }

    fn save(&self, book: &AccountBook) -> Result<()> {
        *self.book.lock().unwrap() = book.clone();
        Ok(())
    }

    fn update(&self, apply: &mut dyn FnMut(&mut AccountBook) -> Result<()>) -> Result<()> {
        let mut guard = self.book.lock().unwrap();
        let mut book = guard.clone();
        apply(&mut book)?;
        *guard = book;
        Ok(())
    }
}

/// Namespace -> table; `None` means provisioned but never written
#[derive(Debug, Default)]
pub struct MemoryMarksStore {
    tables: Mutex<BTreeMap<String, Option<MarksTable>>>,
}

impl MemoryMarksStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarksStore for MemoryMarksStore {
    fn provision(&self, user_key: &str) -> Result<()> {
        validate_user_key(user_key)?;
        self.tables
            .lock()
            .unwrap()
            .entry(user_key.to_string())
            .or_insert(None);
        Ok(())
    }

    fn load_table(&self, user_key: &str) -> Result<MarksTable> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.get(user_key).cloned().flatten().unwrap_or_default())
    }

    fn save_table(&self, user_key: &str, table: &MarksTable) -> Result<()> {
        validate_user_key(user_key)?;
        if table.is_empty() {
            return Err(Error::validation("A marks table needs all subjects"));
        }
        self.tables
            .lock()
            .unwrap()
            .insert(user_key.to_string(), Some(table.clone()));
        Ok(())
    }

    fn has_table(&self, user_key: &str) -> Result<bool> {
        let tables = self.tables.lock().unwrap();
        Ok(matches!(tables.get(user_key), Some(Some(_))))
    }

    fn namespaces(&self) -> Result<Vec<String>> {
        Ok(self.tables.lock().unwrap().keys().cloned().collect())
    }
}
