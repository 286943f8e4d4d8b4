//! Marks store port - one marks table per user

use crate::domain::result::Result;
use crate::domain::MarksTable;

/// Per-user marks storage, keyed by user key (the email)
pub trait MarksStore: Send + Sync {
    /// Make sure the user's storage namespace exists (idempotent)
    fn provision(&self, user_key: &str) -> Result<()>;

    /// Load the user's table; empty if nothing was ever saved
    fn load_table(&self, user_key: &str) -> Result<MarksTable>;

    /// Replace the user's table in full
    fn save_table(&self, user_key: &str, table: &MarksTable) -> Result<()>;

    /// Whether a table has been saved for the user
    fn has_table(&self, user_key: &str) -> Result<bool>;

    /// Every provisioned namespace, sorted
    fn namespaces(&self) -> Result<Vec<String>>;
}
