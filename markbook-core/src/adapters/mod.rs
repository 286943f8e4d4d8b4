//! Adapter implementations
//!
//! Adapters implement the port traits on the local filesystem:
//! - JSON registry file for the AccountStore port
//! - Per-user CSV files for the MarksStore port
//! - JSON session file for the CLI session context
//! - In-memory stores for service tests

pub mod csv_marks;
pub mod json_accounts;
pub mod lock;
pub mod session_file;

#[cfg(test)]
pub mod memory;

pub use csv_marks::CsvMarksStore;
pub use json_accounts::JsonAccountStore;
pub use session_file::SessionFile;

/// Account registry filename inside the data directory
pub const ACCOUNTS_FILE: &str = "users.json";

/// Directory holding one folder per user
pub const USERS_DIR: &str = "users";

/// Marks table filename inside a user's folder
pub const MARKS_FILE: &str = "marks.csv";

/// CLI session filename inside the data directory
pub const SESSION_FILE: &str = "session.json";
