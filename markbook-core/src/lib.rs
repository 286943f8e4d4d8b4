//! Markbook Core - accounts and marks for a small student portal
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (profiles, marks tables, sessions, reports)
//! - **ports**: Trait definitions for storage (AccountStore, MarksStore)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (users.json, per-user marks.csv)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::{CsvMarksStore, JsonAccountStore, SessionFile};
use config::Config;
use ports::{AccountStore, MarksStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    BackupMetadata, Mark, MarkRow, MarksTable, PageId, Registration, Report, Session, Subject,
    UserProfile,
};
pub use domain::result::Error;
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for Markbook operations
///
/// This is the primary entry point for all business logic. It holds the
/// stores for one data directory, the configuration, and all services.
pub struct MarkbookContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub accounts: Arc<JsonAccountStore>,
    pub marks: Arc<CsvMarksStore>,
    pub account_service: AccountService,
    pub marks_service: MarksService,
    pub report_service: ReportService,
    pub session_service: SessionService,
    pub status_service: StatusService,
    pub doctor_service: DoctorService,
    pub backup_service: BackupService,
}

impl MarkbookContext {
    /// Create a new Markbook context rooted at `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config = Config::load(data_dir)?;
        Self::with_config(data_dir, config)
    }

    /// Create a context with an already resolved configuration
    pub fn with_config(data_dir: &Path, config: Config) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let accounts = Arc::new(JsonAccountStore::new(data_dir));
        let marks = Arc::new(CsvMarksStore::new(data_dir));
        let account_store: Arc<dyn AccountStore> = accounts.clone();
        let marks_store: Arc<dyn MarksStore> = marks.clone();

        // Create services
        let account_service = AccountService::new(
            Arc::clone(&account_store),
            Arc::clone(&marks_store),
            config.hash_passwords,
        );
        let marks_service = MarksService::new(Arc::clone(&marks_store));
        let report_service = ReportService::new(Arc::clone(&marks_store));
        let session_service = SessionService::new(
            account_service.clone(),
            marks_service.clone(),
            report_service.clone(),
        );
        let status_service = StatusService::new(
            Arc::clone(&account_store),
            Arc::clone(&marks_store),
            config.hash_passwords,
        );
        let doctor_service = DoctorService::new(account_store, marks_store);
        let backup_service = BackupService::new(data_dir.to_path_buf());

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            accounts,
            marks,
            account_service,
            marks_service,
            report_service,
            session_service,
            status_service,
            doctor_service,
            backup_service,
        })
    }

    /// The persisted CLI session for this data directory
    pub fn session_file(&self) -> SessionFile {
        SessionFile::new(&self.data_dir)
    }
}
