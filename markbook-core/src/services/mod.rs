//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod account;
mod backup;
pub mod credentials;
mod doctor;
pub mod logging;
mod marks;
mod report;
mod session;
mod status;

pub use account::AccountService;
pub use backup::{BackupService, ClearResult};
pub use doctor::{CheckResult, DoctorResult, DoctorService, DoctorSummary};
pub use logging::{EntryPoint, LogEntry, LogEvent, LogStats, LoggingService};
pub use marks::MarksService;
pub use report::ReportService;
pub use session::SessionService;
pub use status::{StatusService, StatusSummary};
