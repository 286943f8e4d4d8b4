//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod backup;
pub mod marks;
mod profile;
pub mod report;
pub mod result;
mod session;

pub use backup::BackupMetadata;
pub use marks::{Mark, MarkRow, MarksTable, Subject};
pub use profile::{validate_user_key, AccountBook, ProfileRecord, Registration, UserProfile};
pub use report::{ChartKind, ChartPoint, ChartSpec, Report, ReportSummary};
pub use session::{PageId, Session};
