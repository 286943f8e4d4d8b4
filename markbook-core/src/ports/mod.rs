//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for storage. Services depend only on these
//! traits, not on the file formats behind them.

mod account_store;
mod marks_store;

pub use account_store::AccountStore;
pub use marks_store::MarksStore;
