//! Result and error types for the core library

use std::path::PathBuf;

use thiserror::Error;

/// Core library error type
///
/// The first four variants are caller mistakes the UI can recover from by
/// showing a message. Everything else is a storage failure and is fatal for
/// the operation that hit it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("User with this email already exists: {0}")]
    DuplicateUser(String),

    /// Unknown email and wrong password share this variant on purpose
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Corrupt store file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a corrupt-store error for the given file
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True when the caller can show the message and carry on
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUser(_) | Self::InvalidCredentials | Self::Validation(_) | Self::Session(_)
        )
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::DuplicateUser("a@x.com".into()).is_recoverable());
        assert!(Error::InvalidCredentials.is_recoverable());
        assert!(Error::validation("bad").is_recoverable());
        assert!(Error::session("not logged in").is_recoverable());

        let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(!io.is_recoverable());
        assert!(!Error::corrupt("users.json", "eof").is_recoverable());
    }

    #[test]
    fn test_messages() {
        assert_eq!(Error::InvalidCredentials.to_string(), "Invalid email or password");
        assert!(Error::validation("bad input")
            .to_string()
            .contains("Validation error"));
        assert!(Error::corrupt("/tmp/users.json", "expected value")
            .to_string()
            .contains("/tmp/users.json"));
    }
}
