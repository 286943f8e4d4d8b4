//! Status service - registry and marks summary

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::ports::{AccountStore, MarksStore};

/// Status service for an overview of stored data
pub struct StatusService {
    accounts: Arc<dyn AccountStore>,
    marks: Arc<dyn MarksStore>,
    hash_passwords: bool,
}

impl StatusService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        marks: Arc<dyn MarksStore>,
        hash_passwords: bool,
    ) -> Self {
        Self {
            accounts,
            marks,
            hash_passwords,
        }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let book = self.accounts.load()?;

        let mut with_marks = 0;
        for email in book.emails() {
            if self.marks.has_table(email)? {
                with_marks += 1;
            }
        }

        Ok(StatusSummary {
            total_users: book.len() as i64,
            users_with_marks: with_marks,
            users_without_marks: book.len() as i64 - with_marks,
            hash_passwords: self.hash_passwords,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_users: i64,
    pub users_with_marks: i64,
    pub users_without_marks: i64,
    pub hash_passwords: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryAccountStore, MemoryMarksStore};
    use crate::domain::{MarksTable, Registration};
    use crate::services::AccountService;
    use chrono::NaiveDate;

    #[test]
    fn test_status_counts() {
        let accounts: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new());
        let marks: Arc<dyn MarksStore> = Arc::new(MemoryMarksStore::new());
        let service = AccountService::new(accounts.clone(), marks.clone(), false);
        let dob = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        for email in ["a@x.com", "b@x.com", "c@x.com"] {
            service
                .register(Registration::new(email, "N", "P", dob, "pw"))
                .unwrap();
        }
        marks
            .save_table("b@x.com", &MarksTable::from_marks(&[1; 7]).unwrap())
            .unwrap();

        let status = StatusService::new(accounts, marks, false).get_status().unwrap();
        assert_eq!(status.total_users, 3);
        assert_eq!(status.users_with_marks, 1);
        assert_eq!(status.users_without_marks, 2);
        assert!(!status.hash_passwords);
    }
}
