//! Doctor service - storage health checks

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use super::credentials::is_hashed;
use crate::domain::result::Error;
use crate::domain::AccountBook;
use crate::ports::{AccountStore, MarksStore};

/// Doctor service for health checks
pub struct DoctorService {
    accounts: Arc<dyn AccountStore>,
    marks: Arc<dyn MarksStore>,
}

impl DoctorService {
    pub fn new(accounts: Arc<dyn AccountStore>, marks: Arc<dyn MarksStore>) -> Self {
        Self { accounts, marks }
    }

    /// Run all health checks
    ///
    /// Storage errors that prevent a check from running are reported as
    /// failed checks rather than returned.
    pub fn run_checks(&self) -> Result<DoctorResult> {
        let mut checks = HashMap::new();

        let book = match self.accounts.load() {
            Ok(book) => {
                checks.insert(
                    "accounts_file".to_string(),
                    CheckResult::pass(format!("{} registered user(s)", book.len())),
                );
                Some(book)
            }
            Err(e) => {
                checks.insert(
                    "accounts_file".to_string(),
                    CheckResult::error(format!("Account registry unreadable: {}", e), None),
                );
                None
            }
        };

        let namespaces: BTreeSet<String> = self.marks.namespaces()?.into_iter().collect();

        if let Some(book) = &book {
            checks.insert("missing_folders".to_string(), missing_folders(book, &namespaces));
            checks.insert("orphaned_folders".to_string(), orphaned_folders(book, &namespaces));
            checks.insert("plaintext_passwords".to_string(), plaintext_passwords(book));
        }

        // Marks tables
        let mut bad_tables = Vec::new();
        for namespace in &namespaces {
            match self.marks.load_table(namespace) {
                Ok(_) => {}
                Err(Error::Corrupt { reason, .. }) => {
                    bad_tables.push(json!({"user": namespace, "reason": reason}));
                }
                Err(e) => bad_tables.push(json!({"user": namespace, "reason": e.to_string()})),
            }
        }
        checks.insert(
            "marks_files".to_string(),
            if bad_tables.is_empty() {
                CheckResult::pass("All marks files are readable")
            } else {
                CheckResult::error(
                    format!("{} marks file(s) could not be read", bad_tables.len()),
                    Some(bad_tables),
                )
            },
        );

        let passed = checks.values().filter(|c| c.status == "pass").count() as i64;
        let warnings = checks.values().filter(|c| c.status == "warning").count() as i64;
        let errors = checks.values().filter(|c| c.status == "error").count() as i64;

        Ok(DoctorResult {
            checks,
            summary: DoctorSummary {
                passed,
                warnings,
                errors,
            },
        })
    }
}

fn missing_folders(book: &AccountBook, namespaces: &BTreeSet<String>) -> CheckResult {
    let missing: Vec<serde_json::Value> = book
        .emails()
        .filter(|email| !namespaces.contains(*email))
        .map(|email| json!({"user": email}))
        .collect();

    if missing.is_empty() {
        CheckResult::pass("Every user has a storage folder")
    } else {
        CheckResult::error(
            format!("{} user(s) have no storage folder", missing.len()),
            Some(missing),
        )
    }
}

fn orphaned_folders(book: &AccountBook, namespaces: &BTreeSet<String>) -> CheckResult {
    let orphaned: Vec<serde_json::Value> = namespaces
        .iter()
        .filter(|ns| !book.contains(ns))
        .map(|ns| json!({"folder": ns}))
        .collect();

    if orphaned.is_empty() {
        CheckResult::pass("No orphaned storage folders")
    } else {
        CheckResult::warning(
            format!("{} folder(s) belong to no registered user", orphaned.len()),
            Some(orphaned),
        )
    }
}

fn plaintext_passwords(book: &AccountBook) -> CheckResult {
    let plaintext = book
        .iter()
        .filter(|(_, record)| !is_hashed(&record.password))
        .count();

    if plaintext == 0 {
        CheckResult::pass("All passwords are hashed")
    } else {
        CheckResult::warning(
            format!("{} password(s) stored in plaintext", plaintext),
            Some(vec![json!({"plaintext_count": plaintext, "total_count": book.len()})]),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorResult {
    pub checks: HashMap<String, CheckResult>,
    pub summary: DoctorSummary,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}

impl CheckResult {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            status: "pass".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warning(message: impl Into<String>, details: Option<Vec<serde_json::Value>>) -> Self {
        Self {
            status: "warning".to_string(),
            message: message.into(),
            details,
        }
    }

    fn error(message: impl Into<String>, details: Option<Vec<serde_json::Value>>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub passed: i64,
    pub warnings: i64,
    pub errors: i64,
}
