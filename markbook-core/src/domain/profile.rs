//! User profile domain model

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// A profile as persisted in users.json, keyed by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub phone: String,
    /// Serialized as an ISO `YYYY-MM-DD` string
    pub dob: NaiveDate,
    /// Plaintext, or an Argon2 PHC string when hashing is enabled
    pub password: String,
}

/// A registered user as handed back to callers (never carries the password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub dob: NaiveDate,
}

impl UserProfile {
    fn from_record(email: &str, record: &ProfileRecord) -> Self {
        Self {
            email: email.to_string(),
            name: record.name.clone(),
            phone: record.phone.clone(),
            dob: record.dob,
        }
    }
}

/// Sign-up form contents
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub dob: NaiveDate,
    pub password: String,
}

impl Registration {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        dob: NaiveDate,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            phone: phone.into(),
            dob,
            password: password.into(),
        }
    }
}

/// The whole account registry: email -> profile
///
/// Loaded and saved as one unit. Serializes as a plain JSON object so the
/// file stays `{ "<email>": { ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountBook {
    users: BTreeMap<String, ProfileRecord>,
}

impl AccountBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.users.contains_key(email)
    }

    pub fn get(&self, email: &str) -> Option<&ProfileRecord> {
        self.users.get(email)
    }

    /// Public view of a stored profile
    pub fn profile(&self, email: &str) -> Option<UserProfile> {
        self.users
            .get(email)
            .map(|record| UserProfile::from_record(email, record))
    }

    /// Insert a new profile; existing emails are never overwritten
    pub fn insert(&mut self, email: impl Into<String>, record: ProfileRecord) -> Result<()> {
        let email = email.into();
        if self.users.contains_key(&email) {
            return Err(Error::DuplicateUser(email));
        }
        self.users.insert(email, record);
        Ok(())
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProfileRecord)> {
        self.users.iter().map(|(email, record)| (email.as_str(), record))
    }
}

/// Check that an email can double as a storage folder name
///
/// Emails are otherwise unvalidated; this only rejects keys that would
/// escape or alias the users directory.
pub fn validate_user_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::validation("email must not be empty"));
    }
    if key == "." || key == ".." || key.contains(['/', '\\', '\0']) {
        return Err(Error::validation(format!(
            "'{}' cannot be used as a storage folder name",
            key
        )));
    }
    Ok(())
}
