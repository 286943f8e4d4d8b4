//! Account service - sign-up and log-in

use std::sync::Arc;

use chrono::NaiveDate;

use super::credentials::{store_password, verify_password};
use crate::domain::result::{Error, Result};
use crate::domain::{validate_user_key, ProfileRecord, Registration, UserProfile};
use crate::ports::{AccountStore, MarksStore};

/// Registers and authenticates users
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    marks: Arc<dyn MarksStore>,
    hash_passwords: bool,
}

impl AccountService {
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

    /// Register a new user and provision their marks storage
    ///
    /// Fails with `DuplicateUser` if the email is taken; the existing profile
    /// is left as it was.
    pub fn register(&self, registration: Registration) -> Result<UserProfile> {
        let Registration {
            email,
            name,
            phone,
            dob,
            password,
        } = registration;
        validate_user_key(&email)?;

        let record = ProfileRecord {
            name,
            phone,
            dob,
            password: store_password(&password, self.hash_passwords)?,
        };
        let profile = UserProfile {
            email: email.clone(),
            name: record.name.clone(),
            phone: record.phone.clone(),
            dob,
        };

        self.accounts
            .update(&mut |book| book.insert(email.clone(), record.clone()))?;
        self.marks.provision(&email)?;

        Ok(profile)
    }

    /// Field-by-field form of [`register`](Self::register)
    pub fn register_user(
        &self,
        name: &str,
        phone: &str,
        dob: NaiveDate,
        email: &str,
        password: &str,
    ) -> Result<()> {
        self.register(Registration::new(email, name, phone, dob, password))
            .map(|_| ())
    }

    /// Check credentials and return the matching profile
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    /// Nothing is written either way.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<UserProfile> {
        let book = self.accounts.load()?;
        match book.get(email) {
            Some(record) if verify_password(&record.password, password) => {
                book.profile(email).ok_or(Error::InvalidCredentials)
            }
            _ => Err(Error::InvalidCredentials),
        }
    }

    /// Look up a profile by email
    pub fn profile(&self, email: &str) -> Result<Option<UserProfile>> {
        Ok(self.accounts.load()?.profile(email))
    }

    pub fn hashes_passwords(&self) -> bool {
        self.hash_passwords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryAccountStore, MemoryMarksStore};

    fn service(hash: bool) -> (AccountService, Arc<MemoryAccountStore>, Arc<MemoryMarksStore>) {
        let accounts = Arc::new(MemoryAccountStore::new());
        let marks = Arc::new(MemoryMarksStore::new());
        let service = AccountService::new(accounts.clone(), marks.clone(), hash);
        (service, accounts, marks)
    }

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(2004, 6, 1).unwrap()
    }

    #[test]
    fn test_register_then_authenticate() {
        let (service, _, marks) = service(false);
        service
            .register_user("Ann", "0400", dob(), "a@x.com", "p1")
            .unwrap();

        let profile = service.authenticate("a@x.com", "p1").unwrap();
        assert_eq!(profile.name, "Ann");
        assert_eq!(profile.dob, dob());
        assert_eq!(marks.namespaces().unwrap(), vec!["a@x.com".to_string()]);
    }

    #[test]
    fn test_duplicate_registration_keeps_first_profile() {
        let (service, accounts, _) = service(false);
        service
            .register_user("Ann", "0400", dob(), "a@x.com", "p1")
            .unwrap();

        let err = service
            .register_user("Other", "0500", dob(), "a@x.com", "p2")
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateUser(_)));

        let book = accounts.load().unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.get("a@x.com").unwrap().name, "Ann");
        assert_eq!(book.get("a@x.com").unwrap().password, "p1");
    }

    #[test]
    fn test_wrong_password_and_unknown_email_look_the_same() {
        let (service, accounts, _) = service(false);
        service
            .register_user("Ann", "0400", dob(), "a@x.com", "p1")
            .unwrap();
        let before = accounts.load().unwrap();

        let wrong = service.authenticate("a@x.com", "nope").unwrap_err();
        let unknown = service.authenticate("b@x.com", "p1").unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, Error::InvalidCredentials));

        assert_eq!(accounts.load().unwrap(), before);
    }

    #[test]
    fn test_hashed_registration() {
        let (service, accounts, _) = service(true);
        service
            .register_user("Ann", "0400", dob(), "a@x.com", "p1")
            .unwrap();

        let stored = accounts.load().unwrap().get("a@x.com").unwrap().password.clone();
        assert_ne!(stored, "p1");
        assert!(service.authenticate("a@x.com", "p1").is_ok());
        assert!(service.authenticate("a@x.com", "p2").is_err());
    }

    #[test]
    fn test_plaintext_users_survive_enabling_hashing() {
        let accounts = Arc::new(MemoryAccountStore::new());
        let marks = Arc::new(MemoryMarksStore::new());
        AccountService::new(accounts.clone(), marks.clone(), false)
            .register_user("Ann", "0400", dob(), "a@x.com", "p1")
            .unwrap();

        let hashing = AccountService::new(accounts, marks, true);
        assert!(hashing.authenticate("a@x.com", "p1").is_ok());
    }

    #[test]
    fn test_dollar_prefixed_plaintext_password() {
        let (service, accounts, _) = service(false);
        service
            .register_user("Ann", "0400", dob(), "a@x.com", "$secret")
            .unwrap();
        service
            .register_user("Bo", "0401", dob(), "b@x.com", "$2b$pass")
            .unwrap();

        let book = accounts.load().unwrap();
        assert_eq!(book.get("a@x.com").unwrap().password, "$secret");
        assert!(service.authenticate("a@x.com", "$secret").is_ok());
        assert!(service.authenticate("b@x.com", "$2b$pass").is_ok());
        assert!(service.authenticate("b@x.com", "$2b$").is_err());
    }

    #[test]
    fn test_register_rejects_unusable_email() {
        let (service, accounts, _) = service(false);
        let err = service
            .register_user("Eve", "0", dob(), "../escape", "pw")
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(accounts.load().unwrap().is_empty());
    }

    #[test]
    fn test_profile_lookup() {
        let (service, _, _) = service(false);
        assert!(service.profile("a@x.com").unwrap().is_none());
        service
            .register_user("Ann", "0400", dob(), "a@x.com", "p1")
            .unwrap();
        assert_eq!(service.profile("a@x.com").unwrap().unwrap().phone, "0400");
    }
}
