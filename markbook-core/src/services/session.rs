//! Session service - the page handlers of the marks portal
//!
//! Each handler takes the caller's [`Session`] explicitly, checks that the
//! action fits the session state, delegates to the account/marks services
//! and moves the session to the page that follows.

use crate::domain::result::{Error, Result};
use crate::domain::{MarksTable, Registration, Report, Session, UserProfile};

use super::{AccountService, MarksService, ReportService};

#[derive(Clone)]
pub struct SessionService {
    accounts: AccountService,
    marks: MarksService,
    reports: ReportService,
}

impl SessionService {
    pub fn new(accounts: AccountService, marks: MarksService, reports: ReportService) -> Self {
        Self {
            accounts,
            marks,
            reports,
        }
    }

    /// Sign-up page: register and send the user to the login page
    pub fn register_user(&self, session: &mut Session, registration: Registration) -> Result<UserProfile> {
        ensure_logged_out(session)?;
        let profile = self.accounts.register(registration)?;
        session.signed_up();
        Ok(profile)
    }

    /// Login page: authenticate and open the marks page
    pub fn login(&self, session: &mut Session, email: &str, password: &str) -> Result<UserProfile> {
        ensure_logged_out(session)?;
        let profile = self.accounts.authenticate(email, password)?;
        session.logged_in_as(&profile.email);
        Ok(profile)
    }

    /// Profile of the logged-in user (the marks page greeting)
    pub fn current_user(&self, session: &Session) -> Result<UserProfile> {
        let user_key = session.require_user()?;
        self.accounts
            .profile(user_key)?
            .ok_or_else(|| Error::session(format!("Account {} no longer exists", user_key)))
    }

    /// Marks page: save seven marks and open the report page
    pub fn submit_marks(&self, session: &mut Session, marks: &[i64]) -> Result<MarksTable> {
        let table = MarksTable::from_marks(marks)?;
        self.submit_table(session, &table)?;
        Ok(table)
    }

    /// Same as [`submit_marks`](Self::submit_marks) for an already parsed table
    pub fn submit_table(&self, session: &mut Session, table: &MarksTable) -> Result<()> {
        let user_key = session.require_user()?.to_string();
        self.marks.submit_table(&user_key, table)?;
        session.marks_submitted();
        Ok(())
    }

    /// The logged-in user's marks (possibly empty)
    pub fn get_report_data(&self, session: &Session) -> Result<MarksTable> {
        self.marks.get_report_data(session.require_user()?)
    }

    /// Report page contents for the logged-in user
    pub fn report(&self, session: &Session) -> Result<Report> {
        self.reports.build(session.require_user()?)
    }

    pub fn sign_out(&self, session: &mut Session) {
        session.sign_out();
    }
}

fn ensure_logged_out(session: &Session) -> Result<()> {
    match (&session.user_key, session.logged_in) {
        (Some(user), true) => Err(Error::session(format!(
            "Already logged in as {}; sign out first",
            user
        ))),
        _ => Ok(()),
    }
}
