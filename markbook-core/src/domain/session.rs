//! Session context
//!
//! Replaces process-wide "logged in / current page / username" flags with a
//! value every handler receives explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Pages of the marks portal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageId {
    #[default]
    Login,
    Signup,
    Marks,
    Report,
}

impl PageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageId::Login => "login",
            PageId::Signup => "signup",
            PageId::Marks => "marks",
            PageId::Report => "report",
        }
    }

    /// Whether the page is only reachable after logging in
    pub fn requires_login(&self) -> bool {
        matches!(self, PageId::Marks | PageId::Report)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "login" => Ok(PageId::Login),
            "signup" => Ok(PageId::Signup),
            "marks" => Ok(PageId::Marks),
            "report" => Ok(PageId::Report),
            other => Err(Error::validation(format!("Unknown page: {}", other))),
        }
    }
}

/// Per-session state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub logged_in: bool,
    pub current_page: PageId,
    pub user_key: Option<String>,
}

impl Session {
    /// A fresh, logged-out session on the login page
    pub fn new() -> Self {
        Self::default()
    }

    /// The logged-in user's key, or a session error
    pub fn require_user(&self) -> Result<&str> {
        match (&self.user_key, self.logged_in) {
            (Some(key), true) => Ok(key),
            _ => Err(Error::session("Not logged in")),
        }
    }

    /// Move to another page
    ///
    /// Login and sign-up are for anonymous sessions; marks and report need a
    /// logged-in user.
    pub fn navigate(&mut self, page: PageId) -> Result<()> {
        if page.requires_login() != self.logged_in {
            let reason = if self.logged_in {
                format!("Sign out before opening the {} page", page)
            } else {
                format!("Log in to open the {} page", page)
            };
            return Err(Error::session(reason));
        }
        self.current_page = page;
        Ok(())
    }

    pub(crate) fn signed_up(&mut self) {
        self.current_page = PageId::Login;
    }

    pub(crate) fn logged_in_as(&mut self, user_key: impl Into<String>) {
        self.logged_in = true;
        self.user_key = Some(user_key.into());
        self.current_page = PageId::Marks;
    }

    pub(crate) fn marks_submitted(&mut self) {
        self.current_page = PageId::Report;
    }

    pub fn sign_out(&mut self) {
        self.logged_in = false;
        self.user_key = None;
        self.current_page = PageId::Login;
    }
}
