//! Page command - show or switch the current page of the session

use anyhow::Result;
use colored::Colorize;
use markbook_core::PageId;

use super::{get_context, with_session};
use crate::output;

pub fn run(name: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let session = match name {
        Some(name) => {
            let page: PageId = name.parse()?;
            with_session(&ctx, |session| {
                session.navigate(page)?;
                Ok(session.clone())
            })?
        }
        None => ctx.session_file().load()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    match session.current_page {
        PageId::Login => {
            println!("{}", "Login".bold());
            println!("Log in with `mb login`, or create an account with `mb page signup`.");
        }
        PageId::Signup => {
            println!("{}", "Sign Up".bold());
            println!("Create an account with `mb signup`.");
        }
        PageId::Marks => {
            let profile = ctx.session_service.current_user(&session)?;
            println!("{}", format!("Welcome, {}!", profile.name).bold());
            let table = ctx.session_service.get_report_data(&session)?;
            if table.is_empty() {
                println!("Enter your marks with `mb marks submit`.");
            } else {
                println!("{}", output::marks_table(&table));
                println!("Resubmit with `mb marks submit` to replace them.");
            }
        }
        PageId::Report => {
            let report = ctx.session_service.report(&session)?;
            super::report::print_report(&report);
        }
    }
    Ok(())
}
