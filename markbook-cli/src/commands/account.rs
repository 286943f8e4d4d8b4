//! Account commands - sign up, log in, log out, whoami

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use markbook_core::Registration;

use super::{get_context, password_or_prompt, text_or_prompt, with_session};

/// Fields of the sign-up form; missing ones are prompted for
pub struct SignupArgs {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

fn parse_dob(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date of birth '{}', expected YYYY-MM-DD", raw))
}

pub fn signup(args: SignupArgs, json: bool) -> Result<()> {
    let name = text_or_prompt(args.name, "Name")?;
    let phone = text_or_prompt(args.phone, "Phone")?;
    let dob = parse_dob(&text_or_prompt(args.dob, "Date of birth (YYYY-MM-DD)")?)?;
    let email = text_or_prompt(args.email, "Email")?;
    let password = password_or_prompt(args.password, true)?;

    let ctx = get_context()?;
    let profile = with_session(&ctx, |session| {
        Ok(ctx.session_service.register_user(
            session,
            Registration::new(email, name, phone, dob, password),
        )?)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("{}", "Account created successfully! Please log in.".green());
    }
    Ok(())
}

pub fn login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let email = text_or_prompt(email, "Email")?;
    let password = password_or_prompt(password, false)?;

    let ctx = get_context()?;
    let profile = with_session(&ctx, |session| {
        Ok(ctx.session_service.login(session, &email, &password)?)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("{}", format!("Welcome, {}!", profile.name).green().bold());
        println!("Submit your marks with `mb marks submit`.");
    }
    Ok(())
}

pub fn logout() -> Result<()> {
    let ctx = get_context()?;
    with_session(&ctx, |session| {
        ctx.session_service.sign_out(session);
        Ok(())
    })?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.session_file().load()?;

    if !session.logged_in {
        if json {
            println!(
                "{}",
                serde_json::json!({"logged_in": false, "page": session.current_page})
            );
        } else {
            println!("Not logged in (page: {}).", session.current_page);
        }
        return Ok(());
    }

    let profile = ctx.session_service.current_user(&session)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "logged_in": true,
                "page": session.current_page,
                "user": profile,
            }))?
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Name", profile.name.as_str()]);
    table.add_row(vec!["Email", profile.email.as_str()]);
    table.add_row(vec!["Phone", profile.phone.as_str()]);
    table.add_row(vec!["Date of birth", &profile.dob.to_string()]);
    table.add_row(vec!["Page", session.current_page.as_str()]);
    println!("{}", table);
    Ok(())
}
