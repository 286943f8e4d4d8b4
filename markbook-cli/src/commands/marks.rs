//! Marks commands - submit and show the logged-in user's marks

use std::io::{self, Read};

use anyhow::Result;
use clap::Subcommand;
use markbook_core::{MarksTable, Subject};

use super::{get_context, interactive, with_session};
use crate::output;

#[derive(Subcommand)]
pub enum MarksCommands {
    /// Submit marks for all seven subjects (replaces any earlier submission)
    Submit {
        /// Marks in subject order: Maths Physics Chemistry Biology English ICT History
        values: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the submitted marks
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: MarksCommands) -> Result<()> {
    match command {
        MarksCommands::Submit { values, json } => submit(values, json),
        MarksCommands::Show { json } => show(json),
    }
}

/// Split piped input on commas, whitespace or newlines
fn split_values(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_values(values: Vec<String>) -> Result<Vec<String>> {
    if !values.is_empty() {
        return Ok(values);
    }

    if !interactive() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(split_values(&buffer));
    }

    Subject::ALL
        .iter()
        .map(|subject| -> Result<String> {
            Ok(dialoguer::Input::<String>::new()
                .with_prompt(format!("{} marks", subject))
                .interact_text()?)
        })
        .collect()
}

fn submit(values: Vec<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    // Fail on a logged-out session before asking for seven numbers
    ctx.session_file().load()?.require_user()?;

    let values = read_values(values)?;
    let table = MarksTable::parse_marks(&values)?;

    with_session(&ctx, |session| {
        Ok(ctx.session_service.submit_table(session, &table)?)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        output::success("Marks saved successfully!");
        println!("{}", output::marks_table(&table));
        println!("View the report with `mb report`.");
    }
    Ok(())
}

pub fn show(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.session_file().load()?;
    let table = ctx.session_service.get_report_data(&session)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    if table.is_empty() {
        output::warning("No marks found!");
        return Ok(());
    }

    println!("{}", output::marks_table(&table));
    Ok(())
}
