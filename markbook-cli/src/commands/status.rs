//! Status command - show registry and marks summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Markbook Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Registered users", &status.total_users.to_string()]);
    table.add_row(vec!["Users with marks", &status.users_with_marks.to_string()]);
    table.add_row(vec!["Users without marks", &status.users_without_marks.to_string()]);
    table.add_row(vec![
        "Password storage",
        if status.hash_passwords { "argon2" } else { "plaintext" },
    ]);

    println!("{}", table);
    println!();
    println!("Data directory: {}", ctx.data_dir.display());

    Ok(())
}
