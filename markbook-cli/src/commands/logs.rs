//! Logs command - inspect and prune logs.jsonl

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use markbook_core::services::{LogEntry, LogStats};
use markbook_core::{EntryPoint, LoggingService};

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show the newest entries of the log file
    List {
        /// How many entries
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
        /// Only failed commands and other errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drop entries older than the given age
    Clear {
        #[arg(long, default_value_t = 30)]
        days: i64,
        /// Do not ask before rewriting the file
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Size, entry counts and time span of the log file
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy logs.jsonl to another path
    Export { output: PathBuf },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let logs = LoggingService::new(&get_data_dir()?, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List {
            limit,
            errors,
            json,
        } => list(&logs, limit, errors, json),
        LogsCommands::Clear { days, force, json } => clear(&logs, days, force, json),
        LogsCommands::Stats { json } => stats(&logs, json),
        LogsCommands::Export { output: path } => {
            let written = logs.export(&path)?;
            output::success(&format!("Wrote {}", written.display()));
            Ok(())
        }
    }
}

fn when(timestamp_ms: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_ms).single() {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("@{}", timestamp_ms),
    }
}

/// Command and page joined for one column, `-` when neither is set
fn origin(entry: &LogEntry) -> String {
    match (entry.command.as_deref(), entry.page.as_deref()) {
        (Some(command), Some(page)) => format!("{} ({})", command, page),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn list(logs: &LoggingService, limit: usize, errors: bool, json: bool) -> Result<()> {
    let mut entries = if errors {
        logs.get_errors(limit)?
    } else {
        logs.get_recent(limit)?
    };
    // oldest at the top, like reading the file
    entries.reverse();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("Log is empty.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["When (UTC)", "Event", "Origin", "Error"]);
    for entry in &entries {
        let error = match &entry.error_message {
            Some(kind) => kind.red().to_string(),
            None => String::new(),
        };
        table.add_row(vec![when(entry.timestamp), entry.event.clone(), origin(entry), error]);
    }
    println!("{}", table);
    Ok(())
}

fn clear(logs: &LoggingService, days: i64, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("Remove log entries older than {} days?", days))
            .default(false)
            .interact()?;
        if !proceed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let cutoff = Utc::now() - Duration::days(days);
    let removed = logs.delete_before(cutoff.timestamp_millis())?;
    if json {
        println!("{}", serde_json::json!({ "deleted": removed }));
    } else {
        output::success(&format!("Removed {} entries", removed));
    }
    Ok(())
}

fn span(stats: &LogStats) -> Option<String> {
    Some(format!("{} .. {}", when(stats.oldest?), when(stats.newest?)))
}

fn stats(logs: &LoggingService, json: bool) -> Result<()> {
    let stats = logs.stats()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", stats.path.display().to_string().bold());
    println!(
        "  {} bytes, {} entries, {} errors",
        stats.size_bytes, stats.entries, stats.errors
    );
    if let Some(span) = span(&stats) {
        println!("  {}", span);
    }
    if stats.skipped_lines > 0 {
        output::warning(&format!("{} unreadable lines", stats.skipped_lines));
    }

    if !stats.by_event.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Event", "Count"]);
        for (event, count) in &stats.by_event {
            table.add_row(vec![event.clone(), count.to_string()]);
        }
        println!("{}", table);
    }
    Ok(())
}
