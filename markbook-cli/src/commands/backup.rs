//! Backup command - manage data directory backups

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use markbook_core::config::Config;
use markbook_core::services::BackupService;

use super::get_data_dir;

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup
    Create {
        /// Maximum number of backups to keep, 0 keeps all (defaults to backups.maxBackups)
        #[arg(long, short = 'm')]
        max_backups: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available backups
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore from a backup
    Restore {
        /// Backup name to restore
        name: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear all backups
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

pub fn run(command: BackupCommands) -> Result<()> {
    // Backups only touch files, no need for the full context
    let data_dir = get_data_dir()?;
    let backup_service = BackupService::new(data_dir.clone());

    match command {
        BackupCommands::Create { max_backups, json } => {
            let max_backups = match max_backups {
                Some(max) => Some(max),
                None => Config::load(&data_dir)?.max_backups,
            };
            let result = backup_service.create(max_backups)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", "Backup created".green());
                println!("  Name: {}", result.name);
                println!("  Files: {}", result.entries);
                println!("  Size: {}", result.size_display());
            }
        }
        BackupCommands::List { json } => {
            let backups = backup_service.list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&backups)?);
                return Ok(());
            }

            if backups.is_empty() {
                println!("No backups found.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Name", "Created", "Files", "Size"]);

            for backup in backups {
                table.add_row(vec![
                    backup.name.clone(),
                    backup.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    backup.entries.to_string(),
                    backup.size_display(),
                ]);
            }

            println!("{}", table);
        }
        BackupCommands::Restore { name, force, json } => {
            if !force && !json && !confirm(&format!("Restore from backup '{}'?", name))? {
                println!("Cancelled.");
                return Ok(());
            }
            backup_service.restore(&name)?;
            if json {
                println!("{}", serde_json::json!({"restored": name}));
            } else {
                println!("Accounts and marks restored from backup: {}", name);
            }
        }
        BackupCommands::Clear { force, json } => {
            if !force && !json && !confirm("Delete all backups?")? {
                println!("Cancelled.");
                return Ok(());
            }
            let result = backup_service.clear()?;
            if json {
                println!("{}", serde_json::to_string(&result)?);
            } else {
                println!("Deleted {} backup(s)", result.deleted);
            }
        }
    }

    Ok(())
}
