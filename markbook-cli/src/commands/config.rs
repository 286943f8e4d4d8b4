//! Config command - show and change settings.json

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use comfy_table::{ContentArrangement, Table};
use markbook_core::config::{Config, HASH_PASSWORDS_ENV};

use super::get_data_dir;
use crate::output;

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Store new passwords as Argon2 hashes (on) or plaintext (off)
    Hashing {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Number of backups kept after `mb backup create` (0 keeps all)
    MaxBackups { count: usize },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let data_dir = get_data_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&data_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.add_row(vec!["Data directory", &data_dir.display().to_string()]);
            table.add_row(vec!["Hash passwords", &config.hash_passwords.to_string()]);
            table.add_row(vec![
                "Max backups",
                &config
                    .max_backups
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "unlimited".to_string()),
            ]);
            println!("{}", table);
        }
        ConfigCommands::Hashing { state } => {
            let mut config = Config::load_stored(&data_dir)?;
            config.hash_passwords = matches!(state, Toggle::On);
            config.save(&data_dir)?;

            if config.hash_passwords {
                output::success("New passwords will be stored as Argon2 hashes.");
                println!("Existing plaintext passwords keep working; `mb doctor` lists them.");
            } else {
                output::success("New passwords will be stored in plaintext.");
            }
            if std::env::var(HASH_PASSWORDS_ENV).is_ok() {
                output::warning(&format!(
                    "{} is set and overrides this setting.",
                    HASH_PASSWORDS_ENV
                ));
            }
        }
        ConfigCommands::MaxBackups { count } => {
            let mut config = Config::load_stored(&data_dir)?;
            config.max_backups = (count > 0).then_some(count);
            config.save(&data_dir)?;
            output::success("Backup retention updated.");
        }
    }

    Ok(())
}
