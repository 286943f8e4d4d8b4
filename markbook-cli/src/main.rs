//! Markbook CLI - marks tracking in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use markbook_core::LogEvent;

mod commands;
mod output;

use commands::{account, backup, config, doctor, logs, marks, page, report, status};

/// Markbook - sign up, enter your marks, see your report
#[derive(Parser)]
#[command(name = "mb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Date of birth, YYYY-MM-DD
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Prompted without echo when omitted
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in and open the marks page
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Prompted without echo when omitted
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current page, or switch to another one
    Page {
        /// login, signup, marks or report
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit or show marks
    Marks {
        #[command(subcommand)]
        command: marks::MarksCommands,
    },

    /// Show the marks report with charts
    Report {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show registry and marks summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run storage health checks
    Doctor {
        /// Show verbose output
        #[arg(long, short)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage backups
    Backup {
        #[command(subcommand)]
        command: backup::BackupCommands,
    },

    /// View and manage logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

impl Commands {
    /// Command name for the event log
    fn name(&self) -> &'static str {
        match self {
            Commands::Signup { .. } => "signup",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Page { .. } => "page",
            Commands::Marks { .. } => "marks",
            Commands::Report { .. } => "report",
            Commands::Status { .. } => "status",
            Commands::Doctor { .. } => "doctor",
            Commands::Backup { .. } => "backup",
            Commands::Logs { .. } => "logs",
            Commands::Config { .. } => "config",
        }
    }
}

/// Privacy-safe error label: core errors by kind, anything else generic
fn error_kind(error: &anyhow::Error) -> &'static str {
    use markbook_core::Error;

    match error.downcast_ref::<Error>() {
        Some(Error::DuplicateUser(_)) => "duplicate_user",
        Some(Error::InvalidCredentials) => "invalid_credentials",
        Some(Error::Validation(_)) => "validation",
        Some(Error::Session(_)) => "session",
        Some(Error::Corrupt { .. }) => "corrupt_store",
        Some(Error::Credential(_)) => "credential",
        Some(Error::Io(_)) => "io",
        Some(Error::Json(_)) => "json",
        Some(Error::Csv(_)) => "csv",
        None => "error",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = commands::get_logger();
    let name = cli.command.name();

    let mut event = LogEvent::new("command_executed").with_command(name);
    if let Commands::Page { name: Some(page), .. } = &cli.command {
        event = event.with_page(page.to_ascii_lowercase());
    }
    commands::log_event(&logger, event);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(name)
                    .with_error(error_kind(&e)),
            );
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Signup {
            name,
            phone,
            dob,
            email,
            password,
            json,
        } => account::signup(
            account::SignupArgs {
                name,
                phone,
                dob,
                email,
                password,
            },
            json,
        ),
        Commands::Login {
            email,
            password,
            json,
        } => account::login(email, password, json),
        Commands::Logout => account::logout(),
        Commands::Whoami { json } => account::whoami(json),
        Commands::Page { name, json } => page::run(name, json),
        Commands::Marks { command } => marks::run(command),
        Commands::Report { json } => report::run(json),
        Commands::Status { json } => status::run(json),
        Commands::Doctor { verbose, json } => doctor::run(verbose, json),
        Commands::Backup { command } => backup::run(command),
        Commands::Logs { command } => logs::run(command),
        Commands::Config { command } => config::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_marks_submit() {
        let cli = Cli::try_parse_from(["mb", "marks", "submit", "80", "70", "60"]).unwrap();
        match cli.command {
            Commands::Marks {
                command: marks::MarksCommands::Submit { values, json },
            } => {
                assert_eq!(values, vec!["80", "70", "60"]);
                assert!(!json);
            }
            _ => panic!("expected marks submit"),
        }
    }

    #[test]
    fn test_error_kind() {
        let err = anyhow::Error::from(markbook_core::Error::InvalidCredentials);
        assert_eq!(error_kind(&err), "invalid_credentials");
        assert_eq!(error_kind(&anyhow::anyhow!("boom")), "error");
    }
}
