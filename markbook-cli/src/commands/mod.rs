//! CLI command implementations

pub mod account;
pub mod backup;
pub mod config;
pub mod doctor;
pub mod logs;
pub mod marks;
pub mod page;
pub mod report;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use markbook_core::{EntryPoint, LogEvent, LoggingService, MarkbookContext, Session};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MARKBOOK_DIR";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".markbook"))
        .context("Could not find home directory; set MARKBOOK_DIR")
}

/// Get or create the markbook context
pub fn get_context() -> Result<MarkbookContext> {
    let data_dir = get_data_dir()?;
    MarkbookContext::new(&data_dir).context("Failed to initialize markbook context")
}

/// Run `action` against the saved session and persist the result
///
/// The session is saved even when `action` fails, so a rejected step
/// leaves the session exactly as the handler left it. Other `mb` runs wait
/// on the session lock until the save is done.
pub fn with_session<T>(
    ctx: &MarkbookContext,
    action: impl FnOnce(&mut Session) -> Result<T>,
) -> Result<T> {
    let file = ctx.session_file();
    let _lock = file.lock()?;
    let mut session = file.load()?;
    let result = action(&mut session);
    file.save(&session)?;
    result
}

/// Whether prompts can be shown
pub fn interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Use the given value or ask for it
pub fn text_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    if !interactive() {
        anyhow::bail!("{} is required", prompt);
    }
    let value = dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()?;
    Ok(value)
}

/// Use the given password or ask for it without echo
pub fn password_or_prompt(value: Option<String>, confirm: bool) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    if !interactive() {
        anyhow::bail!("Password is required");
    }
    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}
