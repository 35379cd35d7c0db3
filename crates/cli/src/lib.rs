//! Frontdate CLI library
//!
//! This library contains all the CLI logic for frontdate, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod events;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use frontdate_engine::CommandOutcome;
use std::path::PathBuf;

use cmd::settings::SettingsCommands;
use command::Command;
use common::RuntimeContext;

/// Frontdate - keep `created` / `updated` front matter current
#[derive(Parser)]
#[command(name = "frontdate")]
#[command(about = "Maintain created/updated timestamps in Markdown front matter")]
#[command(version)]
#[command(long_about = "Maintain created/updated timestamps in Markdown front matter

Every Markdown document in a vault gets a creation timestamp written once and
a modification timestamp refreshed on every save. Folders, file names,
extensions and regex patterns can be blacklisted.

Settings live in <vault>/.frontdate/settings.json unless --settings is given.")]
pub struct Cli {
    /// Path to the vault directory
    #[arg(long, env = "FRONTDATE_VAULT", value_name = "DIR", default_value = ".")]
    pub vault: PathBuf,

    /// Path to the settings file
    #[arg(long, env = "FRONTDATE_SETTINGS", value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "FRONTDATE_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for frontdate CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Update current file dates
    Update(cmd::update::UpdateCommand),

    /// Check if current file is blacklisted
    Check(cmd::check::CheckCommand),

    /// Watch the vault and update dates as documents are saved or created
    Watch(cmd::watch::WatchCommand),

    /// View or change settings
    #[command(subcommand)]
    Settings(SettingsCommands),
}

/// Execute the command based on the command type
fn execute_command(command: Commands, context: &mut RuntimeContext) -> Result<()> {
    match command {
        Commands::Update(update_cmd) => {
            if let CommandOutcome::Failed(e) = update_cmd.execute(context)? {
                return Err(e).context("Failed to update dates");
            }
        }
        Commands::Check(check_cmd) => {
            check_cmd.execute(context)?;
        }
        Commands::Watch(watch_cmd) => {
            watch_cmd.execute(context)?;
        }
        Commands::Settings(settings_cmd) => match settings_cmd {
            SettingsCommands::Show(show_cmd) => show_cmd.execute(context)?,
            SettingsCommands::Set(set_cmd) => set_cmd.execute(context)?,
            SettingsCommands::Reset(reset_cmd) => reset_cmd.execute(context)?,
        },
    }

    Ok(())
}

/// Main entry point for the CLI logic
///
/// # Errors
///
/// Returns an error if:
/// - Logging initialization fails
/// - The vault cannot be opened or settings cannot be loaded
/// - Command execution fails
pub fn run(cli: Cli) -> Result<()> {
    frontdate_config::logging::init(cli.verbose, cli.log_file.as_deref())
        .context("Failed to initialize logging")?;

    let mut context = RuntimeContext::new(&cli.vault, cli.settings.as_deref())?;

    execute_command(cli.command, &mut context)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use clap::CommandFactory;
    use frontdate_config::{BlacklistList, SettingKey};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update_with_file() {
        let cli = Cli::try_parse_from(["frontdate", "--vault", "/notes", "update", "a.md"]).unwrap();

        assert_eq!(cli.vault, PathBuf::from("/notes"));
        assert!(matches!(
            cli.command,
            Commands::Update(cmd::update::UpdateCommand { file: Some(ref f) }) if f == &PathBuf::from("a.md")
        ));
    }

    #[test]
    fn test_parse_check_without_file() {
        let cli = Cli::try_parse_from(["frontdate", "check"]).unwrap();
        assert!(matches!(cli.command, Commands::Check(cmd::check::CheckCommand { file: None })));
    }

    #[test]
    fn test_parse_settings_set_list() {
        let cli = Cli::try_parse_from([
            "frontdate", "settings", "set", "patterns", "^draft", "tmp$",
        ])
        .unwrap();

        let Commands::Settings(SettingsCommands::Set(set)) = cli.command else {
            panic!("expected settings set");
        };
        assert_eq!(set.key, SettingKey::List(BlacklistList::Patterns));
        assert_eq!(set.values, vec!["^draft", "tmp$"]);
    }

    #[test]
    fn test_parse_settings_set_unknown_key() {
        assert!(Cli::try_parse_from(["frontdate", "settings", "set", "colour", "red"]).is_err());
    }
}
