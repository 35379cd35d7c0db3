//! Settings commands
//!
//! - show: print the effective settings and warn about broken patterns
//! - set: change one setting and persist
//! - reset: persist the built-in defaults

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use frontdate_config::{BlacklistList, SettingKey, Settings};
use frontdate_engine::blacklist::invalid_patterns;
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::RuntimeContext;

/// Commands for viewing and changing settings
#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Print the effective settings
    Show(ShowCommand),

    /// Change a setting
    #[command(long_about = "Change a setting

Scalar settings take a single value; an empty value restores the default.
Blacklist lists take zero or more entries and replace the whole list.

Examples:
  • frontdate settings set date-format 'DD.MM.YYYY HH:mm'
  • frontdate settings set created-field ''
      → restore the default 'created'
  • frontdate settings set folders _templates archive
  • frontdate settings set patterns
      → clear all patterns")]
    Set(SetCommand),

    /// Restore and persist the default settings
    Reset(ResetCommand),
}

/// Print the effective settings
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Print the persisted JSON shape instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Change a setting
#[derive(Debug, Args)]
pub struct SetCommand {
    /// Setting name: date-format, created-field, modified-field, folders,
    /// filenames, extensions or patterns
    #[arg(value_name = "KEY")]
    pub key: SettingKey,

    /// New value, or list entries for blacklist settings
    #[arg(value_name = "VALUE", num_args = 0..)]
    pub values: Vec<String>,
}

/// Restore the default settings
#[derive(Debug, Args)]
pub struct ResetCommand {}

impl SetCommand {
    /// The text form handed to the settings model
    fn text(&self) -> String {
        match self.key {
            SettingKey::List(_) => self.values.join("\n"),
            _ => self.values.join(" "),
        }
    }
}

fn print_section_header(name: &str) {
    println!("{}", name.bright_white().bold());
}

fn print_row(label: &str, value: &str) {
    println!("  {label:16} {}", value.bright_white());
}

fn print_list(label: &str, entries: &[String]) {
    if entries.is_empty() {
        println!("  {label:16} {}", "(none)".dimmed());
    } else {
        println!("  {label:16} {}", entries.join(", ").bright_white());
    }
}

fn warn_invalid_patterns(settings: &Settings) {
    for (pattern, error) in invalid_patterns(&settings.blacklist) {
        println!(
            "{}: pattern {} is not a valid regex and is skipped",
            "Warning".yellow(),
            pattern.bold()
        );
        println!("  {}", error.dimmed());
    }
}

impl Command for ShowCommand {
    type Output = ();

    fn execute(&self, context: &mut RuntimeContext) -> Result<()> {
        let settings = context.manager.settings();

        if self.json {
            let json = serde_json::to_string_pretty(&settings.to_json()?)
                .context("Failed to serialize settings")?;
            println!("{json}");
            return Ok(());
        }

        print_section_header("Dates");
        print_row("Date format", &settings.date_format);
        print_row("Created field", &settings.created_field);
        print_row("Modified field", &settings.modified_field);
        println!();

        print_section_header("Blacklist");
        for list in BlacklistList::ALL {
            print_list(list.key(), settings.blacklist.list(list));
        }
        println!();

        println!(
            "{}",
            format!("Stored in {}", context.config.path().display()).dimmed()
        );
        warn_invalid_patterns(settings);
        Ok(())
    }
}

impl Command for SetCommand {
    type Output = ();

    fn execute(&self, context: &mut RuntimeContext) -> Result<()> {
        let key = self.key;
        let text = self.text();

        let RuntimeContext {
            config, manager, ..
        } = context;
        manager
            .update_settings(&*config, |settings| settings.set(key, &text))
            .with_context(|| format!("Failed to save setting {key}"))?;

        println!("{} {key}", "Updated".bright_green());
        if matches!(key, SettingKey::List(BlacklistList::Patterns)) {
            warn_invalid_patterns(manager.settings());
        }
        Ok(())
    }
}

impl Command for ResetCommand {
    type Output = ();

    fn execute(&self, context: &mut RuntimeContext) -> Result<()> {
        let RuntimeContext {
            config, manager, ..
        } = context;
        manager
            .update_settings(&*config, |settings| *settings = Settings::default())
            .context("Failed to reset settings")?;

        println!("{}", "Settings reset to defaults".bright_green());
        Ok(())
    }
}
