//! Keep a vault's timestamps current while files change
//!
//! Subscribes to filesystem notifications under the vault root and runs
//! every saved or created document through the date manager until Ctrl-C.

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::events::VaultEvents;

/// Watch the vault and update dates as documents change
#[derive(Debug, Args)]
pub struct WatchCommand {}

impl Command for WatchCommand {
    type Output = ();

    fn execute(&self, context: &mut RuntimeContext) -> Result<()> {
        let mut events =
            VaultEvents::watch(context.vault.clone()).context("Failed to start file watcher")?;

        println!(
            "{} {} {}",
            "Watching".bright_white().bold(),
            context.vault.root().display(),
            "(Ctrl-C to stop)".dimmed()
        );

        let manager = &context.manager;
        context.block_on(async {
            tokio::select! {
                () = manager.run(&mut events) => {
                    tracing::warn!("File watcher stopped delivering events");
                }
                signal = tokio::signal::ctrl_c() => {
                    signal.context("Failed to listen for Ctrl-C")?;
                    tracing::info!("Stopping watcher");
                }
            }
            Ok::<_, anyhow::Error>(())
        })
    }
}
