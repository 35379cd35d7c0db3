//! Update the dates of one file

use anyhow::Result;
use clap::Args;
use frontdate_engine::CommandOutcome;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;

/// Update current file dates
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Document to update (relative to the working directory)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl Command for UpdateCommand {
    type Output = CommandOutcome;

    fn execute(&self, context: &mut RuntimeContext) -> Result<CommandOutcome> {
        let workspace = context.active_file(self.file.as_deref())?;
        let outcome = context.block_on(context.manager.update_current_file(&workspace));
        Ok(outcome)
    }
}
