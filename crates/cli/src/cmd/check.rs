//! Report whether a file is blacklisted

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;

/// Check if current file is blacklisted
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Document to check (relative to the working directory)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl Command for CheckCommand {
    /// `None` when no file was given
    type Output = Option<bool>;

    fn execute(&self, context: &mut RuntimeContext) -> Result<Option<bool>> {
        let workspace = context.active_file(self.file.as_deref())?;
        Ok(context.manager.check_blacklist(&workspace))
    }
}
