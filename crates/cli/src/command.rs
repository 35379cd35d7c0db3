//! Command trait for the frontdate CLI

use crate::common::RuntimeContext;
use anyhow::Result;

/// Trait for all frontdate commands
///
/// Commands receive the [`RuntimeContext`] holding the opened vault, the
/// settings store and the date manager. Settings commands mutate it, so the
/// context is borrowed mutably.
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot complete. Error messages should
    /// be descriptive enough for the user to act on.
    fn execute(&self, context: &mut RuntimeContext) -> Result<Self::Output>;
}
