//! CLI command implementations

pub mod check;
pub mod settings;
pub mod update;
pub mod watch;
