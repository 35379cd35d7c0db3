//! Logging configuration for the frontdate CLI
//!
//! Compact terminal output plus optional file logging using tracing.

use crate::{Error, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable debug level logging and timestamps
/// * `log_file` - Optional path to append detailed logs to
///
/// The default filter can be overridden with `RUST_LOG`.
///
/// # Examples
/// ```ignore
/// // Basic usage with info level
/// init(false, None)?;
///
/// // Verbose mode with a debug log file
/// init(true, Some(Path::new("frontdate.log")))?;
/// ```
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!(
            "frontdate={level},frontdate_engine={level},frontdate_config={level}"
        ))
        .map_err(|e| Error::Message(format!("Invalid log filter: {e}")))?,
    };

    let file = log_file
        .map(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| Error::FileWrite {
                    path: path.to_path_buf(),
                    source,
                })
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(terminal_layer(verbose, env_filter))
        .with(file_layer(file))
        .try_init()
        .map_err(|e| Error::Message(format!("Failed to initialize logging: {e}")))
}

/// Compact stderr output; timestamps only in verbose mode
fn terminal_layer<S>(verbose: bool, filter: EnvFilter) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true)
        .compact();

    if verbose {
        layer.with_filter(filter).boxed()
    } else {
        layer.without_time().with_filter(filter).boxed()
    }
}

/// Detailed file layer that always records at debug level
fn file_layer<S>(file: Option<File>) -> Option<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    file.map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .with_filter(EnvFilter::new("debug"))
    })
}
