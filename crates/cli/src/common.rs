//! Runtime context and host capabilities shared across CLI commands

use anyhow::{Context, Result};
use frontdate_config::{JsonFileStore, Settings};
use frontdate_core::{FileDescriptor, Notifier, Workspace};
use frontdate_engine::{DateManager, FrontMatterStore, Vault};
use owo_colors::OwoColorize;
use std::future::Future;
use std::path::Path;
use tokio::runtime::Runtime;

/// The date manager as wired up by the CLI
pub type CliManager = DateManager<FrontMatterStore, ConsoleNotifier>;

/// Prints notices to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("{} {message}", "›".cyan());
    }
}

/// The file named on the command line, if any
#[derive(Debug, Clone, Default)]
pub struct ActiveFile(Option<FileDescriptor>);

impl ActiveFile {
    /// No file was given
    pub fn none() -> Self {
        Self(None)
    }

    /// Resolve `path` (relative to the working directory) inside `vault`
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or lies outside the vault
    pub fn resolve(vault: &Vault, path: &Path) -> Result<Self> {
        let absolute = std::fs::canonicalize(path)
            .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
        let file = vault
            .describe(&absolute)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self(Some(file)))
    }
}

impl Workspace for ActiveFile {
    fn active_file(&self) -> Option<FileDescriptor> {
        self.0.clone()
    }
}

/// Shared state for a single CLI invocation
pub struct RuntimeContext {
    /// The opened vault
    pub vault: Vault,
    /// Where settings are persisted
    pub config: JsonFileStore,
    /// Policy engine bound to the vault's documents
    pub manager: CliManager,
    runtime: Runtime,
}

impl RuntimeContext {
    /// Open the vault, load settings and start a current-thread runtime
    ///
    /// `settings_path` overrides the default settings file inside the vault.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vault directory does not exist
    /// - The settings file exists but cannot be read or parsed
    /// - The async runtime cannot be created
    pub fn new(vault_dir: &Path, settings_path: Option<&Path>) -> Result<Self> {
        let vault = Vault::open(vault_dir)
            .with_context(|| format!("Failed to open vault {}", vault_dir.display()))?;

        let config = match settings_path {
            Some(path) => JsonFileStore::new(path),
            None => JsonFileStore::for_vault(vault.root()),
        };
        let settings = Settings::load(&config).context("Failed to load settings")?;
        let manager = DateManager::new(settings, vault.store(), ConsoleNotifier);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        tracing::debug!(
            vault = %vault.root().display(),
            settings = %config.path().display(),
            "Runtime context ready"
        );

        Ok(Self {
            vault,
            config,
            manager,
            runtime,
        })
    }

    /// The active file for a command taking an optional `FILE` argument
    ///
    /// # Errors
    ///
    /// Returns an error if a path was given but cannot be resolved
    pub fn active_file(&self, path: Option<&Path>) -> Result<ActiveFile> {
        path.map_or_else(|| Ok(ActiveFile::none()), |path| ActiveFile::resolve(&self.vault, path))
    }

    /// Drive a future to completion on the context's runtime
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
