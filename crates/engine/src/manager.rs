//! Orchestration of blacklist checks and timestamp updates
//!
//! [`DateManager`] ties the pieces together: it owns the effective
//! [`Settings`], consults the blacklist, and drives one read-modify-write cycle
//! through a [`MetadataStore`] per file. Host notifications and the two user
//! commands ("update current file", "check blacklist") all go through it.
//!
//! Errors from the store are logged and swallowed for background events so a
//! single bad document never stops the host. The user commands report them
//! through the [`Notifier`] instead.

use crate::Result;
use crate::blacklist::{self, IgnoreReason, Verdict};
use crate::datefmt::DateFormat;
use crate::upsert::{self, UpsertOutcome};
use frontdate_config::Settings;
use frontdate_core::{
    ConfigStore, Error, EventSource, FileDescriptor, FileEvent, MetadataStore, Notifier, Workspace,
};
use std::time::Duration;

/// Delay between a creation notification and the first update
///
/// Gives the host time to finish writing a freshly created file.
pub const CREATE_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// The file is blacklisted and was not touched
    Ignored(IgnoreReason),
    /// The timestamps were applied
    Updated(UpsertOutcome),
}

/// Result of the "update current file" command
#[derive(Debug)]
pub enum CommandOutcome {
    /// The host has no active file
    NoActiveFile,
    /// The active file is blacklisted
    Blacklisted(IgnoreReason),
    /// The active file was updated
    Updated(UpsertOutcome),
    /// The store failed; the file is unchanged
    Failed(Error),
}

/// Applies the timestamp policy to files reported by the host
pub struct DateManager<S, N> {
    settings: Settings,
    format: DateFormat,
    store: S,
    notifier: N,
    create_delay: Duration,
}

impl<S, N> DateManager<S, N>
where
    S: MetadataStore,
    N: Notifier,
{
    /// Create a manager with the given settings
    pub fn new(settings: Settings, store: S, notifier: N) -> Self {
        let format = DateFormat::parse(&settings.date_format);
        Self {
            settings,
            format,
            store,
            notifier,
            create_delay: CREATE_SETTLE_DELAY,
        }
    }

    /// Override the creation settle delay
    #[must_use]
    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = delay;
        self
    }

    /// Effective settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Metadata store in use
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Notice sink in use
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn apply_settings(&mut self, settings: Settings) {
        self.format = DateFormat::parse(&settings.date_format);
        self.settings = settings;
    }

    /// Re-read settings from `config`, merged over the defaults
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read. The current settings stay
    /// in effect.
    pub fn reload(&mut self, config: &impl ConfigStore) -> Result<()> {
        let settings = Settings::load(config)?;
        self.apply_settings(settings);
        Ok(())
    }

    /// Mutate the settings and persist the result
    ///
    /// The change only takes effect once it has been saved.
    ///
    /// # Errors
    ///
    /// Returns error if the settings cannot be saved
    pub fn update_settings<F>(&mut self, config: &impl ConfigStore, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.clone();
        mutate(&mut settings);
        settings.save(config)?;
        tracing::info!("Settings saved");
        self.apply_settings(settings);
        Ok(())
    }

    /// Evaluate a file against the current blacklist
    pub fn evaluate(&self, file: &FileDescriptor) -> Verdict {
        blacklist::evaluate(file, &self.settings.blacklist)
    }

    /// Blacklist check followed by one read-modify-write cycle
    ///
    /// # Errors
    ///
    /// Returns error if the store fails
    pub async fn process(&self, file: &FileDescriptor) -> Result<Processed> {
        if let Verdict::Ignored(reason) = self.evaluate(file) {
            return Ok(Processed::Ignored(reason));
        }

        let fields = self.settings.fields();
        let mut outcome = UpsertOutcome::default();
        self.store
            .with_metadata(file, |metadata| {
                outcome = upsert::apply(
                    metadata,
                    file.created_at(),
                    file.modified_at(),
                    fields,
                    &self.format,
                );
            })
            .await?;

        Ok(Processed::Updated(outcome))
    }

    /// Handle a saved file
    pub async fn handle_file_changed(&self, file: &FileDescriptor) {
        match self.process(file).await {
            Ok(Processed::Ignored(reason)) => {
                tracing::debug!(path = file.path(), %reason, "Skipping blacklisted file");
            }
            Ok(Processed::Updated(outcome)) => {
                tracing::debug!(
                    path = file.path(),
                    created = outcome.created_written,
                    changed = outcome.changed,
                    "Updated dates"
                );
            }
            Err(e) => {
                tracing::error!(path = file.path(), error = %e, "Failed to update dates");
            }
        }
    }

    /// Handle a newly created file once it has settled
    ///
    /// The timestamps are re-read after the delay, since the host is usually
    /// still writing when the creation is reported.
    pub async fn handle_file_created(&self, file: &FileDescriptor) {
        tokio::time::sleep(self.create_delay).await;
        match self.store.refresh(file).await {
            Ok(settled) => self.handle_file_changed(&settled).await,
            Err(e) => {
                tracing::debug!(path = file.path(), error = %e, "Created file is gone");
            }
        }
    }

    /// Dispatch a host notification
    pub async fn handle_event(&self, event: &FileEvent) {
        match event {
            FileEvent::Changed(file) => self.handle_file_changed(file).await,
            FileEvent::Created(file) => self.handle_file_created(file).await,
        }
    }

    /// Handle events one at a time until the source is exhausted
    pub async fn run(&self, events: &mut impl EventSource) {
        while let Some(event) = events.next_event().await {
            self.handle_event(&event).await;
        }
        tracing::debug!("Event source closed");
    }

    /// "Update current file dates"
    pub async fn update_current_file(&self, workspace: &impl Workspace) -> CommandOutcome {
        let Some(file) = workspace.active_file() else {
            self.notifier.notify("No active file");
            return CommandOutcome::NoActiveFile;
        };

        match self.process(&file).await {
            Ok(Processed::Ignored(reason)) => {
                tracing::debug!(path = file.path(), %reason, "Active file is blacklisted");
                self.notifier
                    .notify(&format!("{} is blacklisted", file.name()));
                CommandOutcome::Blacklisted(reason)
            }
            Ok(Processed::Updated(outcome)) => {
                self.notifier
                    .notify(&format!("Updated dates for {}", file.name()));
                CommandOutcome::Updated(outcome)
            }
            Err(e) => {
                tracing::error!(path = file.path(), error = %e, "Failed to update dates");
                self.notifier
                    .notify(&format!("Failed to update dates for {}", file.name()));
                CommandOutcome::Failed(e)
            }
        }
    }

    /// "Check if current file is blacklisted"
    ///
    /// Returns `None` when there is no active file.
    pub fn check_blacklist(&self, workspace: &impl Workspace) -> Option<bool> {
        let Some(file) = workspace.active_file() else {
            self.notifier.notify("No active file");
            return None;
        };

        let verdict = self.evaluate(&file);
        if let Some(reason) = verdict.reason() {
            tracing::debug!(path = file.path(), %reason, "Blacklist match");
            self.notifier
                .notify(&format!("{} IS blacklisted", file.name()));
        } else {
            self.notifier
                .notify(&format!("{} is NOT blacklisted", file.name()));
        }

        Some(verdict.is_ignored())
    }
}
