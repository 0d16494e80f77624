//! Persisted process-wide toggles and rotation bookkeeping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use signalpost_core::ChatId;
use signalpost_error::{StorageError, StorageErrorKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// The settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether content waits for operator approval
    pub moderation_enabled: bool,
    /// Whether win fragments finalize posts
    pub generation_enabled: bool,
    /// Next link to rotate, per channel id
    pub current_link_index: BTreeMap<i64, usize>,
    /// Day the longest length bucket was last drawn
    pub last_big_bucket_usage: Option<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            moderation_enabled: true,
            generation_enabled: true,
            current_link_index: BTreeMap::new(),
            last_big_bucket_usage: None,
        }
    }
}

/// Settings record backed by a JSON file, rewritten on every mutation.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Load the record at `path`, falling back to defaults when it does not exist.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let settings = match tokio::fs::read_to_string(&path).await {
            Ok(json) => serde_json::from_str(&json).map_err(|e| {
                StorageError::new(StorageErrorKind::Serialization(e.to_string()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No settings record, using defaults");
                Settings::default()
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                ))));
            }
        };
        debug!(?settings, "Settings loaded");
        Ok(Self { path, settings })
    }

    /// Current values.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether moderation is on.
    pub fn moderation_enabled(&self) -> bool {
        self.settings.moderation_enabled
    }

    /// Whether generation is on.
    pub fn generation_enabled(&self) -> bool {
        self.settings.generation_enabled
    }

    /// Day the longest length bucket was last drawn.
    pub fn last_big_bucket_usage(&self) -> Option<NaiveDate> {
        self.settings.last_big_bucket_usage
    }

    /// Next link index for `channel`.
    pub fn link_index(&self, channel: ChatId) -> usize {
        self.settings
            .current_link_index
            .get(&channel.0)
            .copied()
            .unwrap_or(0)
    }

    /// Set the moderation toggle and persist.
    pub async fn set_moderation(&mut self, enabled: bool) -> Result<(), StorageError> {
        self.settings.moderation_enabled = enabled;
        self.save().await
    }

    /// Set the generation toggle and persist.
    pub async fn set_generation(&mut self, enabled: bool) -> Result<(), StorageError> {
        self.settings.generation_enabled = enabled;
        self.save().await
    }

    /// Record the day the longest bucket was drawn and persist.
    pub async fn mark_big_bucket_used(&mut self, day: NaiveDate) -> Result<(), StorageError> {
        self.settings.last_big_bucket_usage = Some(day);
        self.save().await
    }

    /// Store the next link index for `channel` and persist.
    pub async fn set_link_index(
        &mut self,
        channel: ChatId,
        index: usize,
    ) -> Result<(), StorageError> {
        self.settings.current_link_index.insert(channel.0, index);
        self.save().await
    }

    /// Write the record.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn save(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;
        debug!("Settings saved");
        Ok(())
    }
}
