//! User preference persistence for the peerwait viewer.
//!
//! This module provides a tiny JSON-backed store that records lightweight
//! configuration such as the preferred theme and the default selection
//! behaviour of the learner table. The file is written to the standard
//! configuration directory (`~/.config/peerwait/preferences.json` on most
//! platforms) and is safe to read/write from multiple threads thanks to the
//! internal `Mutex`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use dirs_next::config_dir;
use peerwait_types::{EmptySelectionPolicy, MultiSelectPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "PEERWAIT_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted preference values.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferencesPayload {
    /// Canonical identifier of the theme selected via the TUI.
    #[serde(default)]
    pub preferred_theme: Option<String>,
    /// Whether the learner table shows the selection column by default.
    #[serde(default)]
    pub selectable_learners_enabled: Option<bool>,
    #[serde(default)]
    pub empty_selection: Option<EmptySelectionPolicy>,
    #[serde(default)]
    pub multi_select: Option<MultiSelectPolicy>,
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Create a store rooted at the default path (or `PEERWAIT_PREFERENCES_PATH`).
    pub fn new() -> Result<Self, PreferencesError> {
        Self::at_path(default_preferences_path())
    }

    /// Create a store backed by an explicit file.
    pub fn at_path(path: PathBuf) -> Result<Self, PreferencesError> {
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(PreferencesPayload::default()),
            persist_to_disk: false,
        }
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the currently loaded values.
    pub fn snapshot(&self) -> PreferencesPayload {
        self.lock().clone()
    }

    /// Returns the canonical identifier of the preferred theme, if one was saved.
    pub fn preferred_theme(&self) -> Option<String> {
        self.lock().preferred_theme.clone()
    }

    /// Persist a new preferred theme identifier.
    pub fn set_preferred_theme(&self, theme_id: Option<String>) -> Result<(), PreferencesError> {
        self.update(|payload| payload.preferred_theme = theme_id)
    }

    /// Apply `change` to the payload and persist it.
    pub fn update(&self, change: impl FnOnce(&mut PreferencesPayload)) -> Result<(), PreferencesError> {
        let mut payload = self.lock();
        change(&mut payload);
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, PreferencesPayload> {
        // A panic while holding the lock cannot leave the payload half-written.
        self.payload.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save_locked(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn default_preferences_path() -> PathBuf {
    if let Ok(path) = env::var(PREFERENCES_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("peerwait")
        .join(PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PreferencesPayload::default()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}
