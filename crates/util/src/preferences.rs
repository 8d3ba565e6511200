//! User preference persistence for guidekit.
//!
//! A tiny JSON-backed store for the preferred theme and the quick select
//! popover's recently-used ranges. The file lives in the standard
//! configuration directory (`~/.config/guidekit/preferences.json` on most
//! platforms) and access is serialized through an internal `Mutex`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use guidekit_types::DurationRange;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::path_processing::{expand_tilde, guidekit_config_dir};

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "GUIDEKIT_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Maximum number of recently used ranges kept on disk.
pub const RECENTLY_USED_LIMIT: usize = 10;

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
    /// Canonical identifier of the theme selected in the TUI.
    pub preferred_theme: Option<String>,
    /// Most recent first.
    #[serde(default)]
    pub recently_used_ranges: Vec<DurationRange>,
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Opens the store at the default location, honouring
    /// `GUIDEKIT_PREFERENCES_PATH`.
    pub fn new() -> Result<Self, PreferencesError> {
        Self::at_path(default_preferences_path())
    }

    /// Opens the store backed by `path`. A missing file yields defaults.
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

    pub fn preferred_theme(&self) -> Option<String> {
        self.lock().preferred_theme.clone()
    }

    /// Persist a new preferred theme identifier.
    pub fn set_preferred_theme(&self, theme_id: Option<String>) -> Result<(), PreferencesError> {
        let mut payload = self.lock();
        payload.preferred_theme = theme_id;
        self.save_locked(&payload)
    }

    pub fn recently_used_ranges(&self) -> Vec<DurationRange> {
        self.lock().recently_used_ranges.clone()
    }

    /// Moves `range` to the front of the recently used list.
    ///
    /// Entries with the same endpoints are collapsed and the list is capped at
    /// [`RECENTLY_USED_LIMIT`]. Returns the updated list.
    pub fn remember_range(&self, range: DurationRange) -> Result<Vec<DurationRange>, PreferencesError> {
        let mut payload = self.lock();
        payload.recently_used_ranges.retain(|existing| !existing.same_span(&range));
        payload.recently_used_ranges.insert(0, range);
        payload.recently_used_ranges.truncate(RECENTLY_USED_LIMIT);
        self.save_locked(&payload)?;
        Ok(payload.recently_used_ranges.clone())
    }

    fn lock(&self) -> MutexGuard<'_, PreferencesPayload> {
        self.payload.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn save_locked(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        if !self.persist_to_disk {
            return Ok(());
        }
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

    guidekit_config_dir().join(PREFERENCES_FILE_NAME)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_and_ranges_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE_NAME);

        let prefs = UserPreferences::at_path(path.clone()).unwrap();
        prefs.set_preferred_theme(Some("dracula".into())).unwrap();
        prefs.remember_range(DurationRange::new("now-15m", "now")).unwrap();

        let reloaded = UserPreferences::at_path(path).unwrap();
        assert_eq!(reloaded.preferred_theme().as_deref(), Some("dracula"));
        assert_eq!(reloaded.recently_used_ranges(), vec![DurationRange::new("now-15m", "now")]);
    }

    #[test]
    fn remember_range_dedupes_and_caps() {
        let prefs = UserPreferences::ephemeral();
        for minutes in 0..12 {
            prefs.remember_range(DurationRange::new(format!("now-{minutes}m"), "now")).unwrap();
        }
        let ranges = prefs
            .remember_range(DurationRange::labeled("now-5m", "now", "five"))
            .unwrap();
        assert_eq!(ranges.len(), RECENTLY_USED_LIMIT);
        assert_eq!(ranges[0].label.as_deref(), Some("five"));
        assert_eq!(ranges.iter().filter(|r| r.start == "now-5m").count(), 1);
        assert_eq!(ranges[1].start, "now-11m");
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        let prefs = UserPreferences::at_path(path).unwrap();
        assert_eq!(prefs.preferred_theme(), None);
    }

    #[test]
    fn env_override_controls_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("custom.json");
        temp_env::with_var(PREFERENCES_PATH_ENV, Some(custom.to_str().unwrap()), || {
            let prefs = UserPreferences::new().unwrap();
            assert_eq!(prefs.path(), custom.as_path());
        });
    }
}
