//! User settings, persisted as JSON in the OS config directory.
//!
//! Every field carries `#[serde(default)]`, so a partial or hand-edited file
//! is valid and missing keys fall back to the built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};

use crate::model::{ReminderConfig, TimelineMetrics};

const APP_NAME: &str = "AssignmentTracker";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where assignments are stored. Defaults to `<data dir>/assignments.json`.
    pub data_file: PathBuf,
    pub reminder_interval_secs: u64,
    pub reminder_window_secs: i64,
    /// When false, date reminders may refire on every pass inside their window.
    pub dedupe_date_reminders: bool,
    pub due_soon_days: i64,
    pub urgent_days: i64,
    pub min_day_width: f32,
    pub row_height: f32,
    pub row_spacing: f32,
    /// Save after every change instead of only at shutdown.
    pub autosave: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: data_dir().join("assignments.json"),
            reminder_interval_secs: 60,
            reminder_window_secs: 60,
            dedupe_date_reminders: true,
            due_soon_days: 10,
            urgent_days: 5,
            min_day_width: 10.0,
            row_height: 10.0,
            row_spacing: 5.0,
            autosave: true,
        }
    }
}

impl Settings {
    pub fn default_path() -> PathBuf {
        config_dir().join("settings.json")
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn reminder_config(&self) -> ReminderConfig {
        ReminderConfig {
            interval: StdDuration::from_secs(self.reminder_interval_secs.max(1)),
            window: chrono::Duration::seconds(self.reminder_window_secs.max(1)),
            dedupe_date_triggers: self.dedupe_date_reminders,
        }
    }

    pub fn timeline_metrics(&self, viewport_width: f32) -> TimelineMetrics {
        TimelineMetrics {
            viewport_width,
            min_day_width: self.min_day_width,
            row_height: self.row_height,
            row_spacing: self.row_spacing,
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

fn config_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
