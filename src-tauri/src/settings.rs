use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

use crate::annotation::DEFAULT_DEBOUNCE_SECS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Where exports land when no destination is given. `None` means the Desktop.
    pub export_dir: Option<PathBuf>,
    /// Minimum gap between accepted marks, applied from the next loaded video.
    pub debounce_secs: f64,
    /// Extension of the caption file looked up next to a video.
    pub caption_extension: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            export_dir: None,
            debounce_secs: DEFAULT_DEBOUNCE_SECS,
            caption_extension: "srt".into(),
        }
    }
}

impl AppSettings {
    fn normalized(mut self) -> Self {
        if !self.debounce_secs.is_finite() || self.debounce_secs < 0.0 {
            self.debounce_secs = DEFAULT_DEBOUNCE_SECS;
        }
        let extension = self.caption_extension.trim().trim_start_matches('.');
        self.caption_extension = if extension.is_empty() {
            "srt".into()
        } else {
            extension.to_ascii_lowercase()
        };
        self
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str::<AppSettings>(&contents)
                .unwrap_or_default()
                .normalized()
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> AppSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, settings: AppSettings) -> Result<AppSettings> {
        self.update(|current| *current = settings)
    }

    pub fn update<F>(&self, apply: F) -> Result<AppSettings>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = guard.clone();
        apply(&mut next);
        let next = next.normalized();
        self.persist(&next)?;
        *guard = next.clone();
        Ok(next)
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
